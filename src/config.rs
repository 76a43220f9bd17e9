// src/config.rs

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::{fmt, path::PathBuf, str::FromStr, time::Duration};
use url::Url;

use crate::dataset::{RowPolicy, SOURCE};

pub const DEFAULT_AMOUNT: i64 = 15;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_URL: &str = "PRESIDENTS_URL";
pub const ENV_AMOUNT: &str = "PRESIDENTS_AMOUNT";
pub const ENV_RETRIES: &str = "PRESIDENTS_RETRIES";
pub const ENV_POLICY: &str = "PRESIDENTS_POLICY";

/// Print the most recent U.S. presidents from the Wikipedia list.
#[derive(Debug, Default, Parser)]
#[command(name = "presidents", version)]
pub struct Args {
    /// How many presidents to print, newest first
    #[arg(short, long, allow_negative_numbers = true)]
    pub amount: Option<i64>,

    /// Page to download instead of the Wikipedia list
    #[arg(long, conflicts_with = "file")]
    pub url: Option<Url>,

    /// Read a saved copy of the page instead of downloading it
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Handling of rows with fewer than three links: permissive, strict or skip
    #[arg(long)]
    pub policy: Option<RowPolicy>,

    /// Emit a JSON array instead of text blocks
    #[arg(long)]
    pub json: bool,

    /// Extra download attempts after a failed request
    #[arg(long)]
    pub retries: Option<u32>,

    /// Delay before the first retry in milliseconds, doubled on each retry
    #[arg(long)]
    pub backoff_ms: Option<u64>,

    /// Per-request timeout in seconds (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,
}

/// Where the page HTML is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Remote(Url),
    Local(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote(url) => write!(f, "{}", url),
            Source::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: Source,
    pub amount: i64,
    pub policy: RowPolicy,
    pub json: bool,
    pub retries: u32,
    pub backoff_ms: u64,
    pub timeout: Duration,
}

impl Config {
    /// Merge flags over environment over defaults. `env` looks up a variable
    /// by name.
    pub fn resolve<F>(args: Args, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = match (args.file, args.url) {
            (Some(path), _) => Source::Local(path),
            (None, Some(url)) => Source::Remote(url),
            (None, None) => match env_parse::<Url, _>(&env, ENV_URL)? {
                Some(url) => Source::Remote(url),
                None => Source::Remote(Url::parse(SOURCE).context("parsing default source URL")?),
            },
        };

        let amount = match args.amount {
            Some(n) => n,
            None => env_parse::<i64, _>(&env, ENV_AMOUNT)?.unwrap_or(DEFAULT_AMOUNT),
        };
        let retries = match args.retries {
            Some(n) => n,
            None => env_parse::<u32, _>(&env, ENV_RETRIES)?.unwrap_or(DEFAULT_RETRIES),
        };
        let policy = match args.policy {
            Some(p) => p,
            None => env_parse::<RowPolicy, _>(&env, ENV_POLICY)?.unwrap_or_default(),
        };

        Ok(Self {
            source,
            amount,
            policy,
            json: args.json,
            retries,
            backoff_ms: args.backoff_ms.unwrap_or(DEFAULT_BACKOFF_MS),
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

fn env_parse<T, F>(env: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| anyhow!("{}", e))
                .with_context(|| format!("invalid {}={:?}", key, raw))
        })
        .transpose()
}
