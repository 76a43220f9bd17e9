use anyhow::{Context, Result};
use clap::Parser;
use presidents::{
    config::{Args, Config},
    dataset::{self, TableContext},
    fetch,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) resolve config ───────────────────────────────────────────
    let config = Config::resolve(Args::parse(), |key| std::env::var(key).ok())?;
    info!(source = %config.source, amount = config.amount, policy = %config.policy, "startup");

    // ─── 3) load page ────────────────────────────────────────────────
    let html = fetch::load(&config).await?;

    // ─── 4) extract rows ─────────────────────────────────────────────
    let context = TableContext::parse(&html);
    let records = context
        .parsed_with(config.policy)
        .with_context(|| format!("extracting presidents from {}", config.source))?;
    info!(records = records.len(), "parsed table");

    // ─── 5) print ────────────────────────────────────────────────────
    if config.json {
        let latest = dataset::latest(&records, config.amount);
        println!("{}", serde_json::to_string_pretty(&latest)?);
    } else {
        println!("{}", dataset::format(&records, config.amount));
    }

    Ok(())
}
