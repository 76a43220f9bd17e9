// src/fetch.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::{Config, Source};

/// Wikipedia refuses requests without a descriptive agent.
pub const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (presidents table extractor)"
);

pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("building HTTP client")
}

async fn get_text_core(client: &Client, url: &Url) -> Result<String> {
    debug!(%url, "requesting page");
    let resp = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("requesting {}", url))?
        .error_for_status()
        .with_context(|| format!("bad status from {}", url))?;
    resp.text()
        .await
        .with_context(|| format!("reading {}", url))
}

/// Delay before retry number `attempt` (1-based): doubles from `initial_ms`.
pub fn backoff_delay(initial_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(initial_ms.saturating_mul(factor))
}

/// GET `url` as text, retrying up to `max_retries` times with exponential backoff.
#[instrument(level = "info", skip(client, url), fields(url = %url))]
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    max_retries: u32,
    initial_backoff_ms: u64,
) -> Result<String> {
    let mut attempts = 0;
    loop {
        match get_text_core(client, url).await {
            Ok(t) => return Ok(t),
            Err(e) if attempts < max_retries => {
                attempts += 1;
                let delay = backoff_delay(initial_backoff_ms, attempts);
                warn!(%url, attempt = attempts, delay_ms = delay.as_millis() as u64, error = %e, "Retrying");
                sleep(delay).await;
            }
            Err(e) => {
                error!(%url, error = %e, "Exhausted retries");
                return Err(e);
            }
        }
    }
}

/// Load the page HTML from wherever `config` points.
pub async fn load(config: &Config) -> Result<String> {
    match &config.source {
        Source::Remote(url) => {
            let client = build_client(config.timeout)?;
            let html = fetch_page(&client, url, config.retries, config.backoff_ms).await?;
            info!(bytes = html.len(), "downloaded page");
            Ok(html)
        }
        Source::Local(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RowPolicy, TableContext, SOURCE};
    use std::io::Write;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tempfile::NamedTempFile;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Serve `failures` 500 responses, then 200 with `body` for every later request.
    async fn flaky_server(failures: usize, body: &'static str) -> Result<(Url, Arc<AtomicUsize>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = Url::parse(&format!("http://{}/list", listener.local_addr()?))?;
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let (status, text) = if n < failures {
                    ("500 Internal Server Error", "boom")
                } else {
                    ("200 OK", body)
                };
                let resp = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    text.len(),
                    text
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Ok((url, hits))
    }

    fn local(path: &std::path::Path) -> Config {
        Config {
            source: Source::Local(path.to_path_buf()),
            amount: 1,
            policy: RowPolicy::Permissive,
            json: false,
            retries: 0,
            backoff_ms: 0,
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff_delay(500, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(500, 2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(500, 4), Duration::from_millis(4000));
        assert_eq!(backoff_delay(500, 0), Duration::from_millis(500));
        assert_eq!(backoff_delay(u64::MAX, 80), Duration::from_millis(u64::MAX));
    }

    #[tokio::test]
    async fn retries_through_server_errors() -> Result<()> {
        let (url, hits) = flaky_server(2, "ok").await?;
        let client = build_client(Duration::from_secs(5))?;

        let body = fetch_page(&client, &url, 2, 1).await?;
        assert_eq!(body, "ok");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[tokio::test]
    async fn gives_up_after_retry_budget() -> Result<()> {
        let (url, hits) = flaky_server(5, "late").await?;
        let client = build_client(Duration::from_secs(5))?;

        let err = fetch_page(&client, &url, 1, 1).await.unwrap_err();
        assert!(err.to_string().contains("bad status"));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn refused_connection_is_error() -> Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = Url::parse(&format!("http://{}/", listener.local_addr()?))?;
        drop(listener);

        let client = build_client(Duration::from_secs(5))?;
        let err = fetch_page(&client, &url, 1, 1).await.unwrap_err();
        assert!(err.to_string().contains("requesting"));
        Ok(())
    }

    #[tokio::test]
    async fn loads_saved_page() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            "<table><tbody><tr><td><a>1</a><a>i</a><a>George Washington</a></td></tr></tbody></table>"
        )?;

        let html = load(&local(file.path())).await?;
        let ctx = TableContext::parse(&html);
        assert_eq!(ctx.render(1)?, "id 1\nname George Washington");
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.html");
        let err = load(&local(&path)).await.unwrap_err();
        assert!(err.to_string().contains("absent.html"));
    }

    /// Live check against Wikipedia; needs network.
    #[tokio::test]
    #[ignore]
    async fn live_wikipedia_table() -> Result<()> {
        let client = build_client(Duration::from_secs(30))?;
        let html = fetch_page(&client, &Url::parse(SOURCE)?, 2, 500).await?;
        let out = TableContext::parse(&html).render(3)?;
        println!("{}", out);
        assert_eq!(out.split("\n\n").count(), 3);
        Ok(())
    }
}
