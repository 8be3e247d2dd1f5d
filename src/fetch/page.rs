use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::time::sleep;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36";

/// Boundary to whatever renders pages for us. Everything downstream works
/// on the returned HTML string, so extraction stays testable against
/// fixtures and the renderer can be swapped for a real headless browser
/// without touching the pipeline.
pub trait PageSource {
    fn page_source(&self, url: &Url) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Plain-HTTP page source. After each fetch it waits `page_wait` before
/// returning, mirroring the load-then-settle pacing a browser-driven run
/// would use. The wait is a heuristic, not a correctness mechanism.
pub struct HttpPageSource {
    client: Client,
    page_wait: Duration,
}

impl HttpPageSource {
    pub fn new(page_wait: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("building HTTP client")?;
        Ok(HttpPageSource { client, page_wait })
    }
}

impl PageSource for HttpPageSource {
    async fn page_source(&self, url: &Url) -> Result<String> {
        let resp = self
            .client
            .get(url.as_str())
            .send()
            .await
            .with_context(|| format!("fetching {}", url))?
            .error_for_status()
            .with_context(|| format!("fetching {}", url))?;
        let html = resp
            .text()
            .await
            .with_context(|| format!("reading body of {}", url))?;
        sleep(self.page_wait).await;
        Ok(html)
    }
}
