use crate::scrapers::document::Document;
use crate::scrapers::traits::Page;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Static page fetched once over HTTP.
///
/// Works for saved or server-rendered result pages; nothing on it ever changes
/// after the fetch, so waiting for a missing element fails straight away.
/// No JavaScript runs, so it cannot load the default Google Flights search,
/// whose result cards are rendered client-side.
pub struct HttpPage {
    client: Client,
    html: Option<String>,
}

impl HttpPage {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, html: None })
    }

    fn loaded(&self) -> Result<&str> {
        self.html
            .as_deref()
            .ok_or_else(|| anyhow!("No page loaded yet"))
    }
}

#[async_trait]
impl Page for HttpPage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        info!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            warn!("{} returned status: {}", url, response.status());
            bail!("Failed to fetch {}: {}", url, response.status());
        }

        let html = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes of HTML", html.len());
        self.html = Some(html);
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<()> {
        let found = {
            let document = Document::parse(self.loaded()?);
            !document.query_selector_all(selector)?.is_empty()
        };
        if !found {
            bail!("No element matches `{}` on the fetched page", selector);
        }
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        self.loaded().map(str::to_string)
    }

    fn close(self) {
        debug!("Dropping HTTP client");
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
