use crate::scrapers::traits::Page;
use crate::scrapers::types::ScrapeConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One Chrome instance with a single tab.
///
/// Dropping it kills the browser process, so the browser is released on every
/// exit path even when [`Page::close`] is never reached.
pub struct ChromePage {
    browser: Browser,
    tab: Arc<Tab>,
}

impl ChromePage {
    /// Launch Chrome and open the tab the crawl will drive
    pub fn launch(config: &ScrapeConfig) -> Result<Self> {
        info!(
            "Launching Chrome ({})...",
            if config.headless { "headless" } else { "windowed" }
        );

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;

        Ok(Self { browser, tab })
    }

    /// CDP calls block, so run them off the async worker threads
    async fn with_tab<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Tab) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        tokio::task::spawn_blocking(move || f(&tab))
            .await
            .context("Browser task panicked")?
    }
}

#[async_trait]
impl Page for ChromePage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        let target = url.to_string();
        self.with_tab(move |tab| {
            tab.navigate_to(&target)?;
            tab.wait_until_navigated()?;
            Ok(())
        })
        .await
        .with_context(|| format!("Failed to load {}", url))
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<()> {
        debug!("Waiting for `{}`", selector);
        let target = selector.to_string();
        self.with_tab(move |tab| {
            tab.wait_for_element(&target)?;
            Ok(())
        })
        .await
        .with_context(|| format!("Timed out waiting for `{}`", selector))
    }

    async fn content(&self) -> Result<String> {
        self.with_tab(|tab| tab.get_content())
            .await
            .context("Failed to read page HTML")
    }

    fn close(self) {
        info!("Closing browser");
        if let Err(e) = self.tab.close(false) {
            warn!("Failed to close tab cleanly: {}", e);
        }
        drop(self.browser);
    }

    fn backend_name(&self) -> &'static str {
        "chrome"
    }
}
