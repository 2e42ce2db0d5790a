use anyhow::Result;
use async_trait::async_trait;

/// The slice of a browser page the flight crawl needs.
/// Implemented by the Chrome session and the static HTTP fetcher, and by fixtures in tests.
#[async_trait]
pub trait Page: Send {
    /// Load `url` into the page
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Block until at least one element matches `selector`, or fail
    async fn wait_for_selector(&self, selector: &str) -> Result<()>;

    /// Current HTML of the whole page
    async fn content(&self) -> Result<String>;

    /// Release the page and whatever owns it
    fn close(self)
    where
        Self: Sized;

    /// Name of the backend, for logging
    fn backend_name(&self) -> &'static str;
}
