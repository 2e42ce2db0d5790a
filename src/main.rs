mod models;
mod scrapers;
mod storage;

use anyhow::Result;
use models::FlightRecord;
use scrapers::{flights, Backend, ChromePage, HttpPage, Page, ScrapeConfig};
use storage::PersistOutcome;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Crawl `url` on `page`, then release the page whether or not the crawl succeeded
async fn scrape_with<P: Page>(mut page: P, url: &str) -> Result<Vec<FlightRecord>> {
    let result = flights::crawl(&mut page, url).await;
    page.close();
    result
}

async fn run(config: &ScrapeConfig) -> Result<PersistOutcome> {
    let records = match config.backend {
        Backend::Browser => scrape_with(ChromePage::launch(config)?, &config.url).await?,
        Backend::Http => scrape_with(HttpPage::new()?, &config.url).await?,
    };

    info!("Scraped {} flights", records.len());
    storage::persist(&records, &config.output)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("✈️  Flight Scout - one-way results scraper");

    let config = ScrapeConfig::from_env()?;

    match run(&config).await? {
        PersistOutcome::Empty => info!("No flights captured; store left unchanged"),
        PersistOutcome::Saved {
            rows_appended,
            rows_total,
        } => info!(
            "💾 Appended {} rows to {} ({} rows after cleaning)",
            rows_appended,
            config.output.display(),
            rows_total
        ),
    }

    Ok(())
}
