use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;

/// One-way search the scraper targets when nothing else is configured
pub const DEFAULT_URL: &str = "https://www.google.com/travel/flights/search?tfs=CBwQAhopEgoyMDI2LTA3LTIyagwIAhIIL20vMDZ0MnRyDQgCEgkvbS8wM3puY2pAAUgBcAGCAQsI____________AZgBAg";

/// How the results page is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Drive a real Chrome instance
    Browser,
    /// Fetch the HTML once over plain HTTP
    Http,
}

/// Run parameters for a single scrape
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Search results page to scrape
    pub url: String,
    /// CSV store the results are appended to
    pub output: PathBuf,
    /// Launch Chrome without a window
    pub headless: bool,
    pub backend: Backend,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            output: PathBuf::from("flight_data.csv"),
            headless: false,
            backend: Backend::Browser,
        }
    }
}

impl ScrapeConfig {
    /// Defaults, overridden by any `FLIGHT_SCOUT_*` variables that are set
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("FLIGHT_SCOUT_URL") {
            config.url = url;
        }
        if let Some(output) = lookup("FLIGHT_SCOUT_OUTPUT") {
            config.output = PathBuf::from(output);
        }
        if let Some(headless) = lookup("FLIGHT_SCOUT_HEADLESS") {
            config.headless = parse_flag(&headless)?;
        }
        if let Some(backend) = lookup("FLIGHT_SCOUT_BACKEND") {
            config.backend = match backend.to_ascii_lowercase().as_str() {
                "browser" | "chrome" => Backend::Browser,
                "http" => Backend::Http,
                other => bail!("Unknown FLIGHT_SCOUT_BACKEND `{}` (expected browser or http)", other),
            };
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("Expected a boolean, got `{}`", other),
    }
}
