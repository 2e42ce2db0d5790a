use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

/// Parsed snapshot of a page, taken once after the results have rendered.
/// Nodes added to the live page afterwards are not visible here.
pub struct Document {
    html: Html,
}

/// One element inside a [`Document`]
#[derive(Clone, Copy)]
pub struct ResultElement<'a> {
    element: ElementRef<'a>,
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector `{}`: {:?}", selector, e))
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Every element matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<ResultElement<'_>>> {
        let selector = parse_selector(selector)?;
        Ok(self
            .html
            .select(&selector)
            .map(|element| ResultElement { element })
            .collect())
    }
}

impl<'a> ResultElement<'a> {
    /// First descendant matching `selector`, if any
    pub fn query_selector(&self, selector: &str) -> Result<Option<ResultElement<'a>>> {
        let selector = parse_selector(selector)?;
        Ok(self
            .element
            .select(&selector)
            .next()
            .map(|element| ResultElement { element }))
    }

    /// Text content with runs of whitespace collapsed, the way it reads on screen
    pub fn inner_text(&self) -> String {
        self.element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
