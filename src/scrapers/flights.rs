use crate::models::{FlightRecord, NOT_AVAILABLE};
use crate::scrapers::document::{Document, ResultElement};
use crate::scrapers::traits::Page;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

/// One flight card on the results page
pub const RESULT_SELECTOR: &str = ".pIav2d";

/// Where one field's text lives inside a result card
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub selector: &'static str,
    /// Substring the element's `aria-label` must contain
    pub label: Option<&'static str>,
}

impl FieldDescriptor {
    const fn new(selector: &'static str) -> Self {
        Self { selector, label: None }
    }

    const fn labelled(selector: &'static str, label: &'static str) -> Self {
        Self {
            selector,
            label: Some(label),
        }
    }

    /// Selector with the label filter folded in
    pub fn css(&self) -> String {
        match self.label {
            Some(label) => format!("{}[aria-label*=\"{}\"]", self.selector, label),
            None => self.selector.to_string(),
        }
    }
}

pub const DEPARTURE_TIME: FieldDescriptor = FieldDescriptor::labelled("span", "Departure time");
pub const ARRIVAL_TIME: FieldDescriptor = FieldDescriptor::labelled("span", "Arrival time");
pub const AIRLINE: FieldDescriptor = FieldDescriptor::new(".sSHqwe");
pub const DURATION: FieldDescriptor = FieldDescriptor::new("div.gvkrdb");
pub const STOPS: FieldDescriptor = FieldDescriptor::new("div.EfT7Ae span.ogfYpf");
pub const PRICE: FieldDescriptor = FieldDescriptor::new("div.FpEdX span");

/// Visible text of the first match for `field` inside `element`, if there is one
pub fn find_field(element: &ResultElement<'_>, field: &FieldDescriptor) -> Result<Option<String>> {
    Ok(element.query_selector(&field.css())?.map(|el| el.inner_text()))
}

/// Like [`find_field`], with a miss mapped to the `N/A` placeholder
pub fn extract_field(element: &ResultElement<'_>, field: &FieldDescriptor) -> Result<String> {
    Ok(find_field(element, field)?.unwrap_or_else(|| {
        debug!("No match for `{}`", field.css());
        NOT_AVAILABLE.to_string()
    }))
}

/// Build the record for one result card, stamped with today's date
pub fn build_record(element: &ResultElement<'_>) -> Result<FlightRecord> {
    build_record_on(element, Local::now().date_naive())
}

pub fn build_record_on(element: &ResultElement<'_>, purchase_date: NaiveDate) -> Result<FlightRecord> {
    Ok(FlightRecord {
        departure_time: extract_field(element, &DEPARTURE_TIME)?,
        arrival_time: extract_field(element, &ARRIVAL_TIME)?,
        airline: extract_field(element, &AIRLINE)?,
        duration: extract_field(element, &DURATION)?,
        stops: extract_field(element, &STOPS)?,
        price: extract_field(element, &PRICE)?,
        purchase_date,
    })
}

/// Load `url`, wait for the result cards and turn each one into a record, in page order
pub async fn crawl<P: Page>(page: &mut P, url: &str) -> Result<Vec<FlightRecord>> {
    page.goto(url).await?;

    info!("Waiting for flight results to render...");
    page.wait_for_selector(RESULT_SELECTOR).await?;

    let html = page.content().await?;
    let document = Document::parse(&html);
    let cards = document.query_selector_all(RESULT_SELECTOR)?;
    info!("Found {} flight results via {}", cards.len(), page.backend_name());

    cards.iter().map(build_record).collect()
}
