use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder stored for any field the result card did not expose
pub const NOT_AVAILABLE: &str = "N/A";

/// One one-way flight result as captured from the search page.
///
/// Column names match the CSV header written to the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FlightRecord {
    #[serde(rename = "Departure Time")]
    pub departure_time: String,
    #[serde(rename = "Arrival Time")]
    pub arrival_time: String,
    #[serde(rename = "Airline Company")]
    pub airline: String,
    #[serde(rename = "Flight Duration")]
    pub duration: String,
    #[serde(rename = "Stops")]
    pub stops: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Date Purchase")]
    pub purchase_date: NaiveDate,
}

impl FlightRecord {
    /// Header row, in column order
    pub const HEADERS: [&'static str; 7] = [
        "Departure Time",
        "Arrival Time",
        "Airline Company",
        "Flight Duration",
        "Stops",
        "Price",
        "Date Purchase",
    ];
}
