use crate::models::FlightRecord;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing::info;

/// What [`persist`] did with a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Nothing was scraped; the store was not touched
    Empty,
    Saved {
        rows_appended: usize,
        rows_total: usize,
    },
}

/// Append `records` to the CSV store at `path`, then clean the whole store in place
pub fn persist(records: &[FlightRecord], path: &Path) -> Result<PersistOutcome> {
    if records.is_empty() {
        info!("No data to save.");
        return Ok(PersistOutcome::Empty);
    }

    let rows_appended = append(records, path)?;
    info!("Saved CSV at: {}", display_path(path));

    let rows_total = normalize_file(path)?;
    info!("Cleaned data saved at: {}", display_path(path));

    Ok(PersistOutcome::Saved {
        rows_appended,
        rows_total,
    })
}

/// Add rows to the end of the store, writing the header first if the file is new or empty
pub fn append(records: &[FlightRecord], path: &Path) -> Result<usize> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let is_empty = file
        .metadata()
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len()
        == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if is_empty {
        writer.write_record(FlightRecord::HEADERS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(records.len())
}

/// Read every row in the store
pub fn load(path: &Path) -> Result<Vec<FlightRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    reader
        .deserialize()
        .collect::<Result<Vec<FlightRecord>, _>>()
        .with_context(|| format!("Malformed row in {}", path.display()))
}

/// Replace the store's contents with a header and `records`
pub fn rewrite(records: &[FlightRecord], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(FlightRecord::HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Reload, clean and rewrite the store. Returns the number of rows kept.
pub fn normalize_file(path: &Path) -> Result<usize> {
    let records = normalize_records(load(path)?);
    rewrite(&records, path)?;
    Ok(records.len())
}

/// Clean price and stops on every row, then drop exact duplicates, keeping the first
/// occurrence. Cleaning runs first so rows that only differed in formatting collapse too.
pub fn normalize_records(records: Vec<FlightRecord>) -> Vec<FlightRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .map(|mut record| {
            record.price = clean_price(&record.price);
            record.stops = clean_stops(&record.stops);
            record
        })
        .filter(|record| seen.insert(record.clone()))
        .collect()
}

/// Digits only: `"$1,234"` becomes `"1234"`
pub fn clean_price(price: &str) -> String {
    price.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Trim any of the characters in `" stops"` from both ends
pub fn clean_stops(stops: &str) -> String {
    const STRIP: &str = " stops";
    stops.trim_matches(|c: char| STRIP.contains(c)).to_string()
}

/// Absolute form of `path` for log lines, falling back to it as given
fn display_path(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_AVAILABLE;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    const HEADER: &str =
        "Departure Time,Arrival Time,Airline Company,Flight Duration,Stops,Price,Date Purchase";

    fn record(airline: &str, stops: &str, price: &str) -> FlightRecord {
        FlightRecord {
            departure_time: "6:05 AM".into(),
            arrival_time: "9:40 AM".into(),
            airline: airline.into(),
            duration: "3 hr 35 min".into(),
            stops: stops.into(),
            price: price.into(),
            purchase_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
        }
    }

    #[test]
    fn price_keeps_only_digits() {
        assert_eq!(clean_price("$1,234"), "1234");
        assert_eq!(clean_price("Price unavailable"), "");
        assert_eq!(clean_price("412"), "412");
    }

    #[test]
    fn stops_strips_character_set_from_both_ends() {
        assert_eq!(clean_stops("2 stops"), "2");
        assert_eq!(clean_stops("1 stop"), "1");
        assert_eq!(clean_stops(NOT_AVAILABLE), NOT_AVAILABLE);
        // character set, not substring
        assert_eq!(clean_stops("Nonstop"), "Non");
    }

    #[test]
    fn duplicates_collapse_in_first_seen_order() {
        let a = record("Delta", "Nonstop", "$412");
        let b = record("United", "1 stop", "$389");
        let cleaned = normalize_records(vec![a.clone(), b.clone(), a.clone()]);

        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].airline, "Delta");
        assert_eq!(cleaned[1].airline, "United");
        assert_eq!(cleaned[1].price, "389");
        assert_eq!(cleaned[1].stops, "1");
    }

    #[test]
    fn rows_differing_only_in_formatting_collapse() {
        let cleaned = normalize_records(vec![
            record("Delta", "1 stop", "$412"),
            record("Delta", "1", "412"),
        ]);
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn append_writes_header_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.csv");

        append(&[record("Delta", "1 stop", "$412")], &path).unwrap();
        append(&[record("Delta", "1 stop", "$412")], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "6:05 AM,9:40 AM,Delta,3 hr 35 min,1 stop,$412,2026-07-01");
        assert_eq!(lines[1], lines[2]);
    }

    #[test]
    fn append_adds_header_to_zero_length_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.csv");
        fs::write(&path, "").unwrap();

        append(&[record("Delta", "1 stop", "$412")], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(HEADER));
    }

    #[test]
    fn normalize_file_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.csv");
        append(
            &[
                record("Delta", "2 stops", "$1,234"),
                record("Delta", "2 stops", "$1,234"),
                record("United", "Nonstop", "Price unavailable"),
            ],
            &path,
        )
        .unwrap();

        assert_eq!(normalize_file(&path).unwrap(), 2);
        let first = fs::read(&path).unwrap();
        assert_eq!(normalize_file(&path).unwrap(), 2);
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);

        let rows = load(&path).unwrap();
        assert_eq!(rows[0].price, "1234");
        assert_eq!(rows[0].stops, "2");
        assert_eq!(rows[1].price, "");
    }

    #[test]
    fn empty_batch_leaves_store_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.csv");

        assert_eq!(persist(&[], &path).unwrap(), PersistOutcome::Empty);
        assert!(!path.exists());
    }

    #[test]
    fn empty_batch_leaves_existing_store_byte_identical() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.csv");
        // raw rows that normalization would rewrite if it ran
        append(
            &[
                record("Delta", "1 stop", "$412"),
                record("Delta", "1 stop", "$412"),
            ],
            &path,
        )
        .unwrap();
        let before = fs::read(&path).unwrap();

        assert_eq!(persist(&[], &path).unwrap(), PersistOutcome::Empty);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn display_path_resolves_existing_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.csv");
        fs::write(&path, "").unwrap();

        let shown = display_path(&path);
        assert!(Path::new(&shown).is_absolute());
        assert!(shown.ends_with("flights.csv"));
        assert_eq!(display_path(Path::new("missing.csv")), "missing.csv");
    }

    #[test]
    fn persist_accumulates_across_runs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.csv");

        let outcome = persist(&[record("Delta", "1 stop", "$412")], &path).unwrap();
        assert_eq!(
            outcome,
            PersistOutcome::Saved {
                rows_appended: 1,
                rows_total: 1
            }
        );

        let outcome = persist(
            &[record("Delta", "1 stop", "$412"), record("United", "Nonstop", "$389")],
            &path,
        )
        .unwrap();
        assert_eq!(
            outcome,
            PersistOutcome::Saved {
                rows_appended: 2,
                rows_total: 2
            }
        );
    }
}
