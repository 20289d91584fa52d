//! CSV ingestion: header resolution, value coercion, and row cleaning.
//!
//! Rows whose date or price cannot be parsed, or whose state/market/commodity
//! is blank after trimming, are dropped and counted in [`IngestReport`].

use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;

use super::error::DataError;
use super::schema::ColumnMap;
use crate::domain::PriceRow;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%d-%b-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a date cell. Date-times keep only their date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Parse a price cell, tolerating thousands separators.
///
/// Returns `None` for anything that is not a finite, non-negative number.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

/// Outcome of a single ingestion pass.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub rows: Vec<PriceRow>,
    /// Records discarded during cleaning.
    pub dropped: usize,
}

/// Read and clean every record from a CSV source.
pub fn read_rows<R: Read>(source: R) -> Result<IngestReport, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let columns = ColumnMap::resolve(reader.headers()?)?;
    let mut report = IngestReport::default();

    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let date = parse_date(field(columns.date));
        let price = parse_price(field(columns.price));
        match (date, price) {
            (Some(date), Some(price)) => {
                let row = PriceRow::new(
                    date,
                    field(columns.state),
                    field(columns.market),
                    field(columns.commodity),
                    price,
                );
                if row.is_valid() {
                    report.rows.push(row);
                } else {
                    report.dropped += 1;
                }
            }
            _ => report.dropped += 1,
        }
    }

    Ok(report)
}
