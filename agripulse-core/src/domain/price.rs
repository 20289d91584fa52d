//! Price observations: the rows of the dataset and the series fed to a forecaster.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cleaned dataset row: the modal price of a commodity at a market on a day.
///
/// Invariants (enforced by the loader, see [`PriceRow::is_valid`]):
/// state, market and commodity are non-empty after trimming, and the price is
/// finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub state: String,
    pub market: String,
    pub commodity: String,
    pub price: f64,
}

impl PriceRow {
    /// Build a row with trimmed string fields.
    pub fn new(
        date: NaiveDate,
        state: &str,
        market: &str,
        commodity: &str,
        price: f64,
    ) -> Self {
        Self {
            date,
            state: state.trim().to_string(),
            market: market.trim().to_string(),
            commodity: commodity.trim().to_string(),
            price,
        }
    }

    /// True if the row satisfies the dataset invariants.
    pub fn is_valid(&self) -> bool {
        !self.state.trim().is_empty()
            && !self.market.trim().is_empty()
            && !self.commodity.trim().is_empty()
            && self.price.is_finite()
            && self.price >= 0.0
    }
}

/// A single `(ds, y)` pair consumed by the forecaster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    #[serde(rename = "ds")]
    pub date: NaiveDate,
    #[serde(rename = "y")]
    pub value: f64,
}

impl HistoryPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

impl From<&PriceRow> for HistoryPoint {
    fn from(row: &PriceRow) -> Self {
        Self {
            date: row.date,
            value: row.price,
        }
    }
}
