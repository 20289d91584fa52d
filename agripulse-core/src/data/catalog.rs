//! Dataset metadata queries: distinct states, commodities and markets, and
//! the latest-price summary for a handful of tracked commodities.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dataset::{normalize_key, Dataset};
use crate::domain::TrendDirection;

/// Commodities summarized by default.
pub const DEFAULT_TRACKED_COMMODITIES: &[&str] = &["Wheat", "Tomato", "Potato", "Onion"];

/// Day-over-day change (%) beyond which a commodity is trending.
const TREND_THRESHOLD_PCT: f64 = 0.5;

/// Latest average price of a commodity and its move since the previous day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropPriceSnapshot {
    pub name: String,
    /// Average modal price on the latest date, rounded to a whole unit.
    pub price: f64,
    /// Percent change against the previous date, one decimal.
    pub change: f64,
    pub trend: TrendDirection,
}

impl Dataset {
    /// Distinct state names, sorted.
    pub fn unique_states(&self) -> Vec<String> {
        sorted_unique(self.rows().iter().map(|r| r.state.as_str()))
    }

    /// Distinct commodity names, sorted.
    pub fn unique_commodities(&self) -> Vec<String> {
        sorted_unique(self.rows().iter().map(|r| r.commodity.as_str()))
    }

    /// Distinct markets trading `commodity`, sorted.
    pub fn markets_for_commodity(&self, commodity: &str) -> Vec<String> {
        let commodity = normalize_key(commodity);
        sorted_unique(
            self.keyed_rows()
                .filter(|(_, k)| k.commodity == commodity)
                .map(|(row, _)| row.market.as_str()),
        )
    }

    /// Latest-price snapshot for each target commodity present in the data.
    ///
    /// Commodities with a single distinct date report their overall average
    /// with zero change. Absent commodities are omitted.
    pub fn latest_crop_prices(&self, targets: &[&str]) -> Vec<CropPriceSnapshot> {
        targets
            .iter()
            .filter_map(|name| self.crop_snapshot(name))
            .collect()
    }

    fn crop_snapshot(&self, name: &str) -> Option<CropPriceSnapshot> {
        let key = normalize_key(name);
        // date -> (sum, count)
        let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for (row, _) in self.keyed_rows().filter(|(_, k)| k.commodity == key) {
            let entry = by_date.entry(row.date).or_insert((0.0, 0));
            entry.0 += row.price;
            entry.1 += 1;
        }

        let mut days = by_date.values().rev();
        let (latest_sum, latest_n) = *days.next()?;
        let Some(&(prev_sum, prev_n)) = days.next() else {
            return Some(CropPriceSnapshot {
                name: name.to_string(),
                price: (latest_sum / latest_n as f64).round(),
                change: 0.0,
                trend: TrendDirection::Flat,
            });
        };

        let latest = latest_sum / latest_n as f64;
        let previous = prev_sum / prev_n as f64;
        let change = if previous != 0.0 {
            (latest - previous) / previous * 100.0
        } else {
            0.0
        };
        let trend = if change > TREND_THRESHOLD_PCT {
            TrendDirection::Up
        } else if change < -TREND_THRESHOLD_PCT {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        };

        Some(CropPriceSnapshot {
            name: name.to_string(),
            price: latest.round(),
            change: (change * 10.0).round() / 10.0,
            trend,
        })
    }
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}
