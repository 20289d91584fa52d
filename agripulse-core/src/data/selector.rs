//! History selection with a three-tier fallback policy.
//!
//! 1. commodity + market (+ state when provided)
//! 2. commodity + state, if tier 1 is empty and a state was provided
//! 3. commodity only, if still empty
//!
//! Tier 3 can feed a market's forecast with unrelated markets' prices. It is
//! kept as the default behavior and reported through [`SelectionTier`] so
//! callers can log or reject it.

use serde::{Deserialize, Serialize};

use super::dataset::{normalize_key, Dataset, RowKeys};
use crate::domain::{HistoryPoint, PriceRow};

/// Which fallback tier produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionTier {
    /// Rows for the requested market (and state, when given).
    Exact,
    /// Rows for every market of the requested state.
    StateWide,
    /// Rows for the commodity across the whole dataset.
    CommodityWide,
}

/// A selected series and the tier it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub tier: SelectionTier,
    /// Ascending by date; same-date rows keep dataset order.
    pub points: Vec<HistoryPoint>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Resolve a price series for `(state, market, commodity)`.
///
/// An empty result is not an error; callers check emptiness and the minimum
/// history length themselves.
pub fn select_history(
    dataset: &Dataset,
    state: Option<&str>,
    market: &str,
    commodity: &str,
) -> Selection {
    let commodity = normalize_key(commodity);
    let market = normalize_key(market);
    let state = state.map(normalize_key).filter(|s| !s.is_empty());

    let exact = collect(dataset, |k| {
        k.commodity == commodity
            && k.market == market
            && state.as_ref().map_or(true, |s| &k.state == s)
    });
    if !exact.is_empty() {
        return Selection {
            tier: SelectionTier::Exact,
            points: exact,
        };
    }

    if let Some(state) = state.as_ref().filter(|_| !market.is_empty()) {
        let state_wide = collect(dataset, |k| k.commodity == commodity && &k.state == state);
        if !state_wide.is_empty() {
            return Selection {
                tier: SelectionTier::StateWide,
                points: state_wide,
            };
        }
    }

    Selection {
        tier: SelectionTier::CommodityWide,
        points: collect(dataset, |k| k.commodity == commodity),
    }
}

/// The single state a market belongs to.
///
/// Returns `None` when the market is unknown or appears under more than one
/// state. States are compared by normalized key; the first spelling seen in
/// the dataset is returned.
pub fn resolve_state_for_market(dataset: &Dataset, market: &str) -> Option<String> {
    let market = normalize_key(market);
    if market.is_empty() {
        return None;
    }

    let mut found: Option<(&str, &PriceRow)> = None;
    for (row, keys) in dataset.keyed_rows() {
        if keys.market != market {
            continue;
        }
        match found {
            None => found = Some((keys.state.as_str(), row)),
            Some((state, _)) if state == keys.state => {}
            Some(_) => return None,
        }
    }
    found.map(|(_, row)| row.state.clone())
}

/// Distinct markets trading `commodity` in `state`, sorted by name.
pub fn markets_for_state_and_commodity(
    dataset: &Dataset,
    state: &str,
    commodity: &str,
) -> Vec<String> {
    let state = normalize_key(state);
    let commodity = normalize_key(commodity);
    let mut markets: Vec<String> = dataset
        .keyed_rows()
        .filter(|(_, k)| k.state == state && k.commodity == commodity)
        .map(|(row, _)| row.market.clone())
        .collect();
    markets.sort();
    markets.dedup();
    markets
}

fn collect(dataset: &Dataset, keep: impl Fn(&RowKeys) -> bool) -> Vec<HistoryPoint> {
    let mut points: Vec<HistoryPoint> = dataset
        .keyed_rows()
        .filter(|(_, k)| keep(k))
        .map(|(row, _)| HistoryPoint::from(row))
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(i: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i)
    }

    fn dataset(extra: Vec<PriceRow>) -> Dataset {
        let mut rows: Vec<PriceRow> = (0..30)
            .map(|i| PriceRow::new(day(29 - i), "Punjab", "Khanna", "Wheat", 2000.0 + i as f64))
            .collect();
        rows.extend(extra);
        Dataset::from_rows(rows).unwrap()
    }

    #[test]
    fn exact_tier_is_sorted_ascending() {
        let ds = dataset(vec![]);
        let sel = select_history(&ds, Some("punjab"), " KHANNA ", "wheat");
        assert_eq!(sel.tier, SelectionTier::Exact);
        assert_eq!(sel.len(), 30);
        assert!(sel.points.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn same_date_rows_keep_dataset_order() {
        let ds = dataset(vec![
            PriceRow::new(day(100), "Punjab", "Khanna", "Wheat", 1.0),
            PriceRow::new(day(100), "Punjab", "Khanna", "Wheat", 2.0),
        ]);
        let sel = select_history(&ds, None, "Khanna", "Wheat");
        let tail: Vec<f64> = sel.points.iter().rev().take(2).map(|p| p.value).collect();
        assert_eq!(tail, vec![2.0, 1.0]);
    }

    #[test]
    fn falls_back_to_state_then_commodity() {
        let ds = dataset(vec![PriceRow::new(day(0), "Haryana", "Karnal", "Rice", 3000.0)]);

        let sel = select_history(&ds, Some("Punjab"), "Ludhiana", "Wheat");
        assert_eq!(sel.tier, SelectionTier::StateWide);
        assert_eq!(sel.len(), 30);

        let sel = select_history(&ds, Some("Kerala"), "Kochi", "Rice");
        assert_eq!(sel.tier, SelectionTier::CommodityWide);
        assert_eq!(sel.len(), 1);

        let sel = select_history(&ds, None, "Kochi", "Wheat");
        assert_eq!(sel.tier, SelectionTier::CommodityWide);
        assert_eq!(sel.len(), 30);
    }

    #[test]
    fn unknown_commodity_is_empty_not_error() {
        let ds = dataset(vec![]);
        let sel = select_history(&ds, Some("Punjab"), "Khanna", "Saffron");
        assert!(sel.is_empty());
        assert_eq!(sel.tier, SelectionTier::CommodityWide);
    }

    #[test]
    fn blank_state_means_no_state_filter() {
        let ds = dataset(vec![]);
        let sel = select_history(&ds, Some("   "), "Khanna", "Wheat");
        assert_eq!(sel.tier, SelectionTier::Exact);
        assert_eq!(sel.len(), 30);
    }

    #[test]
    fn state_resolution() {
        let ds = dataset(vec![
            PriceRow::new(day(0), "punjab", "Khanna", "Rice", 1.0),
            PriceRow::new(day(0), "Punjab", "Rampur", "Wheat", 1.0),
            PriceRow::new(day(0), "Uttar Pradesh", "Rampur", "Wheat", 1.0),
        ]);
        assert_eq!(resolve_state_for_market(&ds, "khanna"), Some("Punjab".into()));
        assert_eq!(resolve_state_for_market(&ds, "Rampur"), None);
        assert_eq!(resolve_state_for_market(&ds, "Nowhere"), None);
        assert_eq!(resolve_state_for_market(&ds, "  "), None);
    }

    #[test]
    fn markets_are_distinct_and_sorted() {
        let ds = dataset(vec![
            PriceRow::new(day(0), "Punjab", "Amritsar", "Wheat", 1.0),
            PriceRow::new(day(1), "Punjab", "Amritsar", "Wheat", 1.0),
            PriceRow::new(day(0), "Punjab", "Bathinda", "Rice", 1.0),
        ]);
        assert_eq!(
            markets_for_state_and_commodity(&ds, "PUNJAB", "wheat"),
            vec!["Amritsar".to_string(), "Khanna".to_string()]
        );
        assert!(markets_for_state_and_commodity(&ds, "Kerala", "Wheat").is_empty());
    }
}
