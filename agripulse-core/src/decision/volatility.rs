//! Volatility class from the coefficient of variation of raw history.

use crate::domain::VolatilityLevel;

const LOW_CV_PCT: f64 = 1.2;
const MEDIUM_CV_PCT: f64 = 2.5;

/// Classify a price series by `population std / mean × 100`.
///
/// Fewer than two values, or a zero mean, classify as Low.
pub fn classify_volatility(prices: &[f64]) -> VolatilityLevel {
    if prices.len() < 2 {
        return VolatilityLevel::Low;
    }

    let n = prices.len() as f64;
    let mean = prices.iter().sum::<f64>() / n;
    let std = (prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n).sqrt();
    let cv = if mean == 0.0 { 0.0 } else { std / mean * 100.0 };

    if cv < LOW_CV_PCT {
        VolatilityLevel::Low
    } else if cv < MEDIUM_CV_PCT {
        VolatilityLevel::Medium
    } else {
        VolatilityLevel::High
    }
}
