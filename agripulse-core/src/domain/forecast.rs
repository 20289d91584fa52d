//! ForecastPoint: one future-day prediction from a forecaster.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single predicted day with its uncertainty band.
///
/// `lower <= predicted <= upper` is expected but owned by the forecaster;
/// the pipeline only checks that all three values are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(rename = "ds")]
    pub date: NaiveDate,
    #[serde(rename = "yhat")]
    pub predicted: f64,
    #[serde(rename = "yhat_lower")]
    pub lower: f64,
    #[serde(rename = "yhat_upper")]
    pub upper: f64,
}

impl ForecastPoint {
    pub fn new(date: NaiveDate, predicted: f64, lower: f64, upper: f64) -> Self {
        Self {
            date,
            predicted,
            lower,
            upper,
        }
    }

    /// True if predicted, lower and upper are all finite.
    pub fn is_finite(&self) -> bool {
        self.predicted.is_finite() && self.lower.is_finite() && self.upper.is_finite()
    }

    /// Width of the uncertainty band, floored at zero.
    pub fn spread(&self) -> f64 {
        (self.upper - self.lower).max(0.0)
    }
}

/// Finite predicted values of a forecast, in order.
pub fn finite_predictions(forecast: &[ForecastPoint]) -> Vec<f64> {
    forecast
        .iter()
        .map(|p| p.predicted)
        .filter(|v| v.is_finite())
        .collect()
}
