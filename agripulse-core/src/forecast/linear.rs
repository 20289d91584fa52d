//! Built-in trend forecaster: least-squares line over the observation index.

use chrono::Duration;

use super::{ForecastError, Forecaster};
use crate::domain::{ForecastPoint, HistoryPoint};

/// Two-sided ~95% band multiplier.
const BAND_Z: f64 = 1.96;
/// Fallback band (fraction of the last value) for a perfect fit.
const FLAT_BAND_FRACTION: f64 = 0.02;

/// Ordinary least squares on `(index, value)`, projected one day at a time.
///
/// The band is `±1.96 × sample std of residuals`; when the residuals are all
/// zero it falls back to `±1.96 × 2%` of the last observed value.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrendForecaster;

impl LinearTrendForecaster {
    pub fn new() -> Self {
        Self
    }
}

impl Forecaster for LinearTrendForecaster {
    fn name(&self) -> &str {
        "linear-trend"
    }

    fn forecast(
        &self,
        history: &[HistoryPoint],
        horizon_days: usize,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        let Some(last) = history.last() else {
            return Err(ForecastError::EmptyHistory);
        };
        if history.len() < 2 {
            return Err(ForecastError::Backend(
                "need at least 2 points to fit a trend".into(),
            ));
        }

        let values: Vec<f64> = history.iter().map(|p| p.value).collect();
        let (slope, intercept) = fit_line(&values);
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(ForecastError::Backend(format!(
                "trend fit produced non-finite coefficients (slope={slope}, intercept={intercept})"
            )));
        }

        let residuals: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(i, y)| y - (intercept + slope * i as f64))
            .collect();
        let residual_std = sample_std(&residuals);
        let half_width = if residual_std > 0.0 {
            BAND_Z * residual_std
        } else {
            BAND_Z * last.value * FLAT_BAND_FRACTION
        };

        let n = values.len();
        let points = (1..=horizon_days)
            .map(|d| {
                let yhat = intercept + slope * (n - 1 + d) as f64;
                ForecastPoint::new(
                    last.date + Duration::days(d as i64),
                    round2(yhat),
                    round2(yhat - half_width),
                    round2(yhat + half_width),
                )
            })
            .collect();
        Ok(points)
    }
}

/// Returns `(slope, intercept)`; a degenerate design yields a flat line at
/// the mean.
fn fit_line(ys: &[f64]) -> (f64, f64) {
    let n = ys.len() as f64;
    let (mut sx, mut sy, mut sxy, mut sxx) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in ys.iter().enumerate() {
        let x = i as f64;
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
    }
    let denom = n * sxx - sx * sx;
    if denom == 0.0 {
        return (0.0, sy / n);
    }
    let slope = (n * sxy - sx * sy) / denom;
    (slope, (sy - slope * sx) / n)
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
