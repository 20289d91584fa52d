//! Pre- and post-conditions around a [`Forecaster`] call.

use tracing::debug;

use super::{ForecastError, Forecaster};
use crate::domain::{
    ForecastPoint, HistoryPoint, MAX_HORIZON_DAYS, MIN_DECISION_POINTS, MIN_HISTORY_POINTS,
    MIN_HORIZON_DAYS,
};

/// Drop non-finite values, sort ascending, and keep the last row per date.
pub fn prepare_history(history: &[HistoryPoint]) -> Vec<HistoryPoint> {
    let mut points: Vec<HistoryPoint> = history
        .iter()
        .copied()
        .filter(|p| p.value.is_finite())
        .collect();
    points.sort_by_key(|p| p.date);

    let mut deduped: Vec<HistoryPoint> = Vec::with_capacity(points.len());
    for point in points {
        match deduped.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => deduped.push(point),
        }
    }
    deduped
}

/// Points to request from the forecaster for a `days`-day report.
///
/// Never fewer than [`MIN_DECISION_POINTS`]; callers trim what they show back
/// to `days`.
pub fn decision_horizon(days: usize) -> usize {
    days.max(MIN_DECISION_POINTS)
}

/// Run `forecaster` under the boundary contract.
///
/// Before the call: horizon within bounds, history cleaned by
/// [`prepare_history`] and at least [`MIN_HISTORY_POINTS`] long.
/// After the call: non-finite rows discarded, at least `horizon_days` rows
/// left (the first `horizon_days` are kept), and dates strictly after the
/// history and strictly increasing.
pub fn run_forecast(
    forecaster: &dyn Forecaster,
    history: &[HistoryPoint],
    horizon_days: usize,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    if !(MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&horizon_days) {
        return Err(ForecastError::InvalidHorizon {
            got: horizon_days,
            min: MIN_HORIZON_DAYS,
            max: MAX_HORIZON_DAYS,
        });
    }
    if history.is_empty() {
        return Err(ForecastError::EmptyHistory);
    }

    let clean = prepare_history(history);
    if clean.len() < MIN_HISTORY_POINTS {
        return Err(ForecastError::InsufficientHistory {
            found: clean.len(),
            required: MIN_HISTORY_POINTS,
        });
    }

    let raw = forecaster.forecast(&clean, horizon_days)?;
    let raw_len = raw.len();
    let mut points: Vec<ForecastPoint> = raw.into_iter().filter(ForecastPoint::is_finite).collect();
    if points.len() < horizon_days {
        return Err(ForecastError::InsufficientForecast {
            found: points.len(),
            required: horizon_days,
        });
    }
    points.truncate(horizon_days);

    // `clean` is non-empty past the length check above.
    let mut previous = clean[clean.len() - 1].date;
    for point in &points {
        if point.date <= previous {
            return Err(ForecastError::Backend(format!(
                "forecast date {} is not after {}",
                point.date, previous
            )));
        }
        previous = point.date;
    }

    debug!(
        forecaster = forecaster.name(),
        history = clean.len(),
        returned = raw_len,
        kept = points.len(),
        "forecast validated"
    );
    Ok(points)
}
