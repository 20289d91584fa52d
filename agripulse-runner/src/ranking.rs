//! Cross-market ranking by expected gain.
//!
//! Every market trading the commodity in the state is forecast independently.
//! A market that cannot be forecast is recorded as skipped with its reason;
//! one bad market never fails the ranking.

use std::cmp::Ordering;

use agripulse_core::data::{markets_for_state_and_commodity, select_history, Dataset};
use agripulse_core::decision::percent_change;
use agripulse_core::domain::{
    ForecastPoint, MAX_HORIZON_DAYS, MIN_DECISION_POINTS, MIN_HORIZON_DAYS,
};
use agripulse_core::forecast::{decision_horizon, run_forecast, ForecastError, Forecaster};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PipelineError;

fn default_days() -> usize {
    MAX_HORIZON_DAYS
}

fn default_limit() -> usize {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRequest {
    pub state: String,
    pub commodity: String,
    #[serde(default = "default_days")]
    pub days: usize,
    /// Values below 1 are treated as 1.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl RankRequest {
    pub fn new(state: impl Into<String>, commodity: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            commodity: commodity.into(),
            days: default_days(),
            limit: default_limit(),
        }
    }

    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.state.trim().is_empty() {
            return Err(PipelineError::InvalidRequest("state must not be blank".into()));
        }
        if self.commodity.trim().is_empty() {
            return Err(PipelineError::InvalidRequest("commodity must not be blank".into()));
        }
        if !(MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&self.days) {
            return Err(PipelineError::InvalidRequest(format!(
                "days must be between {MIN_HORIZON_DAYS} and {MAX_HORIZON_DAYS}; got {}",
                self.days
            )));
        }
        Ok(())
    }
}

/// One ranked market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandiGain {
    pub mandi: String,
    /// First-to-last forecast change, 2 decimals.
    pub expected_change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRanking {
    pub state: String,
    pub commodity: String,
    /// Descending by gain; ties keep market name order.
    pub best_mandis: Vec<MandiGain>,
}

/// Why a market was left out of the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    InsufficientHistory,
    InsufficientForecast,
    Backend,
    /// First prediction zero, or fewer than two predictions.
    UndefinedGain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedMarket {
    pub mandi: String,
    pub reason: SkipReason,
    pub detail: String,
}

/// Ranked markets plus the ones that could not be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub ranking: MarketRanking,
    pub skipped: Vec<SkippedMarket>,
}

/// Ranks markets for one (state, commodity), optionally in parallel.
pub struct MarketRanker<'a> {
    dataset: &'a Dataset,
    forecaster: &'a dyn Forecaster,
    parallel: bool,
}

impl<'a> MarketRanker<'a> {
    pub fn new(dataset: &'a Dataset, forecaster: &'a dyn Forecaster) -> Self {
        Self {
            dataset,
            forecaster,
            parallel: true,
        }
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn rank(&self, request: &RankRequest) -> Result<RankingOutcome, PipelineError> {
        request.validate()?;

        let markets =
            markets_for_state_and_commodity(self.dataset, &request.state, &request.commodity);
        if markets.is_empty() {
            return Err(PipelineError::NoMarkets {
                state: request.state.clone(),
                commodity: request.commodity.clone(),
            });
        }

        // Both paths preserve enumeration order.
        let scored: Vec<Result<MandiGain, SkippedMarket>> = if self.parallel {
            markets
                .par_iter()
                .map(|market| self.score(request, market))
                .collect()
        } else {
            markets
                .iter()
                .map(|market| self.score(request, market))
                .collect()
        };

        let mut ranked = Vec::with_capacity(scored.len());
        let mut skipped = Vec::new();
        for result in scored {
            match result {
                Ok(gain) => ranked.push(gain),
                Err(skip) => {
                    debug!(
                        mandi = %skip.mandi,
                        reason = ?skip.reason,
                        detail = %skip.detail,
                        "market skipped"
                    );
                    skipped.push(skip);
                }
            }
        }

        if ranked.is_empty() {
            return Err(PipelineError::NothingRankable {
                state: request.state.clone(),
                commodity: request.commodity.clone(),
            });
        }

        // Stable: ties keep market order.
        ranked.sort_by(|a, b| {
            b.expected_change_percent
                .partial_cmp(&a.expected_change_percent)
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(request.limit.max(1));

        info!(
            state = %request.state,
            commodity = %request.commodity,
            markets = markets.len(),
            skipped = skipped.len(),
            "market ranking completed"
        );

        Ok(RankingOutcome {
            ranking: MarketRanking {
                state: request.state.clone(),
                commodity: request.commodity.clone(),
                best_mandis: ranked,
            },
            skipped,
        })
    }

    fn score(&self, request: &RankRequest, market: &str) -> Result<MandiGain, SkippedMarket> {
        let skip = |reason: SkipReason, detail: String| SkippedMarket {
            mandi: market.to_string(),
            reason,
            detail,
        };

        let selection =
            select_history(self.dataset, Some(request.state.as_str()), market, &request.commodity);
        let forecast =
            run_forecast(self.forecaster, &selection.points, decision_horizon(request.days))
            .map_err(|e| skip(skip_reason(&e), e.to_string()))?;

        match expected_gain(&forecast) {
            Some(gain) => Ok(MandiGain {
                mandi: market.to_string(),
                expected_change_percent: (gain * 100.0).round() / 100.0,
            }),
            None => Err(skip(
                SkipReason::UndefinedGain,
                format!("gain undefined over {} forecast points", forecast.len()),
            )),
        }
    }
}

/// Rank with parallel evaluation.
pub fn rank_markets(
    dataset: &Dataset,
    forecaster: &dyn Forecaster,
    request: &RankRequest,
) -> Result<RankingOutcome, PipelineError> {
    MarketRanker::new(dataset, forecaster).rank(request)
}

fn skip_reason(err: &ForecastError) -> SkipReason {
    match err {
        ForecastError::EmptyHistory | ForecastError::InsufficientHistory { .. } => {
            SkipReason::InsufficientHistory
        }
        ForecastError::InsufficientForecast { .. } => SkipReason::InsufficientForecast,
        ForecastError::InvalidHorizon { .. } | ForecastError::Backend(_) => SkipReason::Backend,
    }
}

fn expected_gain(forecast: &[ForecastPoint]) -> Option<f64> {
    if forecast.len() < MIN_DECISION_POINTS {
        return None;
    }
    let first = forecast[0].predicted;
    let last = forecast[forecast.len() - 1].predicted;
    if !first.is_finite() || !last.is_finite() {
        return None;
    }
    percent_change(first, last).filter(|g| g.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(predicted: f64) -> ForecastPoint {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ForecastPoint::new(d, predicted, predicted, predicted)
    }

    #[test]
    fn gain_is_first_to_last() {
        let g = expected_gain(&[point(100.0), point(50.0), point(110.0)]).unwrap();
        assert!((g - 10.0).abs() < 1e-9);
    }

    #[test]
    fn gain_undefined_cases() {
        assert_eq!(expected_gain(&[point(100.0)]), None);
        assert_eq!(expected_gain(&[point(0.0), point(10.0)]), None);
        assert_eq!(expected_gain(&[point(f64::NAN), point(10.0)]), None);
    }

    #[test]
    fn forecast_errors_map_to_reasons() {
        assert_eq!(
            skip_reason(&ForecastError::InsufficientHistory {
                found: 1,
                required: 30
            }),
            SkipReason::InsufficientHistory
        );
        assert_eq!(
            skip_reason(&ForecastError::InsufficientForecast {
                found: 1,
                required: 7
            }),
            SkipReason::InsufficientForecast
        );
        assert_eq!(
            skip_reason(&ForecastError::Backend("x".into())),
            SkipReason::Backend
        );
    }

    #[test]
    fn rank_request_validation() {
        assert!(RankRequest::new("Punjab", "Wheat").validate().is_ok());
        assert!(RankRequest::new("", "Wheat").validate().is_err());
        assert!(RankRequest::new("Punjab", " ").validate().is_err());
        assert!(RankRequest::new("Punjab", "Wheat").with_days(0).validate().is_err());
    }
}
