//! Forecasting boundary.
//!
//! The statistical model is a black box behind [`Forecaster`]. What the
//! pipeline owns is the contract around it: [`guard::run_forecast`] cleans
//! the history going in and validates the predictions coming out.

pub mod guard;
pub mod linear;

pub use guard::{decision_horizon, prepare_history, run_forecast};
pub use linear::LinearTrendForecaster;

use thiserror::Error;

use crate::domain::{ForecastPoint, HistoryPoint};

/// A model that extends a daily price series into the future.
pub trait Forecaster: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Predict `horizon_days` daily points after the last history date.
    ///
    /// `history` is sorted ascending, has unique dates, and holds at least
    /// [`MIN_HISTORY_POINTS`](crate::domain::MIN_HISTORY_POINTS) points.
    fn forecast(
        &self,
        history: &[HistoryPoint],
        horizon_days: usize,
    ) -> Result<Vec<ForecastPoint>, ForecastError>;
}

/// Errors at the forecasting boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("historical dataset is empty for this selection; cannot run forecasting")]
    EmptyHistory,

    #[error("need at least {required} valid history rows for forecasting; found {found}")]
    InsufficientHistory { found: usize, required: usize },

    #[error("forecast horizon must be between {min} and {max} days; got {got}")]
    InvalidHorizon { got: usize, min: usize, max: usize },

    #[error("forecaster produced {found} finite predictions; {required} required")]
    InsufficientForecast { found: usize, required: usize },

    #[error("forecasting backend failed: {0}")]
    Backend(String),
}
