//! Caller-visible error taxonomy.
//!
//! Component errors keep their own types; [`PipelineError::kind`] folds them
//! into the three kinds callers branch on.

use agripulse_core::data::DataError;
use agripulse_core::decision::DecisionError;
use agripulse_core::forecast::ForecastError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a caller should do about a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The dataset, or any history for the selection, does not exist.
    DataNotFound,
    /// The inputs or intermediate results cannot support a forecast.
    Validation,
    /// The forecasting backend or the environment failed.
    ForecastingBackend,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Decision(#[from] DecisionError),

    #[error("no historical data found for commodity='{commodity}' and market='{market}'")]
    NoHistory { commodity: String, market: String },

    #[error("no markets found for state='{state}' and commodity='{commodity}'")]
    NoMarkets { state: String, commodity: String },

    #[error("unable to compute market comparison for state='{state}' and commodity='{commodity}'")]
    NothingRankable { state: String, commodity: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Data(DataError::NotFound { .. }) | Self::NoHistory { .. } => ErrorKind::DataNotFound,
            Self::Data(DataError::MissingColumns(_) | DataError::TooFewRows { .. }) => {
                ErrorKind::Validation
            }
            Self::Data(DataError::Io { .. } | DataError::Csv(_)) => ErrorKind::ForecastingBackend,
            Self::Forecast(ForecastError::Backend(_)) => ErrorKind::ForecastingBackend,
            Self::Forecast(_)
            | Self::Decision(_)
            | Self::NoMarkets { .. }
            | Self::NothingRankable { .. }
            | Self::InvalidRequest(_) => ErrorKind::Validation,
        }
    }
}
