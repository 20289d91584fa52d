//! Decision engine: turns a validated forecast and the raw history into a
//! trade recommendation, risk band, volatility class, and shock alert.

pub mod recommendation;
pub mod risk;
pub mod shock;
pub mod volatility;

pub use recommendation::{build_recommendation, percent_change, recommend, TrendCall};
pub use risk::{assess_risk, RiskAssessment};
pub use shock::{detect_price_shock, SHOCK_THRESHOLD_PCT};
pub use volatility::classify_volatility;

use thiserror::Error;

/// Forecast output that cannot support a decision.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecisionError {
    #[error("forecast must include at least {required} valid predicted values; found {found}")]
    TooFewPredictions { found: usize, required: usize },

    #[error("forecast must contain at least one point with finite predicted, lower and upper values")]
    NoFiniteBand,

    #[error("invalid change percent computed from forecast values")]
    NonFiniteChange,
}
