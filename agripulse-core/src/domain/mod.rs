//! Domain types for the forecast decision pipeline.

pub mod decision;
pub mod forecast;
pub mod mandi;
pub mod price;

pub use decision::{Action, Recommendation, RiskLevel, TrendDirection, VolatilityLevel};
pub use forecast::ForecastPoint;
pub use mandi::MandiOption;
pub use price::{HistoryPoint, PriceRow};

/// Forecast horizon bounds, in days.
pub const MIN_HORIZON_DAYS: usize = 1;
pub const MAX_HORIZON_DAYS: usize = 7;

/// Fewest forecast points a decision (first vs last) can be made from.
pub const MIN_DECISION_POINTS: usize = 2;

/// Minimum number of distinct history days the forecaster is ever fed.
pub const MIN_HISTORY_POINTS: usize = 30;
