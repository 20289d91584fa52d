//! Decision outputs: action, risk band, volatility class, trend direction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the seller should do with the crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "WAIT")]
    Wait,
    #[serde(rename = "SELL NOW")]
    SellNow,
    #[serde(rename = "HOLD")]
    Hold,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Wait => "WAIT",
            Self::SellNow => "SELL NOW",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Forecast uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stability of the raw price history (coefficient of variation bands).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
}

/// Sign of the expected change over the forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    pub fn from_change(change_pct: f64) -> Self {
        if change_pct > 0.0 {
            Self::Up
        } else if change_pct < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

/// The full trade recommendation handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    pub expected_change_percent: f64,
    pub message: String,
    /// 0..=100
    pub confidence: u8,
    pub risk_level: RiskLevel,
}
