//! Confidence and risk band from the width of the forecast interval.

use serde::{Deserialize, Serialize};

use super::DecisionError;
use crate::domain::{ForecastPoint, RiskLevel};

const LOW_RISK_RATIO: f64 = 0.05;
const MEDIUM_RISK_RATIO: f64 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0..=100
    pub confidence: u8,
    pub risk_level: RiskLevel,
    /// Average band width over average predicted price, floored at zero.
    pub uncertainty_ratio: f64,
}

/// Score uncertainty as `avg(spread) / avg(predicted)` over fully finite
/// points. A zero average price counts as maximal uncertainty (ratio 1).
pub fn assess_risk(forecast: &[ForecastPoint]) -> Result<RiskAssessment, DecisionError> {
    let finite: Vec<&ForecastPoint> = forecast.iter().filter(|p| p.is_finite()).collect();
    if finite.is_empty() {
        return Err(DecisionError::NoFiniteBand);
    }

    let n = finite.len() as f64;
    let avg_spread = finite.iter().map(|p| p.spread()).sum::<f64>() / n;
    let avg_price = finite.iter().map(|p| p.predicted).sum::<f64>() / n;
    let ratio = if avg_price == 0.0 {
        1.0
    } else {
        (avg_spread / avg_price).max(0.0)
    };

    let confidence = ((1.0 - ratio) * 100.0).clamp(0.0, 100.0).round() as u8;
    let risk_level = if ratio < LOW_RISK_RATIO {
        RiskLevel::Low
    } else if ratio < MEDIUM_RISK_RATIO {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    Ok(RiskAssessment {
        confidence,
        risk_level,
        uncertainty_ratio: ratio,
    })
}
