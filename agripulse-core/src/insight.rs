//! One-sentence forecast summary for the report's `insights` list.

use crate::decision::{percent_change, DecisionError};
use crate::domain::forecast::finite_predictions;
use crate::domain::{Action, ForecastPoint, RiskLevel, MIN_DECISION_POINTS};

/// Compose the four-clause insight: trend, change, risk, action.
///
/// `action` and `risk` are optional; a missing one is worded as unavailable.
pub fn compose_insight(
    forecast: &[ForecastPoint],
    action: Option<Action>,
    risk: Option<RiskLevel>,
) -> Result<String, DecisionError> {
    let prices = finite_predictions(forecast);
    if prices.len() < MIN_DECISION_POINTS {
        return Err(DecisionError::TooFewPredictions {
            found: prices.len(),
            required: MIN_DECISION_POINTS,
        });
    }
    let (first, last) = (prices[0], prices[prices.len() - 1]);

    let trend = if last > first {
        "Prices show an upward trend this week."
    } else if last < first {
        "Market shows downward pressure this week."
    } else {
        "Prices are mostly flat over the forecast window."
    };

    let change = match percent_change(first, last) {
        None => {
            "Percent change cannot be computed because the first forecasted price is zero."
                .to_string()
        }
        Some(c) if c.is_finite() => {
            format!("Projected change from first to last forecast day is {c:.2}%.")
        }
        Some(_) => {
            "Projected percent change is unavailable due to invalid forecast values.".to_string()
        }
    };

    let risk = match risk {
        Some(RiskLevel::High) => "Risk is HIGH, so volatility may cause sharp price swings.",
        Some(RiskLevel::Medium) => "Risk is MEDIUM, so moderate volatility is possible.",
        Some(RiskLevel::Low) => "Risk is LOW, indicating comparatively stable forecast confidence.",
        None => "Risk level is unavailable for this forecast.",
    };

    let action = match action {
        Some(a) => format!("Suggested action: {a}."),
        None => "Suggested action is unavailable.".to_string(),
    };

    Ok(format!("{trend} {change} {risk} {action}"))
}
