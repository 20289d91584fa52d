//! SELL NOW / WAIT / HOLD from the first-to-last forecast move.

use super::risk::assess_risk;
use super::DecisionError;
use crate::domain::forecast::finite_predictions;
use crate::domain::{Action, ForecastPoint, Recommendation, MIN_DECISION_POINTS};

/// Rounded change (%) above which waiting pays.
pub const WAIT_THRESHOLD_PCT: f64 = 2.0;
/// Rounded change (%) below which selling now is advised.
pub const SELL_THRESHOLD_PCT: f64 = -2.0;

/// Action and expected move, before confidence and risk are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendCall {
    pub action: Action,
    /// Rounded to 2 decimals.
    pub expected_change_percent: f64,
    pub message: String,
}

/// `(last - first) / first * 100`, or `None` when `first` is zero.
pub fn percent_change(first: f64, last: f64) -> Option<f64> {
    if first == 0.0 {
        None
    } else {
        Some((last - first) / first * 100.0)
    }
}

/// Decide the action from the first and last finite predictions.
pub fn recommend(forecast: &[ForecastPoint]) -> Result<TrendCall, DecisionError> {
    let prices = finite_predictions(forecast);
    if prices.len() < MIN_DECISION_POINTS {
        return Err(DecisionError::TooFewPredictions {
            found: prices.len(),
            required: MIN_DECISION_POINTS,
        });
    }
    let (first, last) = (prices[0], prices[prices.len() - 1]);

    let Some(change) = percent_change(first, last) else {
        return Ok(TrendCall {
            action: Action::Hold,
            expected_change_percent: 0.0,
            message: "Unable to compute percent change because first forecast price is zero."
                .to_string(),
        });
    };
    if !change.is_finite() {
        return Err(DecisionError::NonFiniteChange);
    }

    let change = (change * 100.0).round() / 100.0;
    let (action, message) = if change > WAIT_THRESHOLD_PCT {
        (
            Action::Wait,
            format!("Forecast shows a {change:.2}% rise over the horizon. Waiting is recommended."),
        )
    } else if change < SELL_THRESHOLD_PCT {
        (
            Action::SellNow,
            format!(
                "Forecast shows a {:.2}% drop over the horizon. Selling now is recommended.",
                change.abs()
            ),
        )
    } else {
        (
            Action::Hold,
            format!("Forecast change is {change:.2}%, within the hold band (-2% to +2%)."),
        )
    };

    Ok(TrendCall {
        action,
        expected_change_percent: change,
        message,
    })
}

/// Full recommendation: trend call plus confidence and risk band.
pub fn build_recommendation(forecast: &[ForecastPoint]) -> Result<Recommendation, DecisionError> {
    let call = recommend(forecast)?;
    let risk = assess_risk(forecast)?;
    Ok(Recommendation {
        action: call.action,
        expected_change_percent: call.expected_change_percent,
        message: call.message,
        confidence: risk.confidence,
        risk_level: risk.risk_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskLevel;
    use chrono::{Duration, NaiveDate};

    fn forecast(values: &[f64]) -> Vec<ForecastPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ForecastPoint::new(start + Duration::days(i as i64), *v, v - 1.0, v + 1.0))
            .collect()
    }

    #[test]
    fn rise_above_two_percent_waits() {
        let call = recommend(&forecast(&[100.0, 101.0, 103.0])).unwrap();
        assert_eq!(call.action, Action::Wait);
        assert_eq!(call.expected_change_percent, 3.0);
        assert_eq!(
            call.message,
            "Forecast shows a 3.00% rise over the horizon. Waiting is recommended."
        );
    }

    #[test]
    fn drop_below_two_percent_sells() {
        let call = recommend(&forecast(&[100.0, 98.0, 96.0])).unwrap();
        assert_eq!(call.action, Action::SellNow);
        assert_eq!(call.expected_change_percent, -4.0);
        assert_eq!(
            call.message,
            "Forecast shows a 4.00% drop over the horizon. Selling now is recommended."
        );
    }

    #[test]
    fn small_move_holds() {
        let call = recommend(&forecast(&[100.0, 101.0])).unwrap();
        assert_eq!(call.action, Action::Hold);
        assert_eq!(call.expected_change_percent, 1.0);
        assert_eq!(
            call.message,
            "Forecast change is 1.00%, within the hold band (-2% to +2%)."
        );
    }

    #[test]
    fn exactly_two_percent_holds() {
        let call = recommend(&forecast(&[100.0, 102.0])).unwrap();
        assert_eq!(call.action, Action::Hold);
    }

    #[test]
    fn zero_first_price_holds() {
        let call = recommend(&forecast(&[0.0, 5.0])).unwrap();
        assert_eq!(call.action, Action::Hold);
        assert_eq!(call.expected_change_percent, 0.0);
        assert!(call.message.contains("first forecast price is zero"));
    }

    #[test]
    fn non_finite_predictions_are_skipped() {
        let call = recommend(&forecast(&[100.0, f64::NAN, 103.0])).unwrap();
        assert_eq!(call.expected_change_percent, 3.0);

        assert_eq!(
            recommend(&forecast(&[100.0, f64::NAN])),
            Err(DecisionError::TooFewPredictions {
                found: 1,
                required: 2
            })
        );
    }

    #[test]
    fn overflowing_change_is_rejected() {
        let call = recommend(&forecast(&[1e-320, 1e300]));
        assert_eq!(call, Err(DecisionError::NonFiniteChange));
    }

    #[test]
    fn full_recommendation_carries_risk() {
        let rec = build_recommendation(&forecast(&[100.0, 100.0, 100.0])).unwrap();
        assert_eq!(rec.action, Action::Hold);
        assert_eq!(rec.confidence, 98);
        assert_eq!(rec.risk_level, RiskLevel::Low);
    }
}
