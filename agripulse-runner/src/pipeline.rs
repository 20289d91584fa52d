//! Single-market forecast pipeline.
//!
//! Selector → guarded forecaster → decision engine → insight composer, plus
//! the nearby-mandi lookup and a localized headline.

use agripulse_core::data::{resolve_state_for_market, select_history, Dataset, SelectionTier};
use agripulse_core::decision::{build_recommendation, classify_volatility, detect_price_shock};
use agripulse_core::domain::{
    ForecastPoint, MandiOption, Recommendation, TrendDirection, VolatilityLevel,
    MAX_HORIZON_DAYS, MIN_HORIZON_DAYS,
};
use agripulse_core::forecast::{decision_horizon, run_forecast, Forecaster};
use agripulse_core::i18n::{change_message, headline, Language};
use agripulse_core::insight::compose_insight;
use agripulse_core::mandi::NearbyMandiProvider;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PipelineError;

fn default_days() -> usize {
    MAX_HORIZON_DAYS
}

/// One forecast request for a crop at a mandi.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub crop: String,
    pub mandi: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    /// 1..=7
    #[serde(default = "default_days")]
    pub days: usize,
    #[serde(default)]
    pub language: Language,
}

impl ForecastRequest {
    pub fn new(crop: impl Into<String>, mandi: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            mandi: mandi.into(),
            district: None,
            pincode: None,
            days: default_days(),
            language: Language::default(),
        }
    }

    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_location(mut self, district: Option<String>, pincode: Option<String>) -> Self {
        self.district = district;
        self.pincode = pincode;
        self
    }

    /// Reject blank names and out-of-range horizons before touching data.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.crop.trim().is_empty() {
            return Err(PipelineError::InvalidRequest("crop must not be blank".into()));
        }
        if self.mandi.trim().is_empty() {
            return Err(PipelineError::InvalidRequest("mandi must not be blank".into()));
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

/// Everything the caller gets back for one forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub crop: String,
    pub mandi: String,
    /// Last observed price in the selected history.
    pub current_price: f64,
    pub trend_direction: TrendDirection,
    pub expected_change_pct: f64,
    pub recommendation: Recommendation,
    pub volatility_level: VolatilityLevel,
    pub shock_alert: Option<String>,
    pub forecast: Vec<ForecastPoint>,
    pub nearby_mandis: Vec<MandiOption>,
    pub insights: Vec<String>,
    pub headline: String,
    pub language: Language,
}

/// Run the full single-market pipeline against a loaded dataset.
pub fn run_forecast_pipeline(
    dataset: &Dataset,
    forecaster: &dyn Forecaster,
    mandis: &dyn NearbyMandiProvider,
    request: &ForecastRequest,
) -> Result<ForecastReport, PipelineError> {
    request.validate()?;

    let state = resolve_state_for_market(dataset, &request.mandi);
    let selection = select_history(dataset, state.as_deref(), &request.mandi, &request.crop);
    if selection.is_empty() {
        return Err(PipelineError::NoHistory {
            commodity: request.crop.clone(),
            market: request.mandi.clone(),
        });
    }
    if selection.tier == SelectionTier::CommodityWide {
        warn!(
            crop = %request.crop,
            mandi = %request.mandi,
            rows = selection.len(),
            "no market or state history; forecasting from commodity-wide prices"
        );
    }

    // The decision always sees at least two points; the report shows `days`.
    let mut forecast =
        run_forecast(forecaster, &selection.points, decision_horizon(request.days))?;
    let recommendation = build_recommendation(&forecast)?;
    let insight = compose_insight(
        &forecast,
        Some(recommendation.action),
        Some(recommendation.risk_level),
    )?;

    let history: Vec<f64> = selection.points.iter().map(|p| p.value).collect();
    // Non-empty: checked above.
    let current_price = history[history.len() - 1];
    let expected_change_pct = recommendation.expected_change_percent;
    forecast.truncate(request.days);

    let report = ForecastReport {
        crop: request.crop.clone(),
        mandi: request.mandi.clone(),
        current_price,
        trend_direction: TrendDirection::from_change(expected_change_pct),
        expected_change_pct,
        volatility_level: classify_volatility(&history),
        shock_alert: detect_price_shock(&history),
        nearby_mandis: mandis.nearby(request.district.as_deref(), request.pincode.as_deref()),
        insights: vec![insight, change_message(expected_change_pct, request.language)],
        headline: headline(recommendation.action, request.days, request.language),
        language: request.language,
        recommendation,
        forecast,
    };

    info!(
        crop = %report.crop,
        mandi = %report.mandi,
        change = %format!("{:+.2}%", report.expected_change_pct),
        risk = %report.recommendation.risk_level,
        forecaster = forecaster.name(),
        "forecast completed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req: ForecastRequest =
            serde_json::from_str(r#"{"crop": "Wheat", "mandi": "Khanna"}"#).unwrap();
        assert_eq!(req.days, 7);
        assert_eq!(req.language, Language::En);
        assert_eq!(req, ForecastRequest::new("Wheat", "Khanna"));
    }

    #[test]
    fn request_validation() {
        assert!(ForecastRequest::new("Wheat", "Khanna").validate().is_ok());
        assert!(ForecastRequest::new(" ", "Khanna").validate().is_err());
        assert!(ForecastRequest::new("Wheat", "").validate().is_err());
        assert!(ForecastRequest::new("Wheat", "Khanna").with_days(0).validate().is_err());
        assert!(ForecastRequest::new("Wheat", "Khanna").with_days(8).validate().is_err());
        assert!(ForecastRequest::new("Wheat", "Khanna").with_days(1).validate().is_ok());
    }
}
