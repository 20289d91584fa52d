//! AgriPulse Core: price dataset, history selection, forecasting boundary,
//! decision engine.
//!
//! This crate holds everything a single forecast needs:
//! - Domain types (price rows, history and forecast points, recommendations)
//! - Dataset loading with header aliases, cleaning, and process-lifetime memoization
//! - Three-tier history selection and dataset metadata queries
//! - The `Forecaster` trait, its pre/post guard, and a built-in linear model
//! - Decision engine (action, confidence and risk, volatility, shock alert)
//! - Insight text, localized headline, nearby-mandi provider

pub mod data;
pub mod decision;
pub mod domain;
pub mod forecast;
pub mod i18n;
pub mod insight;
pub mod mandi;
