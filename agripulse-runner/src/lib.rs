//! AgriPulse Runner: forecast pipeline orchestration, market ranking,
//! configuration.
//!
//! This crate builds on `agripulse-core` to provide:
//! - TOML configuration with defaults for every field
//! - The caller-visible error taxonomy (`ErrorKind`)
//! - The single-market forecast pipeline (`run_forecast_pipeline`)
//! - The cross-market ranker with explicit skip reasons

pub mod config;
pub mod error;
pub mod pipeline;
pub mod ranking;

pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};
pub use error::{ErrorKind, PipelineError};
pub use pipeline::{run_forecast_pipeline, ForecastReport, ForecastRequest};
pub use ranking::{
    rank_markets, MandiGain, MarketRanker, MarketRanking, RankRequest, RankingOutcome,
    SkipReason, SkippedMarket,
};
