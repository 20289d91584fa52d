//! AgriPulse CLI: commodity price forecasts and market comparison.
//!
//! Commands:
//! - `forecast`: forecast one crop at one mandi and recommend SELL NOW / WAIT / HOLD
//! - `best-mandi`: rank a state's markets for a commodity by expected gain
//! - `metadata`: list states, commodities, markets and latest tracked crop prices
//! - `config`: print the effective configuration as TOML
//!
//! Results go to stdout as JSON; logs go to stderr (`RUST_LOG` filters them).

use std::path::PathBuf;
use std::sync::Arc;

use agripulse_core::data::{Dataset, DEFAULT_TRACKED_COMMODITIES};
use agripulse_core::forecast::LinearTrendForecaster;
use agripulse_core::i18n::Language;
use agripulse_core::mandi::PlaceholderMandiProvider;
use agripulse_runner::{
    run_forecast_pipeline, AppConfig, ErrorKind, ForecastRequest, MarketRanker, PipelineError,
    RankRequest,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "agripulse",
    about = "Commodity price forecasts and sell/wait/hold advice for mandi markets"
)]
struct Cli {
    /// Path to a TOML config file (default: ./agripulse.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset CSV, tried before AGRIPULSE_DATASET and the configured candidates
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast one crop at one mandi and recommend an action
    Forecast {
        /// Commodity name, e.g. Wheat
        #[arg(long)]
        crop: String,

        /// Market name, e.g. Khanna
        #[arg(long)]
        mandi: String,

        /// District used for nearby-mandi suggestions
        #[arg(long)]
        district: Option<String>,

        #[arg(long)]
        pincode: Option<String>,

        /// Forecast horizon in days (1-7)
        #[arg(long)]
        days: Option<usize>,

        /// Headline language code (en, hi)
        #[arg(long)]
        language: Option<String>,
    },

    /// Rank the markets of a state by expected price gain
    BestMandi {
        #[arg(long)]
        state: String,

        #[arg(long)]
        commodity: String,

        /// Forecast horizon in days (1-7)
        #[arg(long)]
        days: Option<usize>,

        /// Number of markets to return
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List states, commodities and latest tracked crop prices
    Metadata {
        /// Also list the markets trading this commodity
        #[arg(long)]
        commodity: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agripulse=info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        let code = exit_code(&err);
        if code == 1 {
            tracing::error!("{err:#}");
        } else {
            tracing::warn!("{err:#}");
        }
        eprintln!("Error: {err:#}");
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::discover(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Forecast {
            crop,
            mandi,
            district,
            pincode,
            days,
            language,
        } => {
            let language = language
                .as_deref()
                .map(Language::from_code)
                .unwrap_or(config.output.default_language);
            let request = ForecastRequest::new(crop, mandi)
                .with_days(days.unwrap_or(config.forecast.default_days))
                .with_language(language)
                .with_location(district, pincode);
            let dataset = load_dataset(&config, &cli.dataset)?;
            let report = run_forecast_pipeline(
                &dataset,
                &LinearTrendForecaster,
                &PlaceholderMandiProvider,
                &request,
            )?;
            print_json(&report)
        }
        Commands::BestMandi {
            state,
            commodity,
            days,
            limit,
        } => {
            let request = RankRequest::new(state, commodity)
                .with_days(days.unwrap_or(config.forecast.default_days))
                .with_limit(limit.unwrap_or(config.ranking.default_limit));
            let dataset = load_dataset(&config, &cli.dataset)?;
            let outcome = MarketRanker::new(&dataset, &LinearTrendForecaster)
                .with_parallelism(config.ranking.parallel)
                .rank(&request)?;
            print_json(&outcome)
        }
        Commands::Metadata { commodity } => {
            let dataset = load_dataset(&config, &cli.dataset)?;
            let markets = commodity
                .as_deref()
                .map(|c| dataset.markets_for_commodity(c));
            print_json(&serde_json::json!({
                "source": dataset.source(),
                "rows": dataset.len(),
                "states": dataset.unique_states(),
                "commodities": dataset.unique_commodities(),
                "markets": markets,
                "latest_crop_prices": dataset.latest_crop_prices(DEFAULT_TRACKED_COMMODITIES),
            }))
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn load_dataset(config: &AppConfig, cli_path: &Option<PathBuf>) -> Result<Arc<Dataset>> {
    let loader = config.global_dataset_loader(cli_path.as_deref());
    Ok(loader.load().map_err(PipelineError::from)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 2 = validation, 3 = data not found, 4 = backend, 1 = anything else.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<PipelineError>().map(PipelineError::kind) {
        Some(ErrorKind::Validation) => 2,
        Some(ErrorKind::DataNotFound) => 3,
        Some(ErrorKind::ForecastingBackend) => 4,
        None => 1,
    }
}
