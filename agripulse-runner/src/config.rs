//! TOML-backed application configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration. Unknown keys are rejected.

use std::path::{Path, PathBuf};

use agripulse_core::data::{DatasetLoader, DATASET_ENV_VAR, DEFAULT_CANDIDATES};
use agripulse_core::domain::{MAX_HORIZON_DAYS, MIN_HORIZON_DAYS};
use agripulse_core::i18n::Language;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conventional config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "agripulse.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub forecast: ForecastConfig,
    pub ranking: RankingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    /// Tried in order; the first existing file wins.
    pub candidates: Vec<PathBuf>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    pub default_days: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_days: MAX_HORIZON_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    pub default_limit: usize,
    /// Evaluate markets on the rayon pool.
    pub parallel: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_limit: 3,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub default_language: Language,
}

impl AppConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `agripulse.toml` if present, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let conventional = Path::new(DEFAULT_CONFIG_FILE);
                if conventional.is_file() {
                    Self::from_file(conventional)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_HORIZON_DAYS..=MAX_HORIZON_DAYS).contains(&self.forecast.default_days) {
            return Err(ConfigError::Invalid(format!(
                "forecast.default_days must be between {MIN_HORIZON_DAYS} and {MAX_HORIZON_DAYS}; got {}",
                self.forecast.default_days
            )));
        }
        if self.ranking.default_limit == 0 {
            return Err(ConfigError::Invalid(
                "ranking.default_limit must be at least 1".into(),
            ));
        }
        if self.dataset.candidates.is_empty() {
            return Err(ConfigError::Invalid(
                "dataset.candidates must list at least one path".into(),
            ));
        }
        Ok(())
    }

    /// Candidate paths in lookup order: `extra_first` (e.g. a CLI override),
    /// then `AGRIPULSE_DATASET`, then the configured list.
    pub fn dataset_candidates(&self, extra_first: Option<&Path>) -> Vec<PathBuf> {
        let env_path = std::env::var(DATASET_ENV_VAR).ok();
        self.candidates_with(extra_first, env_path.as_deref())
    }

    fn candidates_with(&self, extra_first: Option<&Path>, env_path: Option<&str>) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = Vec::new();
        if let Some(p) = extra_first {
            out.push(p.to_path_buf());
        }
        if let Some(p) = env_path.map(str::trim).filter(|p| !p.is_empty()) {
            out.push(PathBuf::from(p));
        }
        for c in &self.dataset.candidates {
            if !out.contains(c) {
                out.push(c.clone());
            }
        }
        out
    }

    /// The process-wide loader, seeded with [`Self::dataset_candidates`] when
    /// this is the first request for it.
    pub fn global_dataset_loader(&self, extra_first: Option<&Path>) -> &'static DatasetLoader {
        DatasetLoader::init_global(self.dataset_candidates(extra_first))
    }
}
