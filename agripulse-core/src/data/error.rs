//! Structured error types for dataset operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating, reading or validating the price dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("dataset file not found. Expected one of: {}", display_paths(.candidates))]
    NotFound { candidates: Vec<PathBuf> },

    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("dataset must contain at least {required} valid rows after cleaning; found {found}")]
    TooFewRows { found: usize, required: usize },

    #[error("failed to read dataset '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
