//! The cleaned, immutable price dataset.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::error::DataError;
use super::ingest::read_rows;
use crate::domain::PriceRow;

/// Minimum number of valid rows a dataset must contain after cleaning.
pub const MIN_DATASET_ROWS: usize = 30;

/// Normalization applied to stored and queried keys alike: trim, then
/// Unicode lowercase.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Normalized lookup keys for one row, computed once at load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowKeys {
    pub state: String,
    pub market: String,
    pub commodity: String,
}

/// An ordered collection of cleaned price rows.
///
/// Construction is all-or-nothing: either every row has been validated and
/// there are at least [`MIN_DATASET_ROWS`] of them, or construction fails.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<PriceRow>,
    keys: Vec<RowKeys>,
    source: Option<PathBuf>,
    content_hash: String,
    dropped_rows: usize,
}

impl Dataset {
    /// Build a dataset from already-parsed rows. Invalid rows are dropped.
    pub fn from_rows(rows: Vec<PriceRow>) -> Result<Self, DataError> {
        let total = rows.len();
        let valid: Vec<PriceRow> = rows.into_iter().filter(PriceRow::is_valid).collect();
        let dropped = total - valid.len();
        Self::build(valid, dropped, None)
    }

    /// Parse and clean a CSV stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let report = read_rows(reader)?;
        Self::build(report.rows, report.dropped, None)
    }

    /// Read a CSV file from disk.
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let report = read_rows(BufReader::new(file))?;
        Self::build(report.rows, report.dropped, Some(path.to_path_buf()))
    }

    fn build(
        rows: Vec<PriceRow>,
        dropped_rows: usize,
        source: Option<PathBuf>,
    ) -> Result<Self, DataError> {
        if rows.len() < MIN_DATASET_ROWS {
            return Err(DataError::TooFewRows {
                found: rows.len(),
                required: MIN_DATASET_ROWS,
            });
        }

        let keys = rows
            .iter()
            .map(|r| RowKeys {
                state: normalize_key(&r.state),
                market: normalize_key(&r.market),
                commodity: normalize_key(&r.commodity),
            })
            .collect();
        let content_hash = hash_rows(&rows);

        Ok(Self {
            rows,
            keys,
            source,
            content_hash,
            dropped_rows,
        })
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Path the dataset was read from, if it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// BLAKE3 hex digest over the cleaned rows.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Number of raw records discarded during cleaning.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Rows paired with their normalized keys, in dataset order.
    pub(crate) fn keyed_rows(&self) -> impl Iterator<Item = (&PriceRow, &RowKeys)> {
        self.rows.iter().zip(self.keys.iter())
    }
}

fn hash_rows(rows: &[PriceRow]) -> String {
    let mut hasher = blake3::Hasher::new();
    for row in rows {
        hasher.update(row.date.to_string().as_bytes());
        hasher.update(row.state.as_bytes());
        hasher.update(&[0]);
        hasher.update(row.market.as_bytes());
        hasher.update(&[0]);
        hasher.update(row.commodity.as_bytes());
        hasher.update(&[0]);
        hasher.update(&row.price.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
