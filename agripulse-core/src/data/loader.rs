//! Dataset location and process-lifetime memoization.
//!
//! Candidate paths are tried in order and the first existing file wins. The
//! first successful load is cached and shared for the lifetime of the loader;
//! failures are never cached, so a later call retries from scratch.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing::info;

use super::dataset::Dataset;
use super::error::DataError;

/// Environment variable naming a dataset file to try before the defaults.
pub const DATASET_ENV_VAR: &str = "AGRIPULSE_DATASET";

/// Default candidate locations, relative to the working directory.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "data/cropPrices.csv",
    "data/Agriculture_price_dataset.csv",
    "DATASET/cropPrices.csv",
    "DATASET/Agriculture_price_dataset.csv",
];

static GLOBAL: OnceLock<DatasetLoader> = OnceLock::new();

/// Loads the dataset from the first existing candidate and memoizes it.
///
/// Concurrent first access is serialized: at most one load runs at a time and
/// callers that arrive during it observe its cached result.
#[derive(Debug)]
pub struct DatasetLoader {
    candidates: Vec<PathBuf>,
    cache: Mutex<Option<Arc<Dataset>>>,
    reads: AtomicUsize,
}

impl DatasetLoader {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            cache: Mutex::new(None),
            reads: AtomicUsize::new(0),
        }
    }

    /// Loader over the default candidates, preceded by `AGRIPULSE_DATASET`
    /// when it is set and non-blank.
    pub fn with_default_candidates() -> Self {
        Self::new(default_candidates_with_env(std::env::var(DATASET_ENV_VAR).ok()))
    }

    /// The process-wide loader, created over the default candidates on first
    /// use.
    pub fn global() -> &'static DatasetLoader {
        GLOBAL.get_or_init(Self::with_default_candidates)
    }

    /// The process-wide loader, created over `candidates` if nothing has
    /// touched it yet. Later calls return the existing loader unchanged.
    pub fn init_global(candidates: Vec<PathBuf>) -> &'static DatasetLoader {
        GLOBAL.get_or_init(|| Self::new(candidates))
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists as a regular file.
    pub fn resolve_path(&self) -> Result<PathBuf, DataError> {
        self.candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or_else(|| DataError::NotFound {
                candidates: self.candidates.clone(),
            })
    }

    /// Return the cached dataset, loading it on first successful call.
    pub fn load(&self) -> Result<Arc<Dataset>, DataError> {
        let mut guard = self.lock();
        if let Some(dataset) = guard.as_ref() {
            return Ok(Arc::clone(dataset));
        }

        let path = self.resolve_path()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        let dataset = Arc::new(Dataset::from_path(&path)?);
        info!(
            path = %path.display(),
            rows = dataset.len(),
            dropped = dataset.dropped_rows(),
            hash = %dataset.content_hash(),
            "dataset loaded"
        );

        *guard = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// The cached dataset, without triggering a load.
    pub fn cached(&self) -> Option<Arc<Dataset>> {
        self.lock().clone()
    }

    /// Number of times the dataset file has been read.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    // A panic while loading leaves the cache untouched, so a poisoned lock
    // still guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, Option<Arc<Dataset>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::with_default_candidates()
    }
}

fn default_candidates_with_env(env_path: Option<String>) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::with_capacity(DEFAULT_CANDIDATES.len() + 1);
    if let Some(path) = env_path.filter(|p| !p.trim().is_empty()) {
        candidates.push(PathBuf::from(path.trim()));
    }
    candidates.extend(DEFAULT_CANDIDATES.iter().map(PathBuf::from));
    candidates
}
