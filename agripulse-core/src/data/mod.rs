//! Price dataset: ingestion, process-lifetime caching, and queries.

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod ingest;
pub mod loader;
pub mod schema;
pub mod selector;

pub use catalog::{CropPriceSnapshot, DEFAULT_TRACKED_COMMODITIES};
pub use dataset::{normalize_key, Dataset, MIN_DATASET_ROWS};
pub use error::DataError;
pub use ingest::{parse_date, parse_price, read_rows, IngestReport};
pub use loader::{DatasetLoader, DATASET_ENV_VAR, DEFAULT_CANDIDATES};
pub use schema::{Column, ColumnMap};
pub use selector::{
    markets_for_state_and_commodity, resolve_state_for_market, select_history, Selection,
    SelectionTier,
};
