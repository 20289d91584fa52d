//! The process-wide loader.
//!
//! Kept in its own test binary: it sets `AGRIPULSE_DATASET` and pins the
//! global loader for the rest of the process.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use agripulse_core::data::{DatasetLoader, DATASET_ENV_VAR};
use tempfile::TempDir;

#[test]
fn global_loader_reads_once_and_ignores_later_seeds() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prices.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Date,State,Market,Commodity,Modal Price").unwrap();
    for i in 0..30 {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
            + chrono::Duration::days(i);
        writeln!(file, "{date},Punjab,Khanna,Wheat,{}", 2000 + i).unwrap();
    }
    drop(file);
    std::env::set_var(DATASET_ENV_VAR, &path);

    let first = DatasetLoader::global().load().unwrap();
    let second = DatasetLoader::global().load().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 30);
    assert_eq!(DatasetLoader::global().read_count(), 1);
    assert_eq!(DatasetLoader::global().candidates()[0], path);

    // Already initialised: the new candidates are not used.
    let seeded = DatasetLoader::init_global(vec![PathBuf::from("/nonexistent/other.csv")]);
    assert!(std::ptr::eq(seeded, DatasetLoader::global()));
    assert!(Arc::ptr_eq(&seeded.load().unwrap(), &first));
    assert_eq!(seeded.read_count(), 1);
}
