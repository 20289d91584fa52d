//! Dataset loading against real files on disk.
//!
//! Covers header aliases, row cleaning, the 30-row floor, candidate
//! resolution, and memoization of the first successful load.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use agripulse_core::data::{select_history, DataError, DatasetLoader, SelectionTier};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────

fn write_csv(dir: &Path, name: &str, header: &str, rows: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{header}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    path
}

/// `n` daily rows for one market in canonical column order.
fn canonical_rows(n: usize, market: &str) -> Vec<String> {
    (0..n)
        .map(|i| {
            let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(i as i64);
            format!("{date},Punjab,{market},Wheat,{}", 2000 + i)
        })
        .collect()
}

const CANONICAL_HEADER: &str = "Date,State,Market,Commodity,Modal Price";

// ── Loading ──────────────────────────────────────────────────────────

#[test]
fn aliased_headers_load() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<String> = (0..30)
        .map(|i| format!("PUNJAB,Khanna,Wheat,\"2,{:03}\",{:02}/03/2024", i, i + 1))
        .collect();
    let path = write_csv(
        dir.path(),
        "prices.csv",
        "STATE,Market Name,Commodity,Modal_Price,Price Date",
        &rows[..29],
    );
    // 29 rows from March plus one more day in April
    let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
    writeln!(file, "PUNJAB,Khanna,Wheat,2100,01/04/2024").unwrap();
    drop(file);

    let loader = DatasetLoader::new(vec![path.clone()]);
    let ds = loader.load().unwrap();
    assert_eq!(ds.len(), 30);
    assert_eq!(ds.source(), Some(path.as_path()));
    assert_eq!(ds.rows()[0].price, 2000.0);
    assert_eq!(ds.rows()[29].price, 2100.0);
    assert_eq!(ds.unique_states(), vec!["PUNJAB".to_string()]);
}

#[test]
fn unparseable_rows_are_dropped() {
    let dir = TempDir::new().unwrap();
    let mut rows = canonical_rows(30, "Khanna");
    rows.push("not-a-date,Punjab,Khanna,Wheat,2000".into());
    rows.push("2024-03-01,Punjab,Khanna,Wheat,abc".into());
    rows.push("2024-03-02,,Khanna,Wheat,2000".into());
    let path = write_csv(dir.path(), "prices.csv", CANONICAL_HEADER, &rows);

    let ds = DatasetLoader::new(vec![path]).load().unwrap();
    assert_eq!(ds.len(), 30);
    assert_eq!(ds.dropped_rows(), 3);
    for row in ds.rows() {
        assert!(!row.state.is_empty() && !row.market.is_empty() && !row.commodity.is_empty());
        assert!(row.price.is_finite() && row.price >= 0.0);
    }
}

#[test]
fn fewer_than_thirty_valid_rows_fails() {
    let dir = TempDir::new().unwrap();
    let mut rows = canonical_rows(29, "Khanna");
    rows.push("2024-03-01,Punjab,Khanna,Wheat,-5".into());
    let path = write_csv(dir.path(), "prices.csv", CANONICAL_HEADER, &rows);

    let err = DatasetLoader::new(vec![path]).load().unwrap_err();
    match err {
        DataError::TooFewRows { found, required } => {
            assert_eq!(found, 29);
            assert_eq!(required, 30);
        }
        other => panic!("expected TooFewRows, got {other:?}"),
    }
}

#[test]
fn missing_columns_are_named() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        dir.path(),
        "prices.csv",
        "Date,Commodity,Modal Price",
        &["2024-01-01,Wheat,2000".to_string()],
    );
    let err = DatasetLoader::new(vec![path]).load().unwrap_err();
    assert_eq!(
        err.to_string(),
        "dataset is missing required columns: Market, State"
    );
}

#[test]
fn first_existing_candidate_wins() {
    let dir = TempDir::new().unwrap();
    let second = write_csv(dir.path(), "second.csv", CANONICAL_HEADER, &canonical_rows(31, "B"));
    let third = write_csv(dir.path(), "third.csv", CANONICAL_HEADER, &canonical_rows(32, "C"));

    let loader = DatasetLoader::new(vec![dir.path().join("first.csv"), second.clone(), third]);
    assert_eq!(loader.resolve_path().unwrap(), second);
    assert_eq!(loader.load().unwrap().len(), 31);
}

#[test]
fn no_candidate_is_not_found() {
    let dir = TempDir::new().unwrap();
    let candidates = vec![dir.path().join("a.csv"), dir.path().join("b.csv")];
    let err = DatasetLoader::new(candidates.clone()).load().unwrap_err();
    match err {
        DataError::NotFound { candidates: listed } => assert_eq!(listed, candidates),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

// ── Memoization ──────────────────────────────────────────────────────

#[test]
fn repeated_loads_reuse_the_first_read() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "prices.csv", CANONICAL_HEADER, &canonical_rows(30, "Khanna"));
    let loader = DatasetLoader::new(vec![path.clone()]);

    let first = loader.load().unwrap();
    // Rewriting the file must not be observed.
    write_csv(dir.path(), "prices.csv", CANONICAL_HEADER, &canonical_rows(40, "Khanna"));
    let second = loader.load().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 30);
    assert_eq!(first.content_hash(), second.content_hash());
    assert_eq!(loader.read_count(), 1);
}

#[test]
fn failures_are_not_cached() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prices.csv");
    let loader = DatasetLoader::new(vec![path.clone()]);

    assert!(matches!(loader.load(), Err(DataError::NotFound { .. })));
    write_csv(dir.path(), "prices.csv", CANONICAL_HEADER, &canonical_rows(10, "Khanna"));
    assert!(matches!(loader.load(), Err(DataError::TooFewRows { .. })));
    assert!(loader.cached().is_none());

    write_csv(dir.path(), "prices.csv", CANONICAL_HEADER, &canonical_rows(30, "Khanna"));
    assert_eq!(loader.load().unwrap().len(), 30);
    assert_eq!(loader.read_count(), 2);
    assert!(loader.cached().is_some());
}

#[test]
fn concurrent_first_access_reads_once() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "prices.csv", CANONICAL_HEADER, &canonical_rows(200, "Khanna"));
    let loader = DatasetLoader::new(vec![path]);

    let loaded: Vec<Arc<_>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| loader.load().unwrap())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(loader.read_count(), 1);
    assert!(loaded.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

// ── Selection over a loaded file ─────────────────────────────────────

#[test]
fn selection_falls_back_to_commodity_wide() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "prices.csv", CANONICAL_HEADER, &canonical_rows(30, "Khanna"));
    let ds = DatasetLoader::new(vec![path]).load().unwrap();

    let sel = select_history(&ds, Some("Kerala"), "Kochi", "wheat");
    assert_eq!(sel.tier, SelectionTier::CommodityWide);
    assert_eq!(sel.len(), 30);
}
