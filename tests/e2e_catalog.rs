// Cerebro - tests/e2e_catalog.rs
//
// End-to-end tests for the import, search, and daily-feature pipeline.
//
// These tests read real fixture files from disk, write a real JSON catalog
// into a temp directory, and reload it, covering the path from a raw
// spreadsheet export to search results.

use cerebro::app::catalog::{import_text, Catalog, ImportOutcome};
use cerebro::app::store::{IssueStore, JsonFileStore};
use cerebro::core::extractor;
use cerebro::core::model::{build_search_index, Month, QueryDescriptor};
use cerebro::core::query::{DisabledBridge, QueryBridge};
use cerebro::platform::fs::read_import_file;
use cerebro::util::error::BridgeError;
use chrono::NaiveDate;
use std::path::PathBuf;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Import the reading-order fixture into a fresh JSON store.
fn imported_store(dir: &tempfile::TempDir) -> JsonFileStore {
    let raw = read_import_file(&fixture("reading_order.csv")).unwrap();
    let mut store = JsonFileStore::new(dir.path().join("catalog.json"));
    let outcome = import_text(&raw, &mut store, 4).unwrap();
    assert_eq!(outcome, ImportOutcome::Imported { count: 10, batches: 3 });
    assert!(!store.has_pending());
    store
}

/// Bridge that always answers with malformed JSON.
struct GarbageBridge;

impl QueryBridge for GarbageBridge {
    fn translate(&self, _text: &str) -> Result<QueryDescriptor, BridgeError> {
        cerebro::core::query::parse_descriptor_json("```json {year: }```")
    }
}

// =============================================================================
// Extraction E2E
// =============================================================================

#[test]
fn e2e_extracts_messy_fixture() {
    let raw = read_import_file(&fixture("reading_order.csv")).unwrap();
    let result = extractor::extract_with_stats(&raw);

    assert_eq!(result.records.len(), 10);
    assert_eq!(result.lines_anchored, 6);

    let muir = &result.records[2];
    assert_eq!(muir.month(), Month::March);
    assert_eq!(muir.issue_number(), "275");
    assert_eq!(muir.collection(), "Muir Island Saga, The");
    assert_eq!(muir.format(), "TPB");

    // Lower-case month cell after a blank leading column.
    let x_factor: Vec<_> = result
        .records
        .iter()
        .filter(|r| r.year() == 1986)
        .collect();
    assert_eq!(x_factor.len(), 2);
    assert!(x_factor.iter().all(|r| r.month() == Month::June));
    assert_eq!(x_factor[1].format(), "Unknown");

    // "Sept" is not a canonical month name.
    assert!(result.records.iter().all(|r| r.collection() != "AoA Omnibus"));
}

#[test]
fn e2e_derived_fields_are_consistent() {
    let raw = read_import_file(&fixture("reading_order.csv")).unwrap();
    for r in extractor::extract(&raw) {
        assert_eq!(
            r.is_uncollected(),
            r.collection() == "Uncollected / Single Issue"
        );
        if r.is_uncollected() {
            assert_eq!(r.format(), "Not Printed");
        }
        assert_eq!(
            r.search_index(),
            build_search_index(
                r.month(),
                r.year(),
                r.issue_number(),
                r.collection(),
                r.format(),
                r.is_uncollected()
            )
        );
    }
}

#[test]
fn e2e_file_without_dates_reports_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let raw = read_import_file(&fixture("no_dates.csv")).unwrap();
    let mut store = JsonFileStore::new(dir.path().join("catalog.json"));
    let outcome = import_text(&raw, &mut store, 450).unwrap();
    assert!(matches!(outcome, ImportOutcome::NoDataFound { .. }));
    assert!(!store.path().exists());
}

// =============================================================================
// Store + catalog E2E
// =============================================================================

#[test]
fn e2e_import_is_durable_across_store_instances() {
    let dir = tempfile::tempdir().unwrap();
    let store = imported_store(&dir);
    let reopened = JsonFileStore::new(store.path());
    assert_eq!(reopened.load_all().unwrap(), store.load_all().unwrap());
}

#[test]
fn e2e_reloaded_catalog_is_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let store = imported_store(&dir);
    let catalog = Catalog::load(&store).unwrap();

    let keys: Vec<_> = catalog
        .records()
        .iter()
        .map(|r| (r.year(), r.month().index()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(catalog.records()[0].year(), 1975);

    let summary = catalog.summary();
    assert_eq!(summary.total, 10);
    assert_eq!(summary.uncollected, 3);
    assert_eq!(summary.distinct_years, 6);
}

#[test]
fn e2e_year_search() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(&imported_store(&dir)).unwrap();
    let outcome = catalog.search("1995", &DisabledBridge);
    assert_eq!(outcome.descriptor, QueryDescriptor::for_year(1995));
    assert_eq!(outcome.hits.len(), 2);
}

#[test]
fn e2e_malformed_bridge_falls_back_to_substring() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(&imported_store(&dir)).unwrap();
    let outcome = catalog.search("Fall of X", &GarbageBridge);
    assert_eq!(outcome.descriptor, QueryDescriptor::for_text("fall of x"));
    assert_eq!(outcome.hits.len(), 2);
    assert!(outcome
        .hits
        .iter()
        .all(|r| r.search_index().contains("fall of x")));
}

#[test]
fn e2e_uncollected_search() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(&imported_store(&dir)).unwrap();
    let outcome = catalog.search("missing", &DisabledBridge);
    assert_eq!(outcome.hits.len(), 3);
    assert!(outcome.hits.iter().all(|r| r.is_uncollected()));
}

#[test]
fn e2e_daily_feature() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::load(&imported_store(&dir)).unwrap();
    // 2025-10-02 is day 275; 275 % 6 = 5 -> the sixth year, 2023.
    let date = NaiveDate::from_ymd_opt(2025, 10, 2).unwrap();
    let feature = catalog.daily_feature(date).unwrap();
    assert_eq!(feature.year, 2023);
    assert_eq!(feature.month, Month::October);
    assert_eq!(feature.issues.len(), 2);
    assert_eq!(catalog.daily_feature(date), Some(feature));
}

#[test]
fn e2e_clear_empties_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = imported_store(&dir);
    assert_eq!(store.clear().unwrap(), 10);
    assert!(Catalog::load(&store).unwrap().is_empty());
}
