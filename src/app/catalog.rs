// Cerebro - app/catalog.rs
//
// Catalog session state: imports spreadsheets into a store, holds the
// sorted catalog in memory, and answers searches and daily-feature requests.

use crate::app::store::IssueStore;
use crate::core::extractor;
use crate::core::matcher;
use crate::core::model::{DailyFeature, IssueRecord, QueryDescriptor};
use crate::core::query::{self, QueryBridge};
use crate::util::error::StoreError;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Outcome of importing one spreadsheet export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Records were extracted and written to the store.
    Imported { count: usize, batches: usize },
    /// No row carried a month/year anchor; nothing was written.
    NoDataFound { lines_processed: usize },
}

/// Extract records from `raw` and append them to `store` in batches of
/// `batch_size`.
///
/// Zero extracted records is reported as `NoDataFound`, not as an error, so
/// the caller can ask for a corrected file.
pub fn import_text(
    raw: &str,
    store: &mut dyn IssueStore,
    batch_size: usize,
) -> Result<ImportOutcome, StoreError> {
    let result = extractor::extract_with_stats(raw);
    if result.is_empty() {
        tracing::warn!(
            lines = result.lines_processed,
            "No valid issues found; input has no Month/Year columns"
        );
        return Ok(ImportOutcome::NoDataFound {
            lines_processed: result.lines_processed,
        });
    }

    let total = result.records.len();
    tracing::info!(records = total, lines = result.lines_processed, "Found issues; uploading");

    let mut written = 0;
    let mut batches = 0;
    for chunk in result.records.chunks(batch_size.max(1)) {
        store.append_batch(chunk)?;
        written += chunk.len();
        batches += 1;
        tracing::info!(written, total, "Uploaded {written} / {total}");
    }
    store.commit()?;

    Ok(ImportOutcome::Imported {
        count: written,
        batches,
    })
}

/// Result of a search: the descriptor the query resolved to, and the hits.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub descriptor: QueryDescriptor,
    pub hits: Vec<IssueRecord>,
}

/// Aggregate figures for the loaded catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSummary {
    pub total: usize,
    pub uncollected: usize,
    pub distinct_years: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    /// Record counts per format, sorted by format name.
    pub by_format: BTreeMap<String, usize>,
}

/// In-memory catalog, always held in canonical (year, month) order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<IssueRecord>,
}

impl Catalog {
    /// Build a catalog from records in any order.
    pub fn from_records(mut records: Vec<IssueRecord>) -> Self {
        matcher::sort_catalog(&mut records);
        Self { records }
    }

    /// Load and sort the full contents of `store`.
    pub fn load(store: &dyn IssueStore) -> Result<Self, StoreError> {
        let records = store.load_all()?;
        tracing::debug!(records = records.len(), "Catalog loaded");
        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[IssueRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve `raw_query` and apply it.
    ///
    /// A blank query matches everything and never reaches the bridge.
    pub fn search(&self, raw_query: &str, bridge: &dyn QueryBridge) -> SearchOutcome {
        let descriptor = if raw_query.trim().is_empty() {
            QueryDescriptor::default()
        } else {
            query::resolve_query(raw_query, bridge)
        };
        let hits = matcher::apply_filter(&self.records, &descriptor);
        tracing::info!(descriptor = %descriptor, hits = hits.len(), "Search complete");
        SearchOutcome { descriptor, hits }
    }

    /// Daily featured year and issues for `date`.
    pub fn daily_feature(&self, date: NaiveDate) -> Option<DailyFeature> {
        matcher::daily_feature(&self.records, date)
    }

    pub fn summary(&self) -> CatalogSummary {
        let years = matcher::unique_years(&self.records);
        let mut by_format = BTreeMap::new();
        for record in &self.records {
            *by_format.entry(record.format().to_string()).or_insert(0) += 1;
        }
        CatalogSummary {
            total: self.records.len(),
            uncollected: self.records.iter().filter(|r| r.is_uncollected()).count(),
            distinct_years: years.len(),
            first_year: years.first().copied(),
            last_year: years.last().copied(),
            by_format,
        }
    }
}
