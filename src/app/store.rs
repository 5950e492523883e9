// Cerebro - app/store.rs
//
// Catalog persistence behind a small trait: append in batches, load the
// whole set, bulk clear. Records carry no identity of their own; the store
// decides how they are kept.

use crate::core::model::IssueRecord;
use crate::platform::fs;
use crate::util::error::StoreError;
use std::path::{Path, PathBuf};

/// Storage collaborator for the catalog.
pub trait IssueStore {
    /// Append one batch of records.
    fn append_batch(&mut self, batch: &[IssueRecord]) -> Result<(), StoreError>;

    /// Make appended batches durable. Stores that persist on every append
    /// need not override this.
    fn commit(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Load every stored record, in insertion order.
    fn load_all(&self) -> Result<Vec<IssueRecord>, StoreError>;

    /// Delete every record, returning how many were removed.
    fn clear(&mut self) -> Result<usize, StoreError>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// Store that lives for the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<IssueRecord>,
    batches_written: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `append_batch` calls so far.
    pub fn batches_written(&self) -> usize {
        self.batches_written
    }
}

impl IssueStore for MemoryStore {
    fn append_batch(&mut self, batch: &[IssueRecord]) -> Result<(), StoreError> {
        self.records.extend_from_slice(batch);
        self.batches_written += 1;
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<IssueRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn clear(&mut self) -> Result<usize, StoreError> {
        let removed = self.records.len();
        self.records.clear();
        Ok(removed)
    }
}

// =============================================================================
// JSON file store
// =============================================================================

/// Store backed by a single JSON array file.
///
/// Appended batches are buffered in memory on top of the file contents and
/// written in one atomic rewrite on `commit`. Uncommitted batches are lost
/// if the store is dropped; the file is never left half-written.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    pending: Option<Vec<IssueRecord>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pending: None,
        }
    }

    /// True when appended batches have not been committed yet.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn read_file(&self) -> Result<Vec<IssueRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = std::fs::read(&self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, records: &[IssueRecord]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(records).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })?;
        fs::write_atomic(&self.path, &bytes).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl IssueStore for JsonFileStore {
    fn append_batch(&mut self, batch: &[IssueRecord]) -> Result<(), StoreError> {
        if self.pending.is_none() {
            self.pending = Some(self.read_file()?);
        }
        if let Some(records) = self.pending.as_mut() {
            records.extend_from_slice(batch);
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if let Some(records) = self.pending.take() {
            if let Err(e) = self.write(&records) {
                self.pending = Some(records);
                return Err(e);
            }
            tracing::debug!(
                records = records.len(),
                path = %self.path.display(),
                "Catalog written"
            );
        }
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<IssueRecord>, StoreError> {
        match &self.pending {
            Some(records) => Ok(records.clone()),
            None => self.read_file(),
        }
    }

    fn clear(&mut self) -> Result<usize, StoreError> {
        let removed = self.load_all()?.len();
        self.pending = None;
        self.write(&[])?;
        Ok(removed)
    }
}
