//! In-memory seen-record store.
//!
//! Non-persistent implementation of [`SeenRecordStore`] used in tests and for
//! dry runs.

use crate::models::{IdentifierKind, SeenRecord, SeenScope};
use crate::storage::traits::SeenRecordStore;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::instrument;

type RecordKey = (String, String, String);

fn record_key(kind: &IdentifierKind, value: &str, scope: &SeenScope) -> RecordKey {
    (scope.key(), kind.as_str().to_string(), value.to_string())
}

fn count_operation(operation: &'static str) {
    metrics::counter!(
        "seen_store_operations_total",
        "backend" => "memory",
        "operation" => operation
    )
    .increment(1);
}

fn poisoned(operation: &str) -> Error {
    Error::OperationFailed {
        operation: operation.to_string(),
        cause: "Lock poisoned".to_string(),
    }
}

/// In-memory seen-record store.
///
/// Uses `RwLock` for thread-safe access with reader-writer semantics.
/// Data is not persisted between processes.
///
/// # Example
///
/// ```rust
/// use seengate::models::{IdentifierKind, SeenRecord, SeenScope};
/// use seengate::storage::{InMemorySeenStore, SeenRecordStore};
///
/// let store = InMemorySeenStore::new();
/// let record = SeenRecord::new(IdentifierKind::IMDB, "tt1", SeenScope::Global, "Heat", "movies");
/// store.record(&record).unwrap();
/// assert!(store.is_seen(&IdentifierKind::IMDB, "tt1", &SeenScope::Global).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct InMemorySeenStore {
    records: RwLock<HashMap<RecordKey, SeenRecord>>,
}

impl InMemorySeenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records stored.
    ///
    /// Reads through a poisoned lock, unlike [`SeenRecordStore::count`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SeenRecordStore for InMemorySeenStore {
    #[instrument(skip(self), fields(operation = "find", backend = "memory", kind = %kind))]
    fn find(
        &self,
        kind: &IdentifierKind,
        value: &str,
        scope: &SeenScope,
    ) -> Result<Option<SeenRecord>> {
        let records = self.records.read().map_err(|_| poisoned("find_seen"))?;
        count_operation("find");
        Ok(records.get(&record_key(kind, value, scope)).cloned())
    }

    #[instrument(skip(self, record), fields(operation = "record", backend = "memory", kind = %record.kind))]
    fn record(&self, record: &SeenRecord) -> Result<bool> {
        let mut records = self.records.write().map_err(|_| poisoned("record_seen"))?;
        let key = record_key(&record.kind, &record.value, &record.scope);
        if records.contains_key(&key) {
            return Ok(false);
        }
        records.insert(key, record.clone());
        count_operation("record");
        Ok(true)
    }

    #[instrument(skip(self), fields(operation = "forget", backend = "memory"))]
    fn forget(&self, value: &str) -> Result<usize> {
        let mut records = self.records.write().map_err(|_| poisoned("forget_seen"))?;
        let before = records.len();
        records.retain(|_, record| record.value != value && record.title != value);
        count_operation("forget");
        Ok(before - records.len())
    }

    #[instrument(skip(self), fields(operation = "search", backend = "memory"))]
    fn search(&self, pattern: &str, limit: usize) -> Result<Vec<SeenRecord>> {
        let records = self.records.read().map_err(|_| poisoned("search_seen"))?;
        let needle = pattern.to_lowercase();

        let mut hits: Vec<SeenRecord> = records
            .values()
            .filter(|r| {
                r.value.to_lowercase().contains(&needle) || r.title.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| {
            a.recorded_at
                .cmp(&b.recorded_at)
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| a.value.cmp(&b.value))
        });
        hits.truncate(limit);
        count_operation("search");
        Ok(hits)
    }

    #[instrument(skip(self), fields(operation = "count", backend = "memory"))]
    fn count(&self) -> Result<usize> {
        let records = self.records.read().map_err(|_| poisoned("count_seen"))?;
        count_operation("count");
        Ok(records.len())
    }
}
