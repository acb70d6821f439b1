//! Seen-record store trait.

use crate::Result;
use crate::config::ScopeSetting;
use crate::models::{IdentifierKind, SeenRecord, SeenScope};

/// Trait for persisted seen-record stores.
///
/// A store maps `(identifier kind, identifier value, scope)` to the record of
/// the run that first accepted it. Scopes partition the space exactly: a
/// query only matches records stored under the same [`SeenScope`].
///
/// Queries reflect what earlier runs recorded. The filter never records
/// in-flight decisions, so a store only ever sees finalized acceptances.
///
/// Implementations provide their own locking and must be safe to share
/// between concurrent runs.
pub trait SeenRecordStore: Send + Sync {
    /// Looks up the record for an identifier value under a scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    fn find(
        &self,
        kind: &IdentifierKind,
        value: &str,
        scope: &SeenScope,
    ) -> Result<Option<SeenRecord>>;

    /// Returns true if the identifier value was recorded under the scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    fn is_seen(&self, kind: &IdentifierKind, value: &str, scope: &SeenScope) -> Result<bool> {
        Ok(self.find(kind, value, scope)?.is_some())
    }

    /// Records an accepted identifier value.
    ///
    /// Idempotent: recording an existing `(kind, value, scope)` keeps the
    /// original record and returns `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn record(&self, record: &SeenRecord) -> Result<bool>;

    /// Removes every record whose value or title equals `value`.
    ///
    /// Returns the number of records removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn forget(&self, value: &str) -> Result<usize>;

    /// Lists records whose value or title contains `pattern`
    /// (case-insensitive), oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    fn search(&self, pattern: &str, limit: usize) -> Result<Vec<SeenRecord>>;

    /// Returns the total number of records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    fn count(&self) -> Result<usize>;

    /// Scope used when the configuration does not name one.
    fn default_scope(&self) -> ScopeSetting {
        ScopeSetting::Global
    }
}
