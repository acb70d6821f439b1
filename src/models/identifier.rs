//! Identifier kinds and seen-record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A named category of external identifier, e.g. `imdb_id`.
///
/// The kind doubles as the item field name the identifier is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentifierKind(Cow<'static, str>);

impl IdentifierKind {
    /// IMDb title identifier (`tt0113277`).
    pub const IMDB: Self = Self(Cow::Borrowed("imdb_id"));

    /// TMDb movie identifier (`949`).
    pub const TMDB: Self = Self(Cow::Borrowed("tmdb_id"));

    /// Creates an identifier kind from a field name.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self(Cow::Owned(field.into()))
    }

    /// Returns the field name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for IdentifierKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Partition key for persisted seen records.
///
/// `Global` records are shared by every task. `Local` records only match
/// queries made for the same task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum SeenScope {
    /// Shared across all tasks.
    Global,
    /// Private to one task.
    Local {
        /// Name of the owning task.
        task: String,
    },
}

impl SeenScope {
    const GLOBAL_KEY: &'static str = "global";
    const LOCAL_PREFIX: &'static str = "local:";

    /// Creates a task-local scope.
    #[must_use]
    pub fn local(task: impl Into<String>) -> Self {
        Self::Local { task: task.into() }
    }

    /// Returns the storage key for this scope.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Global => Self::GLOBAL_KEY.to_string(),
            Self::Local { task } => format!("{}{task}", Self::LOCAL_PREFIX),
        }
    }

    /// Parses a storage key produced by [`SeenScope::key`].
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        if key == Self::GLOBAL_KEY {
            return Some(Self::Global);
        }
        key.strip_prefix(Self::LOCAL_PREFIX).map(Self::local)
    }
}

impl fmt::Display for SeenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.key())
    }
}

/// A persisted record that an identifier value was accepted by some run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenRecord {
    /// Identifier kind.
    pub kind: IdentifierKind,
    /// Canonical identifier value.
    pub value: String,
    /// Scope the record was stored under.
    pub scope: SeenScope,
    /// Title of the item that was accepted.
    pub title: String,
    /// Task that accepted the item.
    pub task: String,
    /// When the record was first stored.
    pub recorded_at: DateTime<Utc>,
}

impl SeenRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(
        kind: IdentifierKind,
        value: impl Into<String>,
        scope: SeenScope,
        title: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            value: value.into(),
            scope,
            title: title.into(),
            task: task.into(),
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_kinds() {
        assert_eq!(IdentifierKind::IMDB.as_str(), "imdb_id");
        assert_eq!(IdentifierKind::TMDB.to_string(), "tmdb_id");
        assert_eq!(IdentifierKind::new("imdb_id"), IdentifierKind::IMDB);
    }

    #[test]
    fn test_scope_key_roundtrip() {
        let global = SeenScope::Global;
        let local = SeenScope::local("movies");

        assert_eq!(global.key(), "global");
        assert_eq!(local.key(), "local:movies");
        assert_eq!(SeenScope::from_key("global"), Some(global));
        assert_eq!(SeenScope::from_key("local:movies"), Some(local));
        assert_eq!(SeenScope::from_key("bogus"), None);
    }

    #[test]
    fn test_local_scopes_differ_by_task() {
        assert_ne!(SeenScope::local("a"), SeenScope::local("b"));
        assert_ne!(SeenScope::local("global"), SeenScope::Global);
        assert_ne!(SeenScope::local("global").key(), SeenScope::Global.key());
    }
}
