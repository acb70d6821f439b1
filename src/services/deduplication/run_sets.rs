//! Per-run identifier sets.

use crate::models::IdentifierKind;
use std::collections::{HashMap, HashSet};

/// Identifier values already accepted in the current run, one set per kind.
///
/// Created fresh for every evaluation and dropped with it. Never persisted and
/// never shared between runs.
#[derive(Debug, Default)]
pub struct RunDuplicateSets {
    sets: HashMap<IdentifierKind, HashSet<String>>,
}

impl RunDuplicateSets {
    /// Creates empty sets for the given kinds.
    #[must_use]
    pub fn new(kinds: &[IdentifierKind]) -> Self {
        Self {
            sets: kinds
                .iter()
                .map(|kind| (kind.clone(), HashSet::new()))
                .collect(),
        }
    }

    /// Inserts a value, returning `false` if it was already present.
    pub fn insert(&mut self, kind: &IdentifierKind, value: String) -> bool {
        self.sets.entry(kind.clone()).or_default().insert(value)
    }

    /// Returns true if the value was already inserted for the kind.
    #[must_use]
    pub fn contains(&self, kind: &IdentifierKind, value: &str) -> bool {
        self.sets.get(kind).is_some_and(|set| set.contains(value))
    }

    /// Total number of values across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.values().map(HashSet::len).sum()
    }

    /// Returns true if no value has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
