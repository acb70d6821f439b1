//! Rejection reasons and presence policies.

use crate::models::{IdentifierKind, Item};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the seen filter rejected an item.
///
/// The [`Display`](fmt::Display) form is the reason string attached to the
/// rejected item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// Strict matching is on and the item has no recognized identifier.
    MissingIdentifier {
        /// What was missing, e.g. `movie (imdb or tmdb) id`.
        description: String,
    },
    /// An identifier was accepted by an earlier run.
    PriorDuplicate {
        /// Kind of the matching identifier.
        kind: IdentifierKind,
        /// Matching value.
        value: String,
        /// Task that recorded it.
        task: String,
    },
    /// An identifier collides with an item accepted earlier in this run.
    SameRunDuplicate,
}

impl RejectReason {
    /// Returns a stable label for metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MissingIdentifier { .. } => "missing_identifier",
            Self::PriorDuplicate { .. } => "prior_duplicate",
            Self::SameRunDuplicate => "same_run_duplicate",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIdentifier { description } => write!(f, "missing {description}, strict"),
            Self::PriorDuplicate { kind, value, task } => {
                write!(f, "already seen: {kind} `{value}` was accepted in task {task}")
            },
            Self::SameRunDuplicate => write!(f, "already accepted once in task"),
        }
    }
}

/// Strict-mode presence requirement.
///
/// Decides whether an item carries enough identifiers to be deduplicated.
/// Items failing the policy are rejected before any store query.
pub trait PresencePolicy: Send + Sync {
    /// Returns true if the item satisfies the requirement.
    fn is_satisfied(&self, item: &Item, kinds: &[IdentifierKind]) -> bool;

    /// Describes what is required, used in the rejection reason.
    fn description(&self) -> &str;
}

/// Requires at least one of the filter's identifier kinds to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyIdentifier {
    description: String,
}

impl AnyIdentifier {
    /// Creates the policy with a human-readable description of the
    /// identifiers, e.g. `movie (imdb or tmdb) id`.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl PresencePolicy for AnyIdentifier {
    fn is_satisfied(&self, item: &Item, kinds: &[IdentifierKind]) -> bool {
        item.has_any_identifier(kinds)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
