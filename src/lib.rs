//! # Seengate
//!
//! Duplicate suppression for items flowing through a sequential filter pipeline.
//!
//! Each item may carry external catalog identifiers (`imdb_id`, `tmdb_id`).
//! The seen-movies stage rejects items accepted by an earlier run, as recorded
//! in a [`SeenRecordStore`], and items that duplicate another item accepted
//! earlier in the same run.
//!
//! ## Features
//!
//! - Strict or loose identifier matching
//! - Global or per-task memory scope
//! - Pluggable record stores (in-memory, `SQLite`)
//! - Explicit, priority-ordered stage registry
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use seengate::models::Item;
//! use seengate::pipeline::{AcceptAll, Pipeline, Run};
//! use seengate::services::SeenMoviesFilter;
//! use seengate::storage::InMemorySeenStore;
//! use seengate::SeenMoviesConfig;
//!
//! let store = Arc::new(InMemorySeenStore::new());
//! let config: SeenMoviesConfig = serde_json::from_str(r#""loose""#).unwrap();
//!
//! let pipeline = Pipeline::builder()
//!     .stage(AcceptAll)
//!     .stage(SeenMoviesFilter::new(&config, store))
//!     .build();
//!
//! let mut run = Run::new(
//!     "movies",
//!     vec![
//!         Item::new("Heat 1995").with_field("imdb_id", "tt0113277"),
//!         Item::new("Heat 1995 REPACK").with_field("imdb_id", "tt0113277"),
//!     ],
//! );
//! let summary = pipeline.execute(&mut run).unwrap();
//! assert_eq!(summary.accepted, 1);
//! assert_eq!(summary.rejected, 1);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod services;
pub mod storage;

pub use config::{Matching, ScopeSetting, SeenMoviesConfig, SeenMoviesOptions, SeengateConfig};
pub use models::{FieldValue, IdentifierKind, Item, ItemStatus, SeenRecord, SeenScope};
pub use pipeline::{FilterStage, Pipeline, Run, RunSummary, StageRegistry};
pub use services::{RejectReason, SeenFilter, SeenMoviesFilter};
pub use storage::{InMemorySeenStore, SeenRecordStore, SqliteSeenStore};

/// Error type for seengate operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed filter configuration, unreadable item JSON |
/// | `OperationFailed` | `SQLite` queries fail, config or log files cannot be read |
///
/// Item rejections are never errors; they are recorded on the item itself.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - The `seen_movies` configuration has unknown keys or values
    /// - An items file is not a JSON array of objects with a `title`
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` database operations fail
    /// - Filesystem I/O errors occur
    /// - Logging has already been initialized
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for seengate operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "test".to_string(),
            cause: "failed".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'test' failed: failed");
    }
}
