//! Seen-item deduplication.
//!
//! Rejects items whose identifiers were already accepted, either by an
//! earlier run or earlier in the current run. Three phases run in order,
//! each exiting per item on the first match:
//!
//! 1. **Missing identifier** (strict only): no recognized identifier at all
//! 2. **Prior duplicate**: an identifier is in the [`SeenRecordStore`]
//! 3. **Same-run duplicate**: an identifier was accepted earlier in the run
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     SeenMoviesFilter                         │
//! │  kinds = [imdb_id, tmdb_id], priority = -255                 │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                      SeenFilter                        │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  │  │
//! │  │  │ Presence     │  │ Prior        │  │ Same-run     │  │  │
//! │  │  │ Policy       │  │ Duplicates   │  │ Duplicates   │  │  │
//! │  │  │ (strict)     │  │ (store)      │  │ (run sets)   │  │  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────┘  │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`SeenRecordStore`]: crate::storage::SeenRecordStore

mod movies;
mod run_sets;
mod seen_filter;
mod types;

pub use movies::{
    MOVIE_IDENTIFIER_DESCRIPTION, SEEN_MOVIES_PRIORITY, SEEN_MOVIES_STAGE, SeenMoviesFilter,
    movie_identifier_kinds,
};
pub use run_sets::RunDuplicateSets;
pub use seen_filter::{SEEN_FILTER_PRIORITY, SeenFilter};
pub use types::{AnyIdentifier, PresencePolicy, RejectReason};
