//! Storage layer abstraction.
//!
//! The seen-memory used by the `seen_movies` stage lives behind
//! [`SeenRecordStore`]. Two backends are provided:
//! - [`InMemorySeenStore`]: non-persistent, for tests and dry runs
//! - [`SqliteSeenStore`]: `SQLite` file shared between runs and tasks

// Dropping the connection guard slightly earlier provides no benefit.
#![allow(clippy::significant_drop_tightening)]

pub mod seen;
pub mod sqlite;
pub mod traits;

pub use seen::{InMemorySeenStore, SqliteSeenStore};
pub use traits::SeenRecordStore;
