//! Seen-record store backends.

mod memory;
mod sqlite;

pub use memory::InMemorySeenStore;
pub use sqlite::SqliteSeenStore;
