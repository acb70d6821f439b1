//! CLI command implementations.
//!
//! Each submodule implements one command. Argument parsing lives in the
//! binary; the functions here take resolved configuration and write to any
//! [`Write`](std::io::Write) so they can be exercised from tests.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `filter` | Run a list of items through the pipeline |
//! | `forget` | Remove seen records by identifier value or title |
//! | `search` | List seen records matching a pattern |
//! | `status` | Show the database location and record count |
//!
//! # Example Usage
//!
//! ```bash
//! # Filter a feed and remember accepted movies
//! seengate filter feed.json --task hd-movies --matching strict
//!
//! # See what would be rejected without recording anything
//! seengate filter feed.json --dry-run --format json
//!
//! # Make a movie acceptable again
//! seengate forget tt0113277
//! ```

mod filter;
mod forget;
mod search;
mod status;

pub use filter::{FilterArgs, build_pipeline, cmd_filter, load_items, parse_items, run_filter};
pub use forget::cmd_forget;
pub use search::{cmd_search, write_records};
pub use status::{StatusReport, cmd_status};

use crate::Result;
use crate::config::SeengateConfig;
use crate::storage::SqliteSeenStore;
use std::str::FromStr;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default).
    #[default]
    Table,
    /// JSON format.
    Json,
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        })
    }
}

/// Opens the configured seen-record database.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or initialized.
pub fn open_store(config: &SeengateConfig) -> Result<SqliteSeenStore> {
    SqliteSeenStore::new(config.database_path.clone())
}
