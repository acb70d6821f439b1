//! Status CLI command.

use crate::config::SeengateConfig;
use crate::storage::SeenRecordStore;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Database status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Crate version.
    pub version: String,
    /// Configured task.
    pub task: String,
    /// Database location.
    pub database_path: PathBuf,
    /// Number of stored records.
    pub records: usize,
}

/// Prints the database location and record count.
///
/// # Errors
///
/// Returns an error if the store cannot be queried or output fails.
pub fn cmd_status<W: Write>(
    writer: &mut W,
    config: &SeengateConfig,
    store: &dyn SeenRecordStore,
) -> Result<StatusReport, Box<dyn std::error::Error>> {
    let report = StatusReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        task: config.task.clone(),
        database_path: config.database_path.clone(),
        records: store.count()?,
    };

    writeln!(writer, "Seengate Status")?;
    writeln!(writer, "===============")?;
    writeln!(writer)?;
    writeln!(writer, "Version: {}", report.version)?;
    writeln!(writer, "Task: {}", report.task)?;
    writeln!(writer, "Database: {}", report.database_path.display())?;
    writeln!(writer, "Seen records: {}", report.records)?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemorySeenStore;

    #[test]
    fn test_status_report() {
        let config = SeengateConfig::new()
            .with_task("movies")
            .with_database_path("/tmp/seen.db");
        let mut out = Vec::new();

        let report = cmd_status(&mut out, &config, &InMemorySeenStore::new()).unwrap();

        assert_eq!(report.records, 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Task: movies"));
        assert!(text.contains("Database: /tmp/seen.db"));
        assert!(text.contains("Seen records: 0"));
    }
}
