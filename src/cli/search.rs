//! Search CLI command.

use super::OutputFormat;
use crate::models::SeenRecord;
use crate::storage::SeenRecordStore;
use std::io::{self, Write};

/// Writes records as a table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_records<W: Write>(writer: &mut W, records: &[SeenRecord]) -> io::Result<()> {
    writeln!(
        writer,
        "{:<10}{:<14}{:<20}{:<20}{:<26}TITLE",
        "KIND", "VALUE", "SCOPE", "TASK", "RECORDED"
    )?;
    for record in records {
        writeln!(
            writer,
            "{:<10}{:<14}{:<20}{:<20}{:<26}{}",
            record.kind,
            record.value,
            record.scope,
            record.task,
            record.recorded_at.format("%Y-%m-%d %H:%M:%S UTC"),
            record.title
        )?;
    }
    Ok(())
}

/// Lists records whose value or title contains `pattern`.
///
/// # Errors
///
/// Returns an error if the store cannot be queried or output fails.
pub fn cmd_search<W: Write>(
    writer: &mut W,
    store: &dyn SeenRecordStore,
    pattern: &str,
    limit: usize,
    format: OutputFormat,
) -> Result<Vec<SeenRecord>, Box<dyn std::error::Error>> {
    let records = store.search(pattern, limit)?;

    match format {
        OutputFormat::Table if records.is_empty() => {
            writeln!(writer, "No seen records matched '{pattern}'")?;
        },
        OutputFormat::Table => write_records(writer, &records)?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&records)?;
            writeln!(writer, "{json}")?;
        },
    }
    Ok(records)
}
