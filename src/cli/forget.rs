//! Forget CLI command.

use crate::storage::SeenRecordStore;
use std::io::Write;

/// Removes every record whose identifier value or title equals `value`.
///
/// Returns the number of records removed.
///
/// # Errors
///
/// Returns an error if the store cannot be written or output fails.
pub fn cmd_forget<W: Write>(
    writer: &mut W,
    store: &dyn SeenRecordStore,
    value: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let value = value.trim();
    if value.is_empty() {
        return Err(crate::Error::InvalidInput("nothing to forget: value is empty".to_string()).into());
    }

    let removed = store.forget(value)?;
    if removed == 0 {
        writeln!(writer, "No seen records matched '{value}'")?;
    } else {
        writeln!(writer, "Forgot {removed} seen record(s) matching '{value}'")?;
    }
    Ok(removed)
}
