//! Shared metrics recording for `SQLite` backends.

use std::time::Instant;

/// Records operation metrics for a storage operation.
///
/// Emits `seen_store_operations_total` (counter) and
/// `seen_store_operation_duration_ms` (histogram), labelled by backend,
/// operation and status (`"success"` or `"error"`).
pub fn record_operation_metrics(
    backend: &'static str,
    operation: &'static str,
    start: Instant,
    status: &'static str,
) {
    metrics::counter!(
        "seen_store_operations_total",
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "seen_store_operation_duration_ms",
        "backend" => backend,
        "operation" => operation,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64() * 1000.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_record_operation_metrics_without_recorder() {
        // No recorder is installed in tests; recording must be a no-op.
        let start = Instant::now();
        thread::sleep(Duration::from_millis(1));

        record_operation_metrics("sqlite", "find", start, "success");
        record_operation_metrics("sqlite", "record", start, "error");
        assert!(start.elapsed().as_millis() >= 1);
    }
}
