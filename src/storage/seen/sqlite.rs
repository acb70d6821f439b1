//! `SQLite`-backed seen-record store.

use crate::models::{IdentifierKind, SeenRecord, SeenScope};
use crate::storage::sqlite::{acquire_lock, configure_connection, record_operation_metrics};
use crate::storage::traits::SeenRecordStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::instrument;

const SELECT_COLUMNS: &str = "kind, value, scope, title, task, recorded_at";

/// `SQLite`-backed seen-record store.
///
/// Records live in a single `seen_records` table with a
/// `UNIQUE(kind, value, scope)` constraint; inserts use `INSERT OR IGNORE`
/// so recording is idempotent even across processes sharing the file.
///
/// # Concurrency
///
/// The connection sits behind a `Mutex`. WAL mode and a busy timeout let
/// several processes (one per task) share the same database file.
pub struct SqliteSeenStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

/// Raw column values of one `seen_records` row.
struct SeenRow {
    kind: String,
    value: String,
    scope: String,
    title: String,
    task: String,
    recorded_at: i64,
}

impl SeenRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            kind: row.get(0)?,
            value: row.get(1)?,
            scope: row.get(2)?,
            title: row.get(3)?,
            task: row.get(4)?,
            recorded_at: row.get(5)?,
        })
    }

    fn into_record(self) -> Result<SeenRecord> {
        let scope = SeenScope::from_key(&self.scope).ok_or_else(|| Error::OperationFailed {
            operation: "decode_seen_record".to_string(),
            cause: format!("unknown scope key `{}`", self.scope),
        })?;
        let recorded_at =
            DateTime::<Utc>::from_timestamp_millis(self.recorded_at).unwrap_or_default();

        Ok(SeenRecord {
            kind: IdentifierKind::new(self.kind),
            value: self.value,
            scope,
            title: self.title,
            task: self.task,
            recorded_at,
        })
    }
}

fn sql_error(operation: &str, e: &rusqlite::Error) -> Error {
    Error::OperationFailed {
        operation: operation.to_string(),
        cause: e.to_string(),
    }
}

/// Escapes `%`, `_` and the escape character itself for a `LIKE` pattern.
fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

const fn status_of<T>(result: &Result<T>) -> &'static str {
    if result.is_ok() { "success" } else { "error" }
}

impl SqliteSeenStore {
    /// Opens (or creates) a store at the given path.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_database_dir".to_string(),
                cause: format!("{}: {e}", parent.display()),
            })?;
        }

        let conn = Connection::open(&db_path).map_err(|e| sql_error("open_sqlite", &e))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Creates an in-memory store (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| sql_error("open_sqlite_in_memory", &e))?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path: None,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Returns the database path, or `None` for in-memory stores.
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn initialize(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);
        configure_connection(&conn)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS seen_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                value TEXT NOT NULL,
                scope TEXT NOT NULL,
                title TEXT NOT NULL,
                task TEXT NOT NULL,
                recorded_at INTEGER NOT NULL,
                UNIQUE (kind, value, scope)
            );
            CREATE INDEX IF NOT EXISTS idx_seen_records_title ON seen_records (title);",
        )
        .map_err(|e| sql_error("create_seen_records_table", &e))?;

        Ok(())
    }
}

impl SeenRecordStore for SqliteSeenStore {
    #[instrument(skip(self), fields(operation = "find", backend = "sqlite", kind = %kind))]
    fn find(
        &self,
        kind: &IdentifierKind,
        value: &str,
        scope: &SeenScope,
    ) -> Result<Option<SeenRecord>> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            let row = conn
                .query_row(
                    &format!(
                        "SELECT {SELECT_COLUMNS} FROM seen_records
                         WHERE kind = ?1 AND value = ?2 AND scope = ?3"
                    ),
                    params![kind.as_str(), value, scope.key()],
                    SeenRow::from_row,
                )
                .optional()
                .map_err(|e| sql_error("find_seen", &e))?;
            row.map(SeenRow::into_record).transpose()
        })();

        record_operation_metrics("sqlite", "find", start, status_of(&result));
        result
    }

    #[instrument(skip(self, record), fields(operation = "record", backend = "sqlite", kind = %record.kind))]
    fn record(&self, record: &SeenRecord) -> Result<bool> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            let inserted = conn
                .execute(
                    "INSERT OR IGNORE INTO seen_records
                     (kind, value, scope, title, task, recorded_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        record.kind.as_str(),
                        record.value,
                        record.scope.key(),
                        record.title,
                        record.task,
                        record.recorded_at.timestamp_millis(),
                    ],
                )
                .map_err(|e| sql_error("record_seen", &e))?;
            Ok(inserted > 0)
        })();

        record_operation_metrics("sqlite", "record", start, status_of(&result));
        result
    }

    #[instrument(skip(self), fields(operation = "forget", backend = "sqlite"))]
    fn forget(&self, value: &str) -> Result<usize> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            conn.execute(
                "DELETE FROM seen_records WHERE value = ?1 OR title = ?1",
                params![value],
            )
            .map_err(|e| sql_error("forget_seen", &e))
        })();

        record_operation_metrics("sqlite", "forget", start, status_of(&result));
        result
    }

    #[instrument(skip(self), fields(operation = "search", backend = "sqlite"))]
    fn search(&self, pattern: &str, limit: usize) -> Result<Vec<SeenRecord>> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            let like = format!("%{}%", escape_like(&pattern.to_lowercase()));
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM seen_records
                     WHERE lower(value) LIKE ?1 ESCAPE '\\' OR lower(title) LIKE ?1 ESCAPE '\\'
                     ORDER BY recorded_at, kind, value
                     LIMIT ?2"
                ))
                .map_err(|e| sql_error("search_seen", &e))?;

            let rows = stmt
                .query_map(params![like, limit], SeenRow::from_row)
                .map_err(|e| sql_error("search_seen", &e))?;

            let mut records = Vec::new();
            for row in rows {
                let row = row.map_err(|e| sql_error("search_seen", &e))?;
                records.push(row.into_record()?);
            }
            Ok(records)
        })();

        record_operation_metrics("sqlite", "search", start, status_of(&result));
        result
    }

    fn count(&self) -> Result<usize> {
        let start = Instant::now();
        let result = (|| {
            let conn = acquire_lock(&self.conn);
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM seen_records", [], |row| row.get(0))
                .map_err(|e| sql_error("count_seen", &e))?;
            Ok(usize::try_from(count).unwrap_or(0))
        })();

        record_operation_metrics("sqlite", "count", start, status_of(&result));
        result
    }
}
