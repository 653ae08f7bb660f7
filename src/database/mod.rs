use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;

use crate::models::StorageStats;

pub mod error;
pub mod schedules;
pub mod schema;
pub mod summaries;
pub mod users;

pub use error::StoreError;
use error::LogContext;

/// Owns the single SQLite connection for the process.
///
/// Built once at startup and handed to consumers by reference. Every method
/// takes the lock for the duration of one operation only.
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Store {
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path).log_context("Failed to open database")?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .log_context("Failed to enable WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .log_context("Failed to set synchronous mode")?;

        let store = Self::initialize(conn, Some(db_path.to_path_buf()))?;
        log::info!("Database initialized at {}", db_path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().log_context("Failed to open in-memory database")?;
        Self::initialize(conn, None)
    }

    fn initialize(conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .log_context("Failed to enable foreign keys")?;
        schema::create_tables(&conn).log_context("Failed to create schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn storage_stats(&self) -> Result<StorageStats, StoreError> {
        let conn = self.conn();

        let count = |table: &str| -> Result<i64, StoreError> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
                .log_context("Failed to count rows")
        };

        let users_count = count("users")?;
        let schedules_count = count("schedules")?;
        let summaries_count = count("schedule_summaries")?;

        let oldest_summary_date: Option<String> = conn
            .query_row("SELECT MIN(date) FROM schedule_summaries", [], |row| row.get(0))
            .log_context("Failed to read oldest summary")?;

        let total_size_bytes = self
            .path
            .as_deref()
            .map(|p| file_len(p) + file_len(&wal_path(p)))
            .unwrap_or(0);

        Ok(StorageStats {
            total_size_bytes,
            users_count,
            schedules_count,
            summaries_count,
            oldest_summary_date,
        })
    }
}

/// Recent writes live in the `-wal` sidecar until a checkpoint.
fn wal_path(db_path: &Path) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push("-wal");
    PathBuf::from(name)
}

fn file_len(path: &Path) -> i64 {
    path.metadata().map(|m| m.len() as i64).unwrap_or(0)
}
