//! SQLite database module for tally

pub(crate) mod events;
pub(crate) mod roster;
mod schema;
pub(crate) mod scores;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::config::ScoringConfig;
use crate::error::{Result, TallyError};

pub use events::CompletedCompetition;
pub use schema::{create_schema, SchemaCreateResult, CURRENT_SCHEMA_VERSION};

/// File name of the database inside the store root
pub const DB_FILE: &str = "tally.db";

/// SQLite database for tally
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the given store root
    pub fn open(store_root: &Path, scoring: &ScoringConfig) -> Result<Self> {
        let db_path = store_root.join(DB_FILE);

        let conn = Connection::open(&db_path).map_err(|e| {
            TallyError::Other(format!(
                "failed to open database at {}: {}",
                db_path.display(),
                e
            ))
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| TallyError::Other(format!("failed to enable WAL mode: {}", e)))?;

        // Concurrent judges and tabulators wait for each other instead of failing
        conn.busy_timeout(Duration::from_millis(scoring.busy_timeout_ms))
            .map_err(|e| TallyError::Other(format!("failed to set busy timeout: {}", e)))?;

        match create_schema(&conn)? {
            SchemaCreateResult::Created => {
                tracing::debug!(path = %db_path.display(), "created database schema")
            }
            SchemaCreateResult::Migrated { from } => {
                tracing::info!(from, to = CURRENT_SCHEMA_VERSION, "database schema migrated")
            }
            SchemaCreateResult::Current => {}
        }

        Ok(Database { conn })
    }

    /// Start a write transaction that takes the database write lock up front.
    ///
    /// The lock check, the writes and any lock transition of one request all
    /// happen under this lock, so a concurrent lock and upsert on the same
    /// contestant resolve to exactly one winner.
    pub(crate) fn begin_immediate(&self) -> Result<Transaction<'_>> {
        Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(|e| TallyError::transaction("begin", e))
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn get_schema_version(&self) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT value FROM index_meta WHERE key = 'schema_version'",
                [],
                |r| {
                    let s: String = r.get(0)?;
                    Ok(s.parse().unwrap_or(0))
                },
            )
            .map_err(|e| TallyError::Other(format!("failed to get schema version: {}", e)))
    }

    pub fn get_score_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM scores", [], |r| r.get(0))
            .map_err(|e| TallyError::Other(format!("failed to get score count: {}", e)))
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Checkpoint so a later process sees every committed score
        let _ = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
    }
}

/// Parse an RFC 3339 timestamp column
pub(crate) fn parse_timestamp(
    value: &str,
) -> std::result::Result<chrono::DateTime<chrono::Utc>, rusqlite::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
pub(crate) mod tests;
