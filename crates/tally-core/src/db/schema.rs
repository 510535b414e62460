//! SQLite database schema for tally

use rusqlite::Connection;

use crate::error::{Result, TallyError};

pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Result of schema creation
#[derive(Debug, PartialEq, Eq)]
pub enum SchemaCreateResult {
    /// Fresh database, schema created
    Created,
    /// Schema already at the current version
    Current,
    /// Schema upgraded in place from an older version
    Migrated { from: i32 },
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    created_at TEXT NOT NULL,
    completed_at TEXT
);
-- At most one active event
CREATE UNIQUE INDEX IF NOT EXISTS idx_events_active ON events(status) WHERE status = 'active';

CREATE TABLE IF NOT EXISTS competitions (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS judges (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS judge_competitions (
    judge_id INTEGER NOT NULL REFERENCES judges(id) ON DELETE CASCADE,
    competition_id INTEGER NOT NULL REFERENCES competitions(id) ON DELETE CASCADE,
    PRIMARY KEY (judge_id, competition_id)
);
CREATE INDEX IF NOT EXISTS idx_judge_competitions_competition ON judge_competitions(competition_id);

CREATE TABLE IF NOT EXISTS contestants (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    competition_id INTEGER NOT NULL REFERENCES competitions(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_contestants_competition ON contestants(competition_id);

CREATE TABLE IF NOT EXISTS criteria (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    max_score REAL NOT NULL,
    weight REAL NOT NULL,
    competition_id INTEGER NOT NULL REFERENCES competitions(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_criteria_competition ON criteria(competition_id);

-- Score ledger: one row per (event, competition, judge, contestant, criterion)
CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY,
    event_id INTEGER NOT NULL REFERENCES events(id),
    competition_id INTEGER NOT NULL REFERENCES competitions(id),
    judge_id INTEGER NOT NULL REFERENCES judges(id),
    contestant_id INTEGER NOT NULL REFERENCES contestants(id),
    criterion_id INTEGER NOT NULL REFERENCES criteria(id),
    raw_score REAL NOT NULL,
    locked INTEGER NOT NULL DEFAULT 0,
    submitted_by TEXT NOT NULL,
    origin TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (event_id, competition_id, judge_id, contestant_id, criterion_id)
);
CREATE INDEX IF NOT EXISTS idx_scores_contestant ON scores(event_id, competition_id, contestant_id);

CREATE TABLE IF NOT EXISTS index_meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

/// Version 1 stored a single competition per judge in `judges.competition_id`.
/// Fold those links into `judge_competitions` and rebuild `judges` without the column.
const MIGRATE_V1_TO_V2_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS judge_competitions (
    judge_id INTEGER NOT NULL REFERENCES judges(id) ON DELETE CASCADE,
    competition_id INTEGER NOT NULL REFERENCES competitions(id) ON DELETE CASCADE,
    PRIMARY KEY (judge_id, competition_id)
);
INSERT OR IGNORE INTO judge_competitions (judge_id, competition_id)
    SELECT id, competition_id FROM judges WHERE competition_id IS NOT NULL;
CREATE TABLE judges_v2 (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);
INSERT INTO judges_v2 (id, name) SELECT id, name FROM judges;
DROP TABLE judges;
ALTER TABLE judges_v2 RENAME TO judges;
"#;

fn read_schema_version(conn: &Connection) -> Option<i32> {
    conn.query_row(
        "SELECT value FROM index_meta WHERE key = 'schema_version'",
        [],
        |r| r.get::<_, String>(0).map(|s| s.parse().unwrap_or(0)),
    )
    .ok()
}

fn write_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO index_meta (key, value) VALUES ('schema_version', ?1)",
        [&version.to_string()],
    )?;
    Ok(())
}

pub fn create_schema(conn: &Connection) -> Result<SchemaCreateResult> {
    let target_version = CURRENT_SCHEMA_VERSION;

    let result = match read_schema_version(conn) {
        None => {
            conn.execute_batch(SCHEMA_SQL)?;
            write_schema_version(conn, target_version)?;
            SchemaCreateResult::Created
        }
        Some(v) if v == target_version => SchemaCreateResult::Current,
        Some(1) => {
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(MIGRATE_V1_TO_V2_SQL)?;
            tx.execute_batch(SCHEMA_SQL)?;
            write_schema_version(&tx, target_version)?;
            tx.commit()?;
            tracing::info!(
                from = 1,
                to = target_version,
                "Database schema migrated, legacy judge links folded into judge_competitions"
            );
            SchemaCreateResult::Migrated { from: 1 }
        }
        Some(v) => {
            // Scores cannot be rebuilt from anywhere else, so refuse rather than drop tables
            return Err(TallyError::InvalidStore {
                reason: format!(
                    "unsupported schema version {} (expected {})",
                    v, target_version
                ),
            });
        }
    };

    Ok(result)
}

#[cfg(test)]
pub(crate) const SCHEMA_V1_SQL: &str = r#"
CREATE TABLE events (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    created_at TEXT NOT NULL,
    completed_at TEXT
);
CREATE TABLE competitions (id INTEGER PRIMARY KEY, name TEXT NOT NULL, slug TEXT NOT NULL UNIQUE);
CREATE TABLE judges (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    competition_id INTEGER NOT NULL REFERENCES competitions(id)
);
CREATE TABLE contestants (id INTEGER PRIMARY KEY, name TEXT NOT NULL, competition_id INTEGER NOT NULL);
CREATE TABLE criteria (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    max_score REAL NOT NULL,
    weight REAL NOT NULL,
    competition_id INTEGER NOT NULL
);
CREATE TABLE scores (
    id INTEGER PRIMARY KEY,
    event_id INTEGER NOT NULL,
    competition_id INTEGER NOT NULL,
    judge_id INTEGER NOT NULL,
    contestant_id INTEGER NOT NULL,
    criterion_id INTEGER NOT NULL,
    raw_score REAL NOT NULL,
    locked INTEGER NOT NULL DEFAULT 0,
    submitted_by TEXT NOT NULL,
    origin TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (event_id, competition_id, judge_id, contestant_id, criterion_id)
);
CREATE TABLE index_meta (key TEXT PRIMARY KEY, value TEXT);
INSERT INTO index_meta (key, value) VALUES ('schema_version', '1');
"#;
