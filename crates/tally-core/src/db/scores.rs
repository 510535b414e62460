//! Score ledger
//!
//! One row per (event, competition, judge, contestant, criterion). Rows are
//! inserted on first submission and overwritten in place while the contestant
//! is unlocked. The lock flag is scoped to the contestant: a single locked row
//! freezes every slot of that contestant, for every judge and criterion.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::parse_timestamp;
use crate::error::{Result, TallyError};
use crate::map_db_err;
use crate::model::{
    CompetitionId, ContestantId, Criterion, EntryId, EntryOrigin, EventId, JudgeId, ScoreEntry,
    ScoreKey,
};

const ENTRY_COLUMNS: &str = "id, event_id, competition_id, judge_id, contestant_id, criterion_id, \
                             raw_score, locked, submitted_by, origin, updated_at";

fn entry_from_row(row: &Row) -> rusqlite::Result<ScoreEntry> {
    let origin: String = row.get(9)?;
    let updated_at: String = row.get(10)?;

    Ok(ScoreEntry {
        id: row.get(0)?,
        key: ScoreKey {
            event: row.get(1)?,
            competition: row.get(2)?,
            judge: row.get(3)?,
            contestant: row.get(4)?,
            criterion: row.get(5)?,
        },
        raw_score: row.get(6)?,
        locked: row.get::<_, i64>(7)? != 0,
        submitted_by: row.get(8)?,
        origin: origin.parse().map_err(|e: TallyError| {
            rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e))
        })?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

/// Reject a raw score outside `[0, criterion.max_score]`
pub(crate) fn check_range(criterion: &Criterion, raw_score: f64) -> Result<()> {
    if criterion.accepts(raw_score) {
        Ok(())
    } else {
        Err(TallyError::OutOfRange {
            criterion: criterion.id,
            value: raw_score,
            max: criterion.max_score,
        })
    }
}

/// Insert or overwrite one slot.
///
/// Fails with `OutOfRange` before touching the table, and with `Locked` when any
/// slot of the same contestant is locked. The caller owns the transaction.
pub(crate) fn upsert(
    conn: &Connection,
    key: &ScoreKey,
    criterion: &Criterion,
    raw_score: f64,
    submitted_by: &str,
    origin: EntryOrigin,
    now: DateTime<Utc>,
) -> Result<EntryId> {
    if criterion.id != key.criterion || criterion.competition_id != key.competition {
        return Err(TallyError::invalid_value(
            "criterion for competition",
            format!("{} / {}", key.criterion, key.competition),
        ));
    }
    check_range(criterion, raw_score)?;

    if is_locked(conn, key.event, key.competition, key.contestant)? {
        return Err(TallyError::Locked {
            contestant: key.contestant,
        });
    }

    // The WHERE on the update arm keeps a locked row untouched even if the
    // check above raced; no row comes back and the write reports Locked.
    let id: Option<EntryId> = conn
        .query_row(
            "INSERT INTO scores (event_id, competition_id, judge_id, contestant_id, criterion_id,
                                 raw_score, locked, submitted_by, origin, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?9)
             ON CONFLICT (event_id, competition_id, judge_id, contestant_id, criterion_id)
             DO UPDATE SET raw_score = excluded.raw_score, updated_at = excluded.updated_at
             WHERE scores.locked = 0
             RETURNING id",
            params![
                key.event,
                key.competition,
                key.judge,
                key.contestant,
                key.criterion,
                raw_score,
                submitted_by,
                origin.as_str(),
                now.to_rfc3339(),
            ],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| map_db_err!("upsert score", e))?;

    id.ok_or(TallyError::Locked {
        contestant: key.contestant,
    })
}

pub(crate) fn get(conn: &Connection, key: &ScoreKey) -> Result<Option<ScoreEntry>> {
    conn.query_row(
        &format!(
            "SELECT {ENTRY_COLUMNS} FROM scores
             WHERE event_id = ?1 AND competition_id = ?2 AND judge_id = ?3
               AND contestant_id = ?4 AND criterion_id = ?5"
        ),
        params![
            key.event,
            key.competition,
            key.judge,
            key.contestant,
            key.criterion
        ],
        entry_from_row,
    )
    .optional()
    .map_err(|e| map_db_err!("load score", e))
}

/// Entries for a contestant across all judges and criteria
pub(crate) fn count_for(
    conn: &Connection,
    event: EventId,
    competition: CompetitionId,
    contestant: ContestantId,
) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM scores
         WHERE event_id = ?1 AND competition_id = ?2 AND contestant_id = ?3",
        params![event, competition, contestant],
        |row| row.get(0),
    )
    .map_err(|e| map_db_err!("count scores", e))
}

/// Entries one judge holds for a contestant
pub(crate) fn count_for_judge(
    conn: &Connection,
    event: EventId,
    competition: CompetitionId,
    judge: JudgeId,
    contestant: ContestantId,
) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM scores
         WHERE event_id = ?1 AND competition_id = ?2 AND judge_id = ?3 AND contestant_id = ?4",
        params![event, competition, judge, contestant],
        |row| row.get(0),
    )
    .map_err(|e| map_db_err!("count judge scores", e))
}

pub(crate) fn is_locked(
    conn: &Connection,
    event: EventId,
    competition: CompetitionId,
    contestant: ContestantId,
) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS (
             SELECT 1 FROM scores
             WHERE event_id = ?1 AND competition_id = ?2 AND contestant_id = ?3 AND locked = 1
         )",
        params![event, competition, contestant],
        |row| row.get(0),
    )
    .map_err(|e| map_db_err!("check lock", e))
}

/// Flip every slot of a contestant to locked in one statement
pub(crate) fn lock_contestant(
    conn: &Connection,
    event: EventId,
    competition: CompetitionId,
    contestant: ContestantId,
) -> Result<usize> {
    conn.execute(
        "UPDATE scores SET locked = 1
         WHERE event_id = ?1 AND competition_id = ?2 AND contestant_id = ?3",
        params![event, competition, contestant],
    )
    .map_err(|e| map_db_err!("lock scores", e))
}

pub(crate) fn locked_count(
    conn: &Connection,
    event: EventId,
    competition: CompetitionId,
) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM scores WHERE event_id = ?1 AND competition_id = ?2 AND locked = 1",
        params![event, competition],
        |row| row.get(0),
    )
    .map_err(|e| map_db_err!("count locked scores", e))
}

/// Every entry of a competition in an event, in insertion order
pub(crate) fn entries_for(
    conn: &Connection,
    event: EventId,
    competition: CompetitionId,
) -> Result<Vec<ScoreEntry>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM scores
             WHERE event_id = ?1 AND competition_id = ?2
             ORDER BY id"
        ))
        .map_err(|e| map_db_err!("prepare scores query", e))?;
    let rows = stmt
        .query_map(params![event, competition], entry_from_row)
        .map_err(|e| map_db_err!("query scores", e))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| map_db_err!("read scores", e))
}

/// Entries of a single contestant
pub(crate) fn entries_for_contestant(
    conn: &Connection,
    event: EventId,
    competition: CompetitionId,
    contestant: ContestantId,
) -> Result<Vec<ScoreEntry>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM scores
             WHERE event_id = ?1 AND competition_id = ?2 AND contestant_id = ?3
             ORDER BY judge_id, criterion_id"
        ))
        .map_err(|e| map_db_err!("prepare scores query", e))?;
    let rows = stmt
        .query_map(params![event, competition, contestant], entry_from_row)
        .map_err(|e| map_db_err!("query scores", e))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| map_db_err!("read scores", e))
}

impl super::Database {
    /// Upsert a single slot in its own write transaction
    pub fn upsert_score(
        &self,
        key: &ScoreKey,
        raw_score: f64,
        submitted_by: &str,
    ) -> Result<EntryId> {
        let tx = self.begin_immediate()?;
        let criterion = super::roster::get_criterion(&tx, key.criterion)?;
        let id = upsert(
            &tx,
            key,
            &criterion,
            raw_score,
            submitted_by,
            EntryOrigin::Tabulator,
            Utc::now(),
        )?;
        tx.commit()
            .map_err(|e| TallyError::transaction("upsert score", e))?;
        Ok(id)
    }

    pub fn get_score(&self, key: &ScoreKey) -> Result<Option<ScoreEntry>> {
        get(&self.conn, key)
    }

    pub fn count_for(
        &self,
        event: EventId,
        competition: CompetitionId,
        contestant: ContestantId,
    ) -> Result<i64> {
        count_for(&self.conn, event, competition, contestant)
    }

    pub fn entries_for(
        &self,
        event: EventId,
        competition: CompetitionId,
    ) -> Result<Vec<ScoreEntry>> {
        entries_for(&self.conn, event, competition)
    }

    pub fn entries_for_contestant(
        &self,
        event: EventId,
        competition: CompetitionId,
        contestant: ContestantId,
    ) -> Result<Vec<ScoreEntry>> {
        entries_for_contestant(&self.conn, event, competition, contestant)
    }
}
