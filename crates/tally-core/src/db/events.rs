//! Event scoping: the single active event and completed history

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::parse_timestamp;
use crate::error::{Result, TallyError};
use crate::map_db_err;
use crate::model::{CompetitionId, Event, EventId, EventStatus};

const EVENT_COLUMNS: &str = "id, name, status, created_at, completed_at";

fn event_from_row(row: &Row) -> rusqlite::Result<Event> {
    let status: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let completed_at: Option<String> = row.get(4)?;

    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        status: status.parse().map_err(|e: TallyError| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    e.to_string(),
                )),
            )
        })?,
        created_at: parse_timestamp(&created_at)?,
        completed_at: completed_at.as_deref().map(parse_timestamp).transpose()?,
    })
}

fn find_active(conn: &Connection) -> Result<Option<Event>> {
    conn.query_row(
        &format!("SELECT {EVENT_COLUMNS} FROM events WHERE status = 'active'"),
        [],
        event_from_row,
    )
    .optional()
    .map_err(|e| map_db_err!("load active event", e))
}

fn insert_active(conn: &Connection, name: &str, now: DateTime<Utc>) -> Result<Event> {
    conn.execute(
        "INSERT INTO events (name, status, created_at) VALUES (?1, 'active', ?2)",
        params![name, now.to_rfc3339()],
    )
    .map_err(|e| map_db_err!("create event", e))?;

    Ok(Event {
        id: EventId(conn.last_insert_rowid()),
        name: name.to_string(),
        status: EventStatus::Active,
        created_at: now,
        completed_at: None,
    })
}

pub(crate) fn get_event(conn: &Connection, id: EventId) -> Result<Event> {
    conn.query_row(
        &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
        params![id],
        event_from_row,
    )
    .optional()
    .map_err(|e| map_db_err!("load event", e))?
    .ok_or_else(|| TallyError::not_found("event", id))
}

/// A competition whose every judge x contestant x criterion cell is locked for an event
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CompletedCompetition {
    pub event: Event,
    pub competition_id: CompetitionId,
    pub competition: String,
    pub expected_scores: i64,
}

impl super::Database {
    /// The active event, created under `default_name` when none exists
    pub fn active_event(&self, default_name: &str) -> Result<Event> {
        if let Some(event) = find_active(&self.conn)? {
            return Ok(event);
        }

        let tx = self.begin_immediate()?;
        // Another writer may have created it while we waited for the lock
        let event = match find_active(&tx)? {
            Some(event) => event,
            None => {
                let event = insert_active(&tx, default_name, Utc::now())?;
                tracing::info!(id = %event.id, name = %event.name, "active event created");
                event
            }
        };
        tx.commit()
            .map_err(|e| TallyError::transaction("create event", e))?;
        Ok(event)
    }

    pub fn get_event(&self, id: EventId) -> Result<Event> {
        get_event(&self.conn, id)
    }

    /// All events, newest first
    pub fn list_events(&self) -> Result<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, id DESC"
            ))
            .map_err(|e| map_db_err!("prepare events query", e))?;
        let rows = stmt
            .query_map([], event_from_row)
            .map_err(|e| map_db_err!("query events", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read events", e))
    }

    /// Archive the active event and start a fresh one.
    ///
    /// Returns `(closed, started)`.
    pub fn close_active_event(&self, default_name: &str) -> Result<(Event, Event)> {
        let tx = self.begin_immediate()?;
        let now = Utc::now();

        let active = match find_active(&tx)? {
            Some(event) => event,
            None => insert_active(&tx, default_name, now)?,
        };

        tx.execute(
            "UPDATE events SET status = 'completed', completed_at = ?1 WHERE id = ?2",
            params![now.to_rfc3339(), active.id],
        )
        .map_err(|e| map_db_err!("close event", e))?;

        let next_name = format!("Event {}", now.format("%Y-%m-%d %H:%M"));
        let started = insert_active(&tx, &next_name, now)?;

        tx.commit()
            .map_err(|e| TallyError::transaction("close event", e))?;

        let closed = Event {
            status: EventStatus::Completed,
            completed_at: Some(now),
            ..active
        };
        tracing::info!(closed = %closed.id, started = %started.id, "event closed");
        Ok((closed, started))
    }

    /// Every (event, competition) pair whose scores are complete and fully locked
    pub fn completed_competitions(&self) -> Result<Vec<CompletedCompetition>> {
        let events = self.list_events()?;
        let competitions = self.list_competitions()?;
        let mut completed = Vec::new();

        for event in &events {
            for competition in &competitions {
                let judges = super::roster::judge_count(&self.conn, competition.id)?;
                let contestants: i64 = self
                    .conn
                    .query_row(
                        "SELECT COUNT(*) FROM contestants WHERE competition_id = ?1",
                        params![competition.id],
                        |row| row.get(0),
                    )
                    .map_err(|e| map_db_err!("count contestants", e))?;
                let criteria = super::roster::criteria_count(&self.conn, competition.id)?;

                let expected = judges * contestants * criteria;
                if expected == 0 {
                    continue;
                }

                let locked = super::scores::locked_count(&self.conn, event.id, competition.id)?;
                if locked == expected {
                    completed.push(CompletedCompetition {
                        event: event.clone(),
                        competition_id: competition.id,
                        competition: competition.name.clone(),
                        expected_scores: expected,
                    });
                }
            }
        }

        Ok(completed)
    }
}
