//! Lock coordinator
//!
//! Per (event, competition, contestant) the scores move through
//! `Open -> Saving -> Locked`. `Locked` is terminal. Two write policies gate
//! the ledger:
//!
//! - judge ballot: a judge submits a value for every criterion exactly once
//! - tabulator entry: any subset of a judge's cells, saved or saved-and-locked
//!
//! Both run their checks and writes inside one `BEGIN IMMEDIATE` transaction.

use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{events, roster, scores, Database};
use crate::error::{Result, TallyError};
use crate::model::{
    Actor, CompetitionId, ContestantId, Criterion, CriterionField, CriterionId, EntryId,
    EntryOrigin, EventId, EventStatus, JudgeId, ScoreKey,
};

/// Raw scores keyed by criterion
pub type ScoreSheet = BTreeMap<CriterionId, f64>;

/// Lock state of one contestant's scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    /// No entries yet
    Open,
    /// Entries exist, none locked
    Saving,
    /// Frozen for every judge and criterion
    Locked,
}

impl LockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockState::Open => "open",
            LockState::Saving => "saving",
            LockState::Locked => "locked",
        }
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an accepted write left behind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteReceipt {
    pub contestant: ContestantId,
    pub entries: Vec<EntryId>,
    pub state: LockState,
}

/// Progress of a contestant towards a complete judge x criterion grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockStatus {
    pub contestant: ContestantId,
    pub state: LockState,
    pub present: i64,
    pub expected: i64,
}

fn state_on(
    conn: &Connection,
    event: EventId,
    competition: CompetitionId,
    contestant: ContestantId,
) -> Result<LockState> {
    if scores::is_locked(conn, event, competition, contestant)? {
        return Ok(LockState::Locked);
    }
    if scores::count_for(conn, event, competition, contestant)? == 0 {
        Ok(LockState::Open)
    } else {
        Ok(LockState::Saving)
    }
}

pub fn lock_state(
    db: &Database,
    event: EventId,
    competition: CompetitionId,
    contestant: ContestantId,
) -> Result<LockState> {
    state_on(db.conn(), event, competition, contestant)
}

pub fn lock_status(
    db: &Database,
    event: EventId,
    competition: CompetitionId,
    contestant: ContestantId,
) -> Result<LockStatus> {
    let conn = db.conn();
    Ok(LockStatus {
        contestant,
        state: state_on(conn, event, competition, contestant)?,
        present: scores::count_for(conn, event, competition, contestant)?,
        expected: expected_cells(conn, competition)?,
    })
}

fn expected_cells(conn: &Connection, competition: CompetitionId) -> Result<i64> {
    Ok(roster::judge_count(conn, competition)? * roster::criteria_count(conn, competition)?)
}

/// Resolve the event, judge, contestant and criteria a request writes against.
///
/// Only the active event accepts writes; completed events are history.
fn load_scope(
    conn: &Connection,
    event: EventId,
    competition: CompetitionId,
    judge: JudgeId,
    contestant: ContestantId,
) -> Result<Vec<Criterion>> {
    if events::get_event(conn, event)?.status != EventStatus::Active {
        return Err(TallyError::EventClosed { event });
    }

    let competition = roster::get_competition(conn, competition)?;
    let judge = roster::get_judge(conn, judge)?;
    if !judge.is_assigned_to(competition.id) {
        return Err(TallyError::NotAssigned {
            judge: judge.id,
            competition: competition.name,
        });
    }

    let contestant = roster::get_contestant(conn, contestant)?;
    if contestant.competition_id != competition.id {
        return Err(TallyError::invalid_value(
            "contestant for competition",
            format!("{} / {}", contestant.id, competition.slug),
        ));
    }

    roster::criteria_for(conn, competition.id)
}

/// Check every value against its criterion before anything is written
fn validate_sheet(criteria: &[Criterion], sheet: &ScoreSheet) -> Result<()> {
    for (id, value) in sheet {
        let criterion = criteria
            .iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| TallyError::invalid_value("criterion for competition", id))?;
        scores::check_range(criterion, *value)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn write_sheet(
    conn: &Connection,
    event: EventId,
    competition: CompetitionId,
    judge: JudgeId,
    contestant: ContestantId,
    criteria: &[Criterion],
    sheet: &ScoreSheet,
    actor: &Actor,
    origin: EntryOrigin,
) -> Result<Vec<EntryId>> {
    let now = Utc::now();
    let submitted_by = actor.signature();

    criteria
        .iter()
        .filter_map(|c| sheet.get(&c.id).map(|value| (c, *value)))
        .map(|(criterion, value)| {
            let key = ScoreKey {
                event,
                competition,
                judge,
                contestant,
                criterion: criterion.id,
            };
            scores::upsert(conn, &key, criterion, value, &submitted_by, origin, now)
        })
        .collect()
}

/// One-shot judge ballot: a value for every criterion, accepted once.
pub fn submit_judge_ballot(
    db: &Database,
    event: EventId,
    competition: CompetitionId,
    judge: JudgeId,
    contestant: ContestantId,
    sheet: &ScoreSheet,
    actor: &Actor,
) -> Result<WriteReceipt> {
    let tx = db.begin_immediate()?;
    let criteria = load_scope(&tx, event, competition, judge, contestant)?;

    let fields: Vec<CriterionField> = criteria.iter().map(CriterionField::from).collect();
    if fields.is_empty() {
        return Err(TallyError::invalid_value("ballot", "competition has no criteria"));
    }
    if let Some(missing) = fields.iter().find(|f| !sheet.contains_key(&f.id)) {
        return Err(TallyError::invalid_value(
            "ballot",
            format!("missing score for {}", missing.label),
        ));
    }

    let held = scores::count_for_judge(&tx, event, competition, judge, contestant)?;
    if held >= fields.len() as i64 {
        return Err(TallyError::AlreadySubmitted { judge, contestant });
    }
    if scores::is_locked(&tx, event, competition, contestant)? {
        return Err(TallyError::Locked { contestant });
    }

    validate_sheet(&criteria, sheet)?;
    let entries = write_sheet(
        &tx,
        event,
        competition,
        judge,
        contestant,
        &criteria,
        sheet,
        actor,
        EntryOrigin::Ballot,
    )?;

    tx.commit()
        .map_err(|e| TallyError::transaction("submit ballot", e))?;

    tracing::info!(
        %event, %competition, %judge, %contestant,
        entries = entries.len(),
        actor = %actor.signature(),
        "judge ballot accepted"
    );
    Ok(WriteReceipt {
        contestant,
        entries,
        state: LockState::Saving,
    })
}

/// Tabulator entry: save any subset of a judge's cells, then lock when asked.
///
/// Cells saved before a refused lock stay saved and unlocked.
#[allow(clippy::too_many_arguments)]
pub fn save_or_lock(
    db: &Database,
    event: EventId,
    competition: CompetitionId,
    judge: JudgeId,
    contestant: ContestantId,
    sheet: &ScoreSheet,
    lock: bool,
    actor: &Actor,
) -> Result<WriteReceipt> {
    let tx = db.begin_immediate()?;
    let criteria = load_scope(&tx, event, competition, judge, contestant)?;

    if scores::is_locked(&tx, event, competition, contestant)? {
        return Err(TallyError::Locked { contestant });
    }

    validate_sheet(&criteria, sheet)?;
    let entries = write_sheet(
        &tx,
        event,
        competition,
        judge,
        contestant,
        &criteria,
        sheet,
        actor,
        EntryOrigin::Tabulator,
    )?;

    let mut refused = None;
    if lock {
        let present = scores::count_for(&tx, event, competition, contestant)?;
        let expected = expected_cells(&tx, competition)?;
        if expected > 0 && present == expected {
            let flipped = scores::lock_contestant(&tx, event, competition, contestant)?;
            tracing::debug!(%contestant, flipped, "contestant locked");
        } else {
            refused = Some(TallyError::IncompleteSubmission {
                contestant,
                present,
                expected,
            });
        }
    }

    let state = state_on(&tx, event, competition, contestant)?;
    tx.commit()
        .map_err(|e| TallyError::transaction("save scores", e))?;

    if let Some(err) = refused {
        tracing::warn!(%contestant, error = %err, "lock refused, entries kept");
        return Err(err);
    }

    tracing::info!(
        %event, %competition, %judge, %contestant,
        entries = entries.len(),
        %state,
        actor = %actor.signature(),
        "tabulator entry accepted"
    );
    Ok(WriteReceipt {
        contestant,
        entries,
        state,
    })
}
