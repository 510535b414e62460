//! Resolve command-line references to roster entities
//!
//! Judges, contestants and criteria may be named by numeric id or by name.
//! Names are matched case-insensitively within the competition.

use tally_core::error::{Result, TallyError};
use tally_core::lock::ScoreSheet;
use tally_core::model::{
    Competition, CompetitionId, Contestant, Criterion, Event, EventId, Judge, JudgeId,
};
use tally_core::store::Store;

use crate::cli::parse::ScoreArg;

pub fn competition(store: &Store, reference: &str) -> Result<Competition> {
    store.db().find_competition(reference)
}

pub fn event(store: &Store, event: Option<i64>) -> Result<Event> {
    store.resolve_event(event.map(EventId))
}

fn by_id_or_name<'a, T>(
    items: &'a [T],
    reference: &str,
    id: impl Fn(&T) -> i64,
    name: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    if let Ok(wanted) = reference.parse::<i64>() {
        if let Some(found) = items.iter().find(|item| id(item) == wanted) {
            return Some(found);
        }
    }
    items
        .iter()
        .find(|item| name(item).eq_ignore_ascii_case(reference.trim()))
}

pub fn judge(store: &Store, competition: CompetitionId, reference: &str) -> Result<Judge> {
    let judges = store.db().judges_for(competition)?;
    if let Some(judge) = by_id_or_name(&judges, reference, |j| j.id.0, |j| j.name.as_str()) {
        return Ok(judge.clone());
    }
    // An existing judge outside the competition surfaces as NotAssigned downstream
    match reference.parse::<i64>() {
        Ok(id) => store.db().get_judge(JudgeId(id)),
        Err(_) => Err(TallyError::not_found("judge", reference)),
    }
}

pub fn contestant(store: &Store, competition: CompetitionId, reference: &str) -> Result<Contestant> {
    let contestants = store.db().contestants_for(competition)?;
    by_id_or_name(&contestants, reference, |c| c.id.0, |c| c.name.as_str())
        .cloned()
        .ok_or_else(|| TallyError::not_found("contestant", reference))
}

fn criterion<'a>(criteria: &'a [Criterion], reference: &str) -> Result<&'a Criterion> {
    by_id_or_name(criteria, reference, |c| c.id.0, |c| c.name.as_str())
        .ok_or_else(|| TallyError::not_found("criterion", reference))
}

/// Turn `CRITERION=VALUE` arguments into a score sheet for the competition
pub fn score_sheet(
    store: &Store,
    competition: CompetitionId,
    scores: &[ScoreArg],
) -> Result<ScoreSheet> {
    let criteria = store.db().criteria_for(competition)?;
    let mut sheet = ScoreSheet::new();
    for score in scores {
        let criterion = criterion(&criteria, &score.criterion)?;
        if sheet.insert(criterion.id, score.value).is_some() {
            return Err(TallyError::UsageError(format!(
                "criterion '{}' given more than once",
                criterion.name
            )));
        }
    }
    Ok(sheet)
}
