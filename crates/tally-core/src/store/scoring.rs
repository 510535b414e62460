//! Scoring, results and report operations

use super::Store;
use crate::aggregate::{self, JudgeBreakdown, ResultRow};
use crate::error::Result;
use crate::lock::{self, LockStatus, ScoreSheet, WriteReceipt};
use crate::model::{Actor, CompetitionId, ContestantId, CriterionField, EventId, JudgeId};
use crate::report::{self, Heading};
use crate::trace_time;

impl Store {
    /// Record a judge's one-shot ballot for a contestant
    #[tracing::instrument(skip(self, sheet, actor), fields(%event, %competition, %judge, %contestant))]
    pub fn submit_judge_ballot(
        &self,
        event: EventId,
        competition: CompetitionId,
        judge: JudgeId,
        contestant: ContestantId,
        sheet: &ScoreSheet,
        actor: &Actor,
    ) -> Result<WriteReceipt> {
        lock::submit_judge_ballot(
            &self.db,
            event,
            competition,
            judge,
            contestant,
            sheet,
            actor,
        )
    }

    /// Save tabulator-entered cells for one judge, locking the contestant when asked
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip(self, sheet, actor), fields(%event, %competition, %judge, %contestant))]
    pub fn save_or_lock_tabulator_entry(
        &self,
        event: EventId,
        competition: CompetitionId,
        judge: JudgeId,
        contestant: ContestantId,
        sheet: &ScoreSheet,
        lock: bool,
        actor: &Actor,
    ) -> Result<WriteReceipt> {
        lock::save_or_lock(
            &self.db,
            event,
            competition,
            judge,
            contestant,
            sheet,
            lock,
            actor,
        )
    }

    /// Lock progress of every contestant in a competition
    pub fn lock_statuses(
        &self,
        event: EventId,
        competition: CompetitionId,
    ) -> Result<Vec<LockStatus>> {
        self.db
            .contestants_for(competition)?
            .iter()
            .map(|c| lock::lock_status(&self.db, event, competition, c.id))
            .collect()
    }

    /// Ordered criterion descriptors of a competition
    pub fn criterion_fields(&self, competition: CompetitionId) -> Result<Vec<CriterionField>> {
        Ok(self
            .db
            .criteria_for(competition)?
            .iter()
            .map(CriterionField::from)
            .collect())
    }

    /// Ranked results of a competition within an event
    #[tracing::instrument(skip(self), fields(%event, %competition))]
    pub fn get_results(&self, event: EventId, competition: CompetitionId) -> Result<Vec<ResultRow>> {
        let start = std::time::Instant::now();
        let contestants = self.db.contestants_for(competition)?;
        let criteria = self.db.criteria_for(competition)?;
        let entries = self.db.entries_for(event, competition)?;

        let rows = aggregate::compute_results(&contestants, &criteria, &entries);
        trace_time!(start, "compute_results", rows = rows.len());
        Ok(rows)
    }

    /// Per-judge scores of a competition within an event
    #[tracing::instrument(skip(self), fields(%event, %competition))]
    pub fn get_judge_breakdown(
        &self,
        event: EventId,
        competition: CompetitionId,
    ) -> Result<Vec<JudgeBreakdown>> {
        let judges = self.db.judges_for(competition)?;
        let contestants = self.db.contestants_for(competition)?;
        let criteria = self.db.criteria_for(competition)?;
        let entries = self.db.entries_for(event, competition)?;

        Ok(aggregate::compute_judge_breakdown(
            &judges,
            &contestants,
            &criteria,
            &entries,
        ))
    }

    /// Render ranked results as a PDF document
    #[tracing::instrument(skip(self, results, criteria), fields(%event, %competition))]
    pub fn render_report(
        &self,
        event: EventId,
        competition: CompetitionId,
        results: &[ResultRow],
        criteria: &[CriterionField],
    ) -> Result<Vec<u8>> {
        let event = self.db.get_event(event)?;
        let competition = self.db.get_competition(competition)?;

        let heading = Heading {
            title: &self.config.report.title,
            event: &event.name,
            competition: &competition.name,
        };
        let bytes = report::render_report(&self.config.report, &heading, results, criteria);
        tracing::debug!(bytes = bytes.len(), "report rendered");
        Ok(bytes)
    }
}
