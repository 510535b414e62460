//! Weighted totals and rankings
//!
//! Pure functions over ledger entries. Contestants and criteria are taken in
//! the order given (the database hands them out sorted by name), which makes
//! that order the tie-breaker of the ranking.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::{Contestant, ContestantId, Criterion, CriterionId, Judge, JudgeId, ScoreEntry};

/// Upper bound of a weighted total
pub const MAX_TOTAL: f64 = 100.0;

/// One ranked line of the results view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub contestant_id: ContestantId,
    pub contestant: String,
    /// Sum of weighted criterion averages, capped at 100
    pub total_weighted: f64,
    /// Sum of unweighted criterion averages, never capped
    pub total_raw: f64,
    pub per_criterion_weighted: BTreeMap<CriterionId, f64>,
    pub per_criterion_raw: BTreeMap<CriterionId, f64>,
}

/// Scores of a single judge, one row per contestant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgeBreakdown {
    pub judge_id: JudgeId,
    pub judge: String,
    pub rows: Vec<JudgeRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgeRow {
    pub contestant_id: ContestantId,
    pub contestant: String,
    /// `None` where the judge has not scored the criterion
    pub raw: BTreeMap<CriterionId, Option<f64>>,
    pub weighted: BTreeMap<CriterionId, f64>,
    pub total: f64,
}

#[derive(Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }
}

/// Rank contestants by weighted total, highest first.
///
/// Each criterion contributes `mean(raw over judges) / max_score * weight`;
/// a criterion nobody scored contributes 0. The sort is stable, so equal
/// totals keep the input order.
pub fn compute_results(
    contestants: &[Contestant],
    criteria: &[Criterion],
    entries: &[ScoreEntry],
) -> Vec<ResultRow> {
    let mut means: HashMap<(ContestantId, CriterionId), Mean> = HashMap::new();
    for entry in entries {
        means
            .entry((entry.key.contestant, entry.key.criterion))
            .or_default()
            .push(entry.raw_score);
    }

    let mut rows: Vec<ResultRow> = contestants
        .iter()
        .map(|contestant| {
            let mut row = ResultRow {
                contestant_id: contestant.id,
                contestant: contestant.name.clone(),
                total_weighted: 0.0,
                total_raw: 0.0,
                per_criterion_weighted: BTreeMap::new(),
                per_criterion_raw: BTreeMap::new(),
            };

            for criterion in criteria {
                let avg_raw = means
                    .get(&(contestant.id, criterion.id))
                    .map(Mean::value)
                    .unwrap_or(0.0);
                let weighted = criterion.weighted(avg_raw);

                row.per_criterion_raw.insert(criterion.id, avg_raw);
                row.per_criterion_weighted.insert(criterion.id, weighted);
                row.total_raw += avg_raw;
                row.total_weighted += weighted;
            }

            row.total_weighted = row.total_weighted.min(MAX_TOTAL);
            row
        })
        .collect();

    rows.sort_by(|a, b| b.total_weighted.total_cmp(&a.total_weighted));
    rows
}

/// Per-judge view: the same weighting without averaging.
///
/// Only judges with at least one entry appear. Rows follow contestant order
/// and are not ranked.
pub fn compute_judge_breakdown(
    judges: &[Judge],
    contestants: &[Contestant],
    criteria: &[Criterion],
    entries: &[ScoreEntry],
) -> Vec<JudgeBreakdown> {
    let mut cells: HashMap<(JudgeId, ContestantId, CriterionId), f64> = HashMap::new();
    for entry in entries {
        cells.insert(
            (entry.key.judge, entry.key.contestant, entry.key.criterion),
            entry.raw_score,
        );
    }

    judges
        .iter()
        .filter(|judge| entries.iter().any(|e| e.key.judge == judge.id))
        .map(|judge| JudgeBreakdown {
            judge_id: judge.id,
            judge: judge.name.clone(),
            rows: contestants
                .iter()
                .map(|contestant| {
                    let mut row = JudgeRow {
                        contestant_id: contestant.id,
                        contestant: contestant.name.clone(),
                        raw: BTreeMap::new(),
                        weighted: BTreeMap::new(),
                        total: 0.0,
                    };
                    for criterion in criteria {
                        let raw = cells.get(&(judge.id, contestant.id, criterion.id)).copied();
                        let weighted = criterion.weighted(raw.unwrap_or(0.0));
                        row.raw.insert(criterion.id, raw);
                        row.weighted.insert(criterion.id, weighted);
                        row.total += weighted;
                    }
                    row.total = row.total.min(MAX_TOTAL);
                    row
                })
                .collect(),
        })
        .collect()
}
