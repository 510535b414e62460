//! Domain types shared by the ledger, aggregator and report engine

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TallyError;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl rusqlite::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                self.0.to_sql()
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                i64::column_result(value).map($name)
            }
        }
    };
}

id_type!(
    /// Row id of an event
    EventId
);
id_type!(
    /// Row id of a competition
    CompetitionId
);
id_type!(
    /// Row id of a judge
    JudgeId
);
id_type!(
    /// Row id of a contestant
    ContestantId
);
id_type!(
    /// Row id of a criterion
    CriterionId
);
id_type!(
    /// Row id of a score entry
    EntryId
);

/// Lifecycle status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Completed => "completed",
        }
    }
}

impl FromStr for EventStatus {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EventStatus::Active),
            "completed" => Ok(EventStatus::Completed),
            other => Err(TallyError::invalid_value("event status", other)),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub slug: String,
}

/// A judge with the set of competitions it may score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judge {
    pub id: JudgeId,
    pub name: String,
    pub competitions: Vec<CompetitionId>,
}

impl Judge {
    pub fn is_assigned_to(&self, competition: CompetitionId) -> bool {
        self.competitions.contains(&competition)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contestant {
    pub id: ContestantId,
    pub name: String,
    pub competition_id: CompetitionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    pub max_score: f64,
    /// Percentage points contributed to the 100-point total
    pub weight: f64,
    pub competition_id: CompetitionId,
}

impl Criterion {
    /// Header label used in reports and score forms
    pub fn label(&self) -> String {
        format!("{} ({}%)", self.name, format_number(self.weight))
    }

    /// Weighted contribution of an average raw score
    pub fn weighted(&self, avg_raw: f64) -> f64 {
        if self.max_score > 0.0 {
            (avg_raw / self.max_score) * self.weight
        } else {
            0.0
        }
    }

    pub fn accepts(&self, raw_score: f64) -> bool {
        raw_score >= 0.0 && raw_score <= self.max_score
    }
}

/// Ordered descriptor of one criterion, consumed by validation and layout alike
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionField {
    pub id: CriterionId,
    pub label: String,
    pub max_score: f64,
}

impl From<&Criterion> for CriterionField {
    fn from(criterion: &Criterion) -> Self {
        Self {
            id: criterion.id,
            label: criterion.label(),
            max_score: criterion.max_score,
        }
    }
}

/// Composite key of a score slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreKey {
    pub event: EventId,
    pub competition: CompetitionId,
    pub judge: JudgeId,
    pub contestant: ContestantId,
    pub criterion: CriterionId,
}

/// Which workflow wrote an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrigin {
    Ballot,
    Tabulator,
}

impl EntryOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryOrigin::Ballot => "ballot",
            EntryOrigin::Tabulator => "tabulator",
        }
    }
}

impl FromStr for EntryOrigin {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ballot" => Ok(EntryOrigin::Ballot),
            "tabulator" => Ok(EntryOrigin::Tabulator),
            other => Err(TallyError::invalid_value("entry origin", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub id: EntryId,
    pub key: ScoreKey,
    pub raw_score: f64,
    pub locked: bool,
    pub submitted_by: String,
    pub origin: EntryOrigin,
    pub updated_at: DateTime<Utc>,
}

/// Role of an already-authenticated actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Judge,
    Tabulator,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Judge => f.write_str("judge"),
            Role::Tabulator => f.write_str("tabulator"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

/// An authenticated caller; the core trusts it as given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub role: Role,
    pub name: String,
}

impl Actor {
    pub fn new(role: Role, name: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
        }
    }

    /// Value recorded in `submitted_by`
    pub fn signature(&self) -> String {
        format!("{}:{}", self.role, self.name)
    }
}

/// Print whole numbers without a trailing `.0`
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(max_score: f64, weight: f64) -> Criterion {
        Criterion {
            id: CriterionId(1),
            name: "Stage Presence".to_string(),
            max_score,
            weight,
            competition_id: CompetitionId(1),
        }
    }

    #[test]
    fn test_label_includes_weight() {
        assert_eq!(criterion(10.0, 60.0).label(), "Stage Presence (60%)");
        assert_eq!(criterion(10.0, 12.5).label(), "Stage Presence (12.5%)");
    }

    #[test]
    fn test_weighted_zero_max_yields_zero() {
        assert_eq!(criterion(0.0, 50.0).weighted(5.0), 0.0);
        assert_eq!(criterion(10.0, 60.0).weighted(8.0), 48.0);
    }

    #[test]
    fn test_accepts_bounds_inclusive() {
        let c = criterion(10.0, 50.0);
        assert!(c.accepts(0.0));
        assert!(c.accepts(10.0));
        assert!(!c.accepts(10.01));
        assert!(!c.accepts(-0.5));
        assert!(!c.accepts(f64::NAN));
    }

    #[test]
    fn test_actor_signature() {
        let actor = Actor::new(Role::Tabulator, "desk-1");
        assert_eq!(actor.signature(), "tabulator:desk-1");
    }
}
