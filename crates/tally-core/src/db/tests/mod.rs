mod roster;

use tempfile::{tempdir, TempDir};

use crate::config::ScoringConfig;
use crate::db::Database;
use crate::model::{Competition, Contestant, Criterion, Event, Judge, ScoreKey};

/// One competition with two judges, two contestants and two criteria
pub(crate) struct Fixture {
    pub db: Database,
    pub event: Event,
    pub competition: Competition,
    pub judges: Vec<Judge>,
    pub contestants: Vec<Contestant>,
    pub criteria: Vec<Criterion>,
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path(), &ScoringConfig::default()).unwrap();
        let event = db.active_event("Main Event").unwrap();
        let competition = db.insert_competition("Vocal Solo").unwrap();
        let judges = vec![
            db.insert_judge("Ada", &[competition.id]).unwrap(),
            db.insert_judge("Grace", &[competition.id]).unwrap(),
        ];
        let contestants = vec![
            db.insert_contestant(competition.id, "Alice").unwrap(),
            db.insert_contestant(competition.id, "Bob").unwrap(),
        ];
        let criteria = vec![
            db.insert_criterion(competition.id, "Pitch", 10.0, 60.0).unwrap(),
            db.insert_criterion(competition.id, "Stage", 5.0, 40.0).unwrap(),
        ];

        Fixture {
            db,
            event,
            competition,
            judges,
            contestants,
            criteria,
            dir,
        }
    }

    /// A second connection to the same database file, as another process would hold
    pub fn connect(&self) -> Database {
        Database::open(self.dir.path(), &ScoringConfig::default()).unwrap()
    }

    pub fn key(&self, judge: usize, contestant: usize, criterion: usize) -> ScoreKey {
        ScoreKey {
            event: self.event.id,
            competition: self.competition.id,
            judge: self.judges[judge].id,
            contestant: self.contestants[contestant].id,
            criterion: self.criteria[criterion].id,
        }
    }
}
