//! Competitions, judges, contestants and criteria
//!
//! A thin insert/list layer: enough roster for the ledger to score against.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, TallyError};
use crate::{bail_invalid, map_db_err};
use crate::model::{
    Competition, CompetitionId, Contestant, ContestantId, Criterion, CriterionId, Judge, JudgeId,
};

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

pub(crate) fn get_competition(conn: &Connection, id: CompetitionId) -> Result<Competition> {
    conn.query_row(
        "SELECT id, name, slug FROM competitions WHERE id = ?1",
        params![id],
        |row| {
            Ok(Competition {
                id: row.get(0)?,
                name: row.get(1)?,
                slug: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| map_db_err!("load competition", e))?
    .ok_or_else(|| TallyError::not_found("competition", id))
}

pub(crate) fn get_criterion(conn: &Connection, id: CriterionId) -> Result<Criterion> {
    conn.query_row(
        "SELECT id, name, max_score, weight, competition_id FROM criteria WHERE id = ?1",
        params![id],
        |row| {
            Ok(Criterion {
                id: row.get(0)?,
                name: row.get(1)?,
                max_score: row.get(2)?,
                weight: row.get(3)?,
                competition_id: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(|e| map_db_err!("load criterion", e))?
    .ok_or_else(|| TallyError::not_found("criterion", id))
}

/// Criteria of a competition, ordered by name
pub(crate) fn criteria_for(conn: &Connection, competition: CompetitionId) -> Result<Vec<Criterion>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, max_score, weight, competition_id FROM criteria
             WHERE competition_id = ?1 ORDER BY name, id",
        )
        .map_err(|e| map_db_err!("prepare criteria query", e))?;

    let rows = stmt
        .query_map(params![competition], |row| {
            Ok(Criterion {
                id: row.get(0)?,
                name: row.get(1)?,
                max_score: row.get(2)?,
                weight: row.get(3)?,
                competition_id: row.get(4)?,
            })
        })
        .map_err(|e| map_db_err!("query criteria", e))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| map_db_err!("read criteria", e))
}

/// Contestants of a competition, ordered by name
pub(crate) fn contestants_for(
    conn: &Connection,
    competition: CompetitionId,
) -> Result<Vec<Contestant>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, competition_id FROM contestants
             WHERE competition_id = ?1 ORDER BY name, id",
        )
        .map_err(|e| map_db_err!("prepare contestants query", e))?;

    let rows = stmt
        .query_map(params![competition], |row| {
            Ok(Contestant {
                id: row.get(0)?,
                name: row.get(1)?,
                competition_id: row.get(2)?,
            })
        })
        .map_err(|e| map_db_err!("query contestants", e))?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| map_db_err!("read contestants", e))
}

pub(crate) fn get_contestant(conn: &Connection, id: ContestantId) -> Result<Contestant> {
    conn.query_row(
        "SELECT id, name, competition_id FROM contestants WHERE id = ?1",
        params![id],
        |row| {
            Ok(Contestant {
                id: row.get(0)?,
                name: row.get(1)?,
                competition_id: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| map_db_err!("load contestant", e))?
    .ok_or_else(|| TallyError::not_found("contestant", id))
}

fn judge_competitions(conn: &Connection, judge: JudgeId) -> Result<Vec<CompetitionId>> {
    let mut stmt = conn
        .prepare(
            "SELECT competition_id FROM judge_competitions
             WHERE judge_id = ?1 ORDER BY competition_id",
        )
        .map_err(|e| map_db_err!("prepare judge links query", e))?;
    let rows = stmt
        .query_map(params![judge], |row| row.get(0))
        .map_err(|e| map_db_err!("query judge links", e))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| map_db_err!("read judge links", e))
}

/// A judge with its full competition set
pub(crate) fn get_judge(conn: &Connection, id: JudgeId) -> Result<Judge> {
    let name: String = conn
        .query_row(
            "SELECT name FROM judges WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| map_db_err!("load judge", e))?
        .ok_or_else(|| TallyError::not_found("judge", id))?;

    Ok(Judge {
        id,
        name,
        competitions: judge_competitions(conn, id)?,
    })
}

/// Judges assigned to a competition, ordered by name
pub(crate) fn judges_for(conn: &Connection, competition: CompetitionId) -> Result<Vec<Judge>> {
    let ids: Vec<JudgeId> = {
        let mut stmt = conn
            .prepare(
                "SELECT j.id FROM judges j
                 JOIN judge_competitions jc ON jc.judge_id = j.id
                 WHERE jc.competition_id = ?1
                 ORDER BY j.name, j.id",
            )
            .map_err(|e| map_db_err!("prepare judges query", e))?;
        let rows = stmt
            .query_map(params![competition], |row| row.get(0))
            .map_err(|e| map_db_err!("query judges", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read judges", e))?
    };

    ids.into_iter().map(|id| get_judge(conn, id)).collect()
}

pub(crate) fn judge_count(conn: &Connection, competition: CompetitionId) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM judge_competitions WHERE competition_id = ?1",
        params![competition],
        |row| row.get(0),
    )
    .map_err(|e| map_db_err!("count judges", e))
}

pub(crate) fn criteria_count(conn: &Connection, competition: CompetitionId) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM criteria WHERE competition_id = ?1",
        params![competition],
        |row| row.get(0),
    )
    .map_err(|e| map_db_err!("count criteria", e))
}

impl super::Database {
    /// Create a competition; the slug is derived from the name and must be unique
    pub fn insert_competition(&self, name: &str) -> Result<Competition> {
        let name = name.trim();
        if name.is_empty() {
            bail_invalid!("competition name", "(empty)");
        }
        let slug = slug::slugify(name);

        match self.conn.execute(
            "INSERT INTO competitions (name, slug) VALUES (?1, ?2)",
            params![name, slug],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(TallyError::already_exists("competition", &slug))
            }
            Err(e) => return Err(map_db_err!("insert competition", e)),
        }

        let id = CompetitionId(self.conn.last_insert_rowid());
        tracing::debug!(%id, %slug, "competition created");
        Ok(Competition {
            id,
            name: name.to_string(),
            slug,
        })
    }

    pub fn list_competitions(&self) -> Result<Vec<Competition>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, slug FROM competitions ORDER BY name, id")
            .map_err(|e| map_db_err!("prepare competitions query", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Competition {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    slug: row.get(2)?,
                })
            })
            .map_err(|e| map_db_err!("query competitions", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read competitions", e))
    }

    pub fn get_competition(&self, id: CompetitionId) -> Result<Competition> {
        get_competition(&self.conn, id)
    }

    /// Resolve a competition by numeric id or slug
    pub fn find_competition(&self, reference: &str) -> Result<Competition> {
        if let Ok(id) = reference.parse::<i64>() {
            return get_competition(&self.conn, CompetitionId(id));
        }
        self.conn
            .query_row(
                "SELECT id, name, slug FROM competitions WHERE slug = ?1",
                params![reference],
                |row| {
                    Ok(Competition {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        slug: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|e| map_db_err!("load competition", e))?
            .ok_or_else(|| TallyError::not_found("competition", reference))
    }

    /// Create a judge assigned to the given competitions
    pub fn insert_judge(&self, name: &str, competitions: &[CompetitionId]) -> Result<Judge> {
        let name = name.trim();
        if name.is_empty() {
            bail_invalid!("judge name", "(empty)");
        }

        let tx = self.begin_immediate()?;
        for competition in competitions {
            get_competition(&tx, *competition)?;
        }
        tx.execute("INSERT INTO judges (name) VALUES (?1)", params![name])
            .map_err(|e| map_db_err!("insert judge", e))?;
        let id = JudgeId(tx.last_insert_rowid());
        for competition in competitions {
            tx.execute(
                "INSERT OR IGNORE INTO judge_competitions (judge_id, competition_id) VALUES (?1, ?2)",
                params![id, competition],
            )
            .map_err(|e| map_db_err!("link judge", e))?;
        }
        let judge = get_judge(&tx, id)?;
        tx.commit()
            .map_err(|e| TallyError::transaction("insert judge", e))?;

        tracing::debug!(%id, competitions = judge.competitions.len(), "judge created");
        Ok(judge)
    }

    /// Add a competition to a judge's set; idempotent
    pub fn assign_judge(&self, judge: JudgeId, competition: CompetitionId) -> Result<Judge> {
        get_judge(&self.conn, judge)?;
        get_competition(&self.conn, competition)?;
        self.conn
            .execute(
                "INSERT OR IGNORE INTO judge_competitions (judge_id, competition_id) VALUES (?1, ?2)",
                params![judge, competition],
            )
            .map_err(|e| map_db_err!("link judge", e))?;
        get_judge(&self.conn, judge)
    }

    pub fn get_judge(&self, id: JudgeId) -> Result<Judge> {
        get_judge(&self.conn, id)
    }

    pub fn judges_for(&self, competition: CompetitionId) -> Result<Vec<Judge>> {
        judges_for(&self.conn, competition)
    }

    pub fn insert_contestant(&self, competition: CompetitionId, name: &str) -> Result<Contestant> {
        let name = name.trim();
        if name.is_empty() {
            bail_invalid!("contestant name", "(empty)");
        }
        get_competition(&self.conn, competition)?;

        self.conn
            .execute(
                "INSERT INTO contestants (name, competition_id) VALUES (?1, ?2)",
                params![name, competition],
            )
            .map_err(|e| map_db_err!("insert contestant", e))?;

        Ok(Contestant {
            id: ContestantId(self.conn.last_insert_rowid()),
            name: name.to_string(),
            competition_id: competition,
        })
    }

    pub fn contestants_for(&self, competition: CompetitionId) -> Result<Vec<Contestant>> {
        contestants_for(&self.conn, competition)
    }

    pub fn get_contestant(&self, id: ContestantId) -> Result<Contestant> {
        get_contestant(&self.conn, id)
    }

    /// Create a criterion. The weight-sum limit belongs to the caller.
    pub fn insert_criterion(
        &self,
        competition: CompetitionId,
        name: &str,
        max_score: f64,
        weight: f64,
    ) -> Result<Criterion> {
        let name = name.trim();
        if name.is_empty() {
            bail_invalid!("criterion name", "(empty)");
        }
        if !max_score.is_finite() || max_score <= 0.0 {
            bail_invalid!("criterion max score", max_score);
        }
        if !weight.is_finite() || weight < 0.0 {
            bail_invalid!("criterion weight", weight);
        }
        get_competition(&self.conn, competition)?;

        self.conn
            .execute(
                "INSERT INTO criteria (name, max_score, weight, competition_id) VALUES (?1, ?2, ?3, ?4)",
                params![name, max_score, weight, competition],
            )
            .map_err(|e| map_db_err!("insert criterion", e))?;

        Ok(Criterion {
            id: CriterionId(self.conn.last_insert_rowid()),
            name: name.to_string(),
            max_score,
            weight,
            competition_id: competition,
        })
    }

    pub fn criteria_for(&self, competition: CompetitionId) -> Result<Vec<Criterion>> {
        criteria_for(&self.conn, competition)
    }

    pub fn get_criterion(&self, id: CriterionId) -> Result<Criterion> {
        get_criterion(&self.conn, id)
    }
}
