use super::Fixture;
use crate::error::TallyError;

#[test]
fn test_competition_slug_unique() {
    let fx = Fixture::new();
    assert_eq!(fx.competition.slug, "vocal-solo");

    let err = fx.db.insert_competition("Vocal  Solo").unwrap_err();
    assert!(matches!(err, TallyError::AlreadyExists { .. }));
}

#[test]
fn test_find_competition_by_id_or_slug() {
    let fx = Fixture::new();
    let by_slug = fx.db.find_competition("vocal-solo").unwrap();
    let by_id = fx
        .db
        .find_competition(&fx.competition.id.to_string())
        .unwrap();
    assert_eq!(by_slug, by_id);

    assert!(matches!(
        fx.db.find_competition("missing"),
        Err(TallyError::NotFound { .. })
    ));
}

#[test]
fn test_roster_lists_ordered_by_name() {
    let fx = Fixture::new();
    fx.db.insert_contestant(fx.competition.id, "Aaron").unwrap();

    let names: Vec<String> = fx
        .db
        .contestants_for(fx.competition.id)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Aaron", "Alice", "Bob"]);

    let criteria: Vec<String> = fx
        .db
        .criteria_for(fx.competition.id)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(criteria, vec!["Pitch", "Stage"]);
}

#[test]
fn test_judge_spans_competitions() {
    let fx = Fixture::new();
    let other = fx.db.insert_competition("Choir").unwrap();

    let judge = fx
        .db
        .insert_judge("Linus", &[fx.competition.id, other.id])
        .unwrap();
    assert!(judge.is_assigned_to(fx.competition.id));
    assert!(judge.is_assigned_to(other.id));

    assert_eq!(fx.db.judges_for(fx.competition.id).unwrap().len(), 3);
    assert_eq!(fx.db.judges_for(other.id).unwrap().len(), 1);

    // Assigning twice is a no-op
    let again = fx.db.assign_judge(judge.id, other.id).unwrap();
    assert_eq!(again.competitions.len(), 2);
}

#[test]
fn test_criterion_rejects_bad_bounds() {
    let fx = Fixture::new();
    assert!(fx
        .db
        .insert_criterion(fx.competition.id, "Zero", 0.0, 10.0)
        .is_err());
    assert!(fx
        .db
        .insert_criterion(fx.competition.id, "Negative", 10.0, -1.0)
        .is_err());
    assert!(fx
        .db
        .insert_criterion(fx.competition.id, "   ", 10.0, 10.0)
        .is_err());
}
