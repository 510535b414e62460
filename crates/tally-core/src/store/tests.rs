use std::fs;

use tempfile::tempdir;

use super::paths::{report_file_name, CONFIG_FILE, DEFAULT_STORE_DIR};
use super::Store;
use crate::error::TallyError;
use crate::lock::{LockState, ScoreSheet};
use crate::model::{Actor, Competition, Contestant, Criterion, EventId, Judge, Role};

struct Roster {
    competition: Competition,
    judges: Vec<Judge>,
    contestants: Vec<Contestant>,
    criteria: Vec<Criterion>,
}

fn seed(store: &Store) -> Roster {
    let db = store.db();
    let competition = db.insert_competition("Vocal Solo").unwrap();
    Roster {
        judges: vec![
            db.insert_judge("Ada", &[competition.id]).unwrap(),
            db.insert_judge("Grace", &[competition.id]).unwrap(),
        ],
        contestants: vec![
            db.insert_contestant(competition.id, "Alice").unwrap(),
            db.insert_contestant(competition.id, "Bob").unwrap(),
        ],
        criteria: vec![
            db.insert_criterion(competition.id, "A", 10.0, 60.0).unwrap(),
            db.insert_criterion(competition.id, "B", 5.0, 40.0).unwrap(),
        ],
        competition,
    }
}

fn sheet(roster: &Roster, a: f64, b: f64) -> ScoreSheet {
    [(roster.criteria[0].id, a), (roster.criteria[1].id, b)]
        .into_iter()
        .collect()
}

#[test]
fn test_init_store() {
    let dir = tempdir().unwrap();
    let store = Store::init(dir.path()).unwrap();

    assert_eq!(store.root(), dir.path().join(DEFAULT_STORE_DIR));
    assert!(store.root().join(CONFIG_FILE).exists());
    assert_eq!(store.active_event().unwrap().name, "Main Event");
}

#[test]
fn test_init_keeps_existing_config() {
    let dir = tempdir().unwrap();
    let root = dir.path().join(DEFAULT_STORE_DIR);
    fs::create_dir_all(&root).unwrap();
    fs::write(
        root.join(CONFIG_FILE),
        "[scoring]\ndefault_event_name = \"Regionals\"\n",
    )
    .unwrap();

    let store = Store::init(dir.path()).unwrap();
    assert_eq!(store.config().scoring.default_event_name, "Regionals");
    assert_eq!(store.active_event().unwrap().name, "Regionals");
}

#[test]
fn test_discover_store_from_subdirectory() {
    let dir = tempdir().unwrap();
    Store::init(dir.path()).unwrap();
    let nested = dir.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    let discovered = Store::discover(&nested).unwrap();
    assert_eq!(discovered.root(), dir.path().join(DEFAULT_STORE_DIR));
}

#[test]
fn test_discover_without_store_fails() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        Store::discover(dir.path()),
        Err(TallyError::StoreNotFound { .. })
    ));
}

#[test]
fn test_open_without_config_uses_defaults() {
    let dir = tempdir().unwrap();
    let root = dir.path().join(DEFAULT_STORE_DIR);
    fs::create_dir_all(&root).unwrap();

    let store = Store::open(&root).unwrap();
    assert_eq!(store.config().report.title, "Event Results");
}

#[test]
fn test_ballots_then_lock_then_results() {
    let dir = tempdir().unwrap();
    let store = Store::init(dir.path()).unwrap();
    let roster = seed(&store);
    let event = store.active_event().unwrap().id;
    let competition = roster.competition.id;
    let alice = roster.contestants[0].id;

    for (judge, values) in roster.judges.iter().zip([(7.0, 3.0), (9.0, 5.0)]) {
        let actor = Actor::new(Role::Judge, judge.name.clone());
        store
            .submit_judge_ballot(
                event,
                competition,
                judge.id,
                alice,
                &sheet(&roster, values.0, values.1),
                &actor,
            )
            .unwrap();
    }

    let desk = Actor::new(Role::Tabulator, "desk-1");
    let receipt = store
        .save_or_lock_tabulator_entry(
            event,
            competition,
            roster.judges[0].id,
            alice,
            &ScoreSheet::new(),
            true,
            &desk,
        )
        .unwrap();
    assert_eq!(receipt.state, LockState::Locked);

    let results = store.get_results(event, competition).unwrap();
    assert_eq!(results[0].contestant, "Alice");
    assert!((results[0].total_weighted - 80.0).abs() < 1e-9);
    assert!((results[0].total_raw - 12.0).abs() < 1e-9);
    assert_eq!(results[1].total_weighted, 0.0);

    let statuses = store.lock_statuses(event, competition).unwrap();
    assert_eq!(statuses[0].state, LockState::Locked);
    assert_eq!(statuses[1].state, LockState::Open);

    let breakdown = store.get_judge_breakdown(event, competition).unwrap();
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[1].judge, "Grace");
    assert!((breakdown[1].rows[0].total - 94.0).abs() < 1e-9);
}

#[test]
fn test_incomplete_lock_keeps_saved_cells() {
    let dir = tempdir().unwrap();
    let store = Store::init(dir.path()).unwrap();
    let roster = seed(&store);
    let event = store.active_event().unwrap().id;
    let desk = Actor::new(Role::Tabulator, "desk-1");

    let err = store
        .save_or_lock_tabulator_entry(
            event,
            roster.competition.id,
            roster.judges[0].id,
            roster.contestants[1].id,
            &sheet(&roster, 6.0, 2.0),
            true,
            &desk,
        )
        .unwrap_err();
    assert!(matches!(err, TallyError::IncompleteSubmission { .. }));

    let results = store.get_results(event, roster.competition.id).unwrap();
    assert_eq!(results[0].contestant, "Bob");
    assert!(results[0].total_weighted > 0.0);
}

#[test]
fn test_history_reads_closed_event() {
    let dir = tempdir().unwrap();
    let store = Store::init(dir.path()).unwrap();
    let roster = seed(&store);
    let first = store.active_event().unwrap();
    let desk = Actor::new(Role::Tabulator, "desk-1");

    store
        .save_or_lock_tabulator_entry(
            first.id,
            roster.competition.id,
            roster.judges[0].id,
            roster.contestants[0].id,
            &sheet(&roster, 10.0, 5.0),
            false,
            &desk,
        )
        .unwrap();

    let (closed, started) = store.close_active_event().unwrap();
    assert_eq!(closed.id, first.id);
    assert_eq!(store.resolve_event(None).unwrap().id, started.id);

    let old = store.resolve_event(Some(first.id)).unwrap();
    let results = store.get_results(old.id, roster.competition.id).unwrap();
    // One judge scored, so the mean is that judge's score
    assert!((results[0].total_weighted - 100.0).abs() < 1e-9);

    let fresh = store.get_results(started.id, roster.competition.id).unwrap();
    assert!(fresh.iter().all(|r| r.total_weighted == 0.0));

    assert!(matches!(
        store.resolve_event(Some(EventId(999))),
        Err(TallyError::NotFound { .. })
    ));
}

#[test]
fn test_render_report_uses_store_labels() {
    let dir = tempdir().unwrap();
    let store = Store::init(dir.path()).unwrap();
    let roster = seed(&store);
    let event = store.active_event().unwrap();

    let results = store.get_results(event.id, roster.competition.id).unwrap();
    let fields = store.criterion_fields(roster.competition.id).unwrap();
    assert_eq!(fields[0].label, "A (60%)");

    let bytes = store
        .render_report(event.id, roster.competition.id, &results, &fields)
        .unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    let needle = b"(Competition: Vocal Solo) Tj";
    assert!(bytes.windows(needle.len()).any(|w| w == needle));

    assert_eq!(
        report_file_name(&roster.competition.slug, event.id),
        format!("results_vocal-solo_{}.pdf", event.id)
    );
}
