use tempfile::TempDir;

use whs_index::{
    core::store::MemoryRepository,
    course::{Course, CourseDraft, CoursePatch, DifficultyRanking},
    engine::HandicapEngine,
    ledger::Ledger,
    persist::{ScoringWrite, Store, sqlite::SqliteRepository},
    round::{Differential, DifferentialRecord, HoleCard, HoleEntry, Round, RoundDraft, RoundSummary},
};

fn course(id: u64, name: &str) -> Course {
    let mut course = Course {
        id,
        name: String::new(),
        layout: "Blue".to_string(),
        tees: "White".to_string(),
        pars: [4; 18],
        ranking: DifficultyRanking::default(),
        slope: 128.0,
        sss: 71.2,
    };
    CoursePatch {
        name: Some(name.to_string()),
        ..CoursePatch::default()
    }
    .apply_to(&mut course);
    course
}

fn exercise_crud<S: Store>(mut store: S) {
    assert_eq!(store.reserve_key::<Course>().expect("key"), 1);
    store.put(course(1, "Morfontaine")).expect("save");
    store.put(course(3, "Fontainebleau")).expect("save");

    let loaded: Option<Course> = store.fetch(1).expect("get");
    assert_eq!(loaded.expect("course").name, "Morfontaine");

    let all: Vec<Course> = store.fetch_all().expect("list");
    assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3]);

    store.put(course(1, "Morfontaine Valliere")).expect("replace");
    let loaded: Option<Course> = store.fetch(1).expect("get");
    assert_eq!(loaded.expect("course").name, "Morfontaine Valliere");

    assert_eq!(store.reserve_key::<Course>().expect("key"), 4);
    assert!(store.remove::<Course>(3).expect("delete"));
    assert!(!store.remove::<Course>(3).expect("delete again"));
    assert!(store.fetch::<Course>(3).expect("get").is_none());

    let rounds: Vec<Round> = store.fetch_all().expect("list rounds");
    assert!(rounds.is_empty());
}

fn scoring_write(round: Option<Round>, total: i32, tenths: Option<i32>) -> ScoringWrite {
    ScoringWrite {
        round,
        card: HoleCard {
            round_id: 7,
            holes: Vec::new(),
            total,
            summary: RoundSummary::default(),
        },
        differential: tenths.map(|t| DifferentialRecord {
            round_id: 7,
            player: 3,
            played_on: None,
            value: Differential::from_tenths(t),
        }),
    }
}

fn exercise_round_writes<S: Store>(mut store: S) {
    let round = Round {
        id: 7,
        player: 3,
        course_id: Some(1),
        name: "Sunday medal".to_string(),
        played_on: None,
        course: course(1, "Morfontaine").snapshot(),
        handicap: Some(12),
        pcc: 0,
    };
    store
        .commit_scoring(scoring_write(Some(round), 90, Some(180)))
        .expect("commit");
    assert_eq!(store.fetch::<Round>(7).expect("get").expect("round").handicap, Some(12));
    assert_eq!(store.fetch::<HoleCard>(7).expect("get").expect("card").total, 90);
    assert_eq!(
        store.fetch::<DifferentialRecord>(7).expect("get").expect("diff").value,
        Differential::from_tenths(180)
    );
    assert_eq!(store.reserve_key::<Round>().expect("key"), 8);

    store.commit_scoring(scoring_write(None, 0, None)).expect("commit");
    assert!(store.fetch::<Round>(7).expect("get").is_some());
    assert_eq!(store.fetch::<HoleCard>(7).expect("get").expect("card").total, 0);
    assert!(store.fetch::<DifferentialRecord>(7).expect("get").is_none());

    store.commit_scoring(scoring_write(None, 95, Some(230))).expect("commit");
    assert!(store.purge_round(7).expect("purge"));
    assert!(store.fetch::<Round>(7).expect("get").is_none());
    assert!(store.fetch::<HoleCard>(7).expect("get").is_none());
    assert!(store.fetch::<DifferentialRecord>(7).expect("get").is_none());
    assert!(!store.purge_round(7).expect("purge again"));
}

#[test]
fn memory_repository_crud() {
    exercise_crud(MemoryRepository::new());
}

#[test]
fn sqlite_repository_crud() {
    exercise_crud(SqliteRepository::open_in_memory().expect("open sqlite"));
}

#[test]
fn memory_round_writes_apply_together() {
    exercise_round_writes(MemoryRepository::new());
}

#[test]
fn sqlite_round_writes_apply_together() {
    exercise_round_writes(SqliteRepository::open_in_memory().expect("open sqlite"));
}

#[test]
fn sqlite_ledger_survives_reopen() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("rounds.db");

    let (course_id, round_id) = {
        let repo = SqliteRepository::open(&db_path).expect("open sqlite");
        let mut ledger = Ledger::new(repo, HandicapEngine::default());
        let course_id = ledger.add_course(CourseDraft::new("Saint-Cloud")).expect("course");
        let round_id = ledger
            .start_round(RoundDraft {
                handicap: Some(9),
                pcc: 1,
                ..RoundDraft::new(5, course_id)
            })
            .expect("round");
        ledger
            .record_holes(round_id, &vec![HoleEntry::strokes(5); 18])
            .expect("record");
        (course_id, round_id)
    };

    let repo = SqliteRepository::open(&db_path).expect("reopen");
    let card: Option<HoleCard> = repo.fetch(round_id).expect("card");
    let card = card.expect("stored card");
    assert_eq!(card.total, 90);
    assert_eq!(card.holes.iter().map(|h| h.strokes_received).sum::<i32>(), 9);

    let diff: Option<DifferentialRecord> = repo.fetch(round_id).expect("diff");
    assert_eq!(diff.expect("stored diff").value.to_string(), "17.0");

    let mut ledger = Ledger::new(repo, HandicapEngine::default());
    let next = ledger.start_round(RoundDraft::new(5, course_id)).expect("next round");
    assert!(next > round_id);
    assert_eq!(ledger.history(5).expect("history").len(), 1);

    let round = ledger.round(round_id).expect("load").expect("round");
    assert_eq!(round.pcc, 1);
    assert_eq!(round.course.ranking, DifficultyRanking::natural());
}
