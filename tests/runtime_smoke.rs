use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use whs_index::{
    config::RuntimeConfig,
    core::store::MemoryRepository,
    course::CourseDraft,
    engine::HandicapEngine,
    ledger::{Ledger, LedgerError},
    persist::{EntityKind, PersistError, PersistResult, Record, Repository, ScoringWrite, Store},
    round::{Differential, HoleEntry, RoundDraft},
    runtime::{
        events::LedgerEvent,
        handle::{RuntimeError, spawn_ledger},
    },
    types::RoundId,
};

/// Memory store whose round lookups fail while `broken` is set.
struct UnreadableRounds {
    inner: MemoryRepository,
    broken: Arc<AtomicBool>,
}

impl<T: Record> Repository<T> for UnreadableRounds
where
    MemoryRepository: Repository<T>,
{
    fn get(&self, key: u64) -> PersistResult<Option<T>> {
        if T::KIND == EntityKind::Round && self.broken.load(Ordering::SeqCst) {
            return Err(PersistError::Message("round table unreadable".to_string()));
        }
        <MemoryRepository as Repository<T>>::get(&self.inner, key)
    }

    fn list(&self) -> PersistResult<Vec<T>> {
        <MemoryRepository as Repository<T>>::list(&self.inner)
    }

    fn save(&mut self, record: T) -> PersistResult<()> {
        <MemoryRepository as Repository<T>>::save(&mut self.inner, record)
    }

    fn delete(&mut self, key: u64) -> PersistResult<bool> {
        <MemoryRepository as Repository<T>>::delete(&mut self.inner, key)
    }

    fn next_key(&mut self) -> PersistResult<u64> {
        <MemoryRepository as Repository<T>>::next_key(&mut self.inner)
    }
}

impl Store for UnreadableRounds {
    fn commit_scoring(&mut self, write: ScoringWrite) -> PersistResult<()> {
        self.inner.commit_scoring(write)
    }

    fn purge_round(&mut self, round_id: RoundId) -> PersistResult<bool> {
        self.inner.purge_round(round_id)
    }
}

async fn next_event(sub: &mut tokio::sync::broadcast::Receiver<LedgerEvent>) -> LedgerEvent {
    tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("event")
        .expect("recv")
}

#[tokio::test]
async fn runtime_scores_rounds_and_emits_events_in_order() {
    let ledger = Ledger::new(MemoryRepository::new(), HandicapEngine::default());
    let handle = spawn_ledger(ledger, RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let course_id = handle.add_course(CourseDraft::new("Le Golf National")).await.expect("course");
    let round_id = handle
        .start_round(RoundDraft {
            handicap: Some(18),
            ..RoundDraft::new(1, course_id)
        })
        .await
        .expect("start");

    let scored = handle
        .record_holes(round_id, vec![HoleEntry::strokes(5); 18])
        .await
        .expect("record");
    assert_eq!(scored.total, 90);

    assert_eq!(next_event(&mut sub).await, LedgerEvent::RoundStarted { id: round_id });
    assert_eq!(
        next_event(&mut sub).await,
        LedgerEvent::RoundScored {
            id: round_id,
            differential: Some(Differential::from_tenths(180)),
        }
    );
    assert_eq!(
        next_event(&mut sub).await,
        LedgerEvent::IndexChanged { player: 1, index: None }
    );

    let history = handle.history(1).await.expect("history");
    assert_eq!(history.len(), 1);

    assert!(handle.delete_round(round_id).await.expect("delete"));
    assert_eq!(next_event(&mut sub).await, LedgerEvent::RoundDeleted { id: round_id });
    assert!(handle.round(round_id).await.expect("round").is_none());

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn ledger_errors_and_closed_channel_surface() {
    let ledger = Ledger::new(MemoryRepository::new(), HandicapEngine::default());
    let handle = spawn_ledger(ledger, RuntimeConfig::default());

    let err = handle.record_hole(7, 1, HoleEntry::strokes(4)).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Ledger(LedgerError::MissingRound(7))));

    let outcome = handle.index(1).await.expect("index");
    assert_eq!(outcome.index, None);

    handle.shutdown().await.expect("shutdown");
    let err = handle.index(1).await.unwrap_err();
    assert!(matches!(err, RuntimeError::ChannelClosed));
}

#[tokio::test]
async fn delete_reports_lookup_failure_and_keeps_round() {
    let broken = Arc::new(AtomicBool::new(false));
    let store = UnreadableRounds {
        inner: MemoryRepository::new(),
        broken: Arc::clone(&broken),
    };
    let handle = spawn_ledger(Ledger::new(store, HandicapEngine::default()), RuntimeConfig::default());

    let course_id = handle.add_course(CourseDraft::new("Fontainebleau")).await.expect("course");
    let round_id = handle.start_round(RoundDraft::new(1, course_id)).await.expect("start");
    let mut sub = handle.subscribe();

    broken.store(true, Ordering::SeqCst);
    let err = handle.delete_round(round_id).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Ledger(LedgerError::Persist(_))));

    broken.store(false, Ordering::SeqCst);
    assert!(handle.round(round_id).await.expect("round").is_some());
    assert!(sub.try_recv().is_err());

    handle.shutdown().await.expect("shutdown");
}
