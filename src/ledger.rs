//! Scorecard ledger: keeps stored differentials in step with round inputs.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    course::{Course, CourseDraft, CoursePatch},
    engine::{
        HandicapEngine, ScoredRound,
        index::{IndexOutcome, history_from_records, order_most_recent_first},
    },
    persist::{PersistError, ScoringWrite, Store},
    round::{DifferentialRecord, HoleCard, HoleEntry, Round, RoundDraft, RoundPatch},
    types::{CourseId, HOLES, PlayerId, RoundId},
};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("course {0} not found")]
    MissingCourse(CourseId),
    #[error("round {0} not found")]
    MissingRound(RoundId),
    #[error("hole {0} is outside 1..=18")]
    HoleOutOfRange(usize),
}

/// Owns a [`Store`] and recomputes derived records on every save.
///
/// A round's hole card and differential are never written directly; they
/// are rebuilt from the round and its raw hole entries and committed in one
/// store write, so a failed save keeps the previous card and differential.
pub struct Ledger<S> {
    store: S,
    engine: HandicapEngine,
}

impl<S: Store> Ledger<S> {
    pub fn new(store: S, engine: HandicapEngine) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &HandicapEngine {
        &self.engine
    }

    pub fn add_course(&mut self, draft: CourseDraft) -> Result<CourseId, LedgerError> {
        let id = self.store.reserve_key::<Course>()?;
        self.store.put(draft.into_course(id))?;
        debug!(course_id = id, "course added");
        Ok(id)
    }

    pub fn course(&self, id: CourseId) -> Result<Option<Course>, LedgerError> {
        Ok(self.store.fetch(id)?)
    }

    pub fn courses(&self) -> Result<Vec<Course>, LedgerError> {
        Ok(self.store.fetch_all()?)
    }

    /// Edits a course. Rounds already started keep their snapshot.
    pub fn update_course(&mut self, id: CourseId, patch: CoursePatch) -> Result<Course, LedgerError> {
        let mut course: Course = self.store.fetch(id)?.ok_or(LedgerError::MissingCourse(id))?;
        if patch.is_empty() {
            return Ok(course);
        }
        patch.apply_to(&mut course);
        self.store.put(course.clone())?;
        Ok(course)
    }

    /// Snapshots the course and stores an empty card for a new round.
    pub fn start_round(&mut self, draft: RoundDraft) -> Result<RoundId, LedgerError> {
        let course: Course = self
            .store
            .fetch(draft.course_id)?
            .ok_or(LedgerError::MissingCourse(draft.course_id))?;

        let id = self.store.reserve_key::<Round>()?;
        let round = Round {
            id,
            player: draft.player,
            course_id: Some(course.id),
            name: draft.name,
            played_on: draft.played_on,
            course: course.snapshot(),
            handicap: draft.handicap,
            pcc: draft.pcc,
        };
        self.rescore(&round, &[], true)?;

        info!(round_id = id, player = round.player, course_id = course.id, "round started");
        Ok(id)
    }

    /// Replaces every hole entry of a round.
    pub fn record_holes(&mut self, round_id: RoundId, entries: &[HoleEntry]) -> Result<ScoredRound, LedgerError> {
        let round = self.load_round(round_id)?;
        self.rescore(&round, entries, false)
    }

    /// Replaces the entry of one hole, numbered from 1.
    pub fn record_hole(
        &mut self,
        round_id: RoundId,
        hole: usize,
        entry: HoleEntry,
    ) -> Result<ScoredRound, LedgerError> {
        if hole == 0 || hole > HOLES {
            return Err(LedgerError::HoleOutOfRange(hole));
        }
        let round = self.load_round(round_id)?;
        let mut entries = self.entries_of(round_id)?;
        entries[hole - 1] = entry;
        self.rescore(&round, &entries, false)
    }

    /// Edits handicap, PCC, rating or date and recomputes the round.
    pub fn patch_round(&mut self, round_id: RoundId, patch: RoundPatch) -> Result<ScoredRound, LedgerError> {
        let mut round = self.load_round(round_id)?;
        let entries = self.entries_of(round_id)?;
        let changed = !patch.is_empty();
        if changed {
            patch.apply_to(&mut round);
        }
        self.rescore(&round, &entries, changed)
    }

    /// Removes the round with its card and differential.
    pub fn delete_round(&mut self, round_id: RoundId) -> Result<bool, LedgerError> {
        let removed = self.store.purge_round(round_id)?;
        if removed {
            info!(round_id, "round deleted");
        }
        Ok(removed)
    }

    pub fn round(&self, round_id: RoundId) -> Result<Option<Round>, LedgerError> {
        Ok(self.store.fetch(round_id)?)
    }

    pub fn hole_card(&self, round_id: RoundId) -> Result<Option<HoleCard>, LedgerError> {
        Ok(self.store.fetch(round_id)?)
    }

    /// Stored differentials of `player`, most recent first.
    pub fn history(&self, player: PlayerId) -> Result<Vec<DifferentialRecord>, LedgerError> {
        let mut records = self.player_records(player)?;
        order_most_recent_first(&mut records);
        Ok(records)
    }

    /// Current index of `player` and the rounds counting toward it.
    pub fn player_index(&self, player: PlayerId) -> Result<IndexOutcome<RoundId>, LedgerError> {
        let history = history_from_records(self.player_records(player)?);
        Ok(self.engine.aggregator().compute(&history))
    }

    fn player_records(&self, player: PlayerId) -> Result<Vec<DifferentialRecord>, LedgerError> {
        let all: Vec<DifferentialRecord> = self.store.fetch_all()?;
        Ok(all.into_iter().filter(|r| r.player == player).collect())
    }

    fn load_round(&self, round_id: RoundId) -> Result<Round, LedgerError> {
        self.store
            .fetch(round_id)?
            .ok_or(LedgerError::MissingRound(round_id))
    }

    fn entries_of(&self, round_id: RoundId) -> Result<Vec<HoleEntry>, LedgerError> {
        let card: Option<HoleCard> = self.store.fetch(round_id)?;
        let mut entries: Vec<HoleEntry> = card
            .map(|c| c.holes.iter().map(|h| h.entry()).collect())
            .unwrap_or_default();
        entries.resize(HOLES, HoleEntry::default());
        Ok(entries)
    }

    /// Scores `entries` and commits the card and differential, along with
    /// `round` itself when `save_round` is set.
    fn rescore(
        &mut self,
        round: &Round,
        entries: &[HoleEntry],
        save_round: bool,
    ) -> Result<ScoredRound, LedgerError> {
        let scored = self
            .engine
            .score_round(&round.course, round.handicap, round.pcc, entries);

        let played_any = scored.holes.iter().any(|h| h.strokes.is_some());
        let differential = match (&scored.differential, played_any) {
            (Ok(value), true) => {
                if let Some(incomplete) = &scored.incomplete {
                    warn!(round_id = round.id, %incomplete, "scoring incomplete round");
                }
                Some(DifferentialRecord {
                    round_id: round.id,
                    player: round.player,
                    played_on: round.played_on,
                    value: *value,
                })
            }
            (Err(err), true) => {
                warn!(round_id = round.id, %err, "differential undefined");
                None
            }
            (_, false) => None,
        };

        self.store.commit_scoring(ScoringWrite {
            round: save_round.then(|| round.clone()),
            card: HoleCard {
                round_id: round.id,
                holes: scored.holes.clone(),
                total: scored.total,
                summary: scored.summary,
            },
            differential,
        })?;

        if let Ok(value) = &scored.differential {
            debug!(round_id = round.id, total = scored.total, differential = %value, "round scored");
        }
        Ok(scored)
    }
}
