//! Repository abstraction over the stored entity kinds, plus SQLite.

pub mod sqlite;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    course::Course,
    round::{DifferentialRecord, HoleCard, Round},
    types::RoundId,
};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Message(String),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Stored entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Course,
    Round,
    HoleCard,
    Differential,
}

impl EntityKind {
    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::Course => "courses",
            Self::Round => "rounds",
            Self::HoleCard => "hole_cards",
            Self::Differential => "differentials",
        }
    }
}

/// A value a [`Repository`] can store under a numeric key.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + 'static {
    const KIND: EntityKind;

    fn key(&self) -> u64;
}

impl Record for Course {
    const KIND: EntityKind = EntityKind::Course;

    fn key(&self) -> u64 {
        self.id
    }
}

impl Record for Round {
    const KIND: EntityKind = EntityKind::Round;

    fn key(&self) -> u64 {
        self.id
    }
}

/// Keyed by the round it belongs to.
impl Record for HoleCard {
    const KIND: EntityKind = EntityKind::HoleCard;

    fn key(&self) -> u64 {
        self.round_id
    }
}

/// Keyed by the round it belongs to.
impl Record for DifferentialRecord {
    const KIND: EntityKind = EntityKind::Differential;

    fn key(&self) -> u64 {
        self.round_id
    }
}

/// Storage for one entity kind.
///
/// `save` inserts or replaces by key; `list` returns records in key order.
pub trait Repository<T: Record> {
    fn get(&self, key: u64) -> PersistResult<Option<T>>;
    fn list(&self) -> PersistResult<Vec<T>>;
    fn save(&mut self, record: T) -> PersistResult<()>;
    /// Returns true when a record was removed.
    fn delete(&mut self, key: u64) -> PersistResult<bool>;
    /// Reserves a key above every key handed out or stored so far.
    fn next_key(&mut self) -> PersistResult<u64>;
}

/// Records derived from one scoring pass, written together.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWrite {
    /// Round inputs, when they changed in the same pass.
    pub round: Option<Round>,
    /// Rescored hole card.
    pub card: HoleCard,
    /// Replacement differential; `None` removes the stored one.
    pub differential: Option<DifferentialRecord>,
}

impl ScoringWrite {
    pub fn round_id(&self) -> RoundId {
        self.card.round_id
    }
}

/// Repository holding all four entity kinds.
///
/// The helpers name the entity kind through their type parameter, which
/// plain [`Repository`] calls on a multi-kind store cannot infer.
///
/// Writes touching several kinds of one round go through
/// [`commit_scoring`](Self::commit_scoring) and
/// [`purge_round`](Self::purge_round), which apply all or nothing.
pub trait Store:
    Repository<Course> + Repository<Round> + Repository<HoleCard> + Repository<DifferentialRecord>
{
    /// Stores the round (if set), its card and its differential at once.
    fn commit_scoring(&mut self, write: ScoringWrite) -> PersistResult<()>;

    /// Removes a round with its card and differential at once. Returns true
    /// when the round itself existed.
    fn purge_round(&mut self, round_id: RoundId) -> PersistResult<bool>;

    fn fetch<T: Record>(&self, key: u64) -> PersistResult<Option<T>>
    where
        Self: Repository<T>,
    {
        <Self as Repository<T>>::get(self, key)
    }

    fn fetch_all<T: Record>(&self) -> PersistResult<Vec<T>>
    where
        Self: Repository<T>,
    {
        <Self as Repository<T>>::list(self)
    }

    fn put<T: Record>(&mut self, record: T) -> PersistResult<()>
    where
        Self: Repository<T>,
    {
        <Self as Repository<T>>::save(self, record)
    }

    fn remove<T: Record>(&mut self, key: u64) -> PersistResult<bool>
    where
        Self: Repository<T>,
    {
        <Self as Repository<T>>::delete(self, key)
    }

    fn reserve_key<T: Record>(&mut self) -> PersistResult<u64>
    where
        Self: Repository<T>,
    {
        <Self as Repository<T>>::next_key(self)
    }
}
