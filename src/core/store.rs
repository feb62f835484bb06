use hashbrown::HashMap;

use crate::{
    course::Course,
    persist::{PersistResult, Record, Repository, ScoringWrite, Store},
    round::{DifferentialRecord, HoleCard, Round},
    types::RoundId,
};

#[derive(Debug)]
struct Table<T> {
    records: HashMap<u64, T>,
    next_key: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            next_key: 1,
        }
    }
}

/// In-memory repository for all entity kinds.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    courses: Table<Course>,
    rounds: Table<Round>,
    hole_cards: Table<HoleCard>,
    differentials: Table<DifferentialRecord>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

trait TableFor<T> {
    fn table(&self) -> &Table<T>;
    fn table_mut(&mut self) -> &mut Table<T>;
}

impl TableFor<Course> for MemoryRepository {
    fn table(&self) -> &Table<Course> {
        &self.courses
    }

    fn table_mut(&mut self) -> &mut Table<Course> {
        &mut self.courses
    }
}

impl TableFor<Round> for MemoryRepository {
    fn table(&self) -> &Table<Round> {
        &self.rounds
    }

    fn table_mut(&mut self) -> &mut Table<Round> {
        &mut self.rounds
    }
}

impl TableFor<HoleCard> for MemoryRepository {
    fn table(&self) -> &Table<HoleCard> {
        &self.hole_cards
    }

    fn table_mut(&mut self) -> &mut Table<HoleCard> {
        &mut self.hole_cards
    }
}

impl TableFor<DifferentialRecord> for MemoryRepository {
    fn table(&self) -> &Table<DifferentialRecord> {
        &self.differentials
    }

    fn table_mut(&mut self) -> &mut Table<DifferentialRecord> {
        &mut self.differentials
    }
}

impl<T: Record> Repository<T> for MemoryRepository
where
    Self: TableFor<T>,
{
    fn get(&self, key: u64) -> PersistResult<Option<T>> {
        Ok(<Self as TableFor<T>>::table(self).records.get(&key).cloned())
    }

    fn list(&self) -> PersistResult<Vec<T>> {
        let mut out: Vec<T> = <Self as TableFor<T>>::table(self).records.values().cloned().collect();
        out.sort_by_key(|r| r.key());
        Ok(out)
    }

    fn save(&mut self, record: T) -> PersistResult<()> {
        <Self as TableFor<T>>::table_mut(self).upsert(record);
        Ok(())
    }

    fn delete(&mut self, key: u64) -> PersistResult<bool> {
        Ok(<Self as TableFor<T>>::table_mut(self).records.remove(&key).is_some())
    }

    fn next_key(&mut self) -> PersistResult<u64> {
        let table = <Self as TableFor<T>>::table_mut(self);
        let key = table.next_key;
        table.next_key += 1;
        Ok(key)
    }
}

impl<T: Record> Table<T> {
    fn upsert(&mut self, record: T) {
        let key = record.key();
        self.next_key = self.next_key.max(key.saturating_add(1));
        self.records.insert(key, record);
    }
}

/// Table writes cannot fail, so each multi-kind write is applied in full.
impl Store for MemoryRepository {
    fn commit_scoring(&mut self, write: ScoringWrite) -> PersistResult<()> {
        let round_id = write.round_id();
        if let Some(round) = write.round {
            self.rounds.upsert(round);
        }
        self.hole_cards.upsert(write.card);
        match write.differential {
            Some(record) => self.differentials.upsert(record),
            None => {
                self.differentials.records.remove(&round_id);
            }
        }
        Ok(())
    }

    fn purge_round(&mut self, round_id: RoundId) -> PersistResult<bool> {
        self.hole_cards.records.remove(&round_id);
        self.differentials.records.remove(&round_id);
        Ok(self.rounds.records.remove(&round_id).is_some())
    }
}
