//! Best-of-recent aggregation of differentials into a handicap index.

use crate::{
    round::{Differential, DifferentialRecord, HandicapIndex},
    types::RoundId,
};

/// Most recent rounds considered.
pub const INDEX_WINDOW: usize = 20;
/// Lowest differentials averaged; also the minimum history for an index.
pub const INDEX_BEST_OF: usize = 8;

/// One differential in a history ordered most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry<Id> {
    pub differential: Differential,
    pub id: Id,
}

/// Result of aggregating a history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOutcome<Id> {
    /// Index, or `None` while fewer than `best_of` rounds exist.
    pub index: Option<HandicapIndex>,
    /// Identifiers of the counting rounds, lowest differential first.
    pub best: Vec<Id>,
    /// Entries inside the recency window.
    pub considered: usize,
}

/// Averages the lowest `best_of` of the most recent `window` differentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexAggregator {
    window: usize,
    best_of: usize,
}

impl Default for IndexAggregator {
    fn default() -> Self {
        Self {
            window: INDEX_WINDOW,
            best_of: INDEX_BEST_OF,
        }
    }
}

impl IndexAggregator {
    /// Aggregator over a custom window; `best_of` is raised to at least 1
    /// and `window` to at least `best_of`.
    pub fn new(window: usize, best_of: usize) -> Self {
        let best_of = best_of.max(1);
        Self {
            window: window.max(best_of),
            best_of,
        }
    }

    /// Computes the index of `history`, which must be ordered most recent
    /// first.
    ///
    /// Ties between equal differentials go to the more recent round. The
    /// mean is rounded half away from zero, unlike the differential itself.
    pub fn compute<Id: Copy>(&self, history: &[HistoryEntry<Id>]) -> IndexOutcome<Id> {
        let recent = &history[..history.len().min(self.window)];
        if recent.len() < self.best_of {
            return IndexOutcome {
                index: None,
                best: Vec::new(),
                considered: recent.len(),
            };
        }

        let mut ranked: Vec<&HistoryEntry<Id>> = recent.iter().collect();
        ranked.sort_by_key(|e| e.differential);
        ranked.truncate(self.best_of);

        let sum: i64 = ranked
            .iter()
            .map(|e| i64::from(e.differential.tenths()))
            .sum();
        let mean = sum as f64 / self.best_of as f64;

        IndexOutcome {
            index: Some(HandicapIndex::from_tenths(mean.round() as i32)),
            best: ranked.iter().map(|e| e.id).collect(),
            considered: recent.len(),
        }
    }
}

/// [`IndexAggregator::compute`] with the standard best 8 of 20.
pub fn compute_index<Id: Copy>(history: &[HistoryEntry<Id>]) -> IndexOutcome<Id> {
    IndexAggregator::default().compute(history)
}

/// Sorts stored differentials most recent first.
///
/// Later play date wins; equal or absent dates fall back to creation
/// order. Undated rounds rank older than any dated round.
pub fn order_most_recent_first(records: &mut [DifferentialRecord]) {
    records.sort_by(|a, b| (b.played_on, b.round_id).cmp(&(a.played_on, a.round_id)));
}

/// Orders `records` and turns them into index history.
pub fn history_from_records(mut records: Vec<DifferentialRecord>) -> Vec<HistoryEntry<RoundId>> {
    order_most_recent_first(&mut records);
    records
        .into_iter()
        .map(|r| HistoryEntry {
            differential: r.value,
            id: r.round_id,
        })
        .collect()
}
