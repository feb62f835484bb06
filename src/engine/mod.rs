//! Pure handicap calculation: allocation, capping, differential, index.

/// Course handicap distribution across holes.
pub mod allocation;
/// Net double bogey capping and the scoring differential.
pub mod differential;
/// Best-of-recent index aggregation.
pub mod index;
/// Fairway, green and putt counts.
pub mod summary;

use thiserror::Error;

use crate::{
    config::EngineConfig,
    course::CourseSnapshot,
    round::{Differential, HoleEntry, HoleResult, RoundSummary},
    types::HOLES,
};

use self::{
    allocation::{StrokeAllocation, allocate_strokes},
    differential::{DifferentialEngine, IncompleteRound, cap_adjusted, incomplete_holes, round_total},
    index::IndexAggregator,
};

/// Calculation failures surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid difficulty ranking: {0}")]
    InvalidRanking(String),
    #[error("invalid course rating: {0}")]
    InvalidCourseRating(String),
}

/// Everything derived from one scorecard.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRound {
    /// Strokes received per hole.
    pub allocation: StrokeAllocation,
    /// Scored holes in hole order.
    pub holes: Vec<HoleResult>,
    /// SBA total.
    pub total: i32,
    /// Differential, or why it is undefined.
    pub differential: Result<Differential, EngineError>,
    /// Fairway, green and putt counts.
    pub summary: RoundSummary,
    /// Set when some holes have no strokes.
    pub incomplete: Option<IncompleteRound>,
}

/// Engine facade configured once by the embedding application.
#[derive(Debug, Clone, Default)]
pub struct HandicapEngine {
    config: EngineConfig,
}

impl HandicapEngine {
    /// Engine using `config`.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Differential calculator using the configured rounding rule.
    pub fn differential_engine(&self) -> DifferentialEngine {
        DifferentialEngine::new(self.config.rounding)
    }

    /// Index aggregator using the configured window.
    pub fn aggregator(&self) -> IndexAggregator {
        IndexAggregator::new(self.config.window, self.config.best_of)
    }

    /// Scores `entries` against `course`.
    ///
    /// Missing entries are unrecorded holes; entries past hole 18 are
    /// ignored. A bad course rating leaves `differential` as `Err` while
    /// the hole data is still returned.
    pub fn score_round(
        &self,
        course: &CourseSnapshot,
        handicap: Option<i32>,
        pcc: i32,
        entries: &[HoleEntry],
    ) -> ScoredRound {
        let allocation = allocate_strokes(handicap, &course.ranking);

        let holes: Vec<HoleResult> = (0..HOLES)
            .map(|idx| {
                let entry = entries.get(idx).copied().unwrap_or_default();
                let par = course.pars[idx];
                let received = allocation[idx];
                HoleResult {
                    par,
                    strokes: entry.strokes,
                    strokes_received: received,
                    adjusted: cap_adjusted(i32::from(par), entry.strokes, received),
                    fairway: entry.fairway,
                    gir: entry.gir,
                    putts: entry.putts,
                }
            })
            .collect();

        let total = round_total(&holes);
        let differential =
            self.differential_engine()
                .differential(f64::from(total), course.slope, course.sss, pcc);

        ScoredRound {
            allocation,
            total,
            differential,
            summary: summary::summarize(&holes),
            incomplete: incomplete_holes(&holes),
            holes,
        }
    }
}
