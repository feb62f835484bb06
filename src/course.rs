//! Course records, difficulty ranking, and the per-round course snapshot.

use serde::{Deserialize, Serialize};

use crate::{
    engine::EngineError,
    types::{CourseId, DEFAULT_PAR, HOLES, STANDARD_SLOPE},
};

/// Stroke index of every hole, `1` being the hardest.
///
/// Always a permutation of `1..=18`; the allocator relies on each rank being
/// used exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DifficultyRanking([u8; HOLES]);

impl DifficultyRanking {
    /// Ranking equal to hole order: hole 1 is rank 1, hole 18 is rank 18.
    pub fn natural() -> Self {
        let mut ranks = [0u8; HOLES];
        for (idx, rank) in ranks.iter_mut().enumerate() {
            *rank = idx as u8 + 1;
        }
        Self(ranks)
    }

    /// Validates `ranks` as a permutation of `1..=18` in hole order.
    pub fn new(ranks: &[u8]) -> Result<Self, EngineError> {
        if ranks.len() != HOLES {
            return Err(EngineError::InvalidRanking(format!(
                "expected {HOLES} ranks, got {}",
                ranks.len()
            )));
        }

        let mut seen = [false; HOLES];
        let mut out = [0u8; HOLES];
        for (hole, &rank) in ranks.iter().enumerate() {
            if rank == 0 || usize::from(rank) > HOLES {
                return Err(EngineError::InvalidRanking(format!(
                    "rank {rank} on hole {} is outside 1..={HOLES}",
                    hole + 1
                )));
            }
            let slot = &mut seen[usize::from(rank) - 1];
            if *slot {
                return Err(EngineError::InvalidRanking(format!(
                    "rank {rank} is used more than once"
                )));
            }
            *slot = true;
            out[hole] = rank;
        }
        Ok(Self(out))
    }

    /// Ranks in hole order.
    pub fn ranks(&self) -> &[u8; HOLES] {
        &self.0
    }
}

impl Default for DifficultyRanking {
    fn default() -> Self {
        Self::natural()
    }
}

impl TryFrom<Vec<u8>> for DifficultyRanking {
    type Error = EngineError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<DifficultyRanking> for Vec<u8> {
    fn from(value: DifficultyRanking) -> Self {
        value.0.to_vec()
    }
}

fn default_pars() -> [u8; HOLES] {
    [DEFAULT_PAR; HOLES]
}

fn default_slope() -> f64 {
    STANDARD_SLOPE
}

/// Stored golf course and tee combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Stable course identifier.
    pub id: CourseId,
    /// Club or venue name.
    pub name: String,
    /// Layout played at the venue.
    pub layout: String,
    /// Tee colour or name.
    pub tees: String,
    /// Par per hole in hole order.
    #[serde(default = "default_pars")]
    pub pars: [u8; HOLES],
    /// Stroke index per hole.
    #[serde(default)]
    pub ranking: DifficultyRanking,
    /// Slope rating.
    #[serde(default = "default_slope")]
    pub slope: f64,
    /// Standard scratch score.
    pub sss: f64,
}

impl Course {
    /// Sum of the hole pars.
    pub fn par_total(&self) -> u32 {
        self.pars.iter().map(|p| u32::from(*p)).sum()
    }

    /// Freezes the rating-relevant fields for a round starting now.
    pub fn snapshot(&self) -> CourseSnapshot {
        CourseSnapshot {
            pars: self.pars,
            ranking: self.ranking,
            slope: self.slope,
            sss: self.sss,
        }
    }
}

/// Insert payload used to create a new [`Course`].
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    /// Club or venue name.
    pub name: String,
    /// Layout played at the venue.
    pub layout: String,
    /// Tee colour or name.
    pub tees: String,
    /// Par per hole.
    pub pars: [u8; HOLES],
    /// Stroke index per hole.
    pub ranking: DifficultyRanking,
    /// Slope rating.
    pub slope: f64,
    /// Standard scratch score.
    pub sss: f64,
}

impl CourseDraft {
    /// Draft with par 4 everywhere, natural ranking, standard slope and an
    /// SSS equal to the par total.
    pub fn new(name: impl Into<String>) -> Self {
        let pars = default_pars();
        Self {
            name: name.into(),
            layout: String::new(),
            tees: String::new(),
            pars,
            ranking: DifficultyRanking::natural(),
            slope: STANDARD_SLOPE,
            sss: pars.iter().map(|p| f64::from(*p)).sum(),
        }
    }

    /// Snapshot of the draft, for scoring without storing a course.
    pub fn snapshot(&self) -> CourseSnapshot {
        CourseSnapshot {
            pars: self.pars,
            ranking: self.ranking,
            slope: self.slope,
            sss: self.sss,
        }
    }

    pub(crate) fn into_course(self, id: CourseId) -> Course {
        Course {
            id,
            name: self.name,
            layout: self.layout,
            tees: self.tees,
            pars: self.pars,
            ranking: self.ranking,
            slope: self.slope,
            sss: self.sss,
        }
    }
}

/// Sparse patch where each `Some` field overwrites the course value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoursePatch {
    /// Optional replacement for name.
    pub name: Option<String>,
    /// Optional replacement for layout.
    pub layout: Option<String>,
    /// Optional replacement for tees.
    pub tees: Option<String>,
    /// Optional replacement for pars.
    pub pars: Option<[u8; HOLES]>,
    /// Optional replacement for ranking.
    pub ranking: Option<DifficultyRanking>,
    /// Optional replacement for slope.
    pub slope: Option<f64>,
    /// Optional replacement for SSS.
    pub sss: Option<f64>,
}

impl CoursePatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to `course`.
    pub fn apply_to(&self, course: &mut Course) {
        if let Some(v) = &self.name {
            course.name = v.clone();
        }
        if let Some(v) = &self.layout {
            course.layout = v.clone();
        }
        if let Some(v) = &self.tees {
            course.tees = v.clone();
        }
        if let Some(v) = self.pars {
            course.pars = v;
        }
        if let Some(v) = self.ranking {
            course.ranking = v;
        }
        if let Some(v) = self.slope {
            course.slope = v;
        }
        if let Some(v) = self.sss {
            course.sss = v;
        }
    }
}

/// Course data frozen when a round starts.
///
/// Later edits to the [`Course`] never reach rounds already in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSnapshot {
    /// Par per hole.
    #[serde(default = "default_pars")]
    pub pars: [u8; HOLES],
    /// Stroke index per hole.
    #[serde(default)]
    pub ranking: DifficultyRanking,
    /// Slope rating.
    #[serde(default = "default_slope")]
    pub slope: f64,
    /// Standard scratch score.
    pub sss: f64,
}
