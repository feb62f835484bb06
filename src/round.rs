//! Round records, hole results, and the one-decimal rating values.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    course::CourseSnapshot,
    types::{CourseId, PlayerId, RoundId},
};

/// Scoring differential held as whole tenths.
///
/// Tenths keep recomputation bit-identical and make ordering total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Differential(i32);

impl Differential {
    /// Builds a differential from whole tenths (`183` is `18.3`).
    pub const fn from_tenths(tenths: i32) -> Self {
        Self(tenths)
    }

    /// Whole tenths.
    pub const fn tenths(self) -> i32 {
        self.0
    }

    /// Value as a float with one decimal.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for Differential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.as_f64())
    }
}

/// Running handicap index held as whole tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandicapIndex(i32);

impl HandicapIndex {
    /// Builds an index from whole tenths.
    pub const fn from_tenths(tenths: i32) -> Self {
        Self(tenths)
    }

    /// Whole tenths.
    pub const fn tenths(self) -> i32 {
        self.0
    }

    /// Value as a float with one decimal.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for HandicapIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.as_f64())
    }
}

/// A played (or in-progress) round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Stable round identifier, increasing in creation order.
    pub id: RoundId,
    /// Player who owns the round.
    pub player: PlayerId,
    /// Course the snapshot was taken from, if it still exists.
    pub course_id: Option<CourseId>,
    /// Free-form label.
    pub name: String,
    /// Date the round was played.
    pub played_on: Option<NaiveDate>,
    /// Course data captured when the round started.
    pub course: CourseSnapshot,
    /// Course handicap for the round; absent is treated as zero.
    pub handicap: Option<i32>,
    /// Playing conditions calibration.
    #[serde(default)]
    pub pcc: i32,
}

/// Insert payload used to start a new [`Round`] on a stored course.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundDraft {
    /// Player who owns the round.
    pub player: PlayerId,
    /// Course to snapshot.
    pub course_id: CourseId,
    /// Free-form label.
    pub name: String,
    /// Date the round was played.
    pub played_on: Option<NaiveDate>,
    /// Course handicap.
    pub handicap: Option<i32>,
    /// Playing conditions calibration.
    pub pcc: i32,
}

impl RoundDraft {
    /// Draft with no date, no handicap and a PCC of zero.
    pub fn new(player: PlayerId, course_id: CourseId) -> Self {
        Self {
            player,
            course_id,
            name: String::new(),
            played_on: None,
            handicap: None,
            pcc: 0,
        }
    }
}

/// Sparse patch over the scoring inputs of a round.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoundPatch {
    /// Optional replacement for the label.
    pub name: Option<String>,
    /// Optional replacement for the play date.
    pub played_on: Option<NaiveDate>,
    /// Optional replacement for the course handicap.
    pub handicap: Option<i32>,
    /// Optional replacement for PCC.
    pub pcc: Option<i32>,
    /// Optional replacement for the snapshot slope.
    pub slope: Option<f64>,
    /// Optional replacement for the snapshot SSS.
    pub sss: Option<f64>,
}

impl RoundPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to `round`.
    pub fn apply_to(&self, round: &mut Round) {
        if let Some(v) = &self.name {
            round.name = v.clone();
        }
        if let Some(v) = self.played_on {
            round.played_on = Some(v);
        }
        if let Some(v) = self.handicap {
            round.handicap = Some(v);
        }
        if let Some(v) = self.pcc {
            round.pcc = v;
        }
        if let Some(v) = self.slope {
            round.course.slope = v;
        }
        if let Some(v) = self.sss {
            round.course.sss = v;
        }
    }
}

/// Raw facts entered for one hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HoleEntry {
    /// Strokes taken; `None` when not recorded.
    pub strokes: Option<i32>,
    /// Tee shot found the fairway.
    pub fairway: bool,
    /// Green reached in regulation.
    pub gir: bool,
    /// Putts taken.
    pub putts: Option<u8>,
}

impl HoleEntry {
    /// Entry with only a stroke count.
    pub fn strokes(strokes: i32) -> Self {
        Self {
            strokes: Some(strokes),
            ..Self::default()
        }
    }
}

/// Scored hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleResult {
    /// Par of the hole.
    pub par: u8,
    /// Strokes taken; `None` when unplayed.
    pub strokes: Option<i32>,
    /// Handicap strokes allocated to the hole.
    pub strokes_received: i32,
    /// Net double bogey capped strokes; `None` when unplayed.
    pub adjusted: Option<i32>,
    /// Tee shot found the fairway.
    pub fairway: bool,
    /// Green reached in regulation.
    pub gir: bool,
    /// Putts taken.
    pub putts: Option<u8>,
}

impl HoleResult {
    /// Raw facts this result was scored from.
    pub fn entry(&self) -> HoleEntry {
        HoleEntry {
            strokes: self.strokes,
            fairway: self.fairway,
            gir: self.gir,
            putts: self.putts,
        }
    }
}

/// Counting statistics over a round's holes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Fairways hit off the tee.
    pub fairway_hits: u32,
    /// Holes with a fairway target, i.e. everything but par 3s.
    pub fairway_possible: u32,
    /// Greens reached in regulation.
    pub gir_hits: u32,
    /// Putts over all holes.
    pub putts_total: u32,
    /// Average over holes with putts recorded.
    pub putts_avg: Option<f64>,
}

/// Hole-by-hole card of a round with its derived summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleCard {
    /// Round this card belongs to.
    pub round_id: RoundId,
    /// Results in hole order.
    pub holes: Vec<HoleResult>,
    /// SBA total.
    pub total: i32,
    /// Derived counting statistics.
    pub summary: RoundSummary,
}

/// Persisted differential of one round, consumed by the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferentialRecord {
    /// Round the differential was computed for.
    pub round_id: RoundId,
    /// Player who owns the round.
    pub player: PlayerId,
    /// Play date used for recency ordering.
    pub played_on: Option<NaiveDate>,
    /// Computed value.
    pub value: Differential,
}
