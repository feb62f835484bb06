//! Net double bogey capping, round totals, and the scoring differential.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    engine::EngineError,
    round::{Differential, HoleResult},
    types::STANDARD_SLOPE,
};

/// Absorbs binary representation error before truncating, so that a value
/// computed as `17.299999999999997` still lands on `17.3`.
const ROUNDING_TOLERANCE: f64 = 1e-9;

/// Rule used to bring a raw differential to one decimal.
///
/// The two rules disagree on boundaries: `19.26` is `19.2` under
/// [`FloorTenth`](Self::FloorTenth) and `19.3` under
/// [`CarryPastHalf`](Self::CarryPastHalf).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferentialRounding {
    /// Round toward negative infinity to one decimal.
    FloorTenth,
    /// Floor to hundredths, then to one decimal, adding `0.1` when the
    /// hundredths left over above that tenth are more than 5. Negative values
    /// count up from the floor, so `-0.03` becomes `0.0`.
    CarryPastHalf,
}

/// Rounding rule applied unless configured otherwise.
pub const DEFAULT_DIFFERENTIAL_ROUNDING: DifferentialRounding = DifferentialRounding::FloorTenth;

impl Default for DifferentialRounding {
    fn default() -> Self {
        DEFAULT_DIFFERENTIAL_ROUNDING
    }
}

impl DifferentialRounding {
    /// Rounds `raw` to whole tenths.
    pub fn to_tenths(self, raw: f64) -> i32 {
        match self {
            Self::FloorTenth => (raw * 10.0 + ROUNDING_TOLERANCE).floor() as i32,
            Self::CarryPastHalf => {
                let hundredths = (raw * 100.0 + ROUNDING_TOLERANCE).floor() as i64;
                let tenths = hundredths.div_euclid(10);
                let carry = i64::from(hundredths.rem_euclid(10) > 5);
                (tenths + carry) as i32
            }
        }
    }
}

/// Net double bogey: at most `par + 2 + strokes_received`, never above the
/// strokes actually taken. `None` when the hole was not recorded.
pub fn cap_adjusted(par: i32, strokes: Option<i32>, strokes_received: i32) -> Option<i32> {
    strokes.map(|s| s.min(par + 2 + strokes_received))
}

/// Sum of adjusted strokes; unrecorded holes count as zero.
pub fn round_total(holes: &[HoleResult]) -> i32 {
    holes.iter().filter_map(|h| h.adjusted).sum()
}

/// Non-fatal notice that some holes have no strokes recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteRound {
    /// One-based hole numbers without strokes.
    pub missing: Vec<u8>,
}

impl fmt::Display for IncompleteRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hole(s) without strokes: {:?}", self.missing.len(), self.missing)
    }
}

/// Lists unrecorded holes, or `None` when every hole has strokes.
pub fn incomplete_holes(holes: &[HoleResult]) -> Option<IncompleteRound> {
    let missing: Vec<u8> = holes
        .iter()
        .enumerate()
        .filter(|(_, h)| h.strokes.is_none())
        .map(|(idx, _)| idx as u8 + 1)
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(IncompleteRound { missing })
    }
}

/// WHS differential calculator bound to one rounding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DifferentialEngine {
    rounding: DifferentialRounding,
}

impl DifferentialEngine {
    /// Engine using `rounding`.
    pub fn new(rounding: DifferentialRounding) -> Self {
        Self { rounding }
    }

    /// Rounding rule in use.
    pub fn rounding(&self) -> DifferentialRounding {
        self.rounding
    }

    /// Computes `(113 / slope) * (sba_total - sss) - pcc`, rounded to one
    /// decimal. A positive PCC always lowers the result.
    ///
    /// A zero or non-finite slope, or a non-finite SSS, is refused with
    /// [`EngineError::InvalidCourseRating`].
    pub fn differential(
        &self,
        sba_total: f64,
        slope: f64,
        sss: f64,
        pcc: i32,
    ) -> Result<Differential, EngineError> {
        if slope == 0.0 || !slope.is_finite() {
            return Err(EngineError::InvalidCourseRating(format!("slope {slope}")));
        }
        if !sss.is_finite() {
            return Err(EngineError::InvalidCourseRating(format!("sss {sss}")));
        }

        let raw = (STANDARD_SLOPE / slope) * (sba_total - sss) - f64::from(pcc);
        Ok(Differential::from_tenths(self.rounding.to_tenths(raw)))
    }
}
