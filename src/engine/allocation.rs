//! Distribution of a course handicap across the holes of a card.

use crate::{
    course::DifficultyRanking,
    engine::EngineError,
    types::HOLES,
};

/// Strokes received per hole, in hole order.
pub type StrokeAllocation = [i32; HOLES];

/// Validates `ranking` and allocates `handicap` across the holes.
///
/// Fails with [`EngineError::InvalidRanking`] when `ranking` is not a
/// permutation of `1..=18`; no partial allocation is returned.
pub fn allocate(handicap: Option<i32>, ranking: &[u8]) -> Result<StrokeAllocation, EngineError> {
    let ranking = DifficultyRanking::new(ranking)?;
    Ok(allocate_strokes(handicap, &ranking))
}

/// Allocates `handicap` across holes using an already validated ranking.
///
/// Every hole receives `handicap div 18` strokes and the holes ranked
/// `1..=handicap mod 18` one more. Division is Euclidean, so a plus
/// handicap gives strokes back on the easiest holes and the allocation
/// always sums to `handicap`.
pub fn allocate_strokes(handicap: Option<i32>, ranking: &DifficultyRanking) -> StrokeAllocation {
    let handicap = handicap.unwrap_or(0);
    let holes = HOLES as i32;
    let base = handicap.div_euclid(holes);
    let extra = handicap.rem_euclid(holes);

    let mut out = [base; HOLES];
    for (slot, rank) in out.iter_mut().zip(ranking.ranks()) {
        if i32::from(*rank) <= extra {
            *slot += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_absent_handicap_allocate_nothing() {
        let ranking = DifficultyRanking::natural();
        assert_eq!(allocate_strokes(None, &ranking), [0; HOLES]);
        assert_eq!(allocate_strokes(Some(0), &ranking), [0; HOLES]);
    }

    #[test]
    fn exact_multiple_of_eighteen_is_flat() {
        let ranking = DifficultyRanking::natural();
        assert_eq!(allocate_strokes(Some(36), &ranking), [2; HOLES]);
    }
}
