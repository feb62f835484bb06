//! Counting statistics over hole results.

use crate::round::{HoleResult, RoundSummary};

/// Counts fairways, greens in regulation and putts.
///
/// Par 3s have no fairway target and are left out of both fairway counts.
pub fn summarize(holes: &[HoleResult]) -> RoundSummary {
    let mut summary = RoundSummary::default();
    let mut holes_with_putts = 0u32;

    for hole in holes {
        if hole.par != 3 {
            summary.fairway_possible += 1;
            if hole.fairway {
                summary.fairway_hits += 1;
            }
        }
        if hole.gir {
            summary.gir_hits += 1;
        }
        if let Some(putts) = hole.putts {
            summary.putts_total += u32::from(putts);
            holes_with_putts += 1;
        }
    }

    if holes_with_putts > 0 {
        let avg = f64::from(summary.putts_total) / f64::from(holes_with_putts);
        summary.putts_avg = Some((avg * 100.0).round() / 100.0);
    }
    summary
}
