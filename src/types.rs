//! Shared primitive IDs and scorecard constants.

/// Monotonic course identifier.
pub type CourseId = u64;
/// Monotonic round identifier, also the insertion order of rounds.
pub type RoundId = u64;
/// Player identifier supplied by the embedding application.
pub type PlayerId = u64;

/// Holes on a full scorecard.
pub const HOLES: usize = 18;

/// Par assumed for holes of a course created without explicit pars.
pub const DEFAULT_PAR: u8 = 4;

/// Slope rating of a course of standard difficulty.
pub const STANDARD_SLOPE: f64 = 113.0;
