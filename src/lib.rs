//! World Handicap System scoring: stroke allocation, net double bogey
//! adjusted totals, scoring differentials, and the best-8-of-20 index.
//!
//! # Examples
//!
//! Pure calculation with [`engine::HandicapEngine`]:
//! ```
//! use whs_index::{
//!     course::CourseDraft,
//!     engine::HandicapEngine,
//!     round::HoleEntry,
//! };
//!
//! let course = CourseDraft::new("Les Bordes").snapshot();
//! let entries = vec![HoleEntry::strokes(5); 18];
//! let scored = HandicapEngine::default().score_round(&course, Some(18), 0, &entries);
//! assert_eq!(scored.total, 90);
//! assert_eq!(scored.differential.expect("rated").to_string(), "18.0");
//! ```
//!
//! Ledger usage with SQLite storage:
//! ```no_run
//! use whs_index::{
//!     course::CourseDraft,
//!     engine::HandicapEngine,
//!     ledger::Ledger,
//!     persist::sqlite::SqliteRepository,
//!     round::{HoleEntry, RoundDraft},
//! };
//!
//! let repo = SqliteRepository::open("rounds.db").expect("open sqlite");
//! let mut ledger = Ledger::new(repo, HandicapEngine::default());
//! let course_id = ledger.add_course(CourseDraft::new("Les Bordes")).expect("course");
//! let round_id = ledger.start_round(RoundDraft::new(1, course_id)).expect("round");
//! ledger
//!     .record_holes(round_id, &vec![HoleEntry::strokes(5); 18])
//!     .expect("score");
//! let outcome = ledger.player_index(1).expect("index");
//! assert!(outcome.index.is_none());
//! ```

/// File-based configuration.
pub mod config;
/// In-memory repository.
pub mod core;
/// Courses, difficulty ranking and snapshots.
pub mod course;
/// Pure calculation engine.
pub mod engine;
/// Application service keeping derived records current.
pub mod ledger;
/// Repository abstraction and SQLite implementation.
pub mod persist;
/// Rounds, hole results and rating values.
pub mod round;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Logging setup.
pub mod telemetry;
/// Shared primitive types and constants.
pub mod types;
