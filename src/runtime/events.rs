//! Runtime event stream payloads.

use crate::{
    round::{Differential, HandicapIndex},
    types::{PlayerId, RoundId},
};

/// Events emitted from the single-writer ledger loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A round was started.
    RoundStarted {
        /// New round id.
        id: RoundId,
    },
    /// A round was recomputed after a save.
    RoundScored {
        /// Scored round id.
        id: RoundId,
        /// Stored differential, `None` when undefined.
        differential: Option<Differential>,
    },
    /// A round and its derived records were removed.
    RoundDeleted {
        /// Removed round id.
        id: RoundId,
    },
    /// A player's index moved.
    IndexChanged {
        /// Player whose index changed.
        player: PlayerId,
        /// New index, `None` while history is too short.
        index: Option<HandicapIndex>,
    },
}
