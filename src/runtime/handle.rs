use hashbrown::HashMap;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::{
    config::RuntimeConfig,
    course::CourseDraft,
    engine::{ScoredRound, index::IndexOutcome},
    ledger::{Ledger, LedgerError},
    persist::Store,
    round::{DifferentialRecord, HandicapIndex, HoleEntry, Round, RoundDraft, RoundPatch},
    types::{CourseId, PlayerId, RoundId},
};

use super::events::LedgerEvent;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("ledger task is no longer running")]
    ChannelClosed,
}

pub struct LedgerHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<LedgerEvent>,
}

impl Clone for LedgerHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

type Reply<T> = oneshot::Sender<Result<T, RuntimeError>>;

enum Command {
    AddCourse {
        draft: CourseDraft,
        resp: Reply<CourseId>,
    },
    StartRound {
        draft: RoundDraft,
        resp: Reply<RoundId>,
    },
    RecordHoles {
        round_id: RoundId,
        entries: Vec<HoleEntry>,
        resp: Reply<ScoredRound>,
    },
    RecordHole {
        round_id: RoundId,
        hole: usize,
        entry: HoleEntry,
        resp: Reply<ScoredRound>,
    },
    PatchRound {
        round_id: RoundId,
        patch: RoundPatch,
        resp: Reply<ScoredRound>,
    },
    DeleteRound {
        round_id: RoundId,
        resp: Reply<bool>,
    },
    Round {
        round_id: RoundId,
        resp: Reply<Option<Round>>,
    },
    History {
        player: PlayerId,
        resp: Reply<Vec<DifferentialRecord>>,
    },
    Index {
        player: PlayerId,
        resp: Reply<IndexOutcome<RoundId>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `ledger` onto a tokio task that applies commands one at a time.
pub fn spawn_ledger<S>(ledger: Ledger<S>, config: RuntimeConfig) -> LedgerHandle
where
    S: Store + Send + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<LedgerEvent>(config.event_capacity.max(1));
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut ledger = ledger;
        let mut last_index: HashMap<PlayerId, Option<HandicapIndex>> = HashMap::new();

        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut ledger, &events_tx_loop, &mut last_index) {
                break;
            }
        }
        info!("ledger runtime stopped");
    });

    LedgerHandle { cmd_tx, events_tx }
}

impl LedgerHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events_tx.subscribe()
    }

    pub async fn add_course(&self, draft: CourseDraft) -> Result<CourseId, RuntimeError> {
        self.request(|resp| Command::AddCourse { draft, resp }).await
    }

    pub async fn start_round(&self, draft: RoundDraft) -> Result<RoundId, RuntimeError> {
        self.request(|resp| Command::StartRound { draft, resp }).await
    }

    pub async fn record_holes(
        &self,
        round_id: RoundId,
        entries: Vec<HoleEntry>,
    ) -> Result<ScoredRound, RuntimeError> {
        self.request(|resp| Command::RecordHoles {
            round_id,
            entries,
            resp,
        })
        .await
    }

    pub async fn record_hole(
        &self,
        round_id: RoundId,
        hole: usize,
        entry: HoleEntry,
    ) -> Result<ScoredRound, RuntimeError> {
        self.request(|resp| Command::RecordHole {
            round_id,
            hole,
            entry,
            resp,
        })
        .await
    }

    pub async fn patch_round(&self, round_id: RoundId, patch: RoundPatch) -> Result<ScoredRound, RuntimeError> {
        self.request(|resp| Command::PatchRound {
            round_id,
            patch,
            resp,
        })
        .await
    }

    pub async fn delete_round(&self, round_id: RoundId) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::DeleteRound { round_id, resp }).await
    }

    pub async fn round(&self, round_id: RoundId) -> Result<Option<Round>, RuntimeError> {
        self.request(|resp| Command::Round { round_id, resp }).await
    }

    pub async fn history(&self, player: PlayerId) -> Result<Vec<DifferentialRecord>, RuntimeError> {
        self.request(|resp| Command::History { player, resp }).await
    }

    pub async fn index(&self, player: PlayerId) -> Result<IndexOutcome<RoundId>, RuntimeError> {
        self.request(|resp| Command::Index { player, resp }).await
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

fn handle_command<S: Store>(
    cmd: Command,
    ledger: &mut Ledger<S>,
    events_tx: &broadcast::Sender<LedgerEvent>,
    last_index: &mut HashMap<PlayerId, Option<HandicapIndex>>,
) -> bool {
    match cmd {
        Command::AddCourse { draft, resp } => {
            let _ = resp.send(ledger.add_course(draft).map_err(RuntimeError::from));
        }
        Command::StartRound { draft, resp } => {
            let res = ledger.start_round(draft).map_err(RuntimeError::from);
            if let Ok(id) = res {
                let _ = events_tx.send(LedgerEvent::RoundStarted { id });
            }
            let _ = resp.send(res);
        }
        Command::RecordHoles {
            round_id,
            entries,
            resp,
        } => {
            let res = ledger.record_holes(round_id, &entries);
            let _ = resp.send(after_scoring(ledger, round_id, res, events_tx, last_index));
        }
        Command::RecordHole {
            round_id,
            hole,
            entry,
            resp,
        } => {
            let res = ledger.record_hole(round_id, hole, entry);
            let _ = resp.send(after_scoring(ledger, round_id, res, events_tx, last_index));
        }
        Command::PatchRound {
            round_id,
            patch,
            resp,
        } => {
            let res = ledger.patch_round(round_id, patch);
            let _ = resp.send(after_scoring(ledger, round_id, res, events_tx, last_index));
        }
        Command::DeleteRound { round_id, resp } => {
            let _ = resp.send(delete_round(ledger, round_id, events_tx, last_index));
        }
        Command::Round { round_id, resp } => {
            let _ = resp.send(ledger.round(round_id).map_err(RuntimeError::from));
        }
        Command::History { player, resp } => {
            let _ = resp.send(ledger.history(player).map_err(RuntimeError::from));
        }
        Command::Index { player, resp } => {
            let _ = resp.send(ledger.player_index(player).map_err(RuntimeError::from));
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

fn delete_round<S: Store>(
    ledger: &mut Ledger<S>,
    round_id: RoundId,
    events_tx: &broadcast::Sender<LedgerEvent>,
    last_index: &mut HashMap<PlayerId, Option<HandicapIndex>>,
) -> Result<bool, RuntimeError> {
    let player = ledger.round(round_id)?.map(|r| r.player);
    let removed = ledger.delete_round(round_id)?;
    if removed {
        let _ = events_tx.send(LedgerEvent::RoundDeleted { id: round_id });
        if let Some(player) = player {
            publish_index(ledger, player, events_tx, last_index);
        }
    }
    Ok(removed)
}

fn after_scoring<S: Store>(
    ledger: &Ledger<S>,
    round_id: RoundId,
    res: Result<ScoredRound, LedgerError>,
    events_tx: &broadcast::Sender<LedgerEvent>,
    last_index: &mut HashMap<PlayerId, Option<HandicapIndex>>,
) -> Result<ScoredRound, RuntimeError> {
    let scored = res?;
    let played_any = scored.holes.iter().any(|h| h.strokes.is_some());
    let differential = match &scored.differential {
        Ok(value) if played_any => Some(*value),
        _ => None,
    };
    let _ = events_tx.send(LedgerEvent::RoundScored {
        id: round_id,
        differential,
    });

    if let Some(round) = ledger.round(round_id)? {
        publish_index(ledger, round.player, events_tx, last_index);
    }
    Ok(scored)
}

fn publish_index<S: Store>(
    ledger: &Ledger<S>,
    player: PlayerId,
    events_tx: &broadcast::Sender<LedgerEvent>,
    last_index: &mut HashMap<PlayerId, Option<HandicapIndex>>,
) {
    let Ok(outcome) = ledger.player_index(player) else {
        return;
    };
    let previous = last_index.insert(player, outcome.index);
    if previous != Some(outcome.index) {
        debug!(player, index = ?outcome.index, "index changed");
        let _ = events_tx.send(LedgerEvent::IndexChanged {
            player,
            index: outcome.index,
        });
    }
}
