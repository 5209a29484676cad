//! Worker thread management for asynchronous move finding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::info;
use parking_lot::Mutex;

use crate::board::{GameState, Move};
use crate::search::{find_best_move_cancellable, find_random_move};

/// Observable state of an in-flight search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchPoll {
    /// The worker is still searching.
    Pending,
    /// The search finished and produced a move.
    Done(Move),
    /// The search was cancelled (or the snapshot had no legal moves);
    /// callers fall back to a uniform-random legal move of their own.
    Cancelled,
}

/// Single-slot result channel between the worker and the caller.
enum Slot {
    Pending,
    Finished(Option<Move>),
}

/// Handle to a background search over a snapshot of the game state.
///
/// The worker owns a deep copy; it never reads or mutates the caller's
/// live state. Dropping the handle detaches the worker, which finishes
/// (or notices the stop flag) on its own.
pub struct SearchHandle {
    stop: Arc<AtomicBool>,
    slot: Arc<Mutex<Slot>>,
    worker: Option<JoinHandle<()>>,
}

impl SearchHandle {
    /// Current state of the search.
    ///
    /// After [`cancel`](SearchHandle::cancel) this always answers
    /// `Cancelled`, even if the worker's result arrives later: a cancelled
    /// search's result is discarded, never applied.
    #[must_use]
    pub fn poll(&self) -> SearchPoll {
        if self.stop.load(Ordering::Relaxed) {
            return SearchPoll::Cancelled;
        }
        match *self.slot.lock() {
            Slot::Pending => SearchPoll::Pending,
            Slot::Finished(Some(mv)) => SearchPoll::Done(mv),
            Slot::Finished(None) => SearchPoll::Cancelled,
        }
    }

    /// Abort the search. The worker notices the flag at its next node and
    /// exits without posting a result.
    pub fn cancel(&self) {
        if !self.stop.swap(true, Ordering::Relaxed) {
            info!("search cancelled");
        }
    }

    /// Block until the worker exits, then report the final state.
    pub fn wait(mut self) -> SearchPoll {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        self.poll()
    }
}

/// Start a fixed-depth search on a worker thread.
///
/// `snapshot` and `moves` are moved into the worker wholesale, so the
/// caller's own state can keep changing (including `undo`) while the
/// search runs. If the search completes without being cancelled but finds
/// no move, the worker itself falls back to a uniform-random choice from
/// `moves`; an empty `moves` list resolves to `Cancelled`.
#[must_use]
pub fn start_search(snapshot: GameState, moves: Vec<Move>, depth: u32) -> SearchHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let slot = Arc::new(Mutex::new(Slot::Pending));

    info!(
        "starting depth-{depth} search over {} legal moves",
        moves.len()
    );

    let worker_stop = Arc::clone(&stop);
    let worker_slot = Arc::clone(&slot);
    let worker = thread::Builder::new()
        .name("move-finder".to_string())
        .spawn(move || {
            let found = find_best_move_cancellable(&snapshot, &moves, depth, &worker_stop)
                .or_else(|| find_random_move(&moves, &mut rand::thread_rng()));
            if worker_stop.load(Ordering::Relaxed) {
                info!("search stopped; result discarded");
                return;
            }
            *worker_slot.lock() = Slot::Finished(found);
        })
        .expect("failed to spawn search thread");

    SearchHandle {
        stop,
        slot,
        worker: Some(worker),
    }
}
