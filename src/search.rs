//! Adversarial tree search: negamax with alpha-beta pruning.
//!
//! The search runs to a fixed ply depth over a private copy of the game
//! state, applying and undoing moves internally; it never touches the
//! caller's live state. Move ordering tries captures first (most valuable
//! victim, least valuable attacker), and ties at the root break towards
//! the first move found under that ordering, so results are deterministic
//! for a given input.

use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::eval::evaluate_relative;
use crate::board::{GameState, Move};

/// Magnitude of a checkmate score. Mates found closer to the root score
/// higher, so the search prefers the shortest mate available.
pub const MATE_SCORE: i32 = 100_000;

const INFINITY: i32 = 2 * MATE_SCORE;

/// Find the best move for the side to move, searching `depth` plies.
///
/// Returns `None` exactly when `moves` is empty. A depth of zero
/// degenerates to a one-ply comparison of static evaluations. Repeated
/// invocations on the same state return the same move.
#[must_use]
pub fn find_best_move(state: &GameState, moves: &[Move], depth: u32) -> Option<Move> {
    let stop = AtomicBool::new(false);
    find_best_move_cancellable(state, moves, depth, &stop)
}

/// [`find_best_move`] with a cooperative stop flag, checked at every node.
///
/// Returns `None` when stopped before completion; a stopped search yields
/// no partial result.
#[must_use]
pub fn find_best_move_cancellable(
    state: &GameState,
    moves: &[Move],
    depth: u32,
    stop: &AtomicBool,
) -> Option<Move> {
    if moves.is_empty() {
        return None;
    }

    let mut ordered = moves.to_vec();
    order_moves(&mut ordered);

    let mut scratch = state.clone();
    let mut nodes: u64 = 0;
    let mut best_move = None;
    let mut best_score = -INFINITY;
    let mut alpha = -INFINITY;

    for mv in &ordered {
        if stop.load(Ordering::Relaxed) {
            return None;
        }
        let snapshot = scratch.make_move(mv);
        let score = -negamax(
            &mut scratch,
            depth.saturating_sub(1),
            1,
            -INFINITY,
            -alpha,
            stop,
            &mut nodes,
        );
        scratch.unmake_move(mv, snapshot);

        if score > best_score {
            best_score = score;
            best_move = Some(*mv);
        }
        if best_score > alpha {
            alpha = best_score;
        }
    }

    if stop.load(Ordering::Relaxed) {
        return None;
    }

    debug!(
        "searched {nodes} nodes at depth {depth}: best {} (score {best_score})",
        best_move.map_or_else(|| "-".to_string(), |m| m.to_string()),
    );
    best_move
}

/// Pick a uniform-random legal move; the fallback for cancelled searches.
#[must_use]
pub fn find_random_move<R: Rng>(moves: &[Move], rng: &mut R) -> Option<Move> {
    moves.choose(rng).copied()
}

fn negamax(
    state: &mut GameState,
    depth: u32,
    ply: i32,
    mut alpha: i32,
    beta: i32,
    stop: &AtomicBool,
    nodes: &mut u64,
) -> i32 {
    *nodes += 1;
    if stop.load(Ordering::Relaxed) {
        return 0;
    }

    // Repetition draws mid-search score as neutral.
    if state.repetition_count() >= 3 {
        return 0;
    }

    let mut moves = state.legal_moves();
    if moves.is_empty() {
        // Checkmate or stalemate reached mid-search is a score, not an error.
        return if state.in_check(state.side_to_move()) {
            -(MATE_SCORE - ply)
        } else {
            0
        };
    }

    if depth == 0 {
        return evaluate_relative(state);
    }

    order_moves(&mut moves);

    let mut best = -INFINITY;
    for mv in &moves {
        let snapshot = state.make_move(mv);
        let score = -negamax(state, depth - 1, ply + 1, -beta, -alpha, stop, nodes);
        state.unmake_move(mv, snapshot);

        if score > best {
            best = score;
        }
        if best > alpha {
            alpha = best;
        }
        if alpha >= beta {
            break;
        }
    }
    best
}

/// Order captures first by victim-minus-attacker value, promotions next.
/// The sort is stable, preserving generation order among equal keys.
fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|mv| {
        let mut score = 0;
        if let Some(victim) = mv.captured {
            score += 10 * victim.value() - mv.piece.value();
        }
        if let Some(promo) = mv.promotion {
            score += promo.value();
        }
        std::cmp::Reverse(score)
    });
}
