//! Game state: board, side to move, rights, history, and repetition counts.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::RulesError;
use super::grid::Grid;
use super::types::{CastlingRights, Color, Move, Piece, Square};

/// Terminal-status classification of a position.
///
/// Exactly one variant holds at any time. Checkmate and stalemate both
/// require an empty legal-move set and are distinguished by whether the
/// side to move is in check; threefold repetition is independent of
/// legal-move emptiness.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    ThreefoldRepetition,
}

/// Multiset of position fingerprints, for threefold-repetition detection.
#[derive(Clone, Debug)]
pub(crate) struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub(crate) fn new() -> Self {
        RepetitionTable {
            counts: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, hash: u64, count: u32) {
        if count == 0 {
            self.counts.remove(&hash);
        } else {
            self.counts.insert(hash, count);
        }
    }

    pub(crate) fn increment(&mut self, hash: u64) -> u32 {
        let next = self.get(hash).saturating_add(1);
        self.set(hash, next);
        next
    }
}

/// Full prior-state snapshot stored per history entry.
///
/// `undo` restores these fields verbatim rather than inverting each change
/// algebraically; piece placement is reversed from the move itself.
#[derive(Clone, Debug)]
pub(crate) struct Snapshot {
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) hash: u64,
    /// Repetition count of the post-move fingerprint before it was incremented.
    pub(crate) repetition_count: u32,
}

#[derive(Clone, Debug)]
struct HistoryEntry {
    mv: Move,
    snapshot: Snapshot,
}

/// Authoritative chess game state.
///
/// Owns the board grid, side to move, castling rights, en-passant target,
/// the append-only move log, and the repetition multiset. Mutated only by
/// [`apply`](GameState::apply) and [`undo`](GameState::undo); `Clone`
/// produces a deep, independent copy suitable as a search snapshot.
///
/// # Example
/// ```
/// use chessmate::board::GameState;
///
/// let state = GameState::new();
/// let moves = state.legal_moves();
/// assert_eq!(moves.len(), 20);
/// ```
#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) grid: Grid,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) hash: u64,
    history: Vec<HistoryEntry>,
    pub(crate) repetitions: RepetitionTable,
}

impl GameState {
    /// The standard initial position: White to move, full castling rights,
    /// no en passant, empty history.
    #[must_use]
    pub fn new() -> Self {
        let mut grid = Grid::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.iter().enumerate() {
            grid.set(Square(0, file), Color::White, *piece);
            grid.set(Square(1, file), Color::White, Piece::Pawn);
            grid.set(Square(6, file), Color::Black, Piece::Pawn);
            grid.set(Square(7, file), Color::Black, *piece);
        }

        let mut state = GameState {
            grid,
            side_to_move: Color::White,
            castling: CastlingRights::all(),
            en_passant_target: None,
            hash: 0,
            history: Vec::new(),
            repetitions: RepetitionTable::new(),
        };
        state.hash = state.calculate_initial_hash();
        state.repetitions.set(state.hash, 1);
        state
    }

    /// Build a state from raw components (used by FEN parsing).
    pub(crate) fn from_parts(
        grid: Grid,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant_target: Option<Square>,
    ) -> Self {
        let mut state = GameState {
            grid,
            side_to_move,
            castling,
            en_passant_target,
            hash: 0,
            history: Vec::new(),
            repetitions: RepetitionTable::new(),
        };
        state.hash = state.calculate_initial_hash();
        state.repetitions.set(state.hash, 1);
        state
    }

    /// The board grid.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Occupant of a square, if any.
    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.grid.piece_at(sq)
    }

    /// The side to move.
    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Current castling rights.
    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// The en-passant target square, valid only for the ply immediately
    /// following a two-square pawn advance.
    #[inline]
    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// The position fingerprint of the current position.
    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Moves applied so far, oldest first.
    pub fn played_moves(&self) -> impl ExactSizeIterator<Item = &Move> {
        self.history.iter().map(|entry| &entry.mv)
    }

    /// How many times the current position has occurred.
    #[must_use]
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.get(self.hash)
    }

    /// Classify the current position.
    ///
    /// Derived lazily from the legal-move set: empty set means checkmate or
    /// stalemate depending on whether the king is attacked; otherwise a
    /// third occurrence of the current fingerprint is a repetition draw.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.legal_moves().is_empty() {
            if self.in_check(self.side_to_move) {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            }
        } else if self.repetition_count() >= 3 {
            GameStatus::ThreefoldRepetition
        } else {
            GameStatus::Ongoing
        }
    }

    /// Apply a legal move, updating board, rights, en-passant target,
    /// history, and repetition counts, and flipping the side to move.
    ///
    /// The submitted move is matched against the current legal set by
    /// `(from, to, promotion)` and replaced with the generator's annotated
    /// equivalent, so bare user-input moves gain their en-passant and
    /// capture metadata here. Fails with [`RulesError::GameOver`] on a
    /// terminal position and [`RulesError::InvalidMove`] when the move is
    /// not in the legal set; nothing is mutated on failure.
    pub fn apply(&mut self, mv: Move) -> Result<(), RulesError> {
        let legal = self.legal_moves();
        if legal.is_empty() || self.repetition_count() >= 3 {
            return Err(RulesError::GameOver {
                status: self.status(),
            });
        }
        let canonical = *legal
            .iter()
            .find(|candidate| **candidate == mv)
            .ok_or(RulesError::InvalidMove { mv })?;

        let snapshot = self.make_move(&canonical);
        self.history.push(HistoryEntry {
            mv: canonical,
            snapshot,
        });
        Ok(())
    }

    /// Undo the most recent applied move, restoring board, rights,
    /// en-passant target, side to move, and repetition counts to exactly
    /// the prior snapshot. No-op if the history is empty.
    pub fn undo(&mut self) {
        if let Some(entry) = self.history.pop() {
            self.unmake_move(&entry.mv, entry.snapshot);
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}
