//! Unvalidated move application and reversal.
//!
//! `make_move`/`unmake_move` mutate the grid and bookkeeping directly with
//! no legality checks. They back the public `apply`/`undo` pair, the
//! legality filter's simulate-then-test loop, and the search's recursion.

use crate::zobrist::ZOBRIST;

use super::state::Snapshot;
use super::types::{CastleSide, Color, Move, Piece, Square};
use super::GameState;

/// Rook home and destination files for each castling wing.
const ROOK_FILES: [(usize, usize); 2] = [(7, 5), (0, 3)];

impl GameState {
    /// Recompute the fingerprint from scratch (initialization and FEN setup).
    pub(crate) fn calculate_initial_hash(&self) -> u64 {
        let mut hash: u64 = 0;

        for (sq, color, piece) in self.grid.occupied_squares() {
            hash ^= ZOBRIST.piece_key(piece, color, sq);
        }

        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move_key;
        }

        for color in [Color::White, Color::Black] {
            for side in [CastleSide::KingSide, CastleSide::QueenSide] {
                if self.castling.has(color, side) {
                    hash ^= ZOBRIST.castling_key(color, side);
                }
            }
        }

        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_keys[ep.file()];
        }

        hash
    }

    fn revoke_castling(&mut self, hash: &mut u64, color: Color, side: CastleSide) {
        if self.castling.has(color, side) {
            self.castling.remove(color, side);
            *hash ^= ZOBRIST.castling_key(color, side);
        }
    }

    /// Apply a generator-annotated move without validation, returning the
    /// snapshot needed to reverse it.
    pub(crate) fn make_move(&mut self, m: &Move) -> Snapshot {
        let color = self.side_to_move;
        let opponent = color.opponent();
        let mut hash = self.hash;

        let snapshot_castling = self.castling;
        let snapshot_en_passant = self.en_passant_target;
        let snapshot_hash = self.hash;

        hash ^= ZOBRIST.black_to_move_key;
        if let Some(old_ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_keys[old_ep.file()];
        }

        // Remove the captured piece. For en passant the victim sits on the
        // passed-over square: same rank as the capturer, file of the target.
        if m.is_en_passant {
            let victim_sq = Square(m.from.rank(), m.to.file());
            let (victim_color, victim) = self
                .grid
                .clear(victim_sq)
                .expect("en passant without a pawn to capture");
            hash ^= ZOBRIST.piece_key(victim, victim_color, victim_sq);
        } else if let Some((victim_color, victim)) = self.grid.piece_at(m.to) {
            self.grid.clear(m.to);
            hash ^= ZOBRIST.piece_key(victim, victim_color, m.to);
        }

        // Move the piece, promoting if requested.
        self.grid.clear(m.from);
        hash ^= ZOBRIST.piece_key(m.piece, color, m.from);
        let placed = m.promotion.unwrap_or(m.piece);
        self.grid.set(m.to, color, placed);
        hash ^= ZOBRIST.piece_key(placed, color, m.to);

        // Castling also transfers the rook.
        if let Some(side) = m.castle {
            let (rook_from_file, rook_to_file) = ROOK_FILES[side.index()];
            let rank = color.back_rank();
            let rook_from = Square(rank, rook_from_file);
            let rook_to = Square(rank, rook_to_file);
            self.grid.move_piece(rook_from, rook_to);
            hash ^= ZOBRIST.piece_key(Piece::Rook, color, rook_from);
            hash ^= ZOBRIST.piece_key(Piece::Rook, color, rook_to);
        }

        // En-passant target lives for exactly one ply.
        self.en_passant_target = None;
        if m.is_double_pawn_push {
            let ep_rank = usize::midpoint(m.from.rank(), m.to.rank());
            let ep_sq = Square(ep_rank, m.from.file());
            self.en_passant_target = Some(ep_sq);
            hash ^= ZOBRIST.en_passant_keys[ep_sq.file()];
        }

        // Castling rights: revoked permanently on king move, rook move from
        // its home corner, or rook capture on its home corner.
        if m.piece == Piece::King {
            self.revoke_castling(&mut hash, color, CastleSide::KingSide);
            self.revoke_castling(&mut hash, color, CastleSide::QueenSide);
        } else if m.piece == Piece::Rook {
            let rank = color.back_rank();
            if m.from == Square(rank, 0) {
                self.revoke_castling(&mut hash, color, CastleSide::QueenSide);
            } else if m.from == Square(rank, 7) {
                self.revoke_castling(&mut hash, color, CastleSide::KingSide);
            }
        }
        if m.captured == Some(Piece::Rook) && !m.is_en_passant {
            let rank = opponent.back_rank();
            if m.to == Square(rank, 0) {
                self.revoke_castling(&mut hash, opponent, CastleSide::QueenSide);
            } else if m.to == Square(rank, 7) {
                self.revoke_castling(&mut hash, opponent, CastleSide::KingSide);
            }
        }

        self.side_to_move = opponent;
        self.hash = hash;

        let repetition_count = self.repetitions.get(hash);
        self.repetitions.increment(hash);

        Snapshot {
            castling: snapshot_castling,
            en_passant_target: snapshot_en_passant,
            hash: snapshot_hash,
            repetition_count,
        }
    }

    /// Reverse the most recent `make_move`, restoring the snapshot verbatim.
    pub(crate) fn unmake_move(&mut self, m: &Move, snapshot: Snapshot) {
        self.repetitions.set(self.hash, snapshot.repetition_count);

        self.side_to_move = self.side_to_move.opponent();
        let color = self.side_to_move;

        self.castling = snapshot.castling;
        self.en_passant_target = snapshot.en_passant_target;
        self.hash = snapshot.hash;

        // Put the mover back (un-promoting to the original pawn).
        self.grid.clear(m.to);
        self.grid.set(m.from, color, m.piece);

        // Restore the captured piece, if any.
        if m.is_en_passant {
            let victim_sq = Square(m.from.rank(), m.to.file());
            self.grid.set(victim_sq, color.opponent(), Piece::Pawn);
        } else if let Some(victim) = m.captured {
            self.grid.set(m.to, color.opponent(), victim);
        }

        // Walk the rook home after castling.
        if let Some(side) = m.castle {
            let (rook_from_file, rook_to_file) = ROOK_FILES[side.index()];
            let rank = color.back_rank();
            self.grid
                .move_piece(Square(rank, rook_to_file), Square(rank, rook_from_file));
        }
    }
}
