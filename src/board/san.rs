//! Standard algebraic notation rendering.
//!
//! Examples: "e4", "Nf3", "Bxc6+", "O-O", "e8=Q#".

use super::types::{CastleSide, Move, Piece};
use super::GameState;

impl GameState {
    /// Render a move in standard algebraic notation against this position.
    ///
    /// Includes piece letter, file/rank disambiguation, the capture marker,
    /// promotion suffix, and a '+'/'#' check/checkmate suffix.
    #[must_use]
    pub fn move_to_san(&self, mv: &Move) -> String {
        let mut san = String::new();

        match mv.castle {
            Some(CastleSide::KingSide) => san.push_str("O-O"),
            Some(CastleSide::QueenSide) => san.push_str("O-O-O"),
            None => {
                if mv.piece == Piece::Pawn {
                    if mv.is_capture() {
                        san.push((b'a' + mv.from.file() as u8) as char);
                    }
                } else {
                    san.push(mv.piece.to_char().to_ascii_uppercase());
                    let (needs_file, needs_rank) = self.needs_disambiguation(mv);
                    if needs_file {
                        san.push((b'a' + mv.from.file() as u8) as char);
                    }
                    if needs_rank {
                        san.push((b'1' + mv.from.rank() as u8) as char);
                    }
                }

                if mv.is_capture() {
                    san.push('x');
                }

                san.push_str(&mv.to.to_string());

                if let Some(promo) = mv.promotion {
                    san.push('=');
                    san.push(promo.to_char().to_ascii_uppercase());
                }
            }
        }

        // Check/mate suffix comes from simulating the move.
        let mut after = self.clone();
        after.make_move(mv);
        if after.in_check(after.side_to_move()) {
            if after.legal_moves().is_empty() {
                san.push('#');
            } else {
                san.push('+');
            }
        }

        san
    }

    /// Whether other same-kind pieces can also reach the destination, and
    /// if so which coordinate resolves the ambiguity. Returns
    /// (`needs_file`, `needs_rank`).
    fn needs_disambiguation(&self, mv: &Move) -> (bool, bool) {
        let rivals: Vec<Move> = self
            .legal_moves()
            .into_iter()
            .filter(|m| {
                m.to == mv.to
                    && m.piece == mv.piece
                    && m.from != mv.from
                    && m.promotion == mv.promotion
            })
            .collect();

        if rivals.is_empty() {
            return (false, false);
        }

        let shares_file = rivals.iter().any(|m| m.from.file() == mv.from.file());
        let shares_rank = rivals.iter().any(|m| m.from.rank() == mv.from.rank());

        match (shares_file, shares_rank) {
            (false, _) => (true, false),
            (true, false) => (false, true),
            (true, true) => (true, true),
        }
    }
}
