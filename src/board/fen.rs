//! FEN (Forsyth-Edwards Notation) parsing and formatting.
//!
//! Used by the presentation layer for position setup and heavily by the
//! test suites. A parsed position starts with an empty history and a
//! repetition count of one for itself.

use std::str::FromStr;

use super::error::FenError;
use super::grid::Grid;
use super::types::{CastleSide, CastlingRights, Color, Piece, Square};
use super::GameState;

impl GameState {
    /// Parse a FEN string.
    ///
    /// The first four fields (placement, side to move, castling rights,
    /// en-passant target) are required; the halfmove and fullmove counters
    /// are accepted but ignored.
    pub fn from_fen(fen: &str) -> Result<GameState, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let grid = parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let castling = parse_castling(parts[2])?;

        let en_passant_target = match parts[3] {
            "-" => None,
            notation => Some(Square::from_str(notation).map_err(|_| {
                FenError::InvalidEnPassant {
                    found: notation.to_string(),
                }
            })?),
        };

        Ok(GameState::from_parts(
            grid,
            side_to_move,
            castling,
            en_passant_target,
        ))
    }

    /// Format the current position as a FEN string.
    ///
    /// The halfmove counter is emitted as 0 (this engine does not track the
    /// fifty-move rule); the fullmove number is derived from the history.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                match self.grid.piece_at(Square(rank, file)) {
                    None => empty_run += 1,
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            fen.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                    }
                }
            }
            if empty_run > 0 {
                fen.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        fen.push_str(&castling_string(self.castling));

        fen.push(' ');
        match self.en_passant_target {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        let fullmove = self.played_moves().len() / 2 + 1;
        fen.push_str(&format!(" 0 {fullmove}"));

        fen
    }
}

fn parse_placement(placement: &str) -> Result<Grid, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::BadRankCount { found: ranks.len() });
    }

    let mut grid = Grid::empty();
    for (row, rank_str) in ranks.iter().enumerate() {
        // FEN lists rank 8 first
        let rank = 7 - row;
        let mut file = 0;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
            } else {
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if file >= 8 {
                    return Err(FenError::TooManyFiles { rank, files: file + 1 });
                }
                grid.set(Square(rank, file), color, piece);
                file += 1;
            }
        }
        if file > 8 {
            return Err(FenError::TooManyFiles { rank, files: file });
        }
    }

    Ok(grid)
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut castling = CastlingRights::none();
    if field == "-" {
        return Ok(castling);
    }
    for c in field.chars() {
        match c {
            'K' => castling.set(Color::White, CastleSide::KingSide),
            'Q' => castling.set(Color::White, CastleSide::QueenSide),
            'k' => castling.set(Color::Black, CastleSide::KingSide),
            'q' => castling.set(Color::Black, CastleSide::QueenSide),
            _ => return Err(FenError::InvalidCastling { char: c }),
        }
    }
    Ok(castling)
}

fn castling_string(castling: CastlingRights) -> String {
    let mut s = String::new();
    if castling.has(Color::White, CastleSide::KingSide) {
        s.push('K');
    }
    if castling.has(Color::White, CastleSide::QueenSide) {
        s.push('Q');
    }
    if castling.has(Color::Black, CastleSide::KingSide) {
        s.push('k');
    }
    if castling.has(Color::Black, CastleSide::QueenSide) {
        s.push('q');
    }
    if s.is_empty() {
        s.push('-');
    }
    s
}
