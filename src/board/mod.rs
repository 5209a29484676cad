//! Chess board representation and game rules.
//!
//! A mailbox 8×8 grid with full rules support: castling, en passant,
//! promotion, check-safe legal move generation, and terminal-state
//! detection (checkmate, stalemate, threefold repetition).
//!
//! # Example
//! ```
//! use chessmate::board::{GameState, GameStatus};
//!
//! let mut state = GameState::new();
//! let moves = state.legal_moves();
//! state.apply(moves[0]).unwrap();
//! assert_eq!(state.status(), GameStatus::Ongoing);
//! state.undo();
//! ```

mod error;
pub(crate) mod eval;
mod fen;
mod grid;
mod make_unmake;
mod movegen;
mod san;
mod state;
mod types;


pub use error::{FenError, RulesError, SquareError};
pub use eval::evaluate;
pub use grid::Grid;
pub use state::{GameState, GameStatus};
pub use types::{CastleSide, CastlingRights, Color, Move, Piece, Square};
