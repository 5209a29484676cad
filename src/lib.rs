//! Rules engine and decision core for a two-player chess program.
//!
//! The crate maintains authoritative game state, generates fully legal
//! moves, detects terminal states, and picks moves for an automated player
//! via fixed-depth alpha-beta search. The presentation layer (rendering,
//! input, event loop) consumes this through a narrow surface: query
//! [`board::GameState::legal_moves`], submit one via
//! [`board::GameState::apply`], check [`board::GameState::status`], and
//! run [`engine::start_search`] for a cancellable background "best move"
//! computation.

pub mod board;
pub mod engine;
pub mod search;
mod zobrist;

pub use board::{
    CastleSide, CastlingRights, Color, GameState, GameStatus, Grid, Move, Piece, RulesError,
    Square,
};
