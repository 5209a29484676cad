//! Background search worker.
//!
//! The automated player's "thinking" runs in an isolated, cancellable unit
//! of work so the caller's event loop stays responsive: a worker thread
//! searches a deep-copied snapshot and posts its move through a
//! single-slot result channel.

mod controller;

pub use controller::{start_search, SearchHandle, SearchPoll};
