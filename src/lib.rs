//! # Connect Four
//!
//! A Connect Four rules engine with a computer opponent at three difficulty
//! tiers. The hard tier runs a depth-limited minimax search with alpha-beta
//! pruning over a window-counting heuristic.
//!
//! ## Modules
//!
//! - [`game`] — Board, players, win detection, and move application
//! - [`ai`] — Heuristic, search engine, difficulty tiers
//! - [`engine`] — Facade used by front ends
//! - [`session`] — A running game with a deferred, cancellable computer move
//! - [`arena`] — Computer-vs-computer series and their statistics
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod session;

pub use engine::Engine;
pub use error::MoveError;
