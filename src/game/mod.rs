//! Core Connect Four game logic: board representation, player types, and the
//! rules engine with immutable transitions.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, COLS, ROWS, WIN_LENGTH};
pub use player::Player;
pub use state::{apply_move, outcome, GameOutcome, GameState};

/// An empty board of the fixed dimensions.
pub fn new_game() -> Board {
    Board::new()
}
