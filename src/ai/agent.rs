use crate::game::{Board, Player};

/// Universal interface for computer opponents.
pub trait Agent: Send {
    /// Select a column for `player` on `board`.
    /// Returns `None` only when no column is playable.
    fn select_action(&mut self, board: &Board, player: Player) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
