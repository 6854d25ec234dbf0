use crate::error::MoveError;

use super::board::{Board, COLS, ROWS};
use super::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    InProgress,
    Winner(Player),
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Winner(player) => Some(player),
            _ => None,
        }
    }
}

/// Outcome of `board` judged around the top disc of `last_move`.
///
/// Without a last move the whole board is scanned instead.
pub fn outcome(board: &Board, last_move: Option<usize>) -> GameOutcome {
    let winner = match last_move {
        Some(col) if col < COLS && board.height(col) > 0 => {
            let row = ROWS - board.height(col);
            board
                .get(row, col)
                .player()
                .filter(|&mover| board.check_win_at(row, col, mover))
        }
        Some(_) => None,
        None => board.winner(),
    };

    match winner {
        Some(player) => GameOutcome::Winner(player),
        None if board.valid_columns().is_empty() => GameOutcome::Draw,
        None => GameOutcome::InProgress,
    }
}

/// Drop `player`'s disc into `column`, returning the new board and its outcome.
///
/// Boards that are already won or full reject every move.
pub fn apply_move(
    board: &Board,
    column: usize,
    player: Player,
) -> Result<(Board, GameOutcome), MoveError> {
    if outcome(board, None).is_terminal() {
        return Err(MoveError::GameOver);
    }
    let mut next = *board;
    next.drop_piece(column, player)?;
    Ok((next, outcome(&next, Some(column))))
}

/// A board together with whose turn it is and how the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    last_move: Option<usize>,
    outcome: GameOutcome,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            current_player: Player::Red, // Red starts
            last_move: None,
            outcome: GameOutcome::InProgress,
        }
    }

    /// Resume from an arbitrary position with `to_move` on turn.
    pub fn from_board(board: Board, to_move: Player) -> Self {
        GameState {
            board,
            current_player: to_move,
            last_move: None,
            outcome: outcome(&board, None),
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Get list of legal columns (not full)
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.valid_columns()
    }

    /// Apply a move and return new state (immutable)
    pub fn apply_move(&self, column: usize) -> Result<GameState, MoveError> {
        let mut next = *self;
        next.apply_move_mut(column)?;
        Ok(next)
    }

    /// Apply move mutably (for UI efficiency)
    pub fn apply_move_mut(&mut self, column: usize) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        self.board.drop_piece(column, self.current_player)?;
        self.outcome = outcome(&self.board, Some(column));
        self.last_move = Some(column);
        self.current_player = self.current_player.other();

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
