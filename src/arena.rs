//! Computer-vs-computer series between two difficulty tiers.

use crate::ai::Difficulty;
use crate::engine::Engine;
use crate::game::{GameOutcome, GameState, Player};

/// Result of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord {
    pub winner: Option<Player>,
    pub game_length: usize,
}

/// Running tally over a series of games.
#[derive(Debug, Clone, Default)]
pub struct MatchStats {
    games: Vec<GameRecord>,
}

impl MatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: GameRecord) {
        self.games.push(record);
    }

    pub fn total_games(&self) -> usize {
        self.games.len()
    }

    pub fn wins(&self, player: Player) -> usize {
        self.games
            .iter()
            .filter(|r| r.winner == Some(player))
            .count()
    }

    pub fn draws(&self) -> usize {
        self.games.iter().filter(|r| r.winner.is_none()).count()
    }

    /// Fraction of games won by `player`.
    pub fn win_rate(&self, player: Player) -> f32 {
        if self.games.is_empty() {
            return 0.0;
        }
        self.wins(player) as f32 / self.games.len() as f32
    }

    pub fn average_game_length(&self) -> f32 {
        if self.games.is_empty() {
            return 0.0;
        }
        let total: usize = self.games.iter().map(|r| r.game_length).sum();
        total as f32 / self.games.len() as f32
    }
}

/// Play one game to completion, Red at `red` and Yellow at `yellow`.
pub fn play_game(engine: &mut Engine, red: Difficulty, yellow: Difficulty) -> GameRecord {
    let mut state = GameState::initial();
    let mut game_length = 0;

    while !state.is_terminal() {
        let player = state.current_player();
        let difficulty = match player {
            Player::Red => red,
            Player::Yellow => yellow,
        };
        let Some(column) = engine.compute_computer_move(state.board(), difficulty, player) else {
            break;
        };
        if state.apply_move_mut(column).is_err() {
            break;
        }
        game_length += 1;
    }

    GameRecord {
        winner: match state.outcome() {
            GameOutcome::Winner(player) => Some(player),
            _ => None,
        },
        game_length,
    }
}
