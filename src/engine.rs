use crate::ai::{computer_agent, Agent, Difficulty};
use crate::config::EngineConfig;
use crate::error::{ConfigError, MoveError};
use crate::game::{self, Board, GameOutcome, Player};

/// Entry point for a front end: create boards, apply moves, ask the computer
/// for a column.
pub struct Engine {
    config: EngineConfig,
    /// One agent per [`Difficulty`], in `Difficulty::ALL` order.
    agents: Vec<Box<dyn Agent>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::build(config, None)
    }

    /// Like [`Engine::new`], but rejects a config that fails validation.
    pub fn try_new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Engine whose random choices are reproducible.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::build(config, Some(seed))
    }

    fn build(config: EngineConfig, seed: Option<u64>) -> Self {
        let agents = Difficulty::ALL
            .iter()
            .zip(0u64..)
            .map(|(&difficulty, offset)| {
                computer_agent(difficulty, &config, seed.map(|s| s.wrapping_add(offset)))
            })
            .collect();
        Engine { config, agents }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn new_game(&self) -> Board {
        game::new_game()
    }

    pub fn apply_move(
        &self,
        board: &Board,
        column: usize,
        player: Player,
    ) -> Result<(Board, GameOutcome), MoveError> {
        game::apply_move(board, column, player)
    }

    /// Column the computer plays as `player` at `difficulty`.
    /// `None` only when the board has no playable column.
    pub fn compute_computer_move(
        &mut self,
        board: &Board,
        difficulty: Difficulty,
        player: Player,
    ) -> Option<usize> {
        let index = Difficulty::ALL.iter().position(|&d| d == difficulty)?;
        self.agents.get_mut(index)?.select_action(board, player)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> EngineConfig {
        EngineConfig {
            max_depth: 4,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn new_game_is_empty() {
        let engine = Engine::default();
        assert_eq!(engine.new_game(), Board::new());
        assert_eq!(*engine.config(), EngineConfig::default());
    }

    #[test]
    fn try_new_validates_config() {
        let engine = Engine::try_new(quick_config()).unwrap();
        assert_eq!(engine.config().max_depth, 4);

        let mut config = EngineConfig::default();
        config.weights.win = i32::MAX / 2;
        assert!(matches!(
            Engine::try_new(config),
            Err(ConfigError::Validation(_))
        ));
        config = EngineConfig {
            max_depth: 0,
            ..EngineConfig::default()
        };
        assert!(Engine::try_new(config).is_err());
    }

    #[test]
    fn unchecked_weights_still_produce_a_move() {
        let mut config = quick_config();
        config.weights.win = i32::MAX / 2;
        config.weights.center = i32::MAX / 2;
        let mut engine = Engine::with_seed(config, 5);
        let board: Board = ".......\n.......\n.......\n...Y...\n...R...\nRRYYR.."
            .parse()
            .unwrap();
        let col = engine
            .compute_computer_move(&board, Difficulty::Hard, Player::Red)
            .unwrap();
        assert!(board.is_valid_column(col));
    }

    #[test]
    fn apply_move_reports_outcome() {
        let engine = Engine::default();
        let mut board = engine.new_game();
        for col in 0..3 {
            let (next, outcome) = engine.apply_move(&board, col, Player::Red).unwrap();
            assert_eq!(outcome, GameOutcome::InProgress);
            board = next;
        }
        let (_, outcome) = engine.apply_move(&board, 3, Player::Red).unwrap();
        assert_eq!(outcome, GameOutcome::Winner(Player::Red));
        assert_eq!(
            engine.apply_move(&board, 9, Player::Red),
            Err(MoveError::InvalidColumn(9))
        );
    }

    #[test]
    fn computer_plays_a_full_game_against_itself() {
        let mut engine = Engine::with_seed(quick_config(), 17);
        let mut board = engine.new_game();
        let mut player = Player::Red;
        let mut outcome = GameOutcome::InProgress;
        while outcome == GameOutcome::InProgress {
            let difficulty = if player == Player::Red {
                Difficulty::Hard
            } else {
                Difficulty::Medium
            };
            let col = engine
                .compute_computer_move(&board, difficulty, player)
                .unwrap();
            (board, outcome) = engine.apply_move(&board, col, player).unwrap();
            player = player.other();
        }
        assert!(outcome.is_terminal());
    }

    #[test]
    fn hard_takes_the_win() {
        let mut engine = Engine::with_seed(quick_config(), 1);
        let board: Board = ".......\n.......\n.......\n.......\nYYY....\nRRR...."
            .parse()
            .unwrap();
        assert_eq!(
            engine.compute_computer_move(&board, Difficulty::Hard, Player::Red),
            Some(3)
        );
    }

    #[test]
    fn seeded_engines_agree() {
        let board = Board::new();
        let mut a = Engine::with_seed(quick_config(), 99);
        let mut b = Engine::with_seed(quick_config(), 99);
        for _ in 0..10 {
            assert_eq!(
                a.compute_computer_move(&board, Difficulty::Easy, Player::Red),
                b.compute_computer_move(&board, Difficulty::Easy, Player::Red)
            );
        }
    }
}
