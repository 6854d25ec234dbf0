use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{Board, Player};

use super::agent::Agent;

/// Seeded generator when `seed` is given, OS entropy otherwise.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Uniform choice among the board's valid columns.
pub(crate) fn random_column(rng: &mut StdRng, board: &Board) -> Option<usize> {
    let columns = board.valid_columns();
    if columns.is_empty() {
        return None;
    }
    Some(columns[rng.random_range(0..columns.len())])
}

/// An agent that selects uniformly at random from legal actions.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::with_seed(None)
    }

    pub fn with_seed(seed: Option<u64>) -> Self {
        RandomAgent {
            rng: make_rng(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, board: &Board, _player: Player) -> Option<usize> {
        random_column(&mut self.rng, board)
    }

    fn name(&self) -> &str {
        "Random"
    }
}
