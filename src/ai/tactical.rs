use rand::rngs::StdRng;

use crate::game::{Board, Player};

use super::agent::Agent;
use super::random::{make_rng, random_column};
use super::search::{find_winning_move, SearchEngine};

/// One-ply agent: wins if it can, blocks if it must, otherwise plays at random.
pub struct TacticalAgent {
    rng: StdRng,
}

impl TacticalAgent {
    pub fn new(seed: Option<u64>) -> Self {
        TacticalAgent {
            rng: make_rng(seed),
        }
    }
}

impl Agent for TacticalAgent {
    fn select_action(&mut self, board: &Board, player: Player) -> Option<usize> {
        find_winning_move(board, player)
            .or_else(|| find_winning_move(board, player.other()))
            .or_else(|| random_column(&mut self.rng, board))
    }

    fn name(&self) -> &str {
        "Tactical"
    }
}

/// Full minimax agent backed by a [`SearchEngine`].
pub struct SearchAgent {
    engine: SearchEngine,
    depth: usize,
    rng: StdRng,
}

impl SearchAgent {
    pub fn new(engine: SearchEngine, depth: usize, seed: Option<u64>) -> Self {
        SearchAgent {
            engine,
            depth,
            rng: make_rng(seed),
        }
    }
}

impl Agent for SearchAgent {
    fn select_action(&mut self, board: &Board, player: Player) -> Option<usize> {
        self.engine
            .best_move(board, self.depth, player)
            .column
            .filter(|&col| board.is_valid_column(col))
            .or_else(|| random_column(&mut self.rng, board))
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}
