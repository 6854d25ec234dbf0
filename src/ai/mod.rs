//! Computer opponents: the window heuristic, alpha-beta search, and the
//! difficulty tiers built on top of them.

mod agent;
mod difficulty;
mod heuristic;
mod random;
mod search;
mod tactical;

pub use agent::Agent;
pub use difficulty::{computer_agent, Difficulty};
pub use heuristic::{EvalWeights, Heuristic, WindowHeuristic};
pub use random::RandomAgent;
pub use search::{
    find_double_threat, find_winning_move, winning_columns, SearchEngine, SearchResult,
    SearchStats, BLOCK_SCORE, DOUBLE_THREAT_SCORE, WIN_SCORE,
};
pub use tactical::{SearchAgent, TacticalAgent};
