use std::fmt;
use std::str::FromStr;

use crate::config::EngineConfig;

use super::agent::Agent;
use super::random::RandomAgent;
use super::search::SearchEngine;
use super::tactical::{SearchAgent, TacticalAgent};

/// Strength tiers for the computer opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random legal column.
    Easy,
    /// Immediate win, else immediate block, else random.
    Medium,
    /// Alpha-beta search to the configured depth.
    #[default]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown difficulty '{s}' (expected 'easy', 'medium', or 'hard')")
            })
    }
}

/// Build the move-selection policy for `difficulty`.
///
/// `seed` makes the random choices reproducible; `None` draws from the OS.
pub fn computer_agent(
    difficulty: Difficulty,
    config: &EngineConfig,
    seed: Option<u64>,
) -> Box<dyn Agent> {
    match difficulty {
        Difficulty::Easy => Box::new(RandomAgent::with_seed(seed)),
        Difficulty::Medium => Box::new(TacticalAgent::new(seed)),
        Difficulty::Hard => Box::new(SearchAgent::new(
            SearchEngine::with_weights(config.weights),
            config.max_depth,
            seed,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Player};

    #[test]
    fn parse_and_display() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.to_string().parse::<Difficulty>(), Ok(difficulty));
        }
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn agent_per_difficulty() {
        let config = EngineConfig::default();
        let names: Vec<String> = Difficulty::ALL
            .into_iter()
            .map(|d| computer_agent(d, &config, Some(0)).name().to_string())
            .collect();
        assert_eq!(names, vec!["Random", "Tactical", "Minimax"]);
    }

    #[test]
    fn every_tier_takes_an_obvious_block_or_plays_legally() {
        let board: Board = ".......\n.......\n.......\n.......\n.......\nYYY...."
            .parse()
            .unwrap();
        let config = EngineConfig {
            max_depth: 3,
            ..EngineConfig::default()
        };
        for difficulty in Difficulty::ALL {
            let mut agent = computer_agent(difficulty, &config, Some(5));
            let col = agent.select_action(&board, Player::Red).unwrap();
            assert!(board.is_valid_column(col));
            if difficulty != Difficulty::Easy {
                assert_eq!(col, 3, "{difficulty} should block");
            }
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            difficulty: Difficulty,
        }
        let parsed: Wrapper = toml::from_str("difficulty = \"medium\"").unwrap();
        assert_eq!(parsed.difficulty, Difficulty::Medium);
    }
}
