use std::path::Path;
use std::time::Duration;

use tracing::warn;

use crate::ai::{Difficulty, EvalWeights};
use crate::error::ConfigError;
use crate::game::{Player, COLS, ROWS};

/// Largest window weight; keeps every static score below the search's win scores.
const MAX_WINDOW_WEIGHT: i32 = 1_000_000;
/// Longest delay accepted before the computer replies.
const MAX_COMPUTER_DELAY_MS: u64 = 10_000;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub session: SessionConfig,
}

/// Search depth and evaluation weights for the hard tier.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_depth: usize,
    pub weights: EvalWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_depth: 6,
            weights: EvalWeights::default(),
        }
    }
}

/// Who the computer plays and how long it waits before moving.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// When false, two humans share the board.
    pub vs_computer: bool,
    pub computer: Player,
    pub difficulty: Difficulty,
    pub computer_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            vs_computer: true,
            computer: Player::Yellow,
            difficulty: Difficulty::Hard,
            computer_delay_ms: 300,
        }
    }
}

impl SessionConfig {
    /// The side the computer plays, if any.
    pub fn computer_player(&self) -> Option<Player> {
        self.vs_computer.then_some(self.computer)
    }

    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;

        if self.session.computer_delay_ms > MAX_COMPUTER_DELAY_MS {
            return Err(ConfigError::Validation(format!(
                "session.computer_delay_ms must be <= {MAX_COMPUTER_DELAY_MS}"
            )));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Validation(
                "engine.max_depth must be >= 1".into(),
            ));
        }
        if self.max_depth > ROWS * COLS {
            return Err(ConfigError::Validation(format!(
                "engine.max_depth must be <= {}",
                ROWS * COLS
            )));
        }

        let w = &self.weights;
        if w.two <= 0 || w.center < 0 {
            return Err(ConfigError::Validation(
                "engine.weights.two must be > 0 and engine.weights.center >= 0".into(),
            ));
        }
        if w.threat <= w.two {
            return Err(ConfigError::Validation(
                "engine.weights.threat must be > engine.weights.two".into(),
            ));
        }
        if w.opponent_threat < w.threat {
            return Err(ConfigError::Validation(
                "engine.weights.opponent_threat must be >= engine.weights.threat".into(),
            ));
        }
        if w.win <= w.opponent_threat {
            return Err(ConfigError::Validation(
                "engine.weights.win must be > engine.weights.opponent_threat".into(),
            ));
        }
        if w.win > MAX_WINDOW_WEIGHT || w.center > MAX_WINDOW_WEIGHT {
            return Err(ConfigError::Validation(format!(
                "engine.weights.win and engine.weights.center must be <= {MAX_WINDOW_WEIGHT}"
            )));
        }

        Ok(())
    }
}
