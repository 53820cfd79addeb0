//! Game configuration

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{validate_size, GameError, ParseFirstMoverError, MIN_BOARD_SIZE};

/// Who places the first mark of each game
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstMover {
    #[default]
    Player,
    Opponent,
    /// Coin flip, re-rolled on every new game
    Random,
}

impl FirstMover {
    pub const ALL: [FirstMover; 3] = [FirstMover::Player, FirstMover::Opponent, FirstMover::Random];

    pub fn as_str(self) -> &'static str {
        match self {
            FirstMover::Player => "player",
            FirstMover::Opponent => "opponent",
            FirstMover::Random => "random",
        }
    }
}

impl fmt::Display for FirstMover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FirstMover {
    type Err = ParseFirstMoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        FirstMover::ALL
            .into_iter()
            .find(|m| m.as_str() == lowered)
            .ok_or_else(|| ParseFirstMoverError {
                input: s.to_string(),
            })
    }
}

/// Settings for one game session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board edge length
    pub size: usize,
    pub first_mover: FirstMover,
    /// Seed for the first-mover coin flip (entropy when absent)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: MIN_BOARD_SIZE,
            first_mover: FirstMover::Player,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn with_first_mover(mut self, first_mover: FirstMover) -> Self {
        self.first_mover = first_mover;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        validate_size(self.size).map(|_| ())
    }

    /// Load and validate a JSON config; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}
