//! Difficulty levels and their cadences.

use crate::error::ParseDifficultyError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

/// Difficulty level. Each one maps to two independent cadences: how often the
/// loop polls input and repaints, and how often the snake actually moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Easy.
    Easy,

    /// Medium.
    Medium,

    /// Hard.
    Hard,
}

impl Difficulty {
    /// Delay between two loop ticks.
    pub fn tick_interval(self) -> Duration {
        Duration::from_millis(match self {
            Self::Easy => 100,
            Self::Medium => 50,
            Self::Hard => 30,
        })
    }

    /// Minimum delay between two snake moves.
    pub fn move_interval(self) -> Duration {
        Duration::from_millis(match self {
            Self::Easy => 200,
            Self::Medium => 250,
            Self::Hard => 300,
        })
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lower_case = format!("{:?}", self).to_lowercase();
        write!(f, "{}", lower_case)
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseDifficultyError),
        }
    }
}
