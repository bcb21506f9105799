//! Match configuration.

use super::constants::*;
use crate::arena::types::Difficulty;
use std::fmt;
use std::str::FromStr;

/// Play mode chosen at match start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Single,
    Ai(Difficulty),
    Multiplayer,
}

impl GameMode {
    pub fn has_ai(&self) -> bool {
        matches!(self, Self::Ai(_))
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "ai-easy" => Ok(Self::Ai(Difficulty::Easy)),
            "ai-normal" | "ai" => Ok(Self::Ai(Difficulty::Normal)),
            "ai-hard" => Ok(Self::Ai(Difficulty::Hard)),
            "mp" | "multiplayer" => Ok(Self::Multiplayer),
            other => Err(format!(
                "unknown mode '{other}' (expected single, ai-easy, ai-normal, ai-hard, mp)"
            )),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Ai(difficulty) => write!(f, "ai-{}", difficulty.tag()),
            Self::Multiplayer => write!(f, "mp"),
        }
    }
}

/// Configuration for one match.
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// Width and height of the square grid
    pub grid_size: i16,

    /// Interval at score 0 with no boost (ms)
    pub base_tick_ms: u64,

    /// Fastest allowed interval (ms)
    pub min_tick_ms: u64,

    /// Slowest allowed interval (ms)
    pub max_tick_ms: u64,

    /// Wall-clock period of the special food roll (ms)
    pub special_spawn_period_ms: u64,

    /// Chance that a special spawn roll succeeds
    pub special_spawn_chance: f64,

    /// Match length shown as a countdown; never ends the match
    pub game_duration_ms: u64,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            base_tick_ms: BASE_TICK_MS,
            min_tick_ms: MIN_TICK_MS,
            max_tick_ms: MAX_TICK_MS,
            special_spawn_period_ms: SPECIAL_SPAWN_PERIOD_MS,
            special_spawn_chance: SPECIAL_SPAWN_CHANCE,
            game_duration_ms: GAME_DURATION_MS,
            seed: None,
        }
    }
}

impl ArenaConfig {
    /// Seeded config for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Default rules on a board of `grid_size` cells, for headless runs
    pub fn compact(grid_size: i16) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }
}
