//! Events produced by a tick.
//!
//! The presentation layer maps these to status lines and effects; the
//! simulation never touches UI types directly.

use super::food::FoodKind;
use super::snake::SnakeId;
use super::types::Cell;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeathCause {
    /// Head left the grid.
    Wall,
    /// Head ran into the snake's own body.
    #[serde(rename = "self")]
    SelfBite,
    /// Two heads landed on the same cell.
    Mutual,
    /// Head ran into another snake's body.
    Collision,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Wall => "wall",
            Self::SelfBite => "self",
            Self::Mutual => "mutual",
            Self::Collision => "collision",
        };
        f.write_str(label)
    }
}

/// One snake transitioning from alive to dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Death {
    pub id: SnakeId,
    pub cause: DeathCause,
}

/// Why the match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeCause {
    PlayerDied,
    AiDied,
    BothDied,
}

impl OutcomeCause {
    pub fn message(&self) -> &'static str {
        match self {
            Self::PlayerDied => "player died",
            Self::AiDied => "ai died",
            Self::BothDied => "both died",
        }
    }
}

/// Terminal outcome handed to the UI exactly once per match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub cause: OutcomeCause,
    pub final_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TickEvent {
    FoodEaten {
        by: SnakeId,
        kind: FoodKind,
        at: Cell,
    },
    FoodSpawned {
        kind: FoodKind,
        at: Cell,
    },
    SnakeDied(Death),
    MatchOver(MatchOutcome),
}
