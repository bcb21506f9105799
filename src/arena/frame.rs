//! Per-tick render projection handed to the presentation layer.

use super::events::{MatchOutcome, TickEvent};
use super::food::Food;
use super::types::Cell;
use serde::Serialize;

/// What a renderer may show of one snake.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeView {
    pub name: String,
    pub color: String,
    /// Visible segments only; an invisible snake's tail is already removed.
    pub body: Vec<Cell>,
    pub alive: bool,
    pub invisible: bool,
    pub score: u32,
    /// True for the snake the local player controls.
    pub local: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub grid_size: i16,
    pub tick: u64,
    pub score: u32,
    pub game_time_ms: u64,
    /// Countdown derived from the configured duration; display only.
    pub time_remaining_ms: Option<u64>,
    pub tick_interval_ms: u64,
    pub slowed: bool,
    pub snakes: Vec<SnakeView>,
    pub foods: Vec<Food>,
    pub events: Vec<TickEvent>,
    pub outcome: Option<MatchOutcome>,
}

impl Frame {
    pub fn local_snake(&self) -> Option<&SnakeView> {
        self.snakes.iter().find(|s| s.local)
    }
}
