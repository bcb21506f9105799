//! Snake entity and the per-tick step.

use super::types::{Cell, Direction};
use crate::core::constants::{INVISIBLE_TAIL_SEGMENTS, SNAKE_START_LEN};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Which seat a snake occupies. Iteration order is player first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnakeId {
    Player,
    Ai,
}

impl SnakeId {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Ai => "ai",
        }
    }
}

/// Result of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Snake was already dead; nothing happened.
    Idle,
    /// Head advanced. `grew` is true when the tail was kept.
    Moved { grew: bool },
    /// Head would have left the grid. The snake is now dead.
    HitWall,
}

#[derive(Debug, Clone)]
pub struct Snake {
    pub id: SnakeId,
    /// Body segments. Head is at the front (index 0).
    pub body: VecDeque<Cell>,
    /// Direction applied on the last step.
    pub direction: Direction,
    /// Buffered direction for the next step.
    pub next_direction: Direction,
    pub alive: bool,
    /// Upcoming steps that keep the tail.
    pub pending_growth: u32,
    pub speed_factor: f64,
    /// Remaining ticks during which the tail is hidden from frames.
    pub invisible_ticks: u32,
}

impl Snake {
    /// Build a snake from explicit segments, head first.
    pub fn new(id: SnakeId, body: impl IntoIterator<Item = Cell>, direction: Direction) -> Self {
        Self {
            id,
            body: body.into_iter().collect(),
            direction,
            next_direction: direction,
            alive: true,
            pending_growth: 0,
            speed_factor: 1.0,
            invisible_ticks: 0,
        }
    }

    /// Straight snake of the starting length, facing right with its tail to the left.
    pub fn spawn(id: SnakeId, head: Cell) -> Self {
        let body = (0..SNAKE_START_LEN as i16).map(|i| Cell::new(head.x - i, head.y));
        Self::new(id, body, Direction::Right)
    }

    /// Player start: centered on the grid.
    pub fn spawn_player(grid: i16) -> Self {
        Self::spawn(SnakeId::Player, Cell::new(grid / 2, grid / 2))
    }

    /// AI start: near the top-left corner.
    pub fn spawn_ai() -> Self {
        Self::spawn(SnakeId::Ai, Cell::new(5, 3))
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Buffer a direction change. Reversals of the current heading are ignored
    /// and reported as `false`.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.next_direction = direction;
        true
    }

    /// Advance one cell along the buffered direction.
    pub fn step(&mut self, grid: i16) -> StepOutcome {
        if !self.alive {
            return StepOutcome::Idle;
        }

        self.direction = self.next_direction;
        let new_head = self.head().offset(self.direction);

        if !new_head.inside(grid) {
            self.alive = false;
            return StepOutcome::HitWall;
        }

        self.body.push_front(new_head);
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
            StepOutcome::Moved { grew: true }
        } else {
            self.body.pop_back();
            StepOutcome::Moved { grew: false }
        }
    }

    /// Drop up to `count` trailing segments. The head always survives.
    pub fn truncate_tail(&mut self, count: usize) -> usize {
        let removable = count.min(self.body.len().saturating_sub(1));
        for _ in 0..removable {
            self.body.pop_back();
        }
        removable
    }

    /// True when `cell` is one of this snake's non-head segments.
    pub fn body_contains(&self, cell: Cell) -> bool {
        self.body.iter().skip(1).any(|&seg| seg == cell)
    }

    /// Segments a renderer may show. An invisible snake hides its last few
    /// segments; collision code must use `body` instead.
    pub fn visible_body(&self) -> Vec<Cell> {
        let hidden = if self.invisible_ticks > 0 {
            INVISIBLE_TAIL_SEGMENTS.min(self.body.len().saturating_sub(1))
        } else {
            0
        };
        self.body
            .iter()
            .take(self.body.len() - hidden)
            .copied()
            .collect()
    }
}
