//! Client-side view of a server-authoritative match.
//!
//! The server owns the simulation. This side only keeps the newest decoded
//! snapshot, projects it into frames, and queues the local player's input
//! intents for the transport to send.

use super::food::{Food, FoodKind, SpecialKind};
use super::frame::{Frame, SnakeView};
use super::types::{Cell, Direction};
use crate::core::constants::INVISIBLE_TAIL_SEGMENTS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodClass {
    Normal,
    Special,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFood {
    #[serde(flatten)]
    pub position: Cell,
    pub kind: FoodClass,
    #[serde(default)]
    pub subtype: Option<SpecialKind>,
    #[serde(default, rename = "spawnedAt")]
    pub spawned_at: u64,
}

impl SnapshotFood {
    /// Engine food for rendering. A special without a subtype renders as normal.
    pub fn to_food(&self) -> Food {
        let kind = match (self.kind, self.subtype) {
            (FoodClass::Special, Some(subtype)) => FoodKind::Special(subtype),
            _ => FoodKind::Normal,
        };
        Food {
            position: self.position,
            kind,
            spawned_at_ms: self.spawned_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub body: Vec<Cell>,
    pub color: String,
    pub score: u32,
    pub alive: bool,
    #[serde(default)]
    pub invisible: bool,
}

/// Full-state broadcast from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSnapshot {
    pub players: Vec<PlayerSnapshot>,
    pub foods: Vec<SnapshotFood>,
    #[serde(default)]
    pub scores: HashMap<String, u32>,
}

impl ServerSnapshot {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Input intent for the transport to encode and send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputIntent {
    pub direction: Direction,
}

/// Latest-snapshot slot shared between the transport and the view.
///
/// Publishing replaces whatever is there; the view takes the newest value on
/// its next pass. Intermediate snapshots are dropped.
#[derive(Debug, Clone, Default)]
pub struct SnapshotInbox {
    slot: Arc<Mutex<Option<ServerSnapshot>>>,
}

impl SnapshotInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: ServerSnapshot) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = Some(snapshot),
            Err(poisoned) => *poisoned.into_inner() = Some(snapshot),
        }
    }

    pub fn take(&self) -> Option<ServerSnapshot> {
        match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

/// Passive renderer of server state.
#[derive(Debug)]
pub struct MultiplayerView {
    local_name: String,
    grid_size: i16,
    inbox: SnapshotInbox,
    latest: Option<ServerSnapshot>,
    intents: Vec<InputIntent>,
    frames: u64,
}

impl MultiplayerView {
    pub fn new(local_name: impl Into<String>, grid_size: i16, inbox: SnapshotInbox) -> Self {
        Self {
            local_name: local_name.into(),
            grid_size,
            inbox,
            latest: None,
            intents: Vec::new(),
            frames: 0,
        }
    }

    pub fn latest(&self) -> Option<&ServerSnapshot> {
        self.latest.as_ref()
    }

    fn local_player(&self) -> Option<&PlayerSnapshot> {
        self.latest
            .as_ref()?
            .players
            .iter()
            .find(|p| p.name == self.local_name)
    }

    /// Heading inferred from the local player's first two segments.
    pub fn local_heading(&self) -> Option<Direction> {
        let player = self.local_player()?;
        match player.body.as_slice() {
            [head, neck, ..] => Direction::toward(*neck, *head),
            _ => None,
        }
    }

    /// Queue a direction intent. Reversals of the known heading are dropped.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.local_heading() == Some(direction.opposite()) {
            return false;
        }
        self.intents.push(InputIntent { direction });
        true
    }

    /// Hand queued intents to the transport.
    pub fn drain_intents(&mut self) -> Vec<InputIntent> {
        std::mem::take(&mut self.intents)
    }

    /// Pull the newest snapshot, if any, and project it.
    pub fn refresh(&mut self) -> Frame {
        if let Some(snapshot) = self.inbox.take() {
            self.latest = Some(snapshot);
        }
        self.frames += 1;
        self.frame()
    }

    /// Project the last received snapshot without touching the inbox.
    pub fn frame(&self) -> Frame {
        let Some(snapshot) = &self.latest else {
            return Frame {
                grid_size: self.grid_size,
                tick: self.frames,
                score: 0,
                game_time_ms: 0,
                time_remaining_ms: None,
                tick_interval_ms: 0,
                slowed: false,
                snakes: Vec::new(),
                foods: Vec::new(),
                events: Vec::new(),
                outcome: None,
            };
        };

        let snakes: Vec<SnakeView> = snapshot
            .players
            .iter()
            .map(|p| SnakeView {
                name: p.name.clone(),
                color: p.color.clone(),
                body: visible_segments(&p.body, p.invisible),
                alive: p.alive,
                invisible: p.invisible,
                score: p.score,
                local: p.name == self.local_name,
            })
            .collect();
        let score = snakes.iter().find(|s| s.local).map_or(0, |s| s.score);

        Frame {
            grid_size: self.grid_size,
            tick: self.frames,
            score,
            game_time_ms: 0,
            time_remaining_ms: None,
            tick_interval_ms: 0,
            slowed: false,
            snakes,
            foods: snapshot.foods.iter().map(SnapshotFood::to_food).collect(),
            events: Vec::new(),
            outcome: None,
        }
    }
}

fn visible_segments(body: &[Cell], invisible: bool) -> Vec<Cell> {
    let hidden = if invisible {
        INVISIBLE_TAIL_SEGMENTS.min(body.len().saturating_sub(1))
    } else {
        0
    };
    body[..body.len() - hidden].to_vec()
}
