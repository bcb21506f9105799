//! Play modes behind one capability.

use super::engine::Engine;
use super::events::TickEvent;
use super::frame::Frame;
use super::multiplayer::{MultiplayerView, SnapshotInbox};
use super::types::Direction;
use crate::core::config::{ArenaConfig, GameMode};
use crate::core::constants::MULTIPLAYER_FRAME_MS;
use rand::Rng;

/// Something the tick scheduler can drive.
pub trait Advance {
    /// Run one update and return the resulting frame.
    fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Frame;

    /// Interval the scheduler should wait before the next `advance`.
    fn tick_interval_ms(&self) -> u64;

    /// Periodic special-food roll, fired between ticks.
    fn on_spawn_timer<R: Rng + ?Sized>(&mut self, rng: &mut R);

    /// True once a terminal outcome has been reached.
    fn is_over(&self) -> bool;
}

impl Advance for Engine {
    fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Frame {
        let events = self.tick(rng);
        self.frame(events)
    }

    fn tick_interval_ms(&self) -> u64 {
        self.state.tick_interval_ms
    }

    fn on_spawn_timer<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.try_spawn_special(rng);
    }

    fn is_over(&self) -> bool {
        Engine::is_over(self)
    }
}

impl Advance for MultiplayerView {
    fn advance<R: Rng + ?Sized>(&mut self, _rng: &mut R) -> Frame {
        self.refresh()
    }

    fn tick_interval_ms(&self) -> u64 {
        MULTIPLAYER_FRAME_MS
    }

    fn on_spawn_timer<R: Rng + ?Sized>(&mut self, _rng: &mut R) {}

    fn is_over(&self) -> bool {
        false
    }
}

/// The active match, one variant per play mode.
#[derive(Debug)]
pub enum Session {
    Solo(Engine),
    Versus(Engine),
    Multiplayer(MultiplayerView),
}

impl Session {
    /// Start a match for `mode`. Multiplayer sessions get a fresh inbox; use
    /// [`Session::multiplayer`] to share one with a transport.
    pub fn start<R: Rng + ?Sized>(mode: GameMode, config: ArenaConfig, rng: &mut R) -> Self {
        match mode {
            GameMode::Single => Self::Solo(Engine::new(config, None, rng)),
            GameMode::Ai(difficulty) => Self::Versus(Engine::new(config, Some(difficulty), rng)),
            GameMode::Multiplayer => {
                Self::multiplayer("player", config.grid_size, SnapshotInbox::new())
            }
        }
    }

    pub fn multiplayer(local_name: &str, grid_size: i16, inbox: SnapshotInbox) -> Self {
        Self::Multiplayer(MultiplayerView::new(local_name, grid_size, inbox))
    }

    pub fn mode(&self) -> GameMode {
        match self {
            Self::Solo(_) => GameMode::Single,
            Self::Versus(engine) => engine
                .opponent()
                .map_or(GameMode::Single, GameMode::Ai),
            Self::Multiplayer(_) => GameMode::Multiplayer,
        }
    }

    pub fn engine(&self) -> Option<&Engine> {
        match self {
            Self::Solo(engine) | Self::Versus(engine) => Some(engine),
            Self::Multiplayer(_) => None,
        }
    }

    /// Route a player input intent. Returns false when it was ignored.
    pub fn steer(&mut self, direction: Direction) -> bool {
        match self {
            Self::Solo(engine) | Self::Versus(engine) => engine.steer_player(direction),
            Self::Multiplayer(view) => view.steer(direction),
        }
    }

    /// Current frame without advancing.
    pub fn frame(&self) -> Frame {
        match self {
            Self::Solo(engine) | Self::Versus(engine) => engine.frame(Vec::<TickEvent>::new()),
            Self::Multiplayer(view) => view.frame(),
        }
    }
}

impl Advance for Session {
    fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Frame {
        match self {
            Self::Solo(engine) | Self::Versus(engine) => engine.advance(rng),
            Self::Multiplayer(view) => view.advance(rng),
        }
    }

    fn tick_interval_ms(&self) -> u64 {
        match self {
            Self::Solo(engine) | Self::Versus(engine) => engine.tick_interval_ms(),
            Self::Multiplayer(view) => view.tick_interval_ms(),
        }
    }

    fn on_spawn_timer<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self {
            Self::Solo(engine) | Self::Versus(engine) => engine.on_spawn_timer(rng),
            Self::Multiplayer(view) => view.on_spawn_timer(rng),
        }
    }

    fn is_over(&self) -> bool {
        match self {
            Self::Solo(engine) | Self::Versus(engine) => Advance::is_over(engine),
            Self::Multiplayer(view) => view.is_over(),
        }
    }
}
