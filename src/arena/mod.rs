//! Grid snake simulation: entities, per-tick rules, AI, and play modes.

pub mod ai;
pub mod collision;
pub mod effects;
pub mod engine;
pub mod events;
pub mod food;
pub mod frame;
pub mod multiplayer;
pub mod session;
pub mod snake;
pub mod state;
pub mod types;

pub use ai::{find_path, AiController};
pub use engine::Engine;
pub use events::{Death, DeathCause, MatchOutcome, OutcomeCause, TickEvent};
pub use food::{Food, FoodKind, SpecialKind};
pub use frame::{Frame, SnakeView};
pub use multiplayer::{InputIntent, MultiplayerView, ServerSnapshot, SnapshotInbox};
pub use session::{Advance, Session};
pub use snake::{Snake, SnakeId, StepOutcome};
pub use state::MatchState;
pub use types::{Cell, Difficulty, Direction};
