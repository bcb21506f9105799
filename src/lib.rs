//! Snake Arena - grid snake simulation library
//!
//! Exposes the match engine, AI opponents, and tick scheduling for the
//! terminal front end, the headless simulator, and tests.

pub mod arena;
pub mod core;

pub use crate::arena::{Advance, Engine, Frame, Session};
pub use crate::core::{ArenaConfig, GameMode, TickScheduler};
