//! Match-independent plumbing: tunables, configuration, and the tick driver.

pub mod config;
pub mod constants;
pub mod scheduler;

pub use config::{ArenaConfig, GameMode};
pub use constants::*;
pub use scheduler::{SchedulerState, TickScheduler};
