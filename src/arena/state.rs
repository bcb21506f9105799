//! Per-match mutable timing and scoring state.

use crate::core::config::ArenaConfig;
use crate::core::constants::{SCORE_PER_SPEED_STEP, SLOW_DURATION_MS, SLOW_PENALTY_MS, SPEED_STEP_MS};

/// Pending slow-down expiry, measured on the match clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlowEffect {
    pub expires_at_ms: u64,
}

/// Score and timing aggregate owned by one engine.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub score: u32,
    /// Cumulative interval discount (ms).
    pub speed_boost: u64,
    /// Effective milliseconds between steps.
    pub tick_interval_ms: u64,
    /// Simulated milliseconds elapsed in this match.
    pub game_time_ms: u64,
    /// Steps elapsed.
    pub tick: u64,
    pub slow_effect: Option<SlowEffect>,

    base_tick_ms: u64,
    min_tick_ms: u64,
    max_tick_ms: u64,
}

impl MatchState {
    pub fn new(config: &ArenaConfig) -> Self {
        let mut state = Self {
            score: 0,
            speed_boost: 0,
            tick_interval_ms: config.base_tick_ms,
            game_time_ms: 0,
            tick: 0,
            slow_effect: None,
            base_tick_ms: config.base_tick_ms,
            min_tick_ms: config.min_tick_ms,
            max_tick_ms: config.max_tick_ms,
        };
        state.tick_interval_ms = state.compute_interval();
        state
    }

    /// Interval from score and speed boost alone.
    pub fn base_interval(&self) -> u64 {
        let score_steps = u64::from(self.score / SCORE_PER_SPEED_STEP) * SPEED_STEP_MS;
        self.base_tick_ms
            .saturating_sub(score_steps)
            .saturating_sub(self.speed_boost)
            .max(self.min_tick_ms)
    }

    /// Interval including any active slow-down, clamped to the configured range.
    pub fn compute_interval(&self) -> u64 {
        let interval = match self.slow_effect {
            Some(_) => self.base_interval() + SLOW_PENALTY_MS,
            None => self.base_interval(),
        };
        interval.clamp(self.min_tick_ms, self.max_tick_ms)
    }

    /// Recompute and store the interval. Returns true if it changed.
    pub fn refresh_interval(&mut self) -> bool {
        let next = self.compute_interval();
        let changed = next != self.tick_interval_ms;
        self.tick_interval_ms = next;
        changed
    }

    /// Start (or extend) the slow-down. The latest expiry wins; penalties do
    /// not stack.
    pub fn apply_slow(&mut self) {
        self.slow_effect = Some(SlowEffect {
            expires_at_ms: self.game_time_ms + SLOW_DURATION_MS,
        });
        self.refresh_interval();
    }

    /// Clear expired effects. Runs at the top of every tick. The reverted
    /// interval is derived from the score and boost at expiry time.
    pub fn expire_effects(&mut self) -> bool {
        match self.slow_effect {
            Some(slow) if self.game_time_ms >= slow.expires_at_ms => {
                self.slow_effect = None;
                self.refresh_interval();
                true
            }
            _ => false,
        }
    }

    pub fn slow_active(&self) -> bool {
        self.slow_effect.is_some()
    }

    pub fn add_score(&mut self, amount: u32) {
        self.score += amount;
    }

    pub fn deduct_score(&mut self, amount: u32) {
        self.score = self.score.saturating_sub(amount);
    }

    pub fn discount_boost(&mut self, amount: u64) {
        self.speed_boost = self.speed_boost.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> MatchState {
        MatchState::new(&ArenaConfig::default())
    }

    #[test]
    fn test_initial_interval_is_base() {
        let s = state();
        assert_eq!(s.tick_interval_ms, 150);
        assert_eq!(s.score, 0);
        assert!(!s.slow_active());
    }

    #[test]
    fn test_interval_drops_every_five_points() {
        let mut s = state();
        s.score = 4;
        assert_eq!(s.compute_interval(), 150);
        s.score = 5;
        assert_eq!(s.compute_interval(), 140);
        s.score = 23;
        assert_eq!(s.compute_interval(), 110);
    }

    #[test]
    fn test_interval_respects_min_tick() {
        let mut s = state();
        s.score = 500;
        assert_eq!(s.compute_interval(), 50);
        s.score = 0;
        s.speed_boost = 1_000;
        assert_eq!(s.compute_interval(), 50);
    }

    #[test]
    fn test_slow_adds_penalty_and_caps() {
        let mut s = state();
        s.apply_slow();
        assert_eq!(s.tick_interval_ms, 270);

        let mut capped = MatchState::new(&ArenaConfig {
            base_tick_ms: 350,
            ..ArenaConfig::default()
        });
        capped.apply_slow();
        assert_eq!(capped.tick_interval_ms, 400);
    }

    #[test]
    fn test_slow_expires_on_match_clock() {
        let mut s = state();
        s.apply_slow();
        s.game_time_ms = 2_999;
        assert!(!s.expire_effects());
        s.game_time_ms = 3_000;
        assert!(s.expire_effects());
        assert_eq!(s.tick_interval_ms, 150);
    }

    #[test]
    fn test_second_slow_extends_without_compounding() {
        let mut s = state();
        s.apply_slow();
        s.game_time_ms = 2_000;
        s.apply_slow();

        assert_eq!(s.tick_interval_ms, 270);
        assert_eq!(s.slow_effect.map(|e| e.expires_at_ms), Some(5_000));

        // The first expiry point passes without reverting
        s.game_time_ms = 3_000;
        assert!(!s.expire_effects());
        assert!(s.slow_active());
    }

    #[test]
    fn test_slow_revert_uses_score_at_expiry() {
        let mut s = state();
        s.apply_slow();
        // Score climbs while slowed
        s.score = 10;
        s.game_time_ms = 3_000;
        s.expire_effects();

        // Reverted interval reflects the new score, not the pre-slow value
        assert_eq!(s.tick_interval_ms, 130);
    }

    #[test]
    fn test_deduct_score_floors_at_zero() {
        let mut s = state();
        s.add_score(1);
        s.deduct_score(2);
        assert_eq!(s.score, 0);
    }
}
