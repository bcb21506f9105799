//! Fixed-interval tick driver.
//!
//! Time arrives from the caller as wall-clock deltas. The scheduler turns
//! them into whole ticks at the session's current interval, re-arming when
//! the interval changes, and fires the special-food timer between ticks so
//! food is never mutated mid-update.

use super::constants::MAX_FRAME_DT_MS;
use crate::arena::frame::Frame;
use crate::arena::session::Advance;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Paused,
    /// Halted by a terminal outcome; only `restart` resumes ticking.
    Stopped,
}

#[derive(Debug, Clone)]
pub struct TickScheduler {
    state: SchedulerState,
    interval_ms: u64,
    tick_accumulated_ms: u64,
    spawn_period_ms: u64,
    spawn_accumulated_ms: u64,
}

impl TickScheduler {
    pub fn new(interval_ms: u64, spawn_period_ms: u64) -> Self {
        Self {
            state: SchedulerState::Running,
            interval_ms: interval_ms.max(1),
            tick_accumulated_ms: 0,
            spawn_period_ms: spawn_period_ms.max(1),
            spawn_accumulated_ms: 0,
        }
    }

    /// Scheduler armed at the driver's current interval.
    pub fn for_driver<A: Advance>(driver: &A, spawn_period_ms: u64) -> Self {
        Self::new(driver.tick_interval_ms(), spawn_period_ms)
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Feed `dt_ms` of wall-clock time and run every tick that became due.
    ///
    /// `dt_ms` is clamped so a stall does not replay a burst of ticks.
    /// Stops as soon as the driver reports a terminal outcome.
    pub fn advance<A: Advance, R: Rng + ?Sized>(
        &mut self,
        driver: &mut A,
        dt_ms: u64,
        rng: &mut R,
    ) -> Vec<Frame> {
        let mut frames = Vec::new();
        if self.state != SchedulerState::Running {
            return frames;
        }

        if driver.is_over() {
            self.stop();
            return frames;
        }

        let dt_ms = dt_ms.min(MAX_FRAME_DT_MS);

        self.spawn_accumulated_ms += dt_ms;
        while self.spawn_accumulated_ms >= self.spawn_period_ms {
            self.spawn_accumulated_ms -= self.spawn_period_ms;
            driver.on_spawn_timer(rng);
        }

        self.tick_accumulated_ms += dt_ms;
        while self.tick_accumulated_ms >= self.interval_ms {
            self.tick_accumulated_ms -= self.interval_ms;

            frames.push(driver.advance(rng));
            if driver.is_over() {
                self.stop();
                break;
            }

            let next = driver.tick_interval_ms();
            if next != self.interval_ms {
                self.rearm(next);
            }
        }

        frames
    }

    fn stop(&mut self) {
        self.state = SchedulerState::Stopped;
        tracing::debug!("scheduler stopped on match outcome");
    }

    /// Replace the pending timer with one at `interval_ms`.
    fn rearm(&mut self, interval_ms: u64) {
        tracing::debug!(from = self.interval_ms, to = interval_ms, "tick interval re-armed");
        self.interval_ms = interval_ms.max(1);
        self.tick_accumulated_ms = 0;
    }

    /// Stop ticking without touching match state.
    pub fn pause(&mut self) {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Paused;
        }
    }

    /// Re-arm at the last computed interval.
    pub fn resume(&mut self) {
        if self.state == SchedulerState::Paused {
            self.state = SchedulerState::Running;
            self.tick_accumulated_ms = 0;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            SchedulerState::Running => self.pause(),
            SchedulerState::Paused => self.resume(),
            SchedulerState::Stopped => {}
        }
    }

    /// Cancel all pending timers and start over for a new match.
    pub fn restart(&mut self, interval_ms: u64) {
        self.state = SchedulerState::Running;
        self.interval_ms = interval_ms.max(1);
        self.tick_accumulated_ms = 0;
        self.spawn_accumulated_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::events::{MatchOutcome, OutcomeCause};

    /// Scripted driver: fixed interval schedule, optional outcome at a tick.
    struct Script {
        ticks: u64,
        spawns: u64,
        intervals: Vec<u64>,
        end_at: Option<u64>,
    }

    impl Script {
        fn new(intervals: Vec<u64>) -> Self {
            Self {
                ticks: 0,
                spawns: 0,
                intervals,
                end_at: None,
            }
        }
    }

    impl Advance for Script {
        fn advance<R: Rng + ?Sized>(&mut self, _rng: &mut R) -> Frame {
            self.ticks += 1;
            let outcome = (self.end_at == Some(self.ticks)).then_some(MatchOutcome {
                cause: OutcomeCause::PlayerDied,
                final_score: 0,
            });
            Frame {
                grid_size: 10,
                tick: self.ticks,
                score: 0,
                game_time_ms: 0,
                time_remaining_ms: None,
                tick_interval_ms: self.tick_interval_ms(),
                slowed: false,
                snakes: Vec::new(),
                foods: Vec::new(),
                events: Vec::new(),
                outcome,
            }
        }

        fn tick_interval_ms(&self) -> u64 {
            let index = (self.ticks as usize).min(self.intervals.len() - 1);
            self.intervals[index]
        }

        fn on_spawn_timer<R: Rng + ?Sized>(&mut self, _rng: &mut R) {
            self.spawns += 1;
        }

        fn is_over(&self) -> bool {
            self.end_at.is_some_and(|end| self.ticks >= end)
        }
    }

    fn rng() -> rand::rngs::ThreadRng {
        rand::thread_rng()
    }

    #[test]
    fn test_ticks_at_fixed_interval() {
        let mut driver = Script::new(vec![100]);
        let mut scheduler = TickScheduler::for_driver(&driver, 10_000);

        assert!(scheduler.advance(&mut driver, 99, &mut rng()).is_empty());
        assert_eq!(scheduler.advance(&mut driver, 1, &mut rng()).len(), 1);
        assert_eq!(scheduler.advance(&mut driver, 250, &mut rng()).len(), 2);
        assert_eq!(driver.ticks, 3);
    }

    #[test]
    fn test_dt_clamped() {
        let mut driver = Script::new(vec![100]);
        let mut scheduler = TickScheduler::for_driver(&driver, 10_000);

        let frames = scheduler.advance(&mut driver, 50_000, &mut rng());
        assert_eq!(frames.len(), 5);
    }

    #[test]
    fn test_interval_change_rearms() {
        // 100ms for the first tick, 60ms afterwards
        let mut driver = Script::new(vec![100, 60]);
        let mut scheduler = TickScheduler::for_driver(&driver, 10_000);

        // Second tick would be due at 200ms under the old interval; the
        // re-arm drops the leftover 80ms
        let frames = scheduler.advance(&mut driver, 180, &mut rng());
        assert_eq!(frames.len(), 1);
        assert_eq!(scheduler.interval_ms(), 60);

        assert_eq!(scheduler.advance(&mut driver, 60, &mut rng()).len(), 1);
    }

    #[test]
    fn test_outcome_stops_until_restart() {
        let mut driver = Script::new(vec![50]);
        driver.end_at = Some(2);
        let mut scheduler = TickScheduler::for_driver(&driver, 10_000);

        let frames = scheduler.advance(&mut driver, 500, &mut rng());
        assert_eq!(frames.len(), 2);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert!(scheduler.advance(&mut driver, 500, &mut rng()).is_empty());

        scheduler.toggle_pause();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        let mut fresh = Script::new(vec![50]);
        scheduler.restart(fresh.tick_interval_ms());
        assert_eq!(scheduler.advance(&mut fresh, 100, &mut rng()).len(), 2);
    }

    #[test]
    fn test_finished_driver_never_ticks() {
        let mut driver = Script::new(vec![50]);
        driver.end_at = Some(0);
        let mut scheduler = TickScheduler::for_driver(&driver, 100);

        assert!(scheduler.advance(&mut driver, 400, &mut rng()).is_empty());
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(driver.ticks, 0);
        assert_eq!(driver.spawns, 0);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut driver = Script::new(vec![100]);
        let mut scheduler = TickScheduler::for_driver(&driver, 1_000);

        scheduler.advance(&mut driver, 90, &mut rng());
        scheduler.pause();
        assert!(scheduler.advance(&mut driver, 500, &mut rng()).is_empty());
        assert_eq!(driver.spawns, 0);

        scheduler.resume();
        assert!(scheduler.is_running());
        // Resume re-arms: the 90ms before the pause is discarded
        assert!(scheduler.advance(&mut driver, 50, &mut rng()).is_empty());
        assert_eq!(scheduler.advance(&mut driver, 50, &mut rng()).len(), 1);
    }

    #[test]
    fn test_spawn_timer_fires_on_period() {
        let mut driver = Script::new(vec![100]);
        let mut scheduler = TickScheduler::for_driver(&driver, 1_000);

        for _ in 0..9 {
            scheduler.advance(&mut driver, 250, &mut rng());
        }
        // 2250ms elapsed
        assert_eq!(driver.spawns, 2);
    }

    #[test]
    fn test_restart_clears_spawn_timer() {
        let mut driver = Script::new(vec![100]);
        let mut scheduler = TickScheduler::for_driver(&driver, 1_000);

        for _ in 0..3 {
            scheduler.advance(&mut driver, 300, &mut rng());
        }
        scheduler.restart(100);
        scheduler.advance(&mut driver, 200, &mut rng());
        assert_eq!(driver.spawns, 0);
    }
}
