//! Solo and versus simulation: one full engine update per tick.

use super::ai::AiController;
use super::collision::resolve_collisions;
use super::effects::resolve_food;
use super::events::{Death, DeathCause, MatchOutcome, OutcomeCause, TickEvent};
use super::food::{place_food, place_special, Food, FoodKind};
use super::frame::{Frame, SnakeView};
use super::snake::{Snake, SnakeId, StepOutcome};
use super::state::MatchState;
use super::types::{Difficulty, Direction};
use crate::core::config::ArenaConfig;
use rand::Rng;

/// Simulation for one solo or solo-vs-AI match.
#[derive(Debug, Clone)]
pub struct Engine {
    config: ArenaConfig,
    pub state: MatchState,
    /// Player first, then the AI if present. Iteration order is the
    /// consumption tie-break.
    pub snakes: Vec<Snake>,
    pub foods: Vec<Food>,
    opponent: Option<AiController>,
    outcome: Option<MatchOutcome>,
    /// Events raised between ticks (special spawns), reported with the next frame.
    pending_events: Vec<TickEvent>,
}

impl Engine {
    /// Fresh match: player centered, optional AI top-left, one normal food.
    pub fn new<R: Rng + ?Sized>(
        config: ArenaConfig,
        opponent: Option<Difficulty>,
        rng: &mut R,
    ) -> Self {
        let mut snakes = vec![Snake::spawn_player(config.grid_size)];
        if opponent.is_some() {
            snakes.push(Snake::spawn_ai());
        }

        let mut engine = Self::with_layout(config, snakes, Vec::new(), opponent);
        if let Some(food) = place_food(
            FoodKind::Normal,
            &engine.snakes,
            &engine.foods,
            engine.config.grid_size,
            0,
            rng,
        ) {
            engine.foods.push(food);
        }

        tracing::info!(
            grid = engine.config.grid_size,
            opponent = opponent.map(|d| d.name()),
            "match started"
        );
        engine
    }

    /// Match with an explicit layout. Snakes must be ordered player first.
    pub fn with_layout(
        config: ArenaConfig,
        snakes: Vec<Snake>,
        foods: Vec<Food>,
        opponent: Option<Difficulty>,
    ) -> Self {
        Self {
            state: MatchState::new(&config),
            config,
            snakes,
            foods,
            opponent: opponent.map(AiController::new),
            outcome: None,
            pending_events: Vec::new(),
        }
    }

    pub fn grid(&self) -> i16 {
        self.config.grid_size
    }

    pub fn opponent(&self) -> Option<Difficulty> {
        self.opponent.map(|ai| ai.difficulty)
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn snake(&self, id: SnakeId) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.id == id)
    }

    pub fn snake_mut(&mut self, id: SnakeId) -> Option<&mut Snake> {
        self.snakes.iter_mut().find(|s| s.id == id)
    }

    /// Apply a player input intent. Reversals are ignored.
    pub fn steer_player(&mut self, direction: Direction) -> bool {
        self.snake_mut(SnakeId::Player)
            .is_some_and(|snake| snake.steer(direction))
    }

    /// One full update: expire effects, AI decision, step, food, collisions.
    /// Does nothing once the match is over.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<TickEvent> {
        let mut events = std::mem::take(&mut self.pending_events);
        if self.outcome.is_some() {
            return events;
        }
        let elapsed_ms = self.state.tick_interval_ms;

        self.state.expire_effects();
        for snake in &mut self.snakes {
            snake.invisible_ticks = snake.invisible_ticks.saturating_sub(1);
        }

        self.steer_ai(rng);

        let grid = self.grid();
        for snake in &mut self.snakes {
            if snake.step(grid) == StepOutcome::HitWall {
                tracing::debug!(snake = snake.id.name(), "snake hit the wall");
                events.push(TickEvent::SnakeDied(Death {
                    id: snake.id,
                    cause: DeathCause::Wall,
                }));
            }
        }

        events.extend(resolve_food(
            &mut self.snakes,
            &mut self.foods,
            &mut self.state,
            grid,
            rng,
        ));

        events.extend(
            resolve_collisions(&mut self.snakes)
                .into_iter()
                .map(TickEvent::SnakeDied),
        );

        self.state.game_time_ms += elapsed_ms;
        self.state.tick += 1;

        if let Some(outcome) = self.check_outcome() {
            tracing::info!(
                cause = outcome.cause.message(),
                score = outcome.final_score,
                ticks = self.state.tick,
                "match over"
            );
            self.outcome = Some(outcome);
            events.push(TickEvent::MatchOver(outcome));
        }

        self.state.refresh_interval();
        events
    }

    fn steer_ai<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let Some(controller) = self.opponent else {
            return;
        };
        let Some(index) = self
            .snakes
            .iter()
            .position(|s| s.id == SnakeId::Ai && s.alive)
        else {
            return;
        };

        let direction =
            controller.decide(&self.snakes[index], &self.snakes, &self.foods, self.grid(), rng);
        self.snakes[index].steer(direction);
    }

    fn check_outcome(&self) -> Option<MatchOutcome> {
        let player_dead = self.snake(SnakeId::Player).is_some_and(|s| !s.alive);
        let ai_dead = self.snake(SnakeId::Ai).is_some_and(|s| !s.alive);

        let cause = match (player_dead, ai_dead) {
            (true, true) => OutcomeCause::BothDied,
            (true, false) => OutcomeCause::PlayerDied,
            (false, true) => OutcomeCause::AiDied,
            (false, false) => return None,
        };
        Some(MatchOutcome {
            cause,
            final_score: self.state.score,
        })
    }

    /// Periodic special-food roll. Spawns only while no special food exists.
    pub fn try_spawn_special<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Food> {
        if self.outcome.is_some() || self.foods.iter().any(|f| f.kind.is_special()) {
            return None;
        }
        if !rng.gen_bool(self.config.special_spawn_chance) {
            return None;
        }

        let food = place_special(
            &self.snakes,
            &self.foods,
            self.grid(),
            self.state.game_time_ms,
            rng,
        )?;
        tracing::debug!(kind = ?food.kind, at = ?food.position, "special food spawned");
        self.foods.push(food);
        self.pending_events.push(TickEvent::FoodSpawned {
            kind: food.kind,
            at: food.position,
        });
        Some(food)
    }

    /// Render projection of the current state.
    pub fn frame(&self, events: Vec<TickEvent>) -> Frame {
        let snakes = self
            .snakes
            .iter()
            .map(|snake| SnakeView {
                name: snake.id.name().to_string(),
                color: match snake.id {
                    SnakeId::Player => "green".to_string(),
                    SnakeId::Ai => "red".to_string(),
                },
                body: snake.visible_body(),
                alive: snake.alive,
                invisible: snake.invisible_ticks > 0,
                score: match snake.id {
                    SnakeId::Player => self.state.score,
                    SnakeId::Ai => 0,
                },
                local: snake.id == SnakeId::Player,
            })
            .collect();

        Frame {
            grid_size: self.grid(),
            tick: self.state.tick,
            score: self.state.score,
            game_time_ms: self.state.game_time_ms,
            time_remaining_ms: Some(
                self.config
                    .game_duration_ms
                    .saturating_sub(self.state.game_time_ms),
            ),
            tick_interval_ms: self.state.tick_interval_ms,
            slowed: self.state.slow_active(),
            snakes,
            foods: self.foods.clone(),
            events,
            outcome: self.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::food::SpecialKind;
    use crate::arena::types::Cell;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player(points: &[(i16, i16)], direction: Direction) -> Snake {
        Snake::new(
            SnakeId::Player,
            points.iter().map(|&p| Cell::from(p)),
            direction,
        )
    }

    fn ai(points: &[(i16, i16)], direction: Direction) -> Snake {
        Snake::new(SnakeId::Ai, points.iter().map(|&p| Cell::from(p)), direction)
    }

    fn solo(snake: Snake, foods: Vec<Food>) -> Engine {
        Engine::with_layout(ArenaConfig::default(), vec![snake], foods, None)
    }

    #[test]
    fn test_new_match_layout() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let engine = Engine::new(ArenaConfig::default(), Some(Difficulty::Hard), &mut rng);

        assert_eq!(engine.snakes.len(), 2);
        assert_eq!(engine.snakes[0].id, SnakeId::Player);
        assert_eq!(engine.snakes[0].head(), Cell::new(15, 15));
        assert_eq!(engine.snakes[1].id, SnakeId::Ai);
        assert_eq!(engine.foods.len(), 1);
        assert_eq!(engine.foods[0].kind, FoodKind::Normal);
        assert_eq!(engine.state.tick_interval_ms, 150);
        assert!(!engine.is_over());
    }

    #[test]
    fn test_plain_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut engine = solo(player(&[(5, 5), (4, 5), (3, 5)], Direction::Right), vec![]);

        let events = engine.tick(&mut rng);

        assert!(events.is_empty());
        let body: Vec<Cell> = engine.snakes[0].body.iter().copied().collect();
        assert_eq!(body, vec![Cell::new(6, 5), Cell::new(5, 5), Cell::new(4, 5)]);
        assert_eq!(engine.snakes[0].pending_growth, 0);
        assert_eq!(engine.state.tick, 1);
        assert_eq!(engine.state.game_time_ms, 150);
    }

    #[test]
    fn test_eating_normal_food_grows_next_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut engine = solo(
            player(&[(5, 5), (4, 5), (3, 5)], Direction::Right),
            vec![Food::new(Cell::new(6, 5), FoodKind::Normal)],
        );

        engine.tick(&mut rng);
        assert_eq!(engine.snakes[0].pending_growth, 1);
        assert_eq!(engine.state.score, 1);
        assert_eq!(engine.foods.len(), 1);
        assert_ne!(engine.foods[0].position, Cell::new(6, 5));
        assert_eq!(engine.snakes[0].len(), 3);

        engine.foods.clear();
        engine.tick(&mut rng);
        assert_eq!(engine.snakes[0].len(), 4);
        assert_eq!(engine.snakes[0].pending_growth, 0);
    }

    #[test]
    fn test_wall_death_ends_solo_match() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut engine = solo(player(&[(29, 4), (28, 4)], Direction::Right), vec![]);

        let events = engine.tick(&mut rng);

        assert_eq!(
            events[0],
            TickEvent::SnakeDied(Death {
                id: SnakeId::Player,
                cause: DeathCause::Wall
            })
        );
        assert_eq!(
            engine.outcome(),
            Some(MatchOutcome {
                cause: OutcomeCause::PlayerDied,
                final_score: 0
            })
        );
        // Body untouched by the fatal step
        assert_eq!(engine.snakes[0].head(), Cell::new(29, 4));
    }

    #[test]
    fn test_ticks_after_outcome_are_noops() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut engine = solo(player(&[(29, 4), (28, 4)], Direction::Right), vec![]);
        engine.tick(&mut rng);
        let tick = engine.state.tick;

        assert!(engine.tick(&mut rng).is_empty());
        assert_eq!(engine.state.tick, tick);
    }

    #[test]
    fn test_head_to_head_reports_both_died() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut engine = Engine::with_layout(
            ArenaConfig::default(),
            vec![
                player(&[(10, 10), (9, 10)], Direction::Right),
                ai(&[(12, 10), (13, 10)], Direction::Left),
            ],
            vec![],
            None,
        );

        let events = engine.tick(&mut rng);

        assert_eq!(engine.outcome().map(|o| o.cause), Some(OutcomeCause::BothDied));
        let mutual = events
            .iter()
            .filter(|e| matches!(e, TickEvent::SnakeDied(Death { cause: DeathCause::Mutual, .. })))
            .count();
        assert_eq!(mutual, 2);
        assert!(matches!(events.last(), Some(TickEvent::MatchOver(_))));
    }

    #[test]
    fn test_ai_death_ends_versus_match() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut engine = Engine::with_layout(
            ArenaConfig::default(),
            vec![
                player(&[(15, 15), (14, 15)], Direction::Right),
                ai(&[(5, 0), (4, 0)], Direction::Up),
            ],
            vec![],
            None,
        );

        engine.tick(&mut rng);

        assert_eq!(engine.outcome().map(|o| o.cause), Some(OutcomeCause::AiDied));
    }

    #[test]
    fn test_special_spawn_is_exclusive() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut config = ArenaConfig::default();
        config.special_spawn_chance = 1.0;
        let mut engine = Engine::with_layout(config, vec![Snake::spawn_player(30)], vec![], None);

        assert!(engine.try_spawn_special(&mut rng).is_some());
        for _ in 0..10 {
            assert!(engine.try_spawn_special(&mut rng).is_none());
        }
        assert_eq!(engine.foods.iter().filter(|f| f.kind.is_special()).count(), 1);
    }

    #[test]
    fn test_special_spawn_event_reported_next_tick() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut config = ArenaConfig::default();
        config.special_spawn_chance = 1.0;
        let mut engine = Engine::with_layout(config, vec![Snake::spawn_player(30)], vec![], None);

        let food = engine.try_spawn_special(&mut rng).expect("empty board");
        let events = engine.tick(&mut rng);

        assert!(events.contains(&TickEvent::FoodSpawned {
            kind: food.kind,
            at: food.position
        }));
    }

    #[test]
    fn test_slow_food_reverts_after_three_seconds() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut engine = solo(
            player(&[(5, 5), (4, 5)], Direction::Right),
            vec![Food::new(Cell::new(6, 5), FoodKind::Special(SpecialKind::Slow))],
        );

        engine.tick(&mut rng);
        assert_eq!(engine.state.tick_interval_ms, 270);

        // 270ms ticks: the top-of-tick check first sees 3120ms on the 12th
        let mut ticks = 0;
        while engine.state.slow_active() {
            engine.tick(&mut rng);
            ticks += 1;
        }
        assert_eq!(ticks, 12);
        assert_eq!(engine.state.tick_interval_ms, 150);
    }

    #[test]
    fn test_invisible_hides_tail_in_frame_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut engine = solo(
            player(&[(5, 5), (4, 5), (3, 5), (2, 5), (1, 5)], Direction::Right),
            vec![Food::new(
                Cell::new(6, 5),
                FoodKind::Special(SpecialKind::Invisible),
            )],
        );

        let events = engine.tick(&mut rng);
        let frame = engine.frame(events);

        let me = frame.local_snake().expect("player view");
        assert!(me.invisible);
        assert_eq!(me.body.len(), 2);
        assert_eq!(engine.snakes[0].len(), 5);
    }

    #[test]
    fn test_invisible_wears_off_after_duration() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut engine = solo(
            player(&[(5, 5), (4, 5), (3, 5), (2, 5), (1, 5)], Direction::Right),
            vec![Food::new(
                Cell::new(6, 5),
                FoodKind::Special(SpecialKind::Invisible),
            )],
        );

        engine.tick(&mut rng);
        // 5000ms at 150ms per tick
        assert_eq!(engine.snakes[0].invisible_ticks, 33);

        // Run a lap inside the board so the snake outlives the effect
        let mut ticks = 0;
        while engine.snakes[0].invisible_ticks > 0 {
            let head = engine.snakes[0].head();
            let turn = match (head.x, head.y) {
                (15, 5) => Some(Direction::Down),
                (15, 15) => Some(Direction::Left),
                (6, 15) => Some(Direction::Up),
                _ => None,
            };
            if let Some(direction) = turn {
                engine.steer_player(direction);
            }
            engine.tick(&mut rng);
            ticks += 1;
        }

        assert_eq!(ticks, 33);
        assert!(engine.snakes[0].alive);
        let frame = engine.frame(Vec::new());
        let me = frame.local_snake().expect("player view");
        assert!(!me.invisible);
        assert_eq!(me.body.len(), 5);
    }

    #[test]
    fn test_hidden_tail_still_kills() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut engine = Engine::with_layout(
            ArenaConfig::default(),
            vec![
                player(&[(5, 5), (4, 5), (3, 5), (2, 5), (1, 5)], Direction::Right),
                ai(&[(3, 6), (3, 7), (3, 8)], Direction::Up),
            ],
            vec![Food::new(Cell::new(20, 20), FoodKind::Normal)],
            None,
        );
        engine.snakes[0].invisible_ticks = 10;

        let events = engine.tick(&mut rng);

        // (3, 5) is one of the three tail cells the frame hides
        let frame = engine.frame(Vec::new());
        let me = frame.local_snake().expect("player view");
        assert!(!me.body.contains(&Cell::new(3, 5)));
        assert!(engine.snakes[0].body.contains(&Cell::new(3, 5)));

        assert!(events.contains(&TickEvent::SnakeDied(Death {
            id: SnakeId::Ai,
            cause: DeathCause::Collision,
        })));
        assert!(engine.snakes[0].alive);
        assert_eq!(engine.outcome().map(|o| o.cause), Some(OutcomeCause::AiDied));
    }

    #[test]
    fn test_frame_countdown() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut engine = solo(player(&[(5, 5), (4, 5)], Direction::Right), vec![]);
        engine.tick(&mut rng);
        let frame = engine.frame(Vec::new());
        assert_eq!(frame.time_remaining_ms, Some(180_000 - 150));
        assert_eq!(frame.tick, 1);
    }
}
