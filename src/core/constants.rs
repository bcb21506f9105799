// Grid
pub const GRID_SIZE: i16 = 30;
pub const SNAKE_START_LEN: usize = 3;

// Tick timing (milliseconds)
pub const BASE_TICK_MS: u64 = 150;
pub const MIN_TICK_MS: u64 = 50;
pub const MAX_TICK_MS: u64 = 400;
pub const SCORE_PER_SPEED_STEP: u32 = 5;
pub const SPEED_STEP_MS: u64 = 10;
pub const MAX_FRAME_DT_MS: u64 = 500;

// Food placement
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 200;
pub const SPECIAL_SPAWN_PERIOD_MS: u64 = 10_000;
pub const SPECIAL_SPAWN_CHANCE: f64 = 0.6;

// Food effects
pub const NORMAL_FOOD_SCORE: u32 = 1;
pub const NORMAL_FOOD_SPEED_FACTOR: f64 = 1.03;
pub const NORMAL_FOOD_BOOST_DISCOUNT: u64 = 2;
pub const BONUS_FOOD_SCORE: u32 = 5;
pub const BONUS_FOOD_GROWTH: u32 = 2;
pub const SLOW_PENALTY_MS: u64 = 120;
pub const SLOW_DURATION_MS: u64 = 3_000;
pub const POISON_SCORE_PENALTY: u32 = 2;
pub const POISON_TRUNCATE: usize = 2;
pub const INVISIBLE_DURATION_MS: u64 = 5_000;
pub const INVISIBLE_TAIL_SEGMENTS: usize = 3;

// AI behavior
pub const EASY_RANDOM_TURN_CHANCE: f64 = 0.2;
pub const EASY_EDGE_MARGIN: i16 = 2;
pub const NORMAL_NOISE_CHANCE: f64 = 0.12;

// Match
pub const GAME_DURATION_MS: u64 = 180_000;
pub const MULTIPLAYER_FRAME_MS: u64 = 100;
