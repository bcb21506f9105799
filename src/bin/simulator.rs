//! Snake Arena Headless Simulator
//!
//! Plays matches without any UI, the player steered by the hard AI, and
//! reports how they went. Uses the same session and scheduler as the
//! terminal game, fed with simulated time.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --ticks N       Tick cap per run (default: 5000)
//!   --seed N        RNG seed (default: 42)
//!   --runs N        Number of runs with incrementing seeds (default: 1)
//!   --mode M        single, ai-easy, ai-normal, ai-hard (default: ai-normal)
//!   --grid N        Board size (default: 30)
//!   --json          One JSON line per run on stdout
//!   --quiet         Only the final summary

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use snake_arena::arena::{
    Advance, AiController, Difficulty, FoodKind, Frame, Session, SnakeId, TickEvent,
};
use snake_arena::core::SchedulerState;
use snake_arena::{ArenaConfig, GameMode, TickScheduler};
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

// ── CLI Configuration ────────────────────────────────────────────────

struct SimConfig {
    ticks: u64,
    seed: u64,
    runs: u32,
    mode: GameMode,
    grid: i16,
    json: bool,
    quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: 5_000,
            seed: 42,
            runs: 1,
            mode: GameMode::Ai(Difficulty::Normal),
            grid: 30,
            json: false,
            quiet: false,
        }
    }
}

fn parse_args() -> Result<SimConfig, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || {
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match flag {
            "--ticks" => {
                config.ticks = value()?
                    .parse()
                    .map_err(|_| "--ticks requires a number".to_string())?
            }
            "--seed" => {
                config.seed = value()?
                    .parse()
                    .map_err(|_| "--seed requires a number".to_string())?
            }
            "--runs" => {
                config.runs = value()?
                    .parse()
                    .map_err(|_| "--runs requires a number".to_string())?
            }
            "--mode" => config.mode = value()?.parse()?,
            "--grid" => {
                config.grid = value()?
                    .parse()
                    .map_err(|_| "--grid requires a number".to_string())?
            }
            "--json" => config.json = true,
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 1;
    }

    if config.mode == GameMode::Multiplayer {
        return Err("multiplayer is server-driven and cannot be simulated".to_string());
    }
    if config.grid < 8 {
        return Err("--grid must be at least 8".to_string());
    }
    Ok(config)
}

fn print_usage() {
    eprintln!(
        "Snake Arena Headless Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --ticks N       Tick cap per run (default: 5000)\n\
         \x20 --seed N        RNG seed (default: 42)\n\
         \x20 --runs N        Number of runs with incrementing seeds (default: 1)\n\
         \x20 --mode M        single, ai-easy, ai-normal, ai-hard (default: ai-normal)\n\
         \x20 --grid N        Board size (default: 30)\n\
         \x20 --json          One JSON line per run on stdout\n\
         \x20 --quiet         Only the final summary\n\
         \x20 --help, -h      Show this help"
    );
}

// ── Run Statistics ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
struct RunStats {
    seed: u64,
    ticks: u64,
    game_time_ms: u64,
    final_score: u32,
    final_length: usize,
    fastest_interval_ms: u64,
    foods_eaten: BTreeMap<String, u32>,
    ai_foods_eaten: u32,
    specials_spawned: u32,
    deaths: Vec<String>,
    outcome: Option<String>,
}

fn food_label(kind: FoodKind) -> String {
    match kind {
        FoodKind::Normal => "normal".to_string(),
        FoodKind::Special(special) => special.name().to_string(),
    }
}

impl RunStats {
    fn new(seed: u64, start_interval_ms: u64) -> Self {
        Self {
            seed,
            fastest_interval_ms: start_interval_ms,
            ..Default::default()
        }
    }

    fn record(&mut self, frame: &Frame) {
        self.ticks = frame.tick;
        self.game_time_ms = frame.game_time_ms;
        self.final_score = frame.score;
        self.fastest_interval_ms = self.fastest_interval_ms.min(frame.tick_interval_ms);
        if let Some(player) = frame.local_snake() {
            self.final_length = player.body.len();
        }

        for event in &frame.events {
            match event {
                TickEvent::FoodEaten {
                    by: SnakeId::Player,
                    kind,
                    ..
                } => {
                    *self.foods_eaten.entry(food_label(*kind)).or_insert(0) += 1;
                }
                TickEvent::FoodEaten { by: SnakeId::Ai, .. } => self.ai_foods_eaten += 1,
                TickEvent::FoodSpawned { kind, .. } if kind.is_special() => {
                    self.specials_spawned += 1;
                }
                TickEvent::FoodSpawned { .. } => {}
                TickEvent::SnakeDied(death) => {
                    self.deaths
                        .push(format!("{}:{}", death.id.name(), death.cause));
                }
                TickEvent::MatchOver(outcome) => {
                    self.outcome = Some(outcome.cause.message().to_string());
                }
            }
        }
    }

    fn player_foods(&self) -> u32 {
        self.foods_eaten.values().sum()
    }
}

// ── Simulation ───────────────────────────────────────────────────────

fn run_simulation(config: &SimConfig, seed: u64) -> RunStats {
    let arena = ArenaConfig {
        seed: Some(seed),
        ..ArenaConfig::compact(config.grid)
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = Session::start(config.mode, arena.clone(), &mut rng);
    let mut scheduler = TickScheduler::for_driver(&session, arena.special_spawn_period_ms);
    let autopilot = AiController::new(Difficulty::Hard);
    let mut stats = RunStats::new(seed, session.tick_interval_ms());

    while stats.ticks < config.ticks && scheduler.state() == SchedulerState::Running {
        let steer = session.engine().and_then(|engine| {
            let me = engine.snake(SnakeId::Player)?;
            Some(autopilot.decide(me, &engine.snakes, &engine.foods, engine.grid(), &mut rng))
        });
        if let Some(direction) = steer {
            session.steer(direction);
        }

        // One interval of simulated time is exactly one tick
        let dt_ms = scheduler.interval_ms();
        for frame in scheduler.advance(&mut session, dt_ms, &mut rng) {
            stats.record(&frame);
        }
    }

    tracing::debug!(seed, ticks = stats.ticks, score = stats.final_score, "run finished");
    stats
}

// ── Reporting ────────────────────────────────────────────────────────

fn print_summary(stats: &RunStats) {
    println!("=== Run seed={} ===", stats.seed);
    println!("{:<20} {:>10}", "Ticks", stats.ticks);
    println!("{:<20} {:>9.1}s", "Game time", stats.game_time_ms as f64 / 1000.0);
    println!("{:<20} {:>10}", "Final score", stats.final_score);
    println!("{:<20} {:>10}", "Final length", stats.final_length);
    println!("{:<20} {:>8}ms", "Fastest interval", stats.fastest_interval_ms);
    println!("{:<20} {:>10}", "Specials spawned", stats.specials_spawned);
    println!("{:<20} {:>10}", "AI foods", stats.ai_foods_eaten);
    println!("Foods eaten:");
    for (kind, count) in &stats.foods_eaten {
        println!("  {kind:<18} {count:>10}");
    }
    match &stats.outcome {
        Some(outcome) => println!("Outcome: {outcome} ({})", stats.deaths.join(", ")),
        None => println!("Outcome: tick cap reached"),
    }
    println!();
}

fn print_multi_run_summary(all_stats: &[RunStats]) {
    let n = all_stats.len().max(1) as f64;
    let avg = |f: &dyn Fn(&RunStats) -> u64| all_stats.iter().map(f).sum::<u64>() as f64 / n;
    let min_max = |f: &dyn Fn(&RunStats) -> u64| {
        let values: Vec<u64> = all_stats.iter().map(f).collect();
        (
            values.iter().copied().min().unwrap_or(0),
            values.iter().copied().max().unwrap_or(0),
        )
    };

    println!("=== Summary ({} runs) ===", all_stats.len());
    println!("{:<20} {:>10} {:>10} {:>10}", "", "Min", "Avg", "Max");
    let rows: [(&str, &dyn Fn(&RunStats) -> u64); 3] = [
        ("Ticks", &|s: &RunStats| s.ticks),
        ("Score", &|s: &RunStats| s.final_score as u64),
        ("Foods", &|s: &RunStats| s.player_foods() as u64),
    ];
    for (label, f) in rows {
        let (lo, hi) = min_max(f);
        println!("{:<20} {:>10} {:>10.1} {:>10}", label, lo, avg(f), hi);
    }
    println!();

    let mut outcomes: BTreeMap<&str, u32> = BTreeMap::new();
    for s in all_stats {
        *outcomes
            .entry(s.outcome.as_deref().unwrap_or("tick cap"))
            .or_insert(0) += 1;
    }
    println!("Outcome distribution:");
    for (outcome, count) in &outcomes {
        println!("  {outcome}: {count} runs");
    }
    println!();
}

// ── Main ─────────────────────────────────────────────────────────────

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if !config.quiet {
        eprintln!(
            "Snake Arena Simulator: mode={} grid={} ticks<={} x {} run(s), seed={}",
            config.mode, config.grid, config.ticks, config.runs, config.seed,
        );
    }

    let mut all_stats = Vec::with_capacity(config.runs as usize);

    for run in 0..config.runs {
        let seed = config.seed + run as u64;
        let stats = run_simulation(&config, seed);

        if config.json {
            match serde_json::to_string(&stats) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("Failed to encode run {}: {e}", run + 1),
            }
        } else if config.runs == 1 {
            print_summary(&stats);
        } else if !config.quiet {
            println!(
                "  Run {}: ticks={} score={} foods={} outcome={}",
                run + 1,
                stats.ticks,
                stats.final_score,
                stats.player_foods(),
                stats.outcome.as_deref().unwrap_or("tick cap"),
            );
        }

        all_stats.push(stats);
    }

    if config.runs > 1 && !config.json {
        println!();
        print_multi_run_summary(&all_stats);
    }
}
