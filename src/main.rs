mod ui;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use snake_arena::arena::{Advance, Direction, FoodKind, Session, TickEvent};
use snake_arena::core::SchedulerState;
use snake_arena::{ArenaConfig, GameMode, TickScheduler};
use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use ui::Hud;

const LOG_FILE: &str = "snake-arena.log";

struct Options {
    mode: GameMode,
    config: ArenaConfig,
}

enum Command {
    Play(Options),
    Help,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut mode = GameMode::Single;
    let mut config = ArenaConfig::default();
    let mut i = 0;
    while i < args.len() {
        let value = |i: usize| {
            args.get(i + 1)
                .ok_or_else(|| format!("{} requires a value", args[i]))
        };
        match args[i].as_str() {
            "--mode" => {
                mode = value(i)?.parse()?;
                i += 1;
            }
            "--seed" => {
                let seed = value(i)?
                    .parse()
                    .map_err(|_| "--seed requires a number".to_string())?;
                config.seed = Some(seed);
                i += 1;
            }
            "--grid" => {
                let grid: i16 = value(i)?
                    .parse()
                    .map_err(|_| "--grid requires a number".to_string())?;
                if grid < 8 {
                    return Err("--grid must be at least 8".to_string());
                }
                config.grid_size = grid;
                i += 1;
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(Command::Play(Options { mode, config }))
}

fn print_help() {
    println!("Snake Arena - terminal snake\n");
    println!("Usage: snake-arena [OPTIONS]\n");
    println!("Options:");
    println!("  --mode M   single, ai-easy, ai-normal, ai-hard (default: single)");
    println!("  --seed N   RNG seed for a reproducible match");
    println!("  --grid N   Board size in cells (default: 30)");
    println!("  --help     Show this help message");
    println!("\nControls: arrows move, p pause, r restart, q quit");
    println!("Logs are written to {LOG_FILE} (filter with RUST_LOG).");
}

/// Route tracing output to a file; the terminal belongs to the UI.
fn init_logging() -> io::Result<()> {
    let file = File::create(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn event_message(event: &TickEvent) -> String {
    let food_name = |kind: &FoodKind| match kind {
        FoodKind::Normal => "food",
        FoodKind::Special(special) => special.name(),
    };
    match event {
        TickEvent::FoodEaten { by, kind, .. } => format!("{} ate {}", by.name(), food_name(kind)),
        TickEvent::FoodSpawned { kind, .. } => format!("{} food appeared", food_name(kind)),
        TickEvent::SnakeDied(death) => format!("{} died ({})", death.id.name(), death.cause),
        TickEvent::MatchOver(outcome) => outcome.cause.message().to_string(),
    }
}

struct App {
    mode: GameMode,
    config: ArenaConfig,
    rng: StdRng,
    session: Session,
    scheduler: TickScheduler,
    hud: Hud,
}

impl App {
    fn new(options: Options) -> Self {
        let mut rng = match options.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let session = Session::start(options.mode, options.config.clone(), &mut rng);
        let scheduler =
            TickScheduler::for_driver(&session, options.config.special_spawn_period_ms);
        Self {
            mode: options.mode,
            config: options.config,
            rng,
            session,
            scheduler,
            hud: Hud {
                mode: options.mode,
                paused: false,
                last_event: None,
            },
        }
    }

    fn restart(&mut self) {
        self.session = Session::start(self.mode, self.config.clone(), &mut self.rng);
        self.scheduler.restart(self.session.tick_interval_ms());
        self.hud.paused = false;
        self.hud.last_event = None;
        tracing::info!(mode = %self.mode, "match restarted");
    }

    /// Returns false when the player asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let direction = match code {
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.scheduler.toggle_pause();
                self.hud.paused = self.scheduler.state() == SchedulerState::Paused;
                None
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.restart();
                None
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return false,
            _ => None,
        };
        if let Some(direction) = direction {
            if self.scheduler.is_running() {
                self.session.steer(direction);
            }
        }
        true
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    let mut view = app.session.frame();
    let mut last = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, &view, &app.hud))?;

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if !app.handle_key(key.code) {
                        return Ok(());
                    }
                    if matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R')) {
                        view = app.session.frame();
                        last = Instant::now();
                    }
                }
            }
        }

        let now = Instant::now();
        let dt_ms = now.duration_since(last).as_millis() as u64;
        last = now;

        for frame in app.scheduler.advance(&mut app.session, dt_ms, &mut app.rng) {
            if let Some(event) = frame.events.last() {
                app.hud.last_event = Some(event_message(event));
            }
            view = frame;
        }
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Command::Play(options)) => options,
        Ok(Command::Help) => {
            print_help();
            return Ok(());
        }
        Err(message) => {
            eprintln!("{message}");
            eprintln!("Run 'snake-arena --help' for usage.");
            std::process::exit(1);
        }
    };

    if options.mode == GameMode::Multiplayer {
        eprintln!("Multiplayer needs a server transport; this build only plays locally.");
        std::process::exit(1);
    }

    if let Err(e) = init_logging() {
        eprintln!("Warning: could not open {LOG_FILE}: {e}");
    }

    let mut app = App::new(options);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
