use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::app::App;
use grid_snake::config::{
    DEFAULT_INITIAL_LENGTH, DEFAULT_TICK_INTERVAL_MS, FoodPlacement, GameConfig, GridSize,
};
use grid_snake::error::AppError;
use grid_snake::game_loop::GameLoop;
use grid_snake::input::InputHandler;
use grid_snake::logging::init_tracing;
use grid_snake::renderer;
use grid_snake::score::{HighScoreStore, JsonFileStore, MemoryStore};
use grid_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use tracing::{info, warn};

/// Upper bound on how long one frame waits for input.
const FRAME_BUDGET: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about = "Snake on a bounded grid in your terminal")]
struct Cli {
    /// Grid width in cells. Defaults to what fits the terminal.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells. Defaults to what fits the terminal.
    #[arg(long)]
    height: Option<u16>,

    /// Starting snake length.
    #[arg(long, default_value_t = DEFAULT_INITIAL_LENGTH)]
    length: usize,

    /// Milliseconds between ticks.
    #[arg(long = "tick-ms", default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    tick_ms: u64,

    /// Seed for food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Pick food uniformly among free cells instead of sampling.
    #[arg(long = "exact-food")]
    exact_food: bool,

    /// Keep the high score in memory only.
    #[arg(long = "no-persist")]
    no_persist: bool,

    /// Append tracing output to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;
    install_panic_hook();

    let mut session = TerminalSession::enter()?;
    let fitting = session.fitting_grid()?;
    let config = game_config(&cli, fitting);
    let follow_terminal = cli.width.is_none() && cli.height.is_none();

    let store: Box<dyn HighScoreStore> = if cli.no_persist {
        Box::new(MemoryStore::default())
    } else {
        Box::new(JsonFileStore::in_data_dir())
    };

    info!(
        width = config.grid.width,
        height = config.grid.height,
        tick_ms = config.tick_interval.as_millis(),
        "starting"
    );

    let mut app = App::new(GameLoop::new(config, store), follow_terminal);
    run(&mut session, &mut app)?;

    match app.game().store().load() {
        Ok(high_score) => info!(high_score, "exiting"),
        Err(error) => warn!(%error, "exiting without a readable high score"),
    }
    Ok(())
}

fn run(session: &mut TerminalSession, app: &mut App) -> Result<(), AppError> {
    let mut input = InputHandler::new();

    while !app.should_quit() {
        let now = Instant::now();
        let snapshot = app.game().snapshot(now);
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &snapshot, app.dialog()))?;

        let timeout = app
            .game()
            .next_tick_at()
            .map_or(FRAME_BUDGET, |due| {
                due.saturating_duration_since(now).min(FRAME_BUDGET)
            });
        if let Some(game_input) = input.poll_input(timeout)? {
            app.handle_input(game_input, Instant::now());
        }

        app.resize(session.fitting_grid()?);
        app.tick(Instant::now());
    }

    Ok(())
}

fn game_config(cli: &Cli, fitting: GridSize) -> GameConfig {
    GameConfig {
        grid: GridSize::new(
            cli.width.unwrap_or(fitting.width),
            cli.height.unwrap_or(fitting.height),
        ),
        initial_length: cli.length,
        tick_interval: Duration::from_millis(cli.tick_ms),
        food_placement: if cli.exact_food {
            FoodPlacement::Exact
        } else {
            FoodPlacement::Sampled
        },
        seed: cli.seed,
    }
}
