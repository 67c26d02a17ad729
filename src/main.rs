use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::config::{ConfigOverrides, FRAME_INTERVAL_MS, GameConfig, default_log_path};
use grid_snake::driver::{Flow, Session};
use grid_snake::engine::GameEngine;
use grid_snake::error::AppError;
use grid_snake::logging;
use grid_snake::terminal_runtime::GameTerminal;
use log::info;

#[derive(Debug, Parser)]
#[command(name = "grid-snake", version, about = "Grid-based snake in the terminal")]
struct Cli {
    /// Board width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Board height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Starting head column.
    #[arg(long = "start-x", allow_negative_numbers = true)]
    start_x: Option<i32>,

    /// Starting head row.
    #[arg(long = "start-y", allow_negative_numbers = true)]
    start_y: Option<i32>,

    /// Milliseconds between simulation ticks.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Seed for food placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Color theme: classic, ocean or neon.
    #[arg(long)]
    theme: Option<String>,

    /// JSON config file; defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file path.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    logging::setup(&log_path, cli.debug)?;

    let config = GameConfig::load(cli.config.as_deref())?.with_overrides(ConfigOverrides {
        width: cli.width,
        height: cli.height,
        start_x: cli.start_x,
        start_y: cli.start_y,
        tick_ms: cli.tick_ms,
        seed: cli.seed,
        theme: cli.theme,
    });
    config.validate()?;
    info!("starting with {config:?}");

    let engine = match config.seed {
        Some(seed) => GameEngine::with_seed(config.bounds(), config.start(), seed)?,
        None => GameEngine::new(config.bounds(), config.start())?,
    };
    let session = Session::new(engine, config.start(), config.tick_interval(), Instant::now());

    run(session, &config)?;
    info!("exiting");
    Ok(())
}

fn run(mut session: Session, config: &GameConfig) -> Result<(), AppError> {
    let mut terminal = GameTerminal::open()?;
    let theme = config.theme();
    let frame_interval = Duration::from_millis(FRAME_INTERVAL_MS);

    loop {
        terminal.draw(&session.snapshot(), theme)?;

        let frame_deadline = Instant::now() + frame_interval;
        loop {
            let now = Instant::now();
            if now >= frame_deadline {
                break;
            }

            let wait = session
                .time_until_tick(now)
                .map_or(frame_deadline - now, |tick_wait| {
                    tick_wait.min(frame_deadline - now)
                });

            if let Some(game_input) = terminal.next_input(wait)? {
                if session.handle_input(game_input, Instant::now())? == Flow::Quit {
                    return Ok(());
                }
            }

            session.update(Instant::now());
        }
    }
}
