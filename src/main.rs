//! Blocktris — classic falling-block puzzle game in the terminal.

mod app;
mod arena;
mod catalog;
mod collision;
mod input;
mod line_clear;
mod player;
mod render;
mod session;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

/// Options derived from CLI that affect game behaviour.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Piece sequence seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Zero the score when the board is wiped after topping out.
    pub reset_score_on_game_over: bool,
}

impl From<&Args> for GameConfig {
    fn from(args: &Args) -> Self {
        Self {
            seed: args.seed,
            reset_score_on_game_over: args.reset_score_on_game_over,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let theme = match theme::Theme::load(args.theme.as_deref()) {
        Ok(t) => t,
        Err(e) => {
            warn!(error = %e, "theme not loaded, using defaults");
            theme::Theme::default()
        }
    };
    let config = GameConfig::from(&args);
    info!(?config, "starting blocktris");

    let mut app = App::new(&args, &config, theme);
    app.run()?;
    Ok(())
}

/// Logs go to `--log-file` only; stdout belongs to the game screen.
fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let level = match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(level)
        .init();
    info!("logging initialized at level: {}", level);
    Ok(())
}

/// Falling-block puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blocktris",
    version,
    about = "Falling-block puzzle in the terminal. Complete rows to clear them and score.",
    long_about = "Blocktris is a small falling-block puzzle game for the terminal.\n\n\
        Pieces fall one row per second. Fill a row edge-to-edge to clear it and score a point. \
        When the stack reaches the top row the board is wiped and play continues.\n\n\
        CONTROLS:\n  Left/Right  h/l   Move          Up    k   Rotate\n  \
        Down        j     Soft drop     Space/Enter Fast drop (no steering until the piece lands)\n  \
        q / Esc           Quit"
)]
pub struct Args {
    /// Path to theme file (`theme[key]="#RRGGBB"`; keys piece0..piece6, background, border, text, title).
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Seed for the piece sequence (same seed, same pieces).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Target frames per second; gravity uses measured time, not this rate.
    #[arg(long, default_value = "60", value_name = "RATE", value_parser = clap::value_parser!(u32).range(1..=240))]
    pub frame_rate: u32,

    /// Reset the score to zero when the board is wiped after topping out.
    #[arg(long)]
    pub reset_score_on_game_over: bool,

    /// Write logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log verbosity (-v = INFO, -vv = DEBUG, -vvv = TRACE). Only used with --log-file.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
