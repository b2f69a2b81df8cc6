#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Tilemerge in the terminal.
//!
//! Moves are read from standard input one per line (`left`, `r`, `north`, ...)
//! and the board is printed after every committed move. `quit` ends the game
//! early.

mod board;
mod settings;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use tilemerge_core::{Command, Direction, Event, MoveRejection};
use tilemerge_world::{self as world, query, GameSession};

#[derive(Debug, Parser)]
#[command(author, version, about = "Slide and merge tiles until the board locks up")]
struct Cli {
    /// TOML file providing session configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Edge length of the board
    #[arg(long, value_name = "N")]
    size: Option<u32>,

    /// Seed for tile spawns (defaults to the current time)
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Probability that a spawned tile is a 2
    #[arg(long, value_name = "P")]
    two_probability: Option<f64>,

    /// Points awarded per unit of pre-merge tile value
    #[arg(long, value_name = "N")]
    score_multiplier: Option<u64>,
}

/// Entry point for the Tilemerge command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let overrides = settings::Overrides {
        grid_size: cli.size,
        two_probability: cli.two_probability,
        score_multiplier: cli.score_multiplier,
    };
    let config = settings::load(cli.config.as_deref(), &overrides)?;
    let seed = cli.seed.unwrap_or_else(settings::clock_seed);
    let size = config.grid_size;
    info!("starting a {size}x{size} game with seed {seed}");

    let mut events = Vec::new();
    let mut session =
        GameSession::start(config, seed, &mut events).context("failed to start session")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", board::render(&query::board_view(&session), 0))?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read move from stdin")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "q" | "quit" | "exit") {
            break;
        }

        let direction = match input.parse::<Direction>() {
            Ok(direction) => direction,
            Err(error) => {
                warn!("{error}");
                continue;
            }
        };

        events.clear();
        world::apply(&mut session, Command::Move { direction }, &mut events)?;
        // Nothing animates in a terminal, so every move settles immediately.
        world::apply(&mut session, Command::Settle, &mut events)?;

        if events.iter().any(|event| {
            matches!(
                event,
                Event::MoveIgnored {
                    reason: MoveRejection::NoChange,
                    ..
                }
            )
        }) {
            writeln!(stdout, "nothing moves {direction}")?;
            continue;
        }

        writeln!(
            stdout,
            "{}",
            board::render(&query::board_view(&session), query::score(&session))
        )?;
        if query::is_game_over(&session) {
            break;
        }
    }

    writeln!(
        stdout,
        "final score {} (highest tile {})",
        query::score(&session),
        query::highest_tile(&session)
    )?;
    Ok(())
}
