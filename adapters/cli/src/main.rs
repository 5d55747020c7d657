#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates Conquest boards and plays them.

mod config;
mod play;
mod render;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use conquest_system_bootstrap::Bootstrap;
use conquest_world::query;
use log::info;

/// Conquest - procedurally generated territory battles
#[derive(Parser, Debug)]
#[command(name = "conquest")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file (default: built-in settings)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed overriding the configured one
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a board and print it
    Generate,
    /// Generate a board and play it from standard input
    Play,
    /// Print the effective configuration as TOML
    Config,
}

/// Entry point for the Conquest command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = config::load(args.config.as_deref(), args.seed)?;
    let bootstrap = Bootstrap::new(config);

    match args.command.unwrap_or(Commands::Play) {
        Commands::Generate => {
            let world = bootstrap
                .build_world()
                .context("failed to generate a board")?;
            print!("{}", render::board(&query::board_view(&world)));
        }
        Commands::Play => {
            let mut world = bootstrap
                .build_world()
                .context("failed to generate a board")?;
            info!("starting game with seed {:#x}", config.generator.seed);
            let stdin = io::stdin();
            play::run(&mut world, stdin.lock(), &mut io::stdout())?;
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
