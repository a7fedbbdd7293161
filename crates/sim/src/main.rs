//! Ability engine simulation driver.
//!
//! Grants abilities from a catalog to a single actor, plays a cast script at
//! a fixed step rate and prints every event the engine emits.
//!
//! ```bash
//! ability-sim run --data-dir crates/sim/data --cast fireball drain_life
//! ability-sim formulas --tag cooldown
//! RUST_LOG=ability::cast=debug ability-sim run
//! ```

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Formulas, Run};

/// Ability engine simulation driver
#[derive(Parser)]
#[command(name = "ability-sim")]
#[command(about = "Play ability casts through the engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a cast script against a catalog
    Run(Run),

    /// List built-in formulas
    Formulas(Formulas),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for ABILITY_* overrides)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::Formulas(cmd) => cmd.execute(),
    }
}
