//! Headless combat simulator.
//!
//! Runs fights from content data without any presentation layer, for
//! balance checks and smoke tests. Run with: `combat-sim <command>`

mod commands;
mod summary;

use anyhow::Result;
use clap::Parser;
use commands::{Catalog, Duel, InspectAuras};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Headless combat simulator
#[derive(Parser)]
#[command(name = "combat-sim")]
#[command(about = "Run and inspect headless fights", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Fight the first two fighters of a roster against each other
    Duel(Duel),

    /// List auras, talents and affixes of a content set
    Catalog(Catalog),

    /// Decode a saved aura list
    InspectAuras(InspectAuras),
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Duel(cmd) => cmd.execute(),
        Command::Catalog(cmd) => cmd.execute(),
        Command::InspectAuras(cmd) => cmd.execute(),
    }
}

/// Log to stderr so stdout carries only the report.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
