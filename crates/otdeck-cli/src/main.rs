//! otdeck CLI
//!
//! Runs protocol setup manifests against a simulated deck.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// otdeck - deck slot allocation for OT-2 protocols
#[derive(Parser, Debug)]
#[command(name = "otdeck")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Deck layout file (TOML); defaults to the standard OT-2 deck
    #[arg(long, global = true)]
    layout: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a setup manifest and print the command log
    Setup {
        /// Setup manifest (TOML)
        manifest: PathBuf,
    },

    /// Run a setup manifest and show what is in every slot
    Deck {
        /// Setup manifest (TOML)
        manifest: PathBuf,
    },

    /// Run a setup manifest and show the slot custom labware would get next
    NextSlot {
        /// Setup manifest (TOML)
        manifest: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let layout = commands::load_layout(cli.layout.as_deref())?;

    match cli.command {
        Commands::Setup { manifest } => {
            commands::setup(&manifest, layout)?;
        }
        Commands::Deck { manifest } => {
            commands::deck(&manifest, layout)?;
        }
        Commands::NextSlot { manifest } => {
            commands::next_slot(&manifest, layout)?;
        }
    }

    Ok(())
}
