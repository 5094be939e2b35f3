//! Recall — corpus-to-collection flashcard sync CLI.
//!
//! # Usage
//!
//! ```text
//! recall sync [ROOT] [--url http://127.0.0.1:8765] [--dry-run]
//! recall fill [ROOT]
//! recall decks [ROOT] [--url ...] [--export-only]
//! recall status [ROOT] [--json]
//! ```
//!
//! The corpus root is the directory holding `cards/` (and, for `decks`,
//! `practices/`). It defaults to the current directory.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{decks::DecksArgs, fill::FillArgs, status::StatusArgs, sync::SyncArgs};

#[derive(Parser, Debug)]
#[command(
    name = "recall",
    version,
    about = "One-way sync of a CSV flashcard corpus into a study collection",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile the corpus against the remote collection.
    Sync(SyncArgs),

    /// Normalize corpus CSVs: ensure required columns, fill defaults.
    Fill(FillArgs),

    /// Export filtered-deck specs and upsert practice description notes.
    Decks(DecksArgs),

    /// Summarize the local corpus (no gateway contact).
    Status(StatusArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Fill(args) => args.run(),
        Commands::Decks(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}
