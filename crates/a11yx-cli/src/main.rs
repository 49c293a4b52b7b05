//! A11yX CLI
//!
//! Command-line interface for replaying UI sessions against stored documents

use a11yx_core::logging_facility::{init, Profile};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "a11yx")]
#[command(about = "A11yX - accessibility annotations for design documents", long_about = None)]
struct Cli {
    /// Emit JSON log lines on stderr instead of human-readable ones
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a demo document
    Init(commands::init::InitArgs),
    /// Apply a script of UI messages to a stored document
    Replay(commands::replay::ReplayArgs),
    /// Compare two snapshot files
    Diff(commands::diff::DiffArgs),
    /// Prune orphans, split duplicates and renumber lists
    Check(commands::check::CheckArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args),
        Commands::Replay(args) => commands::replay::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Check(args) => commands::check::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
