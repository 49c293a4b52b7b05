//! Snapshot diff command
//!
//! Usage: a11yx diff --before <JSON> --after <JSON> [--json]

use a11yx_core::diff::{compute_diff, render_human_summary};
use a11yx_store::read_snapshot;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    #[arg(long)]
    pub before: PathBuf,

    #[arg(long)]
    pub after: PathBuf,

    /// Print the full diff as JSON instead of the summary
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let before = read_snapshot(&args.before)?;
    let after = read_snapshot(&args.after)?;

    let diff = compute_diff(&before, &after);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    } else {
        print!("{}", render_human_summary(&diff));
    }
    Ok(())
}
