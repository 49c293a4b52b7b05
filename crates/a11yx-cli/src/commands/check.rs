//! Consistency check
//!
//! Usage: a11yx check --db <PATH> [--config <TOML>] [--dry-run]

use a11yx_core::ops::{sync_page, AnnotationState};
use a11yx_store::db::open_document_db;
use a11yx_store::repo::{load_document, save_document};
use clap::Args;
use std::path::PathBuf;

use crate::commands::load_config;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(long)]
    pub db: PathBuf,

    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report repairs without saving them
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref())?;
    let mut conn = open_document_db(&args.db)?;
    let mut doc = load_document(&conn)?
        .ok_or_else(|| format!("{} holds no document; run `a11yx init` first", args.db.display()))?;

    let mut state = AnnotationState::load(&doc, config.key_space())?;
    let report = sync_page(&mut state, &mut doc)?;

    println!("removed: {}", report.removed_count);
    println!("rekeyed: {}", report.rekeyed.len());
    println!("relocated: {}", report.relocated.len());
    println!("adopted: {}", report.adopted.len());
    println!("renumbered: {}", report.renumbered.len());

    if report.is_clean() {
        println!("✓ Document is consistent");
    } else if args.dry_run {
        println!("Repairs not saved (--dry-run)");
    } else {
        save_document(&mut conn, &doc)?;
        println!("✓ Repairs saved");
    }
    Ok(())
}
