//! Demo document creation
//!
//! Usage: a11yx init --db <PATH> [--containers <N>]

use a11yx_core::{HostDocument, MemoryDocument};
use a11yx_store::db::open_document_db;
use a11yx_store::repo::{load_document, save_document};
use clap::Args;
use std::path::PathBuf;

/// Child nodes created inside every container
const ITEMS_PER_CONTAINER: usize = 3;

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long)]
    pub db: PathBuf,

    /// Number of top-level frames on the page
    #[arg(long, default_value_t = 1)]
    pub containers: usize,

    /// Replace a document that is already stored
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = args.db.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut conn = open_document_db(&args.db)?;
    if !args.force && load_document(&conn)?.is_some() {
        return Err(format!(
            "{} already holds a document (use --force to replace it)",
            args.db.display()
        )
        .into());
    }

    let mut doc = MemoryDocument::new();
    let page = doc.page();
    for c in 0..args.containers {
        let frame = doc.create_node(&page, &format!("frame-{}", c))?;
        for i in 0..ITEMS_PER_CONTAINER {
            doc.create_node(&frame, &format!("item-{}-{}", c, i))?;
        }
    }

    let saved = save_document(&mut conn, &doc)?;
    println!(
        "✓ Initialized {} ({} nodes, digest: {})",
        args.db.display(),
        saved.nodes,
        saved.digest
    );
    Ok(())
}
