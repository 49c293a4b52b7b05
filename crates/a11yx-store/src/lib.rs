//! A11yX Store - persistence for host documents and snapshots
//!
//! Provides:
//! - SQLite schema with a checksummed migration runner
//! - Whole-document save/load of the node tree and private data buckets
//! - Atomic JSON snapshot files

pub mod db;
pub mod errors;
pub mod export;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use export::{read_snapshot, write_snapshot};
pub use repo::{load_document, save_document};
