//! Semantic digest of a snapshot
//!
//! Covers entries and lists only, so two captures of the same state taken at
//! different times share a digest.

use sha2::{Digest, Sha256};

use crate::errors::Result;
use crate::snapshot::page::PageSnapshot;

/// Hex-encoded SHA256 over the canonical JSON of entries and lists
///
/// # Errors
///
/// Returns `Serialization` if JSON serialization fails.
pub fn compute_semantic_digest(snapshot: &PageSnapshot) -> Result<String> {
    let canonical = serde_json::to_string(&(&snapshot.entries, &snapshot.lists))?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
