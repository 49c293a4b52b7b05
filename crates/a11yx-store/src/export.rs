//! Snapshot files
//!
//! Snapshots are written with temp→rename so a crash never leaves a
//! truncated file where a reader expects JSON.

#![allow(clippy::result_large_err)]

use std::fs;
use std::path::Path;

use a11yx_core::diff::parse_snapshot_bytes;
use a11yx_core::PageSnapshot;

use crate::errors::{io_error, serialization_error, Result};

/// Atomically write bytes to a file, creating parent directories
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_snapshot_dir", e))?;
    }

    let temp_path = target_path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| io_error("write_snapshot_temp", e))?;
    fs::rename(&temp_path, target_path).map_err(|e| io_error("rename_snapshot_temp", e))?;

    Ok(())
}

/// Write `snapshot` as pretty JSON
pub fn write_snapshot(path: &Path, snapshot: &PageSnapshot) -> Result<()> {
    let mut bytes =
        serde_json::to_vec_pretty(snapshot).map_err(|e| serialization_error("write_snapshot", e))?;
    bytes.push(b'\n');
    atomic_write(path, &bytes)
}

/// Read a snapshot written by [`write_snapshot`]
///
/// Rejects snapshots from a newer schema version.
pub fn read_snapshot(path: &Path) -> Result<PageSnapshot> {
    let bytes = fs::read(path).map_err(|e| io_error("read_snapshot", e))?;
    parse_snapshot_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("subdir").join("snap.json");

        atomic_write(&target, b"{}").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"{}");
    }

    #[test]
    fn test_no_tmp_files_after_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("snap.json");

        atomic_write(&target, b"clean").unwrap();

        let leftovers = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_snapshot(&temp_dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), "ERR_IO");
    }
}
