//! Host document persistence
//!
//! A document is stored whole: saving replaces every node and data row in
//! one transaction, so a reader never sees half of a save.

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;

use a11yx_core::host::{MemoryDocument, NodeParts};
use a11yx_core::ExError;
use a11yx_core_types::NodeId;
use rusqlite::{Connection, OptionalExtension};
use sha2::{Digest, Sha256};

use crate::errors::{from_rusqlite, serialization_error, Result};

/// Summary of one save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDocument {
    pub nodes: usize,
    pub data_entries: usize,
    /// SHA-256 over the flattened tree, stable across save/load cycles
    pub digest: String,
}

/// Content digest of a document (node ids, names, structure and data)
///
/// # Errors
///
/// Returns `Serialization` if the tree cannot be encoded.
pub fn document_digest(doc: &MemoryDocument) -> Result<String> {
    let parts = doc.to_parts();
    let bytes = serde_json::to_vec(&parts).map_err(|e| serialization_error("document_digest", e))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Replace the stored document with `doc`
///
/// # Errors
///
/// Returns `Persistence` if any statement fails; nothing is written then.
pub fn save_document(conn: &mut Connection, doc: &MemoryDocument) -> Result<SavedDocument> {
    let parts = doc.to_parts();
    let digest = document_digest(doc)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute("DELETE FROM node_data", []).map_err(from_rusqlite)?;
    tx.execute("DELETE FROM nodes", []).map_err(from_rusqlite)?;

    let mut data_entries = 0;
    for (position, part) in parts.iter().enumerate() {
        tx.execute(
            "INSERT INTO nodes (position, id, parent_id, name) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                position as i64,
                part.id.as_str(),
                part.parent.as_ref().map(|p| p.as_str()),
                part.name,
            ],
        )
        .map_err(from_rusqlite)?;

        for (key, value) in &part.data {
            tx.execute(
                "INSERT INTO node_data (node_id, key, value) VALUES (?1, ?2, ?3)",
                rusqlite::params![part.id.as_str(), key, value],
            )
            .map_err(from_rusqlite)?;
            data_entries += 1;
        }
    }

    for (key, value) in [
        ("document_digest", digest.clone()),
        ("saved_at", chrono::Utc::now().to_rfc3339()),
    ] {
        tx.execute(
            "INSERT INTO document_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )
        .map_err(from_rusqlite)?;
    }

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(nodes = parts.len(), data_entries, digest = %digest, "saved document");
    Ok(SavedDocument {
        nodes: parts.len(),
        data_entries,
        digest,
    })
}

/// Load the stored document, or `None` if nothing was saved yet
///
/// # Errors
///
/// - `Persistence` if a query fails
/// - `InvalidInput` if the stored tree is malformed
pub fn load_document(conn: &Connection) -> Result<Option<MemoryDocument>> {
    let mut data: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    {
        let mut stmt = conn
            .prepare("SELECT node_id, key, value FROM node_data")
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(from_rusqlite)?;
        for row in rows {
            let (node_id, key, value) = row.map_err(from_rusqlite)?;
            data.entry(node_id).or_default().insert(key, value);
        }
    }

    let mut stmt = conn
        .prepare("SELECT id, parent_id, name FROM nodes ORDER BY position")
        .map_err(from_rusqlite)?;
    let parts = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(from_rusqlite)?
        .map(|row| {
            row.map(|(id, parent, name)| NodeParts {
                data: data.remove(&id).unwrap_or_default(),
                id: NodeId::new(id),
                parent: parent.map(NodeId::new),
                name,
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    if parts.is_empty() {
        return Ok(None);
    }
    let doc = MemoryDocument::from_parts(parts)
        .map_err(|e| ExError::from(e).with_op("load_document"))?;
    Ok(Some(doc))
}

/// Digest recorded by the last save
///
/// # Errors
///
/// Returns `Persistence` if the query fails.
pub fn stored_digest(conn: &Connection) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM document_meta WHERE key = 'document_digest'",
        [],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}
