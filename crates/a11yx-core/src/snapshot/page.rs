use std::collections::BTreeMap;

use a11yx_core_types::{LinkId, NodeId};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::host::HostDocument;
use crate::model::{AnnotationKind, AnnotationPayload, AnnotationRecord};
use crate::ops::AnnotationState;
use crate::snapshot::digest::compute_semantic_digest;

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// One live annotation as seen at capture time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub node: NodeId,
    pub container: NodeId,
    pub kind: AnnotationKind,
    pub payload: AnnotationPayload,
    pub order: u32,
}

impl From<AnnotationRecord> for SnapshotEntry {
    fn from(record: AnnotationRecord) -> Self {
        Self {
            node: record.node_ref,
            container: record.container,
            kind: record.kind,
            payload: record.payload,
            order: record.order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderListEntry {
    pub container: NodeId,
    pub kind: AnnotationKind,
    pub links: Vec<LinkId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub snapshot_schema_version: u32,
    /// RFC3339; not part of the semantic digest
    pub captured_at: String,
    pub page: NodeId,
    pub entries: BTreeMap<LinkId, SnapshotEntry>,
    pub lists: Vec<OrderListEntry>,
    pub semantic_digest: String,
}

impl PageSnapshot {
    /// Baseline for a page that has never been painted
    pub fn empty(page: NodeId) -> Self {
        let mut snapshot = Self {
            snapshot_schema_version: SNAPSHOT_SCHEMA_VERSION,
            captured_at: chrono::Utc::now().to_rfc3339(),
            page,
            entries: BTreeMap::new(),
            lists: Vec::new(),
            semantic_digest: String::new(),
        };
        snapshot.semantic_digest = compute_semantic_digest(&snapshot).unwrap_or_default();
        snapshot
    }

    /// Capture every live record and order list of the page
    ///
    /// Run after [`crate::ops::sync_page`]; a link carried by several nodes
    /// is captured at its first carrier only.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if stored data is corrupt.
    pub fn capture(state: &AnnotationState, host: &dyn HostDocument) -> Result<Self> {
        let entries = state
            .registry
            .scan(host)?
            .into_iter()
            .filter_map(|(link_id, records)| {
                records
                    .into_iter()
                    .next()
                    .map(|r| (link_id, SnapshotEntry::from(r)))
            })
            .collect();
        let lists = state
            .orders
            .iter()
            .map(|(key, links)| OrderListEntry {
                container: key.container.clone(),
                kind: key.kind,
                links: links.clone(),
            })
            .collect();

        let mut snapshot = Self {
            snapshot_schema_version: SNAPSHOT_SCHEMA_VERSION,
            captured_at: chrono::Utc::now().to_rfc3339(),
            page: host.page(),
            entries,
            lists,
            semantic_digest: String::new(),
        };
        snapshot.semantic_digest = compute_semantic_digest(&snapshot)?;
        Ok(snapshot)
    }

    pub fn entry(&self, link_id: &LinkId) -> Option<&SnapshotEntry> {
        self.entries.get(link_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
