//! Diff output types
//!
//! Collections are `BTreeMap`s and sorted `Vec`s so serialized output is
//! deterministic.

use std::collections::BTreeMap;

use a11yx_core_types::{LinkId, NodeId};
use serde::{Deserialize, Serialize};

use crate::model::AnnotationKind;
use crate::snapshot::SnapshotEntry;

pub const DIFF_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeClass {
    Added,
    Removed,
    Moved,
    Updated,
    Unchanged,
}

impl ChangeClass {
    pub const ALL: [ChangeClass; 5] = [
        ChangeClass::Added,
        ChangeClass::Removed,
        ChangeClass::Moved,
        ChangeClass::Updated,
        ChangeClass::Unchanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeClass::Added => "added",
            ChangeClass::Removed => "removed",
            ChangeClass::Moved => "moved",
            ChangeClass::Updated => "updated",
            ChangeClass::Unchanged => "unchanged",
        }
    }
}

/// Classification of one link id with both sides for repaint decisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub link_id: LinkId,
    pub class: ChangeClass,
    pub kind: AnnotationKind,
    pub before: Option<SnapshotEntry>,
    pub after: Option<SnapshotEntry>,
}

impl DiffEntry {
    /// The side that describes the annotation now (before, for removals)
    pub fn current(&self) -> Option<&SnapshotEntry> {
        self.after.as_ref().or(self.before.as_ref())
    }

    pub fn order(&self) -> u32 {
        self.current().map(|e| e.order).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffIdentity {
    pub before_semantic_digest: String,
    pub after_semantic_digest: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffClassification {
    /// Every entry unchanged and every order list equal
    Identical,
    Changed,
}

/// Integrity problem found inside one of the two snapshots
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvariantViolationEntry {
    /// Two entries of one list claim the same order
    DuplicateOrder {
        which: String,
        container: NodeId,
        kind: AnnotationKind,
        order: u32,
    },
    /// List length differs from the number of live entries of that
    /// container and kind
    ListLengthMismatch {
        which: String,
        container: NodeId,
        kind: AnnotationKind,
        listed: usize,
        live: usize,
    },
    /// A listed link id has no entry in the snapshot
    DanglingListEntry {
        which: String,
        container: NodeId,
        kind: AnnotationKind,
        link_id: LinkId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub diff_schema_version: u32,
    pub identity: DiffIdentity,
    pub classification: DiffClassification,
    pub entries: BTreeMap<LinkId, DiffEntry>,
    pub invariant_violations: Vec<InvariantViolationEntry>,
}

impl DiffResult {
    pub fn class_of(&self, link_id: &LinkId) -> Option<ChangeClass> {
        self.entries.get(link_id).map(|e| e.class)
    }

    /// Link ids of one class, in link-id order
    pub fn links_in(&self, class: ChangeClass) -> Vec<&LinkId> {
        self.entries
            .values()
            .filter(|e| e.class == class)
            .map(|e| &e.link_id)
            .collect()
    }

    pub fn entries_in(&self, class: ChangeClass) -> impl Iterator<Item = &DiffEntry> {
        self.entries.values().filter(move |e| e.class == class)
    }

    pub fn counts(&self) -> BTreeMap<ChangeClass, usize> {
        let mut counts: BTreeMap<ChangeClass, usize> =
            ChangeClass::ALL.iter().map(|c| (*c, 0)).collect();
        for entry in self.entries.values() {
            *counts.entry(entry.class).or_default() += 1;
        }
        counts
    }

    pub fn has_changes(&self) -> bool {
        self.entries
            .values()
            .any(|e| e.class != ChangeClass::Unchanged)
    }
}
