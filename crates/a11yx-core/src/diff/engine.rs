//! Snapshot diff computation
//!
//! The entry point is [`compute_diff`]; [`parse_snapshot_bytes`] reads a
//! snapshot file for the CLI.

use std::collections::{BTreeMap, BTreeSet};

use a11yx_core_types::{LinkId, NodeId};

use crate::diff::model::{
    ChangeClass, DiffClassification, DiffEntry, DiffIdentity, DiffResult,
    InvariantViolationEntry, DIFF_SCHEMA_VERSION,
};
use crate::errors::{ExError, ExErrorKind};
use crate::model::AnnotationKind;
use crate::snapshot::{PageSnapshot, SnapshotEntry, SNAPSHOT_SCHEMA_VERSION};

/// Classify one link id from its two sides
///
/// Payload equality is by value. When payload and position both changed the
/// entry is `Updated`: new badge content needs a redraw, which also places
/// it, while a move only repositions.
pub fn classify(before: Option<&SnapshotEntry>, after: Option<&SnapshotEntry>) -> Option<ChangeClass> {
    match (before, after) {
        (None, None) => None,
        (None, Some(_)) => Some(ChangeClass::Added),
        (Some(_), None) => Some(ChangeClass::Removed),
        (Some(b), Some(a)) => Some(if b.payload != a.payload {
            ChangeClass::Updated
        } else if b.order != a.order || b.container != a.container || b.node != a.node {
            ChangeClass::Moved
        } else {
            ChangeClass::Unchanged
        }),
    }
}

/// Compute a structured, deterministic diff between two snapshots
///
/// Every link id present in either snapshot appears exactly once in
/// `entries`. Integrity problems inside either snapshot are collected in
/// `invariant_violations` and never fail the diff.
pub fn compute_diff(previous: &PageSnapshot, current: &PageSnapshot) -> DiffResult {
    let all_ids: BTreeSet<&LinkId> = previous
        .entries
        .keys()
        .chain(current.entries.keys())
        .collect();

    let mut entries = BTreeMap::new();
    for link_id in all_ids {
        let before = previous.entries.get(link_id);
        let after = current.entries.get(link_id);
        let Some(class) = classify(before, after) else {
            continue;
        };
        let kind = after
            .or(before)
            .map(|e| e.kind)
            .unwrap_or(AnnotationKind::Keystop);
        entries.insert(
            link_id.clone(),
            DiffEntry {
                link_id: link_id.clone(),
                class,
                kind,
                before: before.cloned(),
                after: after.cloned(),
            },
        );
    }

    let mut invariant_violations = Vec::new();
    check_invariants("before", previous, &mut invariant_violations);
    check_invariants("after", current, &mut invariant_violations);
    invariant_violations.sort();

    let unchanged = entries.values().all(|e| e.class == ChangeClass::Unchanged);
    let classification = if unchanged && previous.lists == current.lists {
        DiffClassification::Identical
    } else {
        DiffClassification::Changed
    };

    DiffResult {
        diff_schema_version: DIFF_SCHEMA_VERSION,
        identity: DiffIdentity {
            before_semantic_digest: previous.semantic_digest.clone(),
            after_semantic_digest: current.semantic_digest.clone(),
        },
        classification,
        entries,
        invariant_violations,
    }
}

fn check_invariants(
    which: &str,
    snapshot: &PageSnapshot,
    violations: &mut Vec<InvariantViolationEntry>,
) {
    let mut live: BTreeMap<(&NodeId, AnnotationKind), usize> = BTreeMap::new();
    for entry in snapshot.entries.values() {
        *live.entry((&entry.container, entry.kind)).or_default() += 1;
    }

    for list in &snapshot.lists {
        let mut orders = BTreeSet::new();
        let mut reported = false;
        for link_id in &list.links {
            match snapshot.entries.get(link_id) {
                Some(entry) => {
                    if !orders.insert(entry.order) && !reported {
                        violations.push(InvariantViolationEntry::DuplicateOrder {
                            which: which.to_string(),
                            container: list.container.clone(),
                            kind: list.kind,
                            order: entry.order,
                        });
                        reported = true;
                    }
                }
                None => violations.push(InvariantViolationEntry::DanglingListEntry {
                    which: which.to_string(),
                    container: list.container.clone(),
                    kind: list.kind,
                    link_id: link_id.clone(),
                }),
            }
        }

        let live_count = live.remove(&(&list.container, list.kind)).unwrap_or(0);
        if live_count != list.links.len() {
            violations.push(InvariantViolationEntry::ListLengthMismatch {
                which: which.to_string(),
                container: list.container.clone(),
                kind: list.kind,
                listed: list.links.len(),
                live: live_count,
            });
        }
    }

    // Live entries of a container/kind with no list at all.
    for ((container, kind), count) in live {
        violations.push(InvariantViolationEntry::ListLengthMismatch {
            which: which.to_string(),
            container: container.clone(),
            kind,
            listed: 0,
            live: count,
        });
    }
}

/// Parse a snapshot file
///
/// # Errors
///
/// - `Serialization`: bytes are not UTF-8 or not a snapshot document
/// - `InvalidInput`: the snapshot schema version is newer than supported
pub fn parse_snapshot_bytes(bytes: &[u8]) -> Result<PageSnapshot, ExError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("parse_snapshot_bytes")
            .with_message(format!("snapshot is not valid UTF-8: {}", e))
    })?;

    let snapshot: PageSnapshot = serde_json::from_str(text).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("parse_snapshot_bytes")
            .with_message(format!("failed to deserialize snapshot: {}", e))
    })?;

    if snapshot.snapshot_schema_version > SNAPSHOT_SCHEMA_VERSION {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("parse_snapshot_bytes")
            .with_message(format!(
                "snapshot schema version {} is newer than supported version {}",
                snapshot.snapshot_schema_version, SNAPSHOT_SCHEMA_VERSION
            )));
    }

    Ok(snapshot)
}
