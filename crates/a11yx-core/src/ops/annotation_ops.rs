//! Annotation commands over [`AnnotationState`]
//!
//! Each function performs its whole mutation synchronously: record write,
//! registry update, list placement and renumbering all finish before it
//! returns.

use std::str::FromStr;

use a11yx_core_types::{LinkId, NodeId};
use serde_json::Value;

use crate::errors::{A11yError, Result};
use crate::host::HostDocument;
use crate::model::{AnnotationKind, AnnotationPayload, AnnotationRecord};
use crate::ops::record_store::SetOutcome;
use crate::ops::state::AnnotationState;

/// Result of [`add_annotation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub record: AnnotationRecord,
    pub created: bool,
    pub changed: bool,
    /// Other-kind annotations on the same node that were bundled with it
    pub bundled_with: Vec<LinkId>,
}

/// Annotate `node` with `payload`
///
/// A new record is appended to its container's order list and bundled with
/// any annotation of another kind already on the node. Adding a kind the
/// node already carries updates that record in place.
///
/// # Errors
///
/// - `NodeNotFound` / `NotInContainer` if the node cannot be annotated
/// - `Host` if a write is refused
pub fn add_annotation(
    state: &mut AnnotationState,
    host: &mut dyn HostDocument,
    node: &NodeId,
    payload: AnnotationPayload,
) -> Result<AddOutcome> {
    let kind = payload.kind();
    let SetOutcome {
        record,
        created,
        changed,
    } = state.records().set(host, node, kind, payload)?;

    if !created {
        return Ok(AddOutcome {
            record,
            created,
            changed,
            bundled_with: Vec::new(),
        });
    }

    let link_id = state.registry.register(&record);
    state.orders.insert(
        host,
        &mut state.registry,
        &record.container,
        kind,
        &link_id,
        None,
    )?;
    let record = state.registry.require(host, &link_id)?;

    let others = state.records().records_on(host, node)?;
    let mut bundled_with = Vec::new();
    for other in others {
        if other.kind != kind {
            state.bundles.link(&record, &other)?;
            bundled_with.push(other.link_id);
        }
    }
    if !bundled_with.is_empty() {
        let keys = state.keys().clone();
        state.bundles.persist(host, &keys)?;
    }

    Ok(AddOutcome {
        record,
        created,
        changed,
        bundled_with,
    })
}

/// Delete the annotation carrying `link_id` and close the gap in its list
///
/// # Errors
///
/// Returns `LinkNotFound` if no live node carries the id.
pub fn remove_annotation(
    state: &mut AnnotationState,
    host: &mut dyn HostDocument,
    link_id: &LinkId,
) -> Result<AnnotationRecord> {
    let record = state.registry.require(host, link_id)?;
    state.records().remove(host, &record.node_ref, record.kind)?;
    state.orders.remove(
        host,
        &mut state.registry,
        &record.container,
        record.kind,
        link_id,
    )?;
    if state.bundles.dissolve(link_id) > 0 {
        let keys = state.keys().clone();
        state.bundles.persist(host, &keys)?;
    }
    state.registry.forget(link_id);
    Ok(record)
}

/// Move the annotation to `to_index` within its list; returns its new order
///
/// # Errors
///
/// Returns `LinkNotFound` if the id is not live or not listed.
pub fn reorder_annotation(
    state: &mut AnnotationState,
    host: &mut dyn HostDocument,
    link_id: &LinkId,
    to_index: usize,
) -> Result<u32> {
    let record = state.registry.require(host, link_id)?;
    state.orders.move_to(
        host,
        &mut state.registry,
        &record.container,
        record.kind,
        link_id,
        to_index,
    )
}

/// Replace the payload of the annotation carrying `link_id`
///
/// `value` may be untagged (`{"role": "link"}`) or carry a `kind` tag; a tag
/// naming another kind is rejected because kinds are immutable.
///
/// # Errors
///
/// - `LinkNotFound` if the id is not live
/// - `KindMismatch` if the tag names another kind
/// - `InvalidPayload` if the value does not fit the record's kind
pub fn update_payload(
    state: &mut AnnotationState,
    host: &mut dyn HostDocument,
    link_id: &LinkId,
    value: Value,
) -> Result<SetOutcome> {
    let record = state.registry.require(host, link_id)?;
    if let Some(tag) = value.get("kind").and_then(Value::as_str) {
        let tagged = AnnotationKind::from_str(tag)?;
        if tagged != record.kind {
            return Err(A11yError::KindMismatch {
                expected: record.kind,
                actual: tagged,
            });
        }
    }
    let payload = AnnotationPayload::from_value(record.kind, value)?;
    state
        .records()
        .set(host, &record.node_ref, record.kind, payload)
}
