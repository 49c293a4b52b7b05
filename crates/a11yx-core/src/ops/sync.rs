//! Page-wide consistency pass
//!
//! Runs after every mutating command and on `refresh`. Repairs what host-side
//! edits (deletion, duplication, undo, moves) did to the annotation state.

use std::collections::{BTreeMap, BTreeSet};

use a11yx_core_types::{LinkId, NodeId};

use crate::errors::{A11yError, Result};
use crate::host::HostDocument;
use crate::log_repair;
use crate::model::{AnnotationRecord, Bundle};
use crate::ops::order_lists::ListKey;
use crate::ops::state::AnnotationState;

/// What [`sync_page`] repaired
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// `(shared id, fresh id)` for every copy that was re-keyed
    pub rekeyed: Vec<(LinkId, LinkId)>,
    /// Records whose node left its container (or list of the wrong kind)
    pub relocated: Vec<LinkId>,
    /// Orphans removed by the prune step
    pub removed_count: usize,
    /// Live records that were missing from their list
    pub adopted: Vec<LinkId>,
    /// Lists whose stored orders had to be rewritten
    pub renumbered: Vec<ListKey>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.rekeyed.is_empty()
            && self.relocated.is_empty()
            && self.removed_count == 0
            && self.adopted.is_empty()
            && self.renumbered.is_empty()
    }
}

/// Bring the registry, order lists and bundles in line with the page
///
/// Steps, in order:
/// 1. scan every node for records
/// 2. re-key copies so each link id has exactly one carrier
/// 3. detach list entries whose record now belongs to another list
/// 4. prune ids that no live node carries
/// 5. list live records that are not listed yet
/// 6. renumber any list whose stored orders disagree with positions
///
/// # Errors
///
/// Returns `Host` if a write is refused, leaving `state` partially updated;
/// run it on a clone.
pub fn sync_page(state: &mut AnnotationState, host: &mut dyn HostDocument) -> Result<SyncReport> {
    let mut report = SyncReport::default();
    let mut bundles_changed = false;

    let carriers = state.registry.scan(host)?;

    // Copies carry the original's link id verbatim.
    let mut copies: BTreeMap<NodeId, Vec<(LinkId, AnnotationRecord)>> = BTreeMap::new();
    let mut fresh_ids = BTreeSet::new();
    for (link_id, records) in carriers.iter().filter(|(_, r)| r.len() > 1) {
        let keep = state
            .registry
            .cached(link_id)
            .and_then(|bound| records.iter().position(|r| &r.node_ref == bound))
            .unwrap_or(0);
        for (index, record) in records.iter().enumerate() {
            if index == keep {
                continue;
            }
            let rekeyed = state.records().rekey(
                host,
                &record.node_ref,
                record.kind,
                LinkId::generate(),
            )?;
            state.registry.register(&rekeyed);
            tracing::debug!(
                link_id = %link_id,
                new_link_id = %rekeyed.link_id,
                node_id = %record.node_ref,
                "re-keyed duplicated annotation"
            );
            report
                .rekeyed
                .push((link_id.clone(), rekeyed.link_id.clone()));
            fresh_ids.insert(rekeyed.link_id.clone());
            copies
                .entry(record.node_ref.clone())
                .or_default()
                .push((link_id.clone(), rekeyed));
        }
        state
            .registry
            .rebind(link_id, records[keep].node_ref.clone());
    }

    // A copied node keeps the bundles its original had.
    let original_bundles: BTreeSet<Bundle> = state.bundles.iter().cloned().collect();
    for pairs in copies.values() {
        for (i, (old_a, new_a)) in pairs.iter().enumerate() {
            for (old_b, new_b) in &pairs[i + 1..] {
                if original_bundles.contains(&Bundle::new(old_a.clone(), old_b.clone())) {
                    state.bundles.link(new_a, new_b)?;
                    bundles_changed = true;
                }
            }
        }
    }

    let live: BTreeMap<LinkId, AnnotationRecord> = if report.rekeyed.is_empty() {
        first_carriers(carriers)
    } else {
        first_carriers(state.registry.scan(host)?)
    };
    for (link_id, record) in &live {
        state.registry.rebind(link_id, record.node_ref.clone());
    }

    let mut misplaced = Vec::new();
    for (key, links) in state.orders.iter() {
        for link_id in links {
            if let Some(record) = live.get(link_id) {
                if record.container != key.container || record.kind != key.kind {
                    misplaced.push((key.clone(), link_id.clone()));
                }
            }
        }
    }
    let mut touched = BTreeSet::new();
    for (key, link_id) in misplaced {
        state.orders.detach(&key, &link_id);
        report.relocated.push(link_id);
        touched.insert(key);
    }

    let mut stale: BTreeSet<LinkId> = BTreeSet::new();
    for (_, links) in state.orders.iter() {
        stale.extend(links.iter().filter(|l| !live.contains_key(*l)).cloned());
    }
    for bundle in state.bundles.iter() {
        for member in [&bundle.first, &bundle.second] {
            if !live.contains_key(member) {
                stale.insert(member.clone());
            }
        }
    }
    stale.extend(
        state
            .registry
            .bound_ids()
            .filter(|l| !live.contains_key(*l))
            .cloned(),
    );
    report.removed_count =
        state
            .registry
            .prune(host, &mut state.orders, &mut state.bundles, &stale)?;

    for key in touched {
        state
            .orders
            .renumber(host, &mut state.registry, &key.container, key.kind)?;
    }

    let mut unlisted: Vec<&AnnotationRecord> = live
        .values()
        .filter(|r| {
            !state
                .orders
                .contains(&ListKey::new(r.container.clone(), r.kind), &r.link_id)
        })
        .collect();
    unlisted.sort_by(|a, b| {
        (&a.container, a.kind, a.order, &a.link_id).cmp(&(&b.container, b.kind, b.order, &b.link_id))
    });
    for record in unlisted {
        // Restored records (undo) go back to their stored position; copies
        // are appended.
        let at = if fresh_ids.contains(&record.link_id) {
            None
        } else {
            Some(record.order as usize)
        };
        state.orders.insert(
            host,
            &mut state.registry,
            &record.container,
            record.kind,
            &record.link_id,
            at,
        )?;
        report.adopted.push(record.link_id.clone());
    }

    for key in state.orders.list_keys() {
        let audit = state
            .orders
            .audit(host, &mut state.registry, &key.container, key.kind)?;
        if let Some(order) = audit.duplicate_order {
            log_repair!(
                "renumber",
                A11yError::DuplicateOrder {
                    container_id: key.container.clone(),
                    kind: key.kind,
                    order,
                }
            );
        }
        if audit.duplicate_order.is_some() || !audit.contiguous {
            state
                .orders
                .renumber(host, &mut state.registry, &key.container, key.kind)?;
            report.renumbered.push(key);
        }
    }

    let live_ids: BTreeSet<LinkId> = live.keys().cloned().collect();
    bundles_changed |= state.bundles.retain_live(&live_ids) > 0;
    if bundles_changed {
        let keys = state.keys().clone();
        state.bundles.persist(host, &keys)?;
    }

    if !report.is_clean() {
        tracing::debug!(
            rekeyed = report.rekeyed.len(),
            relocated = report.relocated.len(),
            removed_count = report.removed_count,
            adopted = report.adopted.len(),
            renumbered = report.renumbered.len(),
            "page sync repaired annotation state"
        );
    }
    Ok(report)
}

fn first_carriers(
    carriers: BTreeMap<LinkId, Vec<AnnotationRecord>>,
) -> BTreeMap<LinkId, AnnotationRecord> {
    carriers
        .into_iter()
        .filter_map(|(link_id, records)| records.into_iter().next().map(|r| (link_id, r)))
        .collect()
}
