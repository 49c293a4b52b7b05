#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::collections::BTreeSet;

use a11yx_core::model::{AnnotationKind, AriaRole};
use a11yx_core::ops::{add_annotation, sync_page, LinkRegistry, RecordStore};
use a11yx_core::{HostDocument, KeySpace};
use common::{assert_all_contiguous, keystop, label, new_state, page};

#[test]
fn test_resolve_after_register_returns_node() {
    let mut p = page(1, 1);
    let mut registry = LinkRegistry::new(RecordStore::new(KeySpace::default()));
    let node = p.nodes[0][0].clone();
    let record = registry
        .records()
        .clone()
        .set(&mut p.doc, &node, AnnotationKind::Keystop, keystop())
        .unwrap()
        .record;

    let link = registry.register(&record);

    assert_eq!(registry.resolve(&p.doc, &link).unwrap(), Some(record.node_ref));
}

#[test]
fn test_resolve_without_binding_scans_page() {
    // GIVEN a record written by another registry instance
    let mut p = page(2, 2);
    let mut state = new_state();
    let node = p.nodes[1][1].clone();
    let link = add_annotation(&mut state, &mut p.doc, &node, keystop())
        .unwrap()
        .record
        .link_id;

    // WHEN a fresh registry resolves it
    let mut fresh = LinkRegistry::new(RecordStore::new(KeySpace::default()));
    assert!(fresh.cached(&link).is_none());
    let resolved = fresh.resolve(&p.doc, &link).unwrap();

    // THEN the reverse scan finds the node and caches it
    assert_eq!(resolved, Some(node.clone()));
    assert_eq!(fresh.cached(&link), Some(&node));
}

#[test]
fn test_recycled_node_id_does_not_resolve_old_link() {
    // GIVEN an annotated node that is deleted and whose id is reused
    let mut p = page(1, 1);
    let mut state = new_state();
    let node = p.nodes[0][0].clone();
    let link = add_annotation(&mut state, &mut p.doc, &node, keystop())
        .unwrap()
        .record
        .link_id;
    p.doc.delete_node(&node).unwrap();
    let reused = p.doc.create_node(&p.containers[0], "newcomer").unwrap();
    assert_eq!(reused, node);

    // WHEN the stale binding is looked up
    let resolved = state.registry.resolve(&p.doc, &link).unwrap();

    // THEN the link is orphaned and the binding dropped
    assert_eq!(resolved, None);
    assert!(state.registry.cached(&link).is_none());
}

#[test]
fn test_prune_removes_external_deletions() {
    // GIVEN three keystops in one container
    let mut p = page(1, 3);
    let mut state = new_state();
    let c = p.containers[0].clone();
    let links: Vec<_> = p.nodes[0]
        .clone()
        .iter()
        .map(|n| {
            add_annotation(&mut state, &mut p.doc, n, keystop())
                .unwrap()
                .record
                .link_id
        })
        .collect();

    // WHEN the middle node is deleted by the host and its id pruned
    p.doc.delete_node(&p.nodes[0][1]).unwrap();
    let stale: BTreeSet<_> = [links[1].clone()].into_iter().collect();
    let removed = state
        .registry
        .prune(&mut p.doc, &mut state.orders, &mut state.bundles, &stale)
        .unwrap();

    // THEN exactly one orphan was removed and the list is renumbered
    assert_eq!(removed, 1);
    assert_eq!(
        state.orders.get(&c, AnnotationKind::Keystop),
        &[links[0].clone(), links[2].clone()]
    );
    assert_all_contiguous(&mut state, &p.doc);
}

#[test]
fn test_prune_of_unknown_id_counts_nothing() {
    let mut p = page(1, 1);
    let mut state = new_state();
    add_annotation(&mut state, &mut p.doc, &p.nodes[0][0], keystop()).unwrap();

    let stale: BTreeSet<_> = [a11yx_core_types::LinkId::from_string("nobody")]
        .into_iter()
        .collect();
    let removed = state
        .registry
        .prune(&mut p.doc, &mut state.orders, &mut state.bundles, &stale)
        .unwrap();

    assert_eq!(removed, 0);
}

#[test]
fn test_sync_counts_every_orphan() {
    let mut p = page(2, 3);
    let mut state = new_state();
    for node in p.nodes.concat() {
        add_annotation(&mut state, &mut p.doc, &node, keystop()).unwrap();
    }

    p.doc.delete_node(&p.nodes[0][0]).unwrap();
    p.doc.delete_node(&p.nodes[1][2]).unwrap();
    let report = sync_page(&mut state, &mut p.doc).unwrap();

    assert_eq!(report.removed_count, 2);
    assert_eq!(
        state
            .orders
            .get(&p.containers[0], AnnotationKind::Keystop)
            .len(),
        2
    );
    assert_all_contiguous(&mut state, &p.doc);
}

#[test]
fn test_prune_dissolves_bundles() {
    let mut p = page(1, 1);
    let mut state = new_state();
    let node = p.nodes[0][0].clone();
    add_annotation(&mut state, &mut p.doc, &node, keystop()).unwrap();
    let outcome = add_annotation(&mut state, &mut p.doc, &node, label(AriaRole::Button)).unwrap();
    assert_eq!(outcome.bundled_with.len(), 1);
    assert_eq!(state.bundles.len(), 1);

    p.doc.delete_node(&node).unwrap();
    let report = sync_page(&mut state, &mut p.doc).unwrap();

    assert_eq!(report.removed_count, 2);
    assert!(state.bundles.is_empty());
    assert!(state.orders.list_keys().is_empty());
}

#[test]
fn test_duplicated_node_is_rekeyed() {
    // GIVEN an annotated node
    let mut p = page(1, 1);
    let mut state = new_state();
    let c = p.containers[0].clone();
    let original = p.nodes[0][0].clone();
    let link = add_annotation(&mut state, &mut p.doc, &original, keystop())
        .unwrap()
        .record
        .link_id;

    // WHEN the host duplicates it (copying private data verbatim)
    let copy = p.doc.duplicate(&original).unwrap();
    let report = sync_page(&mut state, &mut p.doc).unwrap();

    // THEN the copy gets a fresh link appended to the list
    assert_eq!(report.rekeyed.len(), 1);
    let (shared, fresh) = report.rekeyed[0].clone();
    assert_eq!(shared, link);
    assert_ne!(fresh, link);
    assert_eq!(state.registry.resolve(&p.doc, &link).unwrap(), Some(original));
    assert_eq!(state.registry.resolve(&p.doc, &fresh).unwrap(), Some(copy));
    assert_eq!(state.orders.get(&c, AnnotationKind::Keystop), &[link, fresh]);
    assert_all_contiguous(&mut state, &p.doc);
}

#[test]
fn test_duplicated_container_gets_its_own_list() {
    let mut p = page(1, 2);
    let mut state = new_state();
    for node in p.nodes[0].clone() {
        add_annotation(&mut state, &mut p.doc, &node, keystop()).unwrap();
    }
    let before = state
        .orders
        .get(&p.containers[0], AnnotationKind::Keystop)
        .to_vec();

    let copy = p.doc.duplicate(&p.containers[0]).unwrap();
    let report = sync_page(&mut state, &mut p.doc).unwrap();

    assert_eq!(report.rekeyed.len(), 2);
    assert_eq!(
        state.orders.get(&p.containers[0], AnnotationKind::Keystop),
        before.as_slice()
    );
    let copied = state.orders.get(&copy, AnnotationKind::Keystop).to_vec();
    assert_eq!(copied.len(), 2);
    assert!(copied.iter().all(|l| !before.contains(l)));
    assert_all_contiguous(&mut state, &p.doc);
}

#[test]
fn test_undo_restores_position() {
    // GIVEN three keystops and a saved copy of the middle node's data
    let mut p = page(1, 3);
    let mut state = new_state();
    let c = p.containers[0].clone();
    let links: Vec<_> = p.nodes[0]
        .clone()
        .iter()
        .map(|n| {
            add_annotation(&mut state, &mut p.doc, n, keystop())
                .unwrap()
                .record
                .link_id
        })
        .collect();
    let middle = p.nodes[0][1].clone();
    let saved: Vec<(String, String)> = p
        .doc
        .data_keys(&middle)
        .into_iter()
        .map(|k| {
            let v = p.doc.get_data(&middle, &k).unwrap();
            (k, v)
        })
        .collect();

    // WHEN the node is deleted, synced, then restored by the host's undo
    p.doc.delete_node(&middle).unwrap();
    sync_page(&mut state, &mut p.doc).unwrap();
    assert_eq!(state.orders.get(&c, AnnotationKind::Keystop).len(), 2);

    let restored = p.doc.create_node(&c, "node-0-1").unwrap();
    p.doc.move_node(&restored, &c, Some(1)).unwrap();
    for (k, v) in saved {
        p.doc.set_data(&restored, &k, v).unwrap();
    }
    let report = sync_page(&mut state, &mut p.doc).unwrap();

    // THEN the record is re-listed at its former position under its old id
    assert_eq!(report.adopted, vec![links[1].clone()]);
    assert_eq!(state.orders.get(&c, AnnotationKind::Keystop), links.as_slice());
    assert_all_contiguous(&mut state, &p.doc);
}

#[test]
fn test_moved_node_follows_to_new_container() {
    let mut p = page(2, 2);
    let mut state = new_state();
    let node = p.nodes[0][0].clone();
    let link = add_annotation(&mut state, &mut p.doc, &node, keystop())
        .unwrap()
        .record
        .link_id;
    add_annotation(&mut state, &mut p.doc, &p.nodes[0][1], keystop()).unwrap();

    p.doc.move_node(&node, &p.containers[1], None).unwrap();
    let report = sync_page(&mut state, &mut p.doc).unwrap();

    assert_eq!(report.relocated, vec![link.clone()]);
    assert_eq!(
        state.orders.get(&p.containers[1], AnnotationKind::Keystop),
        &[link.clone()]
    );
    assert!(!state
        .orders
        .get(&p.containers[0], AnnotationKind::Keystop)
        .contains(&link));
    assert_all_contiguous(&mut state, &p.doc);
}

#[test]
fn test_deleted_container_drops_its_lists() {
    let mut p = page(2, 2);
    let mut state = new_state();
    for node in p.nodes.concat() {
        add_annotation(&mut state, &mut p.doc, &node, keystop()).unwrap();
    }

    p.doc.delete_node(&p.containers[0]).unwrap();
    let report = sync_page(&mut state, &mut p.doc).unwrap();

    assert_eq!(report.removed_count, 2);
    assert_eq!(state.orders.list_keys().len(), 1);
    assert!(!p.doc.exists(&p.containers[0]));
}

#[test]
fn test_sync_on_clean_page_is_clean() {
    let mut p = page(1, 2);
    let mut state = new_state();
    add_annotation(&mut state, &mut p.doc, &p.nodes[0][0], keystop()).unwrap();

    let report = sync_page(&mut state, &mut p.doc).unwrap();

    assert!(report.is_clean());
}
