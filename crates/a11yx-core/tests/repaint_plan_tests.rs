#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use a11yx_core::diff::compute_diff;
use a11yx_core::model::{AnnotationKind, AriaRole};
use a11yx_core::ops::{add_annotation, remove_annotation, reorder_annotation, update_payload};
use a11yx_core::repaint::RepaintDirective;
use a11yx_core::{plan_repaint, Options, PageSnapshot};
use common::{keystop, label, new_state, page};
use serde_json::json;

fn names(directives: &[RepaintDirective]) -> Vec<&'static str> {
    directives.iter().map(|d| d.name()).collect()
}

#[test]
fn test_swap_redraws_both_numbers_in_order() {
    // GIVEN two keystops, numbered 1 and 2
    let mut p = page(1, 2);
    let mut state = new_state();
    let a = add_annotation(&mut state, &mut p.doc, &p.nodes[0][0], keystop()).unwrap();
    let b = add_annotation(&mut state, &mut p.doc, &p.nodes[0][1], keystop()).unwrap();
    let before = PageSnapshot::capture(&state, &p.doc).unwrap();

    // WHEN the second is moved to the front
    reorder_annotation(&mut state, &mut p.doc, &b.record.link_id, 0).unwrap();
    let after = PageSnapshot::capture(&state, &p.doc).unwrap();
    let plan = plan_repaint(&compute_diff(&before, &after), &Options::default());

    // THEN both badges are redrawn with new numbers, lowest order first
    assert_eq!(
        names(&plan.directives),
        vec!["redraw_badge", "redraw_badge", "reflow_legend"]
    );
    assert_eq!(plan.directives[0].link_id(), Some(&b.record.link_id));
    assert_eq!(plan.directives[1].link_id(), Some(&a.record.link_id));
    match &plan.directives[0] {
        RepaintDirective::RedrawBadge { badge, .. } => {
            assert_eq!(badge.order, 0);
            assert_eq!(badge.text, "1");
        }
        other => panic!("unexpected directive {:?}", other),
    }
    assert!(plan.needs_fonts);
}

#[test]
fn test_removals_precede_draws() {
    let mut p = page(1, 3);
    let mut state = new_state();
    let first = add_annotation(&mut state, &mut p.doc, &p.nodes[0][0], keystop()).unwrap();
    add_annotation(&mut state, &mut p.doc, &p.nodes[0][1], keystop()).unwrap();
    let before = PageSnapshot::capture(&state, &p.doc).unwrap();

    remove_annotation(&mut state, &mut p.doc, &first.record.link_id).unwrap();
    let added = add_annotation(&mut state, &mut p.doc, &p.nodes[0][2], keystop()).unwrap();
    let after = PageSnapshot::capture(&state, &p.doc).unwrap();
    let plan = plan_repaint(&compute_diff(&before, &after), &Options::default());

    assert_eq!(plan.directives[0].name(), "remove_badge");
    assert_eq!(plan.directives[0].link_id(), Some(&first.record.link_id));
    assert_eq!(plan.directives[0].target(), &p.nodes[0][0]);

    let draw_at = plan
        .directives
        .iter()
        .position(|d| d.link_id() == Some(&added.record.link_id))
        .unwrap();
    assert!(draw_at > 0);
    assert_eq!(plan.directives[draw_at].name(), "draw_badge");
    assert_eq!(plan.directives.last().unwrap().name(), "reflow_legend");
}

#[test]
fn test_moved_label_is_repositioned_without_fonts() {
    // Label badges show the role, so a reading-order move keeps their text.
    let mut p = page(1, 2);
    let mut state = new_state();
    add_annotation(&mut state, &mut p.doc, &p.nodes[0][0], label(AriaRole::Button)).unwrap();
    let second =
        add_annotation(&mut state, &mut p.doc, &p.nodes[0][1], label(AriaRole::Link)).unwrap();
    let before = PageSnapshot::capture(&state, &p.doc).unwrap();

    reorder_annotation(&mut state, &mut p.doc, &second.record.link_id, 0).unwrap();
    let after = PageSnapshot::capture(&state, &p.doc).unwrap();
    let plan = plan_repaint(&compute_diff(&before, &after), &Options::default());

    assert_eq!(
        names(&plan.directives),
        vec!["reposition_badge", "reposition_badge", "reflow_legend"]
    );
    assert!(!plan.needs_fonts);
}

#[test]
fn test_payload_update_redraws_single_badge() {
    let mut p = page(1, 1);
    let mut state = new_state();
    let added =
        add_annotation(&mut state, &mut p.doc, &p.nodes[0][0], label(AriaRole::Button)).unwrap();
    let before = PageSnapshot::capture(&state, &p.doc).unwrap();

    update_payload(
        &mut state,
        &mut p.doc,
        &added.record.link_id,
        json!({"role": "checkbox"}),
    )
    .unwrap();
    let after = PageSnapshot::capture(&state, &p.doc).unwrap();
    let plan = plan_repaint(&compute_diff(&before, &after), &Options::default());

    assert_eq!(names(&plan.directives), vec!["redraw_badge", "reflow_legend"]);
    match &plan.directives[1] {
        RepaintDirective::ReflowLegend { container, kind } => {
            assert_eq!(container, &p.containers[0]);
            assert_eq!(*kind, AnnotationKind::Label);
        }
        other => panic!("unexpected directive {:?}", other),
    }
}

#[test]
fn test_hidden_badges_emit_only_removals_and_legends() {
    let mut p = page(1, 2);
    let mut state = new_state();
    let gone = add_annotation(&mut state, &mut p.doc, &p.nodes[0][0], keystop()).unwrap();
    let before = PageSnapshot::capture(&state, &p.doc).unwrap();

    remove_annotation(&mut state, &mut p.doc, &gone.record.link_id).unwrap();
    add_annotation(&mut state, &mut p.doc, &p.nodes[0][1], keystop()).unwrap();
    let after = PageSnapshot::capture(&state, &p.doc).unwrap();
    let options = Options {
        show_badges: false,
        show_legends: true,
    };
    let plan = plan_repaint(&compute_diff(&before, &after), &options);

    assert_eq!(names(&plan.directives), vec!["remove_badge", "reflow_legend"]);
    assert!(!plan.needs_fonts);
}

#[test]
fn test_hidden_legends_skip_reflow() {
    let mut p = page(2, 1);
    let mut state = new_state();
    let before = PageSnapshot::capture(&state, &p.doc).unwrap();
    add_annotation(&mut state, &mut p.doc, &p.nodes[0][0], keystop()).unwrap();
    add_annotation(&mut state, &mut p.doc, &p.nodes[1][0], keystop()).unwrap();
    let after = PageSnapshot::capture(&state, &p.doc).unwrap();

    let options = Options {
        show_badges: true,
        show_legends: false,
    };
    let plan = plan_repaint(&compute_diff(&before, &after), &options);

    assert_eq!(names(&plan.directives), vec!["draw_badge", "draw_badge"]);
}

#[test]
fn test_legend_reflows_once_per_touched_list() {
    let mut p = page(2, 2);
    let mut state = new_state();
    let before = PageSnapshot::capture(&state, &p.doc).unwrap();
    for node in p.nodes.concat() {
        add_annotation(&mut state, &mut p.doc, &node, keystop()).unwrap();
    }
    add_annotation(&mut state, &mut p.doc, &p.nodes[0][0], label(AriaRole::Img)).unwrap();
    let after = PageSnapshot::capture(&state, &p.doc).unwrap();

    let plan = plan_repaint(&compute_diff(&before, &after), &Options::default());
    let legends: Vec<_> = plan
        .directives
        .iter()
        .filter_map(|d| match d {
            RepaintDirective::ReflowLegend { container, kind } => Some((container.clone(), *kind)),
            _ => None,
        })
        .collect();

    assert_eq!(legends.len(), 3);
    assert!(legends.contains(&(p.containers[0].clone(), AnnotationKind::Label)));
    assert!(legends.contains(&(p.containers[1].clone(), AnnotationKind::Keystop)));
}

#[test]
fn test_unchanged_diff_plans_nothing() {
    let mut p = page(1, 2);
    let mut state = new_state();
    add_annotation(&mut state, &mut p.doc, &p.nodes[0][0], keystop()).unwrap();
    let snapshot = PageSnapshot::capture(&state, &p.doc).unwrap();

    let plan = plan_repaint(&compute_diff(&snapshot, &snapshot), &Options::default());

    assert!(plan.is_empty());
    assert!(!plan.needs_fonts);
}

#[test]
fn test_draws_sorted_by_order_across_containers() {
    let mut p = page(2, 2);
    let mut state = new_state();
    let before = PageSnapshot::capture(&state, &p.doc).unwrap();
    // container 1 first so insertion order differs from plan order
    add_annotation(&mut state, &mut p.doc, &p.nodes[1][0], keystop()).unwrap();
    add_annotation(&mut state, &mut p.doc, &p.nodes[1][1], keystop()).unwrap();
    add_annotation(&mut state, &mut p.doc, &p.nodes[0][0], keystop()).unwrap();
    let after = PageSnapshot::capture(&state, &p.doc).unwrap();

    let plan = plan_repaint(&compute_diff(&before, &after), &Options::default());
    let orders: Vec<u32> = plan
        .directives
        .iter()
        .filter_map(|d| match d {
            RepaintDirective::DrawBadge { badge, .. } => Some(badge.order),
            _ => None,
        })
        .collect();

    assert_eq!(orders, vec![0, 0, 1]);
}
