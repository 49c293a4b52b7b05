#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::collections::BTreeSet;

use a11yx_core::errors::{A11yError, ExError, ExErrorKind};
use a11yx_core::logging_facility::test_capture::init_test_capture;
use a11yx_core::model::AnnotationKind;
use a11yx_core::ops::add_annotation;
use a11yx_core::{log_op_end, log_op_error, log_op_start, log_repair};
use a11yx_core::{BuildMode, CommandReport, Delivery, Messenger};
use a11yx_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use a11yx_core_types::{LinkId, NodeId};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert!(
        !start_events.is_empty(),
        "Should have captured at least one start event"
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = A11yError::LinkNotFound {
        link_id: LinkId::from_string("link-gone"),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(error_events[0].field("err.code"), Some("ERR_NOT_FOUND"));
    assert!(error_events[0]
        .message
        .as_deref()
        .is_some_and(|m| m.contains("link-gone")));
}

#[test]
fn test_boundary_ownership_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_ownership_unique_4";

    log_op_start!(op_name, node_id = "1:4");
    log_op_end!(op_name, duration_ms = 3);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    let ends = capture
        .count_events(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END));

    assert_eq!(starts, 1, "Should have exactly one start event");
    assert_eq!(ends, 1, "Should have exactly one end event");
}

#[test]
fn test_log_macros_with_multiple_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_5";

    log_op_start!(op_name, node_id = "1:9", kind = "label");

    let events = capture.events_for_op(op_name);
    let start_event = events.first().expect("Should have start event");

    assert_eq!(start_event.field("node_id"), Some("1:9"));
    assert_eq!(start_event.field("kind"), Some("label"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();

    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_error_conversion_preserves_kind_in_log() {
    let capture = init_test_capture();
    let op_name = "test_error_conversion_unique_6";

    let err = A11yError::KindMismatch {
        expected: AnnotationKind::Label,
        actual: AnnotationKind::Heading,
    };
    log_op_error!(op_name, err.clone(), duration_ms = 5);

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::KindMismatch);

    let events = capture.events_for_op(op_name);
    let error_event = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event for this test");
    assert_eq!(error_event.field("err.code"), Some("ERR_KIND_MISMATCH"));
}

#[test]
fn test_log_repair_is_warning() {
    let capture = init_test_capture();
    let container = NodeId::new("test-repair-container-unique-7");

    log_repair!(
        "renumber",
        A11yError::DuplicateOrder {
            container_id: container.clone(),
            kind: AnnotationKind::Keystop,
            order: 2,
        }
    );

    let repairs: Vec<_> = capture
        .events_for_op("renumber")
        .into_iter()
        .filter(|e| {
            e.event.as_deref() == Some("repair")
                && e.message
                    .as_deref()
                    .is_some_and(|m| m.contains(container.as_str()))
        })
        .collect();

    assert_eq!(repairs.len(), 1);
    assert_eq!(repairs[0].level, tracing::Level::WARN);
    assert_eq!(repairs[0].field("err.code"), Some("ERR_DUPLICATE_ORDER"));
}

#[test]
fn test_prune_logs_each_orphan() {
    let capture = init_test_capture();

    // GIVEN: a keystop whose node was deleted behind the plugin's back
    let mut page = common::page(1, 2);
    let mut state = common::new_state();
    let added = add_annotation(
        &mut state,
        &mut page.doc,
        &page.nodes[0][0],
        common::keystop(),
    )
    .unwrap();
    page.doc.delete_node(&page.nodes[0][0]).unwrap();

    // WHEN: the stale id is pruned
    let stale: BTreeSet<LinkId> = [added.record.link_id.clone()].into_iter().collect();
    let removed = state
        .registry
        .prune(&mut page.doc, &mut state.orders, &mut state.bundles, &stale)
        .unwrap();

    // THEN: one repair line names the orphaned id
    assert_eq!(removed, 1);
    let link = added.record.link_id.as_str().to_string();
    let repairs = capture.count_events(|e| {
        e.op.as_deref() == Some("prune")
            && e.event.as_deref() == Some("repair")
            && e.field("err.code") == Some("ERR_ORPHANED_LINK")
            && e.message.as_deref().is_some_and(|m| m.contains(&link))
    });
    assert_eq!(repairs, 1);
}

#[test]
fn test_messenger_logs_missing_context() {
    let capture = init_test_capture();
    let toast = "Added 1 keyboard stop unique-8";

    let delivery = Messenger::new(BuildMode::Production)
        .report(&CommandReport::success("done").with_toast(toast), None);

    assert_eq!(delivery, Delivery::LoggedOnly);
    let found = capture.count_events(|e| {
        e.op.as_deref() == Some("report")
            && e.field("err.code") == Some("ERR_MISSING_CONTEXT")
            && e.message.as_deref().is_some_and(|m| m.contains(toast))
    });
    assert_eq!(found, 1);
}

#[test]
fn test_messenger_error_logged_in_production() {
    let capture = init_test_capture();
    let line = "[ERR_EMPTY_SELECTION] unique-9";

    let report = CommandReport {
        status: a11yx_core::ReportStatus::Error,
        log_message: Some(line.to_string()),
        toast_message: None,
    };
    Messenger::new(BuildMode::Production).report(&report, None);

    let found = capture.count_events(|e| {
        e.op.as_deref() == Some("report")
            && e.level == tracing::Level::ERROR
            && e.message.as_deref() == Some(line)
    });
    assert_eq!(found, 1);
}
