#![allow(clippy::unwrap_used, clippy::expect_used)]

use a11yx_core::errors::{A11yError, ExError, ExErrorKind};
use a11yx_core::model::AnnotationKind;
use a11yx_core_types::{LinkId, NodeId};

#[test]
fn test_missing_link_verifiable_by_kind() {
    let err = A11yError::LinkNotFound {
        link_id: LinkId::from_string("link-unknown"),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.link_id().map(|l| l.as_str()), Some("link-unknown"));
    assert!(ex_err.node_id().is_none());
}

#[test]
fn test_orphan_distinct_from_not_found() {
    let err = A11yError::OrphanedLink {
        link_id: LinkId::from_string("link-orphan"),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::OrphanedLink);
    assert_eq!(ex_err.code(), "ERR_ORPHANED_LINK");
    assert_ne!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.link_id().map(|l| l.as_str()), Some("link-orphan"));
}

#[test]
fn test_duplicate_order_names_container() {
    let err = A11yError::DuplicateOrder {
        container_id: NodeId::new("1:2"),
        kind: AnnotationKind::Keystop,
        order: 1,
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateOrder);
    assert_eq!(ex_err.node_id().map(|n| n.as_str()), Some("1:2"));
    assert!(ex_err.message().contains("keystop"));
}

#[test]
fn test_unresolved_command_carries_parse_op() {
    let err = A11yError::UnresolvedCommand {
        action: "explode".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::UnresolvedCommand);
    assert_eq!(ex_err.op(), Some("parse_command"));
    assert!(ex_err.message().contains("explode"));
}

#[test]
fn test_missing_context_keeps_toast_text() {
    let err = A11yError::MissingContext {
        message: "Added 1 keystop".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.code(), "ERR_MISSING_CONTEXT");
    assert!(ex_err.message().contains("Added 1 keystop"));
}

#[test]
fn test_invalid_config_carries_load_op() {
    let ex_err: ExError = A11yError::InvalidConfig {
        reason: "identifier must not be empty".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidConfig);
    assert_eq!(ex_err.op(), Some("load_config"));
}

#[test]
fn test_host_error_keeps_node() {
    let ex_err: ExError = A11yError::Host {
        node_id: NodeId::new("1:7"),
        message: "node is locked".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::Host);
    assert_eq!(ex_err.node_id().map(|n| n.as_str()), Some("1:7"));
    assert!(ex_err.to_string().contains("node is locked"));
}

#[test]
fn test_error_kind_code_mapping() {
    // Test that each kind has a stable, unique code
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::InvalidPayload, "ERR_INVALID_PAYLOAD"),
        (ExErrorKind::KindMismatch, "ERR_KIND_MISMATCH"),
        (ExErrorKind::EmptySelection, "ERR_EMPTY_SELECTION"),
        (ExErrorKind::UnresolvedCommand, "ERR_UNRESOLVED_COMMAND"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::NotInContainer, "ERR_NOT_IN_CONTAINER"),
        (ExErrorKind::OrphanedLink, "ERR_ORPHANED_LINK"),
        (ExErrorKind::DuplicateOrder, "ERR_DUPLICATE_ORDER"),
        (ExErrorKind::MissingContext, "ERR_MISSING_CONTEXT"),
        (ExErrorKind::InvalidBundle, "ERR_INVALID_BUNDLE"),
        (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
        (ExErrorKind::Host, "ERR_HOST"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        (ExErrorKind::Painter, "ERR_PAINTER"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    let mut seen = std::collections::HashSet::new();
    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
        assert!(seen.insert(expected_code), "duplicate code {}", expected_code);
    }
}

#[test]
fn test_only_integrity_kinds_self_heal() {
    let healing: Vec<_> = [
        ExErrorKind::NotFound,
        ExErrorKind::OrphanedLink,
        ExErrorKind::DuplicateOrder,
        ExErrorKind::MissingContext,
        ExErrorKind::Host,
    ]
    .into_iter()
    .filter(|k| k.is_self_healing())
    .collect();

    assert_eq!(
        healing,
        vec![ExErrorKind::OrphanedLink, ExErrorKind::DuplicateOrder]
    );
}

#[test]
fn test_source_chain_is_preserved() {
    let inner: ExError = A11yError::Serialization {
        message: "expected value at line 1".to_string(),
    }
    .into();
    let outer = ExError::new(ExErrorKind::Persistence)
        .with_op("load_document")
        .with_source(inner);

    let source = outer.source_error().expect("source attached");
    assert_eq!(source.kind(), ExErrorKind::Serialization);
    assert_eq!(outer.op(), Some("load_document"));
}

#[test]
fn test_serde_error_converts_to_serialization() {
    let bad: Result<serde_json::Value, _> = serde_json::from_str("{not json");
    let err: A11yError = bad.unwrap_err().into();
    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Serialization);
}
