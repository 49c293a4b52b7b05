use a11yx_core_types::{LinkId, NodeId};
use serde::{Deserialize, Serialize};

use crate::model::{AnnotationKind, AnnotationPayload};

/// One annotation attached to one live node
///
/// `node_ref` and `container` describe where the record lives *now*; they are
/// recomputed from the host on every load and never persisted as stable keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub link_id: LinkId,
    pub node_ref: NodeId,
    pub container: NodeId,
    pub kind: AnnotationKind,
    pub payload: AnnotationPayload,
    pub order: u32,
}

impl AnnotationRecord {
    /// Create a record with a freshly generated link id
    pub fn new(node_ref: NodeId, container: NodeId, payload: AnnotationPayload) -> Self {
        Self {
            link_id: LinkId::generate(),
            node_ref,
            container,
            kind: payload.kind(),
            payload,
            order: 0,
        }
    }

    pub(crate) fn from_stored(node_ref: NodeId, container: NodeId, stored: StoredAnnotation) -> Self {
        Self {
            link_id: stored.link_id,
            node_ref,
            container,
            kind: stored.payload.kind(),
            payload: stored.payload,
            order: stored.order,
        }
    }

    pub(crate) fn to_stored(&self) -> StoredAnnotation {
        StoredAnnotation {
            link_id: self.link_id.clone(),
            order: self.order,
            payload: self.payload.clone(),
        }
    }
}

/// Shape of a record inside a node's private data bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnnotation {
    pub link_id: LinkId,
    #[serde(default)]
    pub order: u32,
    pub payload: AnnotationPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_record_takes_kind_from_payload() {
        let record = AnnotationRecord::new(
            NodeId::new("1:4"),
            NodeId::new("1:2"),
            AnnotationPayload::default_for(AnnotationKind::Label),
        );
        assert_eq!(record.kind, AnnotationKind::Label);
        assert_eq!(record.order, 0);
    }

    #[test]
    fn test_stored_shape_is_camel_case() {
        let stored = StoredAnnotation {
            link_id: LinkId::from_string("l1"),
            order: 3,
            payload: AnnotationPayload::default_for(AnnotationKind::Heading),
        };
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(
            value,
            json!({"linkId": "l1", "order": 3, "payload": {"kind": "heading", "level": 2}})
        );
    }
}
