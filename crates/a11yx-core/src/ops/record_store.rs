use a11yx_core_types::{LinkId, NodeId};

use crate::errors::{A11yError, Result};
use crate::host::HostDocument;
use crate::model::{AnnotationKind, AnnotationPayload, AnnotationRecord, StoredAnnotation};
use crate::namespace::{self, Dataset, KeySpace};

/// Result of [`RecordStore::set`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOutcome {
    pub record: AnnotationRecord,
    /// No record of this kind existed on the node before
    pub created: bool,
    /// Something was written to the host
    pub changed: bool,
}

/// Reads and writes annotation records in node-private data buckets
///
/// Holds no records itself: the host's node data is authoritative, so every
/// call goes back to the host.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    keys: KeySpace,
}

impl RecordStore {
    pub fn new(keys: KeySpace) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &KeySpace {
        &self.keys
    }

    /// Record of `kind` on `node`; absent for dead handles and for the page
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the stored value is corrupt.
    pub fn get(
        &self,
        host: &dyn HostDocument,
        node: &NodeId,
        kind: AnnotationKind,
    ) -> Result<Option<AnnotationRecord>> {
        let Some(container) = host.container_of(node) else {
            return Ok(None);
        };
        let stored: Option<StoredAnnotation> =
            namespace::read_json(host, node, &self.keys, &Dataset::NodeData(kind))?;
        Ok(stored
            .filter(|s| s.payload.kind() == kind)
            .map(|s| AnnotationRecord::from_stored(node.clone(), container, s)))
    }

    /// Every record on `node`, in kind order
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a stored value is corrupt.
    pub fn records_on(
        &self,
        host: &dyn HostDocument,
        node: &NodeId,
    ) -> Result<Vec<AnnotationRecord>> {
        let mut out = Vec::new();
        for kind in AnnotationKind::ALL {
            if let Some(record) = self.get(host, node, kind)? {
                out.push(record);
            }
        }
        Ok(out)
    }

    /// The record on `node` carrying `link_id`, whatever its kind
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a stored value is corrupt.
    pub fn find_on(
        &self,
        host: &dyn HostDocument,
        node: &NodeId,
        link_id: &LinkId,
    ) -> Result<Option<AnnotationRecord>> {
        Ok(self
            .records_on(host, node)?
            .into_iter()
            .find(|r| &r.link_id == link_id))
    }

    /// Create or update the record of `kind` on `node`
    ///
    /// Idempotent: writing a payload equal to the stored one touches nothing.
    /// A new record gets a fresh link id and order 0; the caller places it in
    /// its order list.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` / `NotInContainer` if the node cannot carry a record
    /// - `KindMismatch` if `payload` is not of `kind`
    /// - `Host` if the node refuses the write
    pub fn set(
        &self,
        host: &mut dyn HostDocument,
        node: &NodeId,
        kind: AnnotationKind,
        payload: AnnotationPayload,
    ) -> Result<SetOutcome> {
        if payload.kind() != kind {
            return Err(A11yError::KindMismatch {
                expected: kind,
                actual: payload.kind(),
            });
        }
        if !host.exists(node) {
            return Err(A11yError::NodeNotFound {
                node_id: node.clone(),
            });
        }
        let container = host
            .container_of(node)
            .ok_or_else(|| A11yError::NotInContainer {
                node_id: node.clone(),
            })?;
        let payload = payload.normalized()?;

        match self.get(host, node, kind)? {
            Some(existing) if existing.payload == payload => Ok(SetOutcome {
                record: existing,
                created: false,
                changed: false,
            }),
            Some(mut existing) => {
                existing.payload = payload;
                self.write(host, &existing)?;
                Ok(SetOutcome {
                    record: existing,
                    created: false,
                    changed: true,
                })
            }
            None => {
                let record = AnnotationRecord::new(node.clone(), container, payload);
                self.write(host, &record)?;
                Ok(SetOutcome {
                    record,
                    created: true,
                    changed: true,
                })
            }
        }
    }

    /// Store `order` on the record; returns whether anything changed
    ///
    /// # Errors
    ///
    /// Returns `Host` if the node refuses the write.
    pub fn set_order(
        &self,
        host: &mut dyn HostDocument,
        record: &AnnotationRecord,
        order: u32,
    ) -> Result<bool> {
        if record.order == order {
            return Ok(false);
        }
        let mut updated = record.clone();
        updated.order = order;
        self.write(host, &updated)?;
        Ok(true)
    }

    /// Give the record of `kind` on `node` a new link id
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if there is no such record.
    pub fn rekey(
        &self,
        host: &mut dyn HostDocument,
        node: &NodeId,
        kind: AnnotationKind,
        link_id: LinkId,
    ) -> Result<AnnotationRecord> {
        let mut record = self
            .get(host, node, kind)?
            .ok_or_else(|| A11yError::NodeNotFound {
                node_id: node.clone(),
            })?;
        record.link_id = link_id;
        self.write(host, &record)?;
        Ok(record)
    }

    /// Delete the record of `kind` on `node`; absent records are a no-op
    ///
    /// # Errors
    ///
    /// Returns `Host` if the node refuses the delete.
    pub fn remove(
        &self,
        host: &mut dyn HostDocument,
        node: &NodeId,
        kind: AnnotationKind,
    ) -> Result<Option<AnnotationRecord>> {
        let existing = self.get(host, node, kind)?;
        if existing.is_some() {
            namespace::delete(host, node, &self.keys, &Dataset::NodeData(kind))?;
        }
        Ok(existing)
    }

    fn write(&self, host: &mut dyn HostDocument, record: &AnnotationRecord) -> Result<()> {
        tracing::debug!(
            link_id = %record.link_id,
            node_id = %record.node_ref,
            order = record.order,
            "write annotation record"
        );
        namespace::write_json(
            host,
            &record.node_ref,
            &self.keys,
            &Dataset::NodeData(record.kind),
            &record.to_stored(),
        )
    }
}
