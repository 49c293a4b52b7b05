use std::collections::{BTreeMap, BTreeSet};

use a11yx_core_types::{LinkId, NodeId};

use crate::errors::{A11yError, Result};
use crate::host::HostDocument;
use crate::log_repair;
use crate::model::AnnotationRecord;
use crate::ops::bundles::BundleRegistry;
use crate::ops::order_lists::OrderLists;
use crate::ops::record_store::RecordStore;

/// Every record on the page grouped by link id, carriers in depth-first order
pub type Carriers = BTreeMap<LinkId, Vec<AnnotationRecord>>;

/// Indirection table from stable link ids to live node handles
///
/// Bindings are a cache. A binding is re-validated against the node's data
/// on every lookup, because the host recycles ids of deleted nodes.
#[derive(Debug, Clone, Default)]
pub struct LinkRegistry {
    records: RecordStore,
    bindings: BTreeMap<LinkId, NodeId>,
}

impl LinkRegistry {
    pub fn new(records: RecordStore) -> Self {
        Self {
            records,
            bindings: BTreeMap::new(),
        }
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    /// Bind a freshly created record so it resolves without a scan
    pub fn register(&mut self, record: &AnnotationRecord) -> LinkId {
        self.bindings
            .insert(record.link_id.clone(), record.node_ref.clone());
        record.link_id.clone()
    }

    pub fn rebind(&mut self, link_id: &LinkId, node: NodeId) {
        self.bindings.insert(link_id.clone(), node);
    }

    pub fn forget(&mut self, link_id: &LinkId) -> bool {
        self.bindings.remove(link_id).is_some()
    }

    pub fn cached(&self, link_id: &LinkId) -> Option<&NodeId> {
        self.bindings.get(link_id)
    }

    pub fn bound_ids(&self) -> impl Iterator<Item = &LinkId> {
        self.bindings.keys()
    }

    /// The live record carrying `link_id`
    ///
    /// Checks the cached binding first; on a miss (or a stale binding) walks
    /// the page for a node whose data carries the id and caches the result.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a node's stored data is corrupt.
    pub fn lookup(
        &mut self,
        host: &dyn HostDocument,
        link_id: &LinkId,
    ) -> Result<Option<AnnotationRecord>> {
        if let Some(node) = self.bindings.get(link_id) {
            if let Some(record) = self.records.find_on(host, node, link_id)? {
                return Ok(Some(record));
            }
            tracing::debug!(link_id = %link_id, node_id = %node, "stale link binding");
            self.bindings.remove(link_id);
        }

        let page = host.page();
        for node in host.walk(&page) {
            if let Some(record) = self.records.find_on(host, &node, link_id)? {
                self.bindings.insert(link_id.clone(), node);
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Node currently carrying `link_id`, or `None` when orphaned
    ///
    /// # Errors
    ///
    /// Same as [`LinkRegistry::lookup`].
    pub fn resolve(&mut self, host: &dyn HostDocument, link_id: &LinkId) -> Result<Option<NodeId>> {
        Ok(self.lookup(host, link_id)?.map(|r| r.node_ref))
    }

    /// Like [`LinkRegistry::lookup`] but absence is an error
    ///
    /// # Errors
    ///
    /// Returns `LinkNotFound` when no live node carries the id.
    pub fn require(&mut self, host: &dyn HostDocument, link_id: &LinkId) -> Result<AnnotationRecord> {
        self.lookup(host, link_id)?
            .ok_or_else(|| A11yError::LinkNotFound {
                link_id: link_id.clone(),
            })
    }

    /// Full page scan: every record grouped by link id
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a node's stored data is corrupt.
    pub fn scan(&self, host: &dyn HostDocument) -> Result<Carriers> {
        let mut carriers = Carriers::new();
        let page = host.page();
        for node in host.walk(&page) {
            for record in self.records.records_on(host, &node)? {
                carriers
                    .entry(record.link_id.clone())
                    .or_default()
                    .push(record);
            }
        }
        Ok(carriers)
    }

    /// Remove orphaned link ids in one batch
    ///
    /// Each id is dropped from every order list, any record still carrying it
    /// is deleted, bundles naming it are dissolved and its binding is
    /// forgotten. Returns how many of `stale` were actually found somewhere.
    ///
    /// # Errors
    ///
    /// Returns `Host` if a write is refused; state written before the failure
    /// stays written, so callers run this on a cloned state.
    pub fn prune(
        &mut self,
        host: &mut dyn HostDocument,
        orders: &mut OrderLists,
        bundles: &mut BundleRegistry,
        stale: &BTreeSet<LinkId>,
    ) -> Result<usize> {
        if stale.is_empty() {
            return Ok(0);
        }

        let mut removed = 0;
        let mut touched = BTreeSet::new();
        for link_id in stale {
            let mut found = false;
            if let Some(record) = self.lookup(host, link_id)? {
                self.records.remove(host, &record.node_ref, record.kind)?;
                found = true;
            }
            let lists = orders.detach_everywhere(link_id);
            found |= !lists.is_empty();
            touched.extend(lists);
            found |= bundles.dissolve(link_id) > 0;
            found |= self.forget(link_id);

            if found {
                log_repair!(
                    "prune",
                    A11yError::OrphanedLink {
                        link_id: link_id.clone()
                    }
                );
                removed += 1;
            }
        }

        for key in touched {
            orders.renumber(host, self, &key.container, key.kind)?;
        }
        bundles.persist(host, self.records.keys())?;
        Ok(removed)
    }
}
