use std::collections::{BTreeMap, BTreeSet};

use a11yx_core_types::{LinkId, NodeId};

use crate::errors::{A11yError, Result};
use crate::host::HostDocument;
use crate::model::{AnnotationKind, AnnotationRecord};
use crate::namespace::{self, Dataset, KeySpace};
use crate::ops::link_registry::LinkRegistry;

/// Identifies one order list: a top-level container and an annotation kind
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListKey {
    pub container: NodeId,
    pub kind: AnnotationKind,
}

impl ListKey {
    pub fn new(container: NodeId, kind: AnnotationKind) -> Self {
        Self { container, kind }
    }
}

/// Findings of [`OrderLists::audit`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListAudit {
    /// First order value claimed by more than one record (or entry)
    pub duplicate_order: Option<u32>,
    /// Orders read in list sequence are exactly `0..len`
    pub contiguous: bool,
}

/// Per-(container, kind) sequences of link ids: tab order, reading order
///
/// Mutations keep the orders stored on records equal to list positions by
/// finishing with [`OrderLists::renumber`]. A list that becomes empty is
/// deleted from the container.
#[derive(Debug, Clone, Default)]
pub struct OrderLists {
    keys: KeySpace,
    lists: BTreeMap<ListKey, Vec<LinkId>>,
}

impl OrderLists {
    pub fn new(keys: KeySpace) -> Self {
        Self {
            keys,
            lists: BTreeMap::new(),
        }
    }

    /// Read every list persisted on the page's top-level containers
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a stored list is corrupt.
    pub fn load(host: &dyn HostDocument, keys: KeySpace) -> Result<Self> {
        let mut lists = BTreeMap::new();
        let page = host.page();
        for container in host.children(&page) {
            for kind in AnnotationKind::ALL {
                let stored: Option<Vec<LinkId>> =
                    namespace::read_json(host, &container, &keys, &Dataset::List(kind))?;
                if let Some(links) = stored.filter(|l| !l.is_empty()) {
                    lists.insert(ListKey::new(container.clone(), kind), links);
                }
            }
        }
        Ok(Self { keys, lists })
    }

    pub fn get(&self, container: &NodeId, kind: AnnotationKind) -> &[LinkId] {
        self.lists
            .get(&ListKey::new(container.clone(), kind))
            .map(|l| l.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ListKey, &Vec<LinkId>)> {
        self.lists.iter()
    }

    pub fn list_keys(&self) -> Vec<ListKey> {
        self.lists.keys().cloned().collect()
    }

    pub fn contains(&self, key: &ListKey, link_id: &LinkId) -> bool {
        self.lists
            .get(key)
            .map(|l| l.contains(link_id))
            .unwrap_or(false)
    }

    pub fn position(&self, container: &NodeId, kind: AnnotationKind, link_id: &LinkId) -> Option<usize> {
        self.get(container, kind).iter().position(|l| l == link_id)
    }

    /// Place `link_id` at `at` (appending when `None` or past the end)
    ///
    /// Inserting an id that is already listed leaves the list untouched and
    /// returns its current order.
    ///
    /// # Errors
    ///
    /// Returns `LinkNotFound` if the id does not resolve to a record of this
    /// list, or `Host` if a write is refused.
    pub fn insert(
        &mut self,
        host: &mut dyn HostDocument,
        registry: &mut LinkRegistry,
        container: &NodeId,
        kind: AnnotationKind,
        link_id: &LinkId,
        at: Option<usize>,
    ) -> Result<u32> {
        if let Some(pos) = self.position(container, kind, link_id) {
            return Ok(pos as u32);
        }
        let list = self
            .lists
            .entry(ListKey::new(container.clone(), kind))
            .or_default();
        let index = at.unwrap_or(list.len()).min(list.len());
        list.insert(index, link_id.clone());

        self.renumber(host, registry, container, kind)?;
        self.order_of(container, kind, link_id)
    }

    /// Drop `link_id` from the list; returns `false` if it was not listed
    ///
    /// # Errors
    ///
    /// Returns `Host` if a write is refused.
    pub fn remove(
        &mut self,
        host: &mut dyn HostDocument,
        registry: &mut LinkRegistry,
        container: &NodeId,
        kind: AnnotationKind,
        link_id: &LinkId,
    ) -> Result<bool> {
        let key = ListKey::new(container.clone(), kind);
        if !self.detach(&key, link_id) {
            return Ok(false);
        }
        self.renumber(host, registry, container, kind)?;
        Ok(true)
    }

    /// Move `link_id` to `to_index`, clamping past-the-end indexes to append
    ///
    /// # Errors
    ///
    /// Returns `LinkNotFound` if the id is not in this list.
    pub fn move_to(
        &mut self,
        host: &mut dyn HostDocument,
        registry: &mut LinkRegistry,
        container: &NodeId,
        kind: AnnotationKind,
        link_id: &LinkId,
        to_index: usize,
    ) -> Result<u32> {
        let key = ListKey::new(container.clone(), kind);
        let list = self
            .lists
            .get_mut(&key)
            .ok_or_else(|| A11yError::LinkNotFound {
                link_id: link_id.clone(),
            })?;
        let from = list
            .iter()
            .position(|l| l == link_id)
            .ok_or_else(|| A11yError::LinkNotFound {
                link_id: link_id.clone(),
            })?;
        let entry = list.remove(from);
        let to = to_index.min(list.len());
        list.insert(to, entry);

        self.renumber(host, registry, container, kind)?;
        self.order_of(container, kind, link_id)
    }

    /// Rewrite every record's order to its list position (0-based, no gaps)
    ///
    /// Entries that no longer resolve to a record of this container and kind
    /// are dropped and returned. Repeated entries keep their first position.
    ///
    /// # Errors
    ///
    /// Returns `Host` if a write is refused.
    pub fn renumber(
        &mut self,
        host: &mut dyn HostDocument,
        registry: &mut LinkRegistry,
        container: &NodeId,
        kind: AnnotationKind,
    ) -> Result<Vec<LinkId>> {
        let key = ListKey::new(container.clone(), kind);
        let entries = self.lists.get(&key).cloned().unwrap_or_default();

        let mut seen = BTreeSet::new();
        let mut kept: Vec<AnnotationRecord> = Vec::with_capacity(entries.len());
        let mut dropped = Vec::new();
        for link_id in entries {
            if !seen.insert(link_id.clone()) {
                continue;
            }
            match registry.lookup(host, &link_id)? {
                Some(record) if record.kind == kind && &record.container == container => {
                    kept.push(record)
                }
                _ => dropped.push(link_id),
            }
        }

        for (index, record) in kept.iter().enumerate() {
            registry.records().set_order(host, record, index as u32)?;
        }

        let links: Vec<LinkId> = kept.into_iter().map(|r| r.link_id).collect();
        if links.is_empty() {
            self.lists.remove(&key);
        } else {
            self.lists.insert(key.clone(), links);
        }
        self.persist(host, &key)?;
        Ok(dropped)
    }

    /// Check stored orders against list positions without repairing anything
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a node's stored data is corrupt.
    pub fn audit(
        &self,
        host: &dyn HostDocument,
        registry: &mut LinkRegistry,
        container: &NodeId,
        kind: AnnotationKind,
    ) -> Result<ListAudit> {
        let mut audit = ListAudit {
            duplicate_order: None,
            contiguous: true,
        };
        let mut seen_links = BTreeSet::new();
        let mut seen_orders = BTreeSet::new();
        for (index, link_id) in self.get(container, kind).iter().enumerate() {
            if !seen_links.insert(link_id) {
                audit.duplicate_order = audit.duplicate_order.or(Some(index as u32));
                audit.contiguous = false;
                continue;
            }
            match registry.lookup(host, link_id)? {
                Some(record) => {
                    if !seen_orders.insert(record.order) {
                        audit.duplicate_order = audit.duplicate_order.or(Some(record.order));
                    }
                    if record.order != index as u32 {
                        audit.contiguous = false;
                    }
                }
                None => audit.contiguous = false,
            }
        }
        Ok(audit)
    }

    /// Remove `link_id` from one list in memory only; the caller renumbers
    pub(crate) fn detach(&mut self, key: &ListKey, link_id: &LinkId) -> bool {
        match self.lists.get_mut(key) {
            Some(list) => {
                let before = list.len();
                list.retain(|l| l != link_id);
                before != list.len()
            }
            None => false,
        }
    }

    /// Remove `link_id` from every list in memory; returns the touched lists
    pub(crate) fn detach_everywhere(&mut self, link_id: &LinkId) -> Vec<ListKey> {
        let keys: Vec<ListKey> = self.lists.keys().cloned().collect();
        keys.into_iter()
            .filter(|key| self.detach(key, link_id))
            .collect()
    }

    fn order_of(&self, container: &NodeId, kind: AnnotationKind, link_id: &LinkId) -> Result<u32> {
        self.position(container, kind, link_id)
            .map(|p| p as u32)
            .ok_or_else(|| A11yError::LinkNotFound {
                link_id: link_id.clone(),
            })
    }

    fn persist(&self, host: &mut dyn HostDocument, key: &ListKey) -> Result<()> {
        if !host.exists(&key.container) {
            return Ok(());
        }
        let dataset = Dataset::List(key.kind);
        match self.lists.get(key) {
            Some(links) => namespace::write_json(host, &key.container, &self.keys, &dataset, links),
            None => namespace::delete(host, &key.container, &self.keys, &dataset),
        }
    }
}
