use std::collections::BTreeMap;

use a11yx_core_types::NodeId;
use serde::{Deserialize, Serialize};

use crate::errors::{A11yError, Result};
use crate::host::HostDocument;

const PAGE_ID: &str = "0:1";

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    name: String,
    data: BTreeMap<String, String>,
    locked: bool,
}

impl Node {
    fn new(parent: Option<NodeId>, name: impl Into<String>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            name: name.into(),
            data: BTreeMap::new(),
            locked: false,
        }
    }
}

/// Flat, serializable form of one node, parents before children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeParts {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub name: String,
    pub data: BTreeMap<String, String>,
}

/// In-memory host document
///
/// Mirrors the host's handle semantics: ids of deleted nodes are reused
/// (most recently freed first) and `duplicate` copies private data verbatim.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: BTreeMap<NodeId, Node>,
    page: NodeId,
    next_serial: u64,
    free: Vec<NodeId>,
    selection: Vec<NodeId>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let page = NodeId::new(PAGE_ID);
        let mut nodes = BTreeMap::new();
        nodes.insert(page.clone(), Node::new(None, "Page 1"));
        Self {
            nodes,
            page,
            next_serial: 2,
            free: Vec::new(),
            selection: Vec::new(),
        }
    }

    fn node(&self, id: &NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or_else(|| A11yError::NodeNotFound {
            node_id: id.clone(),
        })
    }

    fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or_else(|| A11yError::NodeNotFound {
            node_id: id.clone(),
        })
    }

    fn allocate(&mut self) -> NodeId {
        if let Some(id) = self.free.pop() {
            return id;
        }
        loop {
            let id = NodeId::new(format!("1:{}", self.next_serial));
            self.next_serial += 1;
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Append a new child under `parent`
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` if `parent` does not exist.
    pub fn create_node(&mut self, parent: &NodeId, name: &str) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.allocate();
        self.nodes
            .insert(id.clone(), Node::new(Some(parent.clone()), name));
        self.node_mut(parent)?.children.push(id.clone());
        Ok(id)
    }

    /// Delete `node` and its whole subtree; freed ids become reusable
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` for a dead handle and `InvalidInput` for the page.
    pub fn delete_node(&mut self, node: &NodeId) -> Result<()> {
        if node == &self.page {
            return Err(A11yError::InvalidInput {
                reason: "the page node cannot be deleted".to_string(),
            });
        }
        let parent = self.node(node)?.parent.clone();
        if let Some(parent) = parent {
            self.node_mut(&parent)?.children.retain(|c| c != node);
        }
        for id in self.walk(node) {
            self.nodes.remove(&id);
            self.selection.retain(|s| s != &id);
            self.free.push(id);
        }
        Ok(())
    }

    /// Copy `node`'s subtree (names and private data) as its next sibling
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` for a dead handle and `InvalidInput` for the page.
    pub fn duplicate(&mut self, node: &NodeId) -> Result<NodeId> {
        let parent = self
            .node(node)?
            .parent
            .clone()
            .ok_or_else(|| A11yError::InvalidInput {
                reason: "the page node cannot be duplicated".to_string(),
            })?;
        let copy = self.copy_subtree(node, &parent)?;
        let siblings = &mut self.node_mut(&parent)?.children;
        let at = siblings
            .iter()
            .position(|c| c == node)
            .map(|i| i + 1)
            .unwrap_or(siblings.len());
        siblings.insert(at, copy.clone());
        Ok(copy)
    }

    fn copy_subtree(&mut self, source: &NodeId, parent: &NodeId) -> Result<NodeId> {
        let original = self.node(source)?.clone();
        let id = self.allocate();
        let mut copy = Node::new(Some(parent.clone()), original.name);
        copy.data = original.data;
        self.nodes.insert(id.clone(), copy);
        for child in &original.children {
            let child_copy = self.copy_subtree(child, &id)?;
            self.node_mut(&id)?.children.push(child_copy);
        }
        Ok(id)
    }

    /// Re-parent `node` under `new_parent` at `index` (appends when `None`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the move would create a cycle.
    pub fn move_node(
        &mut self,
        node: &NodeId,
        new_parent: &NodeId,
        index: Option<usize>,
    ) -> Result<()> {
        self.node(new_parent)?;
        if node == &self.page || self.walk(node).contains(new_parent) {
            return Err(A11yError::InvalidInput {
                reason: format!("cannot move {} under {}", node, new_parent),
            });
        }
        if let Some(old_parent) = self.node(node)?.parent.clone() {
            self.node_mut(&old_parent)?.children.retain(|c| c != node);
        }
        let children = &mut self.node_mut(new_parent)?.children;
        let at = index.unwrap_or(children.len()).min(children.len());
        children.insert(at, node.clone());
        self.node_mut(node)?.parent = Some(new_parent.clone());
        Ok(())
    }

    /// Replace the selection; dead handles are dropped
    pub fn select(&mut self, nodes: &[NodeId]) {
        self.selection = nodes
            .iter()
            .filter(|n| self.nodes.contains_key(*n))
            .cloned()
            .collect();
    }

    pub fn node_name(&self, node: &NodeId) -> Option<&str> {
        self.nodes.get(node).map(|n| n.name.as_str())
    }

    /// Find the first node (depth-first) with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.walk(&self.page)
            .into_iter()
            .find(|id| self.node_name(id) == Some(name))
    }

    /// Make the host refuse private-data writes on `node`
    ///
    /// # Errors
    ///
    /// Returns `NodeNotFound` for a dead handle.
    pub fn set_locked(&mut self, node: &NodeId, locked: bool) -> Result<()> {
        self.node_mut(node)?.locked = locked;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Flatten the tree in depth-first order (page first)
    pub fn to_parts(&self) -> Vec<NodeParts> {
        self.walk(&self.page)
            .into_iter()
            .filter_map(|id| {
                self.nodes.get(&id).map(|n| NodeParts {
                    id: id.clone(),
                    parent: n.parent.clone(),
                    name: n.name.clone(),
                    data: n.data.clone(),
                })
            })
            .collect()
    }

    /// Rebuild a document from parts produced by [`MemoryDocument::to_parts`]
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` unless exactly one part has no parent and
    /// every other part names an earlier part as its parent.
    pub fn from_parts(parts: Vec<NodeParts>) -> Result<Self> {
        let mut iter = parts.into_iter();
        let root = iter.next().ok_or_else(|| A11yError::InvalidInput {
            reason: "document has no page node".to_string(),
        })?;
        if root.parent.is_some() {
            return Err(A11yError::InvalidInput {
                reason: format!("first node {} is not a page", root.id),
            });
        }

        let page = root.id.clone();
        let mut page_node = Node::new(None, root.name);
        page_node.data = root.data;
        let mut nodes = BTreeMap::new();
        nodes.insert(page.clone(), page_node);
        let mut max_serial = 1;

        for part in iter {
            let parent = part.parent.clone().ok_or_else(|| A11yError::InvalidInput {
                reason: format!("node {} has no parent", part.id),
            })?;
            let parent_node = nodes
                .get_mut(&parent)
                .ok_or_else(|| A11yError::InvalidInput {
                    reason: format!("node {} appears before its parent {}", part.id, parent),
                })?;
            parent_node.children.push(part.id.clone());
            if let Some(serial) = part
                .id
                .as_str()
                .split_once(':')
                .and_then(|(_, s)| s.parse::<u64>().ok())
            {
                max_serial = max_serial.max(serial);
            }
            let mut node = Node::new(Some(parent), part.name);
            node.data = part.data;
            nodes.insert(part.id, node);
        }

        Ok(Self {
            nodes,
            page,
            next_serial: max_serial + 1,
            free: Vec::new(),
            selection: Vec::new(),
        })
    }
}

impl HostDocument for MemoryDocument {
    fn page(&self) -> NodeId {
        self.page.clone()
    }

    fn exists(&self, node: &NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent.clone())
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }

    fn get_data(&self, node: &NodeId, key: &str) -> Option<String> {
        self.nodes.get(node).and_then(|n| n.data.get(key).cloned())
    }

    fn set_data(&mut self, node: &NodeId, key: &str, value: String) -> Result<()> {
        let target = self.node_mut(node)?;
        if target.locked {
            return Err(A11yError::Host {
                node_id: node.clone(),
                message: format!("node is locked; refused write to '{}'", key),
            });
        }
        target.data.insert(key.to_string(), value);
        Ok(())
    }

    fn delete_data(&mut self, node: &NodeId, key: &str) -> Result<()> {
        let target = self.node_mut(node)?;
        if target.locked && target.data.contains_key(key) {
            return Err(A11yError::Host {
                node_id: node.clone(),
                message: format!("node is locked; refused delete of '{}'", key),
            });
        }
        target.data.remove(key);
        Ok(())
    }

    fn data_keys(&self, node: &NodeId) -> Vec<String> {
        self.nodes
            .get(node)
            .map(|n| n.data.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_child(doc: &mut MemoryDocument) -> (NodeId, NodeId) {
        let page = doc.page();
        let frame = doc.create_node(&page, "frame").unwrap();
        let child = doc.create_node(&frame, "button").unwrap();
        (frame, child)
    }

    #[test]
    fn test_container_of() {
        let mut doc = MemoryDocument::new();
        let (frame, child) = frame_with_child(&mut doc);
        let grandchild = doc.create_node(&child, "icon").unwrap();

        assert_eq!(doc.container_of(&grandchild), Some(frame.clone()));
        assert_eq!(doc.container_of(&frame), Some(frame));
        assert_eq!(doc.container_of(&doc.page()), None);
    }

    #[test]
    fn test_deleted_ids_are_recycled() {
        let mut doc = MemoryDocument::new();
        let (_frame, child) = frame_with_child(&mut doc);
        doc.delete_node(&child).unwrap();

        let page = doc.page();
        let reused = doc.create_node(&page, "other").unwrap();
        assert_eq!(reused, child);
    }

    #[test]
    fn test_duplicate_copies_data_and_places_after_original() {
        let mut doc = MemoryDocument::new();
        let (frame, child) = frame_with_child(&mut doc);
        doc.create_node(&frame, "trailing").unwrap();
        doc.set_data(&child, "k", "v".to_string()).unwrap();

        let copy = doc.duplicate(&child).unwrap();

        assert_ne!(copy, child);
        assert_eq!(doc.get_data(&copy, "k").as_deref(), Some("v"));
        assert_eq!(doc.children(&frame)[1], copy);
    }

    #[test]
    fn test_move_rejects_cycle() {
        let mut doc = MemoryDocument::new();
        let (frame, child) = frame_with_child(&mut doc);
        assert!(doc.move_node(&frame, &child, None).is_err());
    }

    #[test]
    fn test_locked_node_refuses_writes() {
        let mut doc = MemoryDocument::new();
        let (frame, _) = frame_with_child(&mut doc);
        doc.set_locked(&frame, true).unwrap();

        let err = doc.set_data(&frame, "k", "v".to_string()).unwrap_err();
        assert!(matches!(err, A11yError::Host { .. }));
    }

    #[test]
    fn test_parts_rebuild_same_tree() {
        let mut doc = MemoryDocument::new();
        let (frame, child) = frame_with_child(&mut doc);
        doc.set_data(&child, "k", "v".to_string()).unwrap();

        let rebuilt = MemoryDocument::from_parts(doc.to_parts()).unwrap();

        assert_eq!(rebuilt.to_parts(), doc.to_parts());
        assert_eq!(rebuilt.children(&frame), vec![child]);
    }
}
