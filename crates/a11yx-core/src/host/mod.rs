//! Host document seam
//!
//! The plugin never owns the document. It sees a tree of nodes, each with a
//! private string key-value bucket, plus a primitive for notifying the user.

mod journal;
mod memory;

pub use journal::{journaled, WriteJournal};
pub use memory::{MemoryDocument, NodeParts};

use a11yx_core_types::NodeId;

use crate::errors::Result;

/// Node tree with per-node private data, as exposed by the host
///
/// Node ids are handles, not keys: the host recycles ids of deleted nodes and
/// copies private data verbatim when a node is duplicated.
pub trait HostDocument {
    /// Root of the current page
    fn page(&self) -> NodeId;

    fn exists(&self, node: &NodeId) -> bool;

    fn parent(&self, node: &NodeId) -> Option<NodeId>;

    fn children(&self, node: &NodeId) -> Vec<NodeId>;

    /// Nodes currently selected by the user, in selection order
    fn selection(&self) -> Vec<NodeId>;

    fn get_data(&self, node: &NodeId, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns `NodeNotFound` for a dead handle or `Host` if the host refuses
    /// the write.
    fn set_data(&mut self, node: &NodeId, key: &str, value: String) -> Result<()>;

    /// Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Same as [`HostDocument::set_data`].
    fn delete_data(&mut self, node: &NodeId, key: &str) -> Result<()>;

    fn data_keys(&self, node: &NodeId) -> Vec<String>;

    /// The ancestor directly under the page (a top-level node is its own
    /// container). `None` for the page itself and for dead handles.
    fn container_of(&self, node: &NodeId) -> Option<NodeId> {
        let page = self.page();
        if node == &page || !self.exists(node) {
            return None;
        }
        let mut current = node.clone();
        loop {
            let parent = self.parent(&current)?;
            if parent == page {
                return Some(current);
            }
            current = parent;
        }
    }

    /// Depth-first pre-order walk starting at (and including) `root`
    fn walk(&self, root: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.exists(root) {
            return out;
        }
        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            let mut children = self.children(&node);
            children.reverse();
            stack.extend(children);
            out.push(node);
        }
        out
    }
}

/// The host "notify user" primitive; present only while a page context exists
pub trait Notifier {
    fn notify(&mut self, message: &str, is_error: bool);
}

/// Notifier that keeps every toast, for tests and the CLI
#[derive(Debug, Clone, Default)]
pub struct ToastLog {
    pub toasts: Vec<(String, bool)>,
}

impl Notifier for ToastLog {
    fn notify(&mut self, message: &str, is_error: bool) {
        self.toasts.push((message.to_string(), is_error));
    }
}
