use std::collections::BTreeMap;

use a11yx_core_types::NodeId;

use crate::errors::Result;
use crate::host::HostDocument;
use crate::log_repair;

/// Host wrapper that remembers the value each key held before its first
/// write, so a failed command can put the document back.
///
/// Only writes the host accepted are recorded; a refused write changed
/// nothing and needs no restore. Reads pass straight through and observe
/// the command's own writes.
pub struct WriteJournal<'a> {
    host: &'a mut dyn HostDocument,
    prior: BTreeMap<(NodeId, String), Option<String>>,
}

impl<'a> WriteJournal<'a> {
    pub fn new(host: &'a mut dyn HostDocument) -> Self {
        Self {
            host,
            prior: BTreeMap::new(),
        }
    }

    /// Number of distinct keys written so far
    pub fn len(&self) -> usize {
        self.prior.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prior.is_empty()
    }

    /// Keep every write
    pub fn commit(self) {}

    /// Restore every written key to its value before the first write.
    ///
    /// A restore the host refuses is logged and skipped so the rest of the
    /// document still comes back. Returns the number of keys restored.
    pub fn rollback(self) -> usize {
        let mut restored = 0;
        for ((node, key), value) in self.prior {
            let outcome = match value {
                Some(value) => self.host.set_data(&node, &key, value),
                None => self.host.delete_data(&node, &key),
            };
            match outcome {
                Ok(()) => restored += 1,
                Err(err) => log_repair!("rollback", err),
            }
        }
        restored
    }

    fn remember(&mut self, node: &NodeId, key: &str, before: Option<String>) {
        self.prior
            .entry((node.clone(), key.to_string()))
            .or_insert(before);
    }
}

impl HostDocument for WriteJournal<'_> {
    fn page(&self) -> NodeId {
        self.host.page()
    }

    fn exists(&self, node: &NodeId) -> bool {
        self.host.exists(node)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.host.parent(node)
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.host.children(node)
    }

    fn selection(&self) -> Vec<NodeId> {
        self.host.selection()
    }

    fn get_data(&self, node: &NodeId, key: &str) -> Option<String> {
        self.host.get_data(node, key)
    }

    fn set_data(&mut self, node: &NodeId, key: &str, value: String) -> Result<()> {
        let before = self.host.get_data(node, key);
        self.host.set_data(node, key, value)?;
        self.remember(node, key, before);
        Ok(())
    }

    fn delete_data(&mut self, node: &NodeId, key: &str) -> Result<()> {
        let before = self.host.get_data(node, key);
        self.host.delete_data(node, key)?;
        if before.is_some() {
            self.remember(node, key, before);
        }
        Ok(())
    }

    fn data_keys(&self, node: &NodeId) -> Vec<String> {
        self.host.data_keys(node)
    }
}

/// Run `phase` against a journaled view of `host`; keep its writes on
/// success, undo them all on failure.
///
/// # Errors
///
/// Returns whatever `phase` returns, after the rollback.
pub fn journaled<T, E>(
    host: &mut dyn HostDocument,
    phase: impl FnOnce(&mut dyn HostDocument) -> std::result::Result<T, E>,
) -> std::result::Result<T, E> {
    let mut journal = WriteJournal::new(host);
    let outcome = {
        let view: &mut dyn HostDocument = &mut journal;
        phase(view)
    };
    match outcome {
        Ok(value) => {
            journal.commit();
            Ok(value)
        }
        Err(err) => {
            let restored = journal.rollback();
            tracing::debug!(
                component = module_path!(),
                op = "rollback",
                restored,
                "undid host writes of a failed phase"
            );
            Err(err)
        }
    }
}
