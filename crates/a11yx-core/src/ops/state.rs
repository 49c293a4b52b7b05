use crate::errors::Result;
use crate::host::HostDocument;
use crate::namespace::KeySpace;
use crate::ops::bundles::BundleRegistry;
use crate::ops::link_registry::LinkRegistry;
use crate::ops::order_lists::OrderLists;
use crate::ops::record_store::RecordStore;

/// All process-wide annotation state for one page
///
/// Commands mutate a clone and the session swaps it in only once the whole
/// synchronous phase succeeded, so a failed command leaves this untouched.
#[derive(Debug, Clone, Default)]
pub struct AnnotationState {
    pub registry: LinkRegistry,
    pub orders: OrderLists,
    pub bundles: BundleRegistry,
}

impl AnnotationState {
    pub fn new(keys: KeySpace) -> Self {
        Self {
            registry: LinkRegistry::new(RecordStore::new(keys.clone())),
            orders: OrderLists::new(keys),
            bundles: BundleRegistry::new(),
        }
    }

    /// Read persisted order lists and bundles from the page
    ///
    /// Bindings start empty and fill lazily; run
    /// [`crate::ops::sync_page`] afterwards to repair anything stale.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if stored data is corrupt.
    pub fn load(host: &dyn HostDocument, keys: KeySpace) -> Result<Self> {
        Ok(Self {
            registry: LinkRegistry::new(RecordStore::new(keys.clone())),
            bundles: BundleRegistry::load(host, &keys)?,
            orders: OrderLists::load(host, keys)?,
        })
    }

    pub fn records(&self) -> &RecordStore {
        self.registry.records()
    }

    pub fn keys(&self) -> &KeySpace {
        self.registry.records().keys()
    }
}
