//! Schema-versioned keys for node-private data
//!
//! Every dataset is stored under `<identifier>.<dataset>-<schemaVersion>`.
//! Reads fall back to the previous schema version's key; writes always land
//! on the current key and remove the previous one.

use a11yx_core_types::NodeId;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::Result;
use crate::host::HostDocument;
use crate::model::AnnotationKind;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Options,
    List(AnnotationKind),
    NodeData(AnnotationKind),
    BundleLinks,
}

impl Dataset {
    pub fn name(&self) -> String {
        match self {
            Dataset::Options => "options".to_string(),
            Dataset::List(kind) => format!("{}-list", kind.as_str()),
            Dataset::NodeData(kind) => format!("{}-node", kind.as_str()),
            Dataset::BundleLinks => "bundle-links".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    identifier: String,
}

impl KeySpace {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn key(&self, dataset: &Dataset) -> String {
        self.versioned(dataset, SCHEMA_VERSION)
    }

    pub fn legacy_key(&self, dataset: &Dataset) -> String {
        self.versioned(dataset, SCHEMA_VERSION - 1)
    }

    fn versioned(&self, dataset: &Dataset, version: u32) -> String {
        format!("{}.{}-{}", self.identifier, dataset.name(), version)
    }

    /// Whether `key` belongs to this plugin (any schema version)
    pub fn owns(&self, key: &str) -> bool {
        key.strip_prefix(&self.identifier)
            .map(|rest| rest.starts_with('.'))
            .unwrap_or(false)
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new("a11yx")
    }
}

pub fn read(
    host: &dyn HostDocument,
    node: &NodeId,
    keys: &KeySpace,
    dataset: &Dataset,
) -> Option<String> {
    host.get_data(node, &keys.key(dataset))
        .or_else(|| host.get_data(node, &keys.legacy_key(dataset)))
}

/// # Errors
///
/// Returns `Host` if the node refuses the write.
pub fn write(
    host: &mut dyn HostDocument,
    node: &NodeId,
    keys: &KeySpace,
    dataset: &Dataset,
    value: String,
) -> Result<()> {
    host.set_data(node, &keys.key(dataset), value)?;
    let legacy = keys.legacy_key(dataset);
    if host.get_data(node, &legacy).is_some() {
        host.delete_data(node, &legacy)?;
    }
    Ok(())
}

/// Remove both the current and the legacy key
///
/// # Errors
///
/// Returns `Host` if the node refuses the delete.
pub fn delete(
    host: &mut dyn HostDocument,
    node: &NodeId,
    keys: &KeySpace,
    dataset: &Dataset,
) -> Result<()> {
    host.delete_data(node, &keys.key(dataset))?;
    host.delete_data(node, &keys.legacy_key(dataset))
}

/// # Errors
///
/// Returns `Serialization` if the stored value is not the expected JSON shape.
pub fn read_json<T: DeserializeOwned>(
    host: &dyn HostDocument,
    node: &NodeId,
    keys: &KeySpace,
    dataset: &Dataset,
) -> Result<Option<T>> {
    match read(host, node, keys, dataset) {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// # Errors
///
/// Returns `Serialization` or `Host` on failure.
pub fn write_json<T: Serialize>(
    host: &mut dyn HostDocument,
    node: &NodeId,
    keys: &KeySpace,
    dataset: &Dataset,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    write(host, node, keys, dataset, raw)
}
