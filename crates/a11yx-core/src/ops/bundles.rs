use std::collections::BTreeSet;

use a11yx_core_types::LinkId;

use crate::errors::{A11yError, Result};
use crate::host::HostDocument;
use crate::model::{AnnotationRecord, Bundle};
use crate::namespace::{self, Dataset, KeySpace};

/// Co-location links between annotations of different kinds on one node
///
/// Purely associative; a bundle disappears as soon as either member does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleRegistry {
    bundles: BTreeSet<Bundle>,
}

impl BundleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `Serialization` if the stored value is corrupt.
    pub fn load(host: &dyn HostDocument, keys: &KeySpace) -> Result<Self> {
        let page = host.page();
        let stored: Option<Vec<Bundle>> =
            namespace::read_json(host, &page, keys, &Dataset::BundleLinks)?;
        Ok(Self {
            bundles: stored.unwrap_or_default().into_iter().collect(),
        })
    }

    /// # Errors
    ///
    /// Returns `Host` if the page refuses the write.
    pub fn persist(&self, host: &mut dyn HostDocument, keys: &KeySpace) -> Result<()> {
        let page = host.page();
        if self.bundles.is_empty() {
            namespace::delete(host, &page, keys, &Dataset::BundleLinks)
        } else {
            let list: Vec<&Bundle> = self.bundles.iter().collect();
            namespace::write_json(host, &page, keys, &Dataset::BundleLinks, &list)
        }
    }

    /// Bundle two records that share a node
    ///
    /// # Errors
    ///
    /// Returns `InvalidBundle` if the records sit on different nodes or are
    /// of the same kind.
    pub fn link(&mut self, a: &AnnotationRecord, b: &AnnotationRecord) -> Result<Bundle> {
        if a.node_ref != b.node_ref {
            return Err(A11yError::InvalidBundle {
                reason: format!(
                    "{} and {} are on different nodes",
                    a.link_id, b.link_id
                ),
            });
        }
        if a.kind == b.kind {
            return Err(A11yError::InvalidBundle {
                reason: format!("both members are {} annotations", a.kind),
            });
        }
        let bundle = Bundle::new(a.link_id.clone(), b.link_id.clone());
        self.bundles.insert(bundle.clone());
        Ok(bundle)
    }

    /// Link ids bundled with `link_id`
    pub fn members_of(&self, link_id: &LinkId) -> Vec<LinkId> {
        self.bundles
            .iter()
            .filter_map(|b| b.partner_of(link_id).cloned())
            .collect()
    }

    /// Remove every bundle naming `link_id`; returns how many were removed
    pub fn dissolve(&mut self, link_id: &LinkId) -> usize {
        let before = self.bundles.len();
        self.bundles.retain(|b| !b.contains(link_id));
        before - self.bundles.len()
    }

    /// Keep only bundles whose members are both in `live`
    pub fn retain_live(&mut self, live: &BTreeSet<LinkId>) -> usize {
        let before = self.bundles.len();
        self.bundles
            .retain(|b| live.contains(&b.first) && live.contains(&b.second));
        before - self.bundles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bundle> {
        self.bundles.iter()
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}
