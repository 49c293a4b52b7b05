use a11yx_core_types::LinkId;
use serde::{Deserialize, Serialize};

/// Associates two annotations of different kinds that share one node
///
/// Members are kept sorted so `(a, b)` and `(b, a)` are the same bundle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bundle {
    pub first: LinkId,
    pub second: LinkId,
}

impl Bundle {
    pub fn new(a: LinkId, b: LinkId) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn contains(&self, link_id: &LinkId) -> bool {
        &self.first == link_id || &self.second == link_id
    }

    /// The member that is not `link_id`, if `link_id` belongs to this bundle
    pub fn partner_of(&self, link_id: &LinkId) -> Option<&LinkId> {
        if &self.first == link_id {
            Some(&self.second)
        } else if &self.second == link_id {
            Some(&self.first)
        } else {
            None
        }
    }
}
