pub mod annotation_ops;
pub mod bundles;
pub mod link_registry;
pub mod order_lists;
pub mod record_store;
pub mod state;
pub mod sync;

pub use annotation_ops::{
    add_annotation, remove_annotation, reorder_annotation, update_payload, AddOutcome,
};
pub use bundles::BundleRegistry;
pub use link_registry::{Carriers, LinkRegistry};
pub use order_lists::{ListAudit, ListKey, OrderLists};
pub use record_store::{RecordStore, SetOutcome};
pub use state::AnnotationState;
pub use sync::{sync_page, SyncReport};
