//! Page snapshots
//!
//! A snapshot is a diff baseline, never authoritative storage: the host's
//! node data is. It captures every live record and every order list of a
//! page at one point in time.

pub mod digest;
pub mod page;

pub use digest::compute_semantic_digest;
pub use page::{OrderListEntry, PageSnapshot, SnapshotEntry, SNAPSHOT_SCHEMA_VERSION};
