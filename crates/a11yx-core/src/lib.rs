//! A11yX Core - accessibility annotation state model
//!
//! This crate owns the annotation state of a design document page:
//! - Annotation records stored in node-private data buckets
//! - A link registry mapping stable link ids to volatile node handles
//! - Per-container order lists (tab order, reading order) with renumbering
//! - Bundles of co-located annotations
//! - Page snapshots, the snapshot differ and repaint planning
//! - The messenger that reports command outcomes
//!
//! The host document is reached only through [`host::HostDocument`].

pub mod config;
pub mod diff;
pub mod errors;
pub mod host;
pub mod logging_facility;
pub mod messenger;
pub mod model;
pub mod namespace;
pub mod ops;
pub mod repaint;
pub mod snapshot;

// Re-export commonly used types
pub use config::{BuildMode, Options, PluginConfig};
pub use errors::{A11yError, ExError, ExErrorKind, Result};
pub use host::{HostDocument, MemoryDocument, Notifier, ToastLog};
pub use messenger::{CommandReport, Delivery, Messenger, ReportStatus};
pub use model::{AnnotationKind, AnnotationPayload, AnnotationRecord};
pub use namespace::KeySpace;
pub use ops::{AnnotationState, SyncReport};
pub use repaint::{plan_repaint, RepaintDirective, RepaintPlan};
pub use snapshot::PageSnapshot;
