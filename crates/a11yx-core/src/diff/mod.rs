//! Snapshot differ
//!
//! Compares the stored page snapshot with a fresh one and classifies every
//! link id present on either side.
//!
//! ```ignore
//! use a11yx_core::diff::{compute_diff, render_human_summary};
//!
//! let diff = compute_diff(&stored, &current);
//! println!("{}", render_human_summary(&diff));
//! ```
//!
//! ## Guarantees
//!
//! - **Exclusive classes**: each link id lands in exactly one class.
//! - **Updated wins**: a payload change outranks a position change.
//! - **Determinism**: output depends only on snapshot contents, never on
//!   iteration order or capture time.
//! - **Non-fatal integrity findings**: list problems in either snapshot are
//!   reported in `invariant_violations`, never as errors.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{classify, compute_diff, parse_snapshot_bytes};
pub use human_summary::render_human_summary;
pub use model::{ChangeClass, DiffEntry, DiffResult, InvariantViolationEntry};
