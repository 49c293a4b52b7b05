//! Core types shared across a11yx crates
//!
//! This crate provides foundational types used by the annotation kernel,
//! the command engine and the logging facility:
//!
//! - **Identifiers**: LinkId (plugin-generated, stable), NodeId (host handle)
//! - **Correlation types**: CommandId, CommandContext
//! - **Schema constants**: Canonical log event names

pub mod correlation;
pub mod ids;
pub mod schema;

pub use correlation::{CommandContext, CommandId};
pub use ids::{LinkId, NodeId};
