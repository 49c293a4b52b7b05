//! Canonical event names for structured logging
//!
//! Field keys (`component`, `op`, `event`, `err.kind`, `err.code`) are
//! spelled out in the logging macros because tracing needs them as
//! identifiers; the event values live here so tests can match on them.

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
