//! A11yX Engine - command orchestration
//!
//! Connects the UI message protocol to the annotation core:
//! parse a message, run its mutation synchronously, diff against the stored
//! snapshot, then await the repaint and report the outcome.

pub mod commands;
pub mod painter;
pub mod queue;
pub mod session;

pub use commands::{UiCommand, UiMessage, UiResponse};
pub use painter::{execute_plan, BadgePainter, PaintOutcome, RecordingPainter};
pub use queue::serve;
pub use session::Session;
