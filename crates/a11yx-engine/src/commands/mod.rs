//! UI message protocol and the synchronous command phase.
//!
//! Parsing turns a raw `{action, payload}` message into a [`UiCommand`];
//! [`apply_command`] runs the command's mutation against annotation state.

pub mod apply;
pub mod ui_command;

pub use apply::{apply_command, CommandEffect};
pub use ui_command::{UiCommand, UiMessage, UiResponse};
