//! Correlation types for command tracking
//!
//! Every UI message processed by the engine gets a `CommandId` so that the
//! start/end log lines of one command can be tied together.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single dispatched command
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandId(String);

impl CommandId {
    /// Generate a new random CommandId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CommandId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through one command's mutation and repaint phases
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub command_id: CommandId,
    pub action: String,
}

impl CommandContext {
    /// Create a new context for the given UI action
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            command_id: CommandId::new(),
            action: action.into(),
        }
    }
}
