use a11yx_core_types::{CommandId, LinkId, NodeId};
use thiserror::Error;

use crate::model::AnnotationKind;

/// Result type alias using A11yError
pub type Result<T> = std::result::Result<T, A11yError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that is used in log lines,
/// UI responses and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input/protocol
    InvalidInput,
    InvalidPayload,
    KindMismatch,
    EmptySelection,
    UnresolvedCommand,

    // Lookup
    NotFound,
    NotInContainer,

    // Data integrity (self-healed)
    OrphanedLink,
    DuplicateOrder,

    // Reporting
    MissingContext,

    // Associations
    InvalidBundle,

    // Configuration
    InvalidConfig,

    // Integration/IO
    Host,
    Io,
    Serialization,
    Persistence,
    Painter,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidPayload => "ERR_INVALID_PAYLOAD",
            ExErrorKind::KindMismatch => "ERR_KIND_MISMATCH",
            ExErrorKind::EmptySelection => "ERR_EMPTY_SELECTION",
            ExErrorKind::UnresolvedCommand => "ERR_UNRESOLVED_COMMAND",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NotInContainer => "ERR_NOT_IN_CONTAINER",
            ExErrorKind::OrphanedLink => "ERR_ORPHANED_LINK",
            ExErrorKind::DuplicateOrder => "ERR_DUPLICATE_ORDER",
            ExErrorKind::MissingContext => "ERR_MISSING_CONTEXT",
            ExErrorKind::InvalidBundle => "ERR_INVALID_BUNDLE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Host => "ERR_HOST",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Painter => "ERR_PAINTER",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Integrity kinds are repaired in place (prune/renumber) and never
    /// interrupt the command that detected them.
    pub fn is_self_healing(&self) -> bool {
        matches!(self, ExErrorKind::OrphanedLink | ExErrorKind::DuplicateOrder)
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus optional
/// entity context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    link_id: Option<LinkId>,
    node_id: Option<NodeId>,
    command_id: Option<CommandId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            link_id: None,
            node_id: None,
            command_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add link ID context
    pub fn with_link_id(mut self, link_id: LinkId) -> Self {
        self.link_id = Some(link_id);
        self
    }

    /// Add node ID context
    pub fn with_node_id(mut self, node_id: NodeId) -> Self {
        self.node_id = Some(node_id);
        self
    }

    /// Add command correlation
    pub fn with_command_id(mut self, command_id: CommandId) -> Self {
        self.command_id = Some(command_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn link_id(&self) -> Option<&LinkId> {
        self.link_id.as_ref()
    }

    pub fn node_id(&self) -> Option<&NodeId> {
        self.node_id.as_ref()
    }

    pub fn command_id(&self) -> Option<&CommandId> {
        self.command_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(link_id) = &self.link_id {
            write!(f, " (link_id: {})", link_id)?;
        }
        if let Some(node_id) = &self.node_id {
            write!(f, " (node_id: {})", node_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for annotation operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum A11yError {
    // ===== Lookup =====
    /// Node handle does not exist in the host document
    #[error("Node not found: {node_id}")]
    NodeNotFound { node_id: NodeId },

    /// Node has no top-level container (the page itself)
    #[error("Node {node_id} is not inside a top-level container")]
    NotInContainer { node_id: NodeId },

    /// No live annotation carries this link
    #[error("Annotation link not found: {link_id}")]
    LinkNotFound { link_id: LinkId },

    // ===== Integrity =====
    /// A list entry resolves to no live node
    #[error("Orphaned annotation link: {link_id}")]
    OrphanedLink { link_id: LinkId },

    /// Two records in one order list claim the same position
    #[error("Duplicate order {order} in {kind} list of container {container_id}")]
    DuplicateOrder {
        container_id: NodeId,
        kind: AnnotationKind,
        order: u32,
    },

    // ===== Reporting / protocol =====
    /// No page context available for user notification
    #[error("No page context available: {message}")]
    MissingContext { message: String },

    /// The UI sent an action the core does not recognize
    #[error("Unrecognized command: {action}")]
    UnresolvedCommand { action: String },

    /// Payload does not match its kind's shape
    #[error("Invalid {kind} payload: {reason}")]
    InvalidPayload { kind: AnnotationKind, reason: String },

    /// Payload kind differs from the record's immutable kind
    #[error("Annotation kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        expected: AnnotationKind,
        actual: AnnotationKind,
    },

    /// Generic input validation failure
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Command needs a selection but none is active
    #[error("Nothing is selected")]
    EmptySelection,

    /// Bundle members must be two different kinds on one node
    #[error("Invalid bundle: {reason}")]
    InvalidBundle { reason: String },

    /// Configuration file could not be interpreted
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Generic =====
    /// Host document refused a write
    #[error("Host error on node {node_id}: {message}")]
    Host { node_id: NodeId, message: String },

    /// Serialization error (JSON encoding/decoding of node data)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<serde_json::Error> for A11yError {
    fn from(err: serde_json::Error) -> Self {
        A11yError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from A11yError to ExError
impl From<A11yError> for ExError {
    fn from(err: A11yError) -> Self {
        let message = err.to_string();
        match err {
            A11yError::NodeNotFound { node_id } => ExError::new(ExErrorKind::NotFound)
                .with_node_id(node_id)
                .with_message(message),
            A11yError::NotInContainer { node_id } => ExError::new(ExErrorKind::NotInContainer)
                .with_node_id(node_id)
                .with_message(message),
            A11yError::LinkNotFound { link_id } => ExError::new(ExErrorKind::NotFound)
                .with_link_id(link_id)
                .with_message(message),
            A11yError::OrphanedLink { link_id } => ExError::new(ExErrorKind::OrphanedLink)
                .with_link_id(link_id)
                .with_message(message),
            A11yError::DuplicateOrder { container_id, .. } => {
                ExError::new(ExErrorKind::DuplicateOrder)
                    .with_node_id(container_id)
                    .with_message(message)
            }
            A11yError::MissingContext { .. } => {
                ExError::new(ExErrorKind::MissingContext).with_message(message)
            }
            A11yError::UnresolvedCommand { .. } => ExError::new(ExErrorKind::UnresolvedCommand)
                .with_op("parse_command")
                .with_message(message),
            A11yError::InvalidPayload { .. } => {
                ExError::new(ExErrorKind::InvalidPayload).with_message(message)
            }
            A11yError::KindMismatch { .. } => {
                ExError::new(ExErrorKind::KindMismatch).with_message(message)
            }
            A11yError::InvalidInput { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            A11yError::EmptySelection => {
                ExError::new(ExErrorKind::EmptySelection).with_message(message)
            }
            A11yError::InvalidBundle { .. } => {
                ExError::new(ExErrorKind::InvalidBundle).with_message(message)
            }
            A11yError::InvalidConfig { .. } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message(message),
            A11yError::Host { node_id, .. } => ExError::new(ExErrorKind::Host)
                .with_node_id(node_id)
                .with_message(message),
            A11yError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            A11yError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}
