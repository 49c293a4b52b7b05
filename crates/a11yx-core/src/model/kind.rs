use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::A11yError;

/// Annotation kind
///
/// Immutable after a record is created. Declaration order is the order in
/// which kinds are probed on a node and listed in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    /// Keyboard stop (tab order)
    Keystop,
    /// Text label with ARIA role (reading order)
    Label,
    /// Heading level (reading order)
    Heading,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 3] = [
        AnnotationKind::Keystop,
        AnnotationKind::Label,
        AnnotationKind::Heading,
    ];

    /// Token used in protocol payloads and storage keys
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Keystop => "keystop",
            AnnotationKind::Label => "label",
            AnnotationKind::Heading => "heading",
        }
    }

    /// Singular/plural noun for user-facing messages
    pub fn noun(&self, count: usize) -> &'static str {
        match (self, count == 1) {
            (AnnotationKind::Keystop, true) => "keyboard stop",
            (AnnotationKind::Keystop, false) => "keyboard stops",
            (AnnotationKind::Label, true) => "label",
            (AnnotationKind::Label, false) => "labels",
            (AnnotationKind::Heading, true) => "heading",
            (AnnotationKind::Heading, false) => "headings",
        }
    }
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationKind {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keystop" => Ok(AnnotationKind::Keystop),
            "label" => Ok(AnnotationKind::Label),
            "heading" => Ok(AnnotationKind::Heading),
            other => Err(A11yError::InvalidInput {
                reason: format!("unknown annotation kind '{}'", other),
            }),
        }
    }
}
