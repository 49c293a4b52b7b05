//! Kind-specific annotation payloads
//!
//! One variant per [`AnnotationKind`]; every place that interprets a
//! payload matches exhaustively so adding a kind is a compile error until
//! each site handles it.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::errors::{A11yError, Result};
use crate::model::AnnotationKind;

/// Key-action token attached to a keyboard stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyAction {
    Tab,
    ShiftTab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Space,
    Escape,
    Home,
    End,
    PageUp,
    PageDown,
}

/// ARIA role token attached to a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaRole {
    Button,
    Link,
    Checkbox,
    Radio,
    Switch,
    Tab,
    Textbox,
    Combobox,
    Slider,
    Img,
    Navigation,
    Dialog,
    Banner,
    Main,
    Contentinfo,
    Presentation,
}

/// Heading level 1-6, or explicitly not a heading
///
/// Serialized as a number (`2`) or the string `"none"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "HeadingLevelRepr", into = "HeadingLevelRepr")]
pub enum HeadingLevel {
    Level(u8),
    None,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum HeadingLevelRepr {
    Number(u8),
    Text(String),
}

impl TryFrom<HeadingLevelRepr> for HeadingLevel {
    type Error = String;

    fn try_from(repr: HeadingLevelRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            HeadingLevelRepr::Number(n) if (1..=6).contains(&n) => Ok(HeadingLevel::Level(n)),
            HeadingLevelRepr::Number(n) => Err(format!("heading level {} is outside 1-6", n)),
            HeadingLevelRepr::Text(text) => match text.as_str() {
                "none" => Ok(HeadingLevel::None),
                digits => digits
                    .parse::<u8>()
                    .ok()
                    .filter(|n| (1..=6).contains(n))
                    .map(HeadingLevel::Level)
                    .ok_or_else(|| format!("invalid heading level '{}'", digits)),
            },
        }
    }
}

impl From<HeadingLevel> for HeadingLevelRepr {
    fn from(level: HeadingLevel) -> Self {
        match level {
            HeadingLevel::Level(n) => HeadingLevelRepr::Number(n),
            HeadingLevel::None => HeadingLevelRepr::Text("none".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeystopData {
    #[serde(default)]
    pub keys: Vec<KeyAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelData {
    pub role: AriaRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingData {
    pub level: HeadingLevel,
}

/// Accessibility payload, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnnotationPayload {
    Keystop(KeystopData),
    Label(LabelData),
    Heading(HeadingData),
}

impl AnnotationPayload {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            AnnotationPayload::Keystop(_) => AnnotationKind::Keystop,
            AnnotationPayload::Label(_) => AnnotationKind::Label,
            AnnotationPayload::Heading(_) => AnnotationKind::Heading,
        }
    }

    /// Payload used when a UI `add-stop` carries no explicit payload
    pub fn default_for(kind: AnnotationKind) -> Self {
        match kind {
            AnnotationKind::Keystop => AnnotationPayload::Keystop(KeystopData::default()),
            AnnotationKind::Label => AnnotationPayload::Label(LabelData {
                role: AriaRole::Button,
                text: None,
            }),
            AnnotationKind::Heading => AnnotationPayload::Heading(HeadingData {
                level: HeadingLevel::Level(2),
            }),
        }
    }

    /// Interpret an untagged UI payload (e.g. `{"role": "button"}`) as the
    /// given kind, then validate and normalize it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPayload` if the JSON does not match the kind's shape.
    pub fn from_value(kind: AnnotationKind, value: serde_json::Value) -> Result<Self> {
        let invalid = |e: serde_json::Error| A11yError::InvalidPayload {
            kind,
            reason: e.to_string(),
        };
        let payload = match kind {
            AnnotationKind::Keystop => {
                AnnotationPayload::Keystop(serde_json::from_value(value).map_err(invalid)?)
            }
            AnnotationKind::Label => {
                AnnotationPayload::Label(serde_json::from_value(value).map_err(invalid)?)
            }
            AnnotationKind::Heading => {
                AnnotationPayload::Heading(serde_json::from_value(value).map_err(invalid)?)
            }
        };
        payload.normalized()
    }

    /// Trim free text, drop empty text and repeated key tokens.
    ///
    /// Normalizing before every write keeps value-equality comparisons in
    /// the differ free of whitespace noise.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPayload` for keystops listing more key actions than
    /// the option table offers.
    pub fn normalized(self) -> Result<Self> {
        Ok(match self {
            AnnotationPayload::Keystop(data) => {
                if data.keys.len() > config::KEY_ACTION_OPTIONS.len() {
                    return Err(A11yError::InvalidPayload {
                        kind: AnnotationKind::Keystop,
                        reason: format!("{} key actions listed", data.keys.len()),
                    });
                }
                let mut keys = Vec::with_capacity(data.keys.len());
                for key in data.keys {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
                AnnotationPayload::Keystop(KeystopData {
                    keys,
                    description: clean_text(data.description),
                })
            }
            AnnotationPayload::Label(data) => AnnotationPayload::Label(LabelData {
                role: data.role,
                text: clean_text(data.text),
            }),
            heading @ AnnotationPayload::Heading(_) => heading,
        })
    }

    /// Text shown inside the canvas badge for a record at `order`
    pub fn badge_text(&self, order: u32) -> String {
        match self {
            AnnotationPayload::Keystop(_) => order.saturating_add(1).to_string(),
            AnnotationPayload::Label(data) => config::role_label(data.role).to_string(),
            AnnotationPayload::Heading(data) => match data.level {
                HeadingLevel::Level(n) => format!("H{}", n),
                HeadingLevel::None => "–".to_string(),
            },
        }
    }

    /// One-line description using the option tables' labels, e.g.
    /// `Heading 3` or `Button "Save"`
    pub fn describe(&self) -> String {
        match self {
            AnnotationPayload::Keystop(data) if data.keys.is_empty() => "Focus".to_string(),
            AnnotationPayload::Keystop(data) => data
                .keys
                .iter()
                .map(|k| config::key_action_label(*k))
                .collect::<Vec<_>>()
                .join(", "),
            AnnotationPayload::Label(LabelData { role, text: None }) => {
                config::role_label(*role).to_string()
            }
            AnnotationPayload::Label(LabelData {
                role,
                text: Some(text),
            }) => format!("{} \"{}\"", config::role_label(*role), text),
            AnnotationPayload::Heading(data) => config::heading_label(data.level).to_string(),
        }
    }
}

fn clean_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
