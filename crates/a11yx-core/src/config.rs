//! Plugin configuration and static option tables
//!
//! The tables here are immutable data shared by the whole process. They are
//! consulted when rendering badge text and validating payloads, never mutated.

use serde::{Deserialize, Serialize};

use crate::errors::{A11yError, Result};
use crate::host::HostDocument;
use crate::model::{AnnotationKind, AriaRole, HeadingLevel, KeyAction};
use crate::namespace::{self, Dataset, KeySpace};

/// Build flavour; gates informational logging in the messenger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

/// Per-document display options, stored on the page node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    pub show_badges: bool,
    pub show_legends: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            show_badges: true,
            show_legends: true,
        }
    }
}

impl Options {
    /// Read the options dataset from the page, falling back to `fallback`
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a stored value is not valid JSON.
    pub fn load(host: &dyn HostDocument, keys: &KeySpace, fallback: Options) -> Result<Self> {
        let page = host.page();
        Ok(namespace::read_json(host, &page, keys, &Dataset::Options)?.unwrap_or(fallback))
    }

    /// # Errors
    ///
    /// Returns `Host` if the page refuses the write.
    pub fn save(&self, host: &mut dyn HostDocument, keys: &KeySpace) -> Result<()> {
        let page = host.page();
        namespace::write_json(host, &page, keys, &Dataset::Options, self)
    }
}

fn default_identifier() -> String {
    "a11yx".to_string()
}

/// Process-level plugin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Namespace prefix for every persisted key
    #[serde(default = "default_identifier")]
    pub identifier: String,
    #[serde(default)]
    pub build_mode: BuildMode,
    #[serde(default)]
    pub options: Options,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
            build_mode: BuildMode::default(),
            options: Options::default(),
        }
    }
}

impl PluginConfig {
    /// Parse a TOML configuration document
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML or an unusable identifier.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PluginConfig = toml::from_str(text).map_err(|e| A11yError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` if the identifier is empty or contains the
    /// key separator.
    pub fn validate(&self) -> Result<()> {
        if self.identifier.trim().is_empty() {
            return Err(A11yError::InvalidConfig {
                reason: "identifier must not be empty".to_string(),
            });
        }
        if self.identifier.contains('.') {
            return Err(A11yError::InvalidConfig {
                reason: format!("identifier '{}' must not contain '.'", self.identifier),
            });
        }
        Ok(())
    }

    pub fn key_space(&self) -> KeySpace {
        KeySpace::new(self.identifier.clone())
    }
}

// ===== Static tables =====

pub static KEY_ACTION_OPTIONS: &[(KeyAction, &str)] = &[
    (KeyAction::Tab, "Tab"),
    (KeyAction::ShiftTab, "Shift + Tab"),
    (KeyAction::ArrowUp, "Arrow up"),
    (KeyAction::ArrowDown, "Arrow down"),
    (KeyAction::ArrowLeft, "Arrow left"),
    (KeyAction::ArrowRight, "Arrow right"),
    (KeyAction::Enter, "Enter"),
    (KeyAction::Space, "Space"),
    (KeyAction::Escape, "Escape"),
    (KeyAction::Home, "Home"),
    (KeyAction::End, "End"),
    (KeyAction::PageUp, "Page up"),
    (KeyAction::PageDown, "Page down"),
];

pub static ROLE_OPTIONS: &[(AriaRole, &str)] = &[
    (AriaRole::Button, "Button"),
    (AriaRole::Link, "Link"),
    (AriaRole::Checkbox, "Checkbox"),
    (AriaRole::Radio, "Radio"),
    (AriaRole::Switch, "Switch"),
    (AriaRole::Tab, "Tab"),
    (AriaRole::Textbox, "Text box"),
    (AriaRole::Combobox, "Combo box"),
    (AriaRole::Slider, "Slider"),
    (AriaRole::Img, "Image"),
    (AriaRole::Navigation, "Navigation"),
    (AriaRole::Dialog, "Dialog"),
    (AriaRole::Banner, "Banner"),
    (AriaRole::Main, "Main"),
    (AriaRole::Contentinfo, "Content info"),
    (AriaRole::Presentation, "Presentation"),
];

pub static HEADING_OPTIONS: &[(HeadingLevel, &str)] = &[
    (HeadingLevel::Level(1), "Heading 1"),
    (HeadingLevel::Level(2), "Heading 2"),
    (HeadingLevel::Level(3), "Heading 3"),
    (HeadingLevel::Level(4), "Heading 4"),
    (HeadingLevel::Level(5), "Heading 5"),
    (HeadingLevel::Level(6), "Heading 6"),
    (HeadingLevel::None, "Not a heading"),
];

/// Badge colours for one annotation kind, as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub text: &'static str,
}

pub fn palette_for(kind: AnnotationKind) -> Palette {
    match kind {
        AnnotationKind::Keystop => Palette {
            fill: "#d4f1ff",
            stroke: "#0d8ae0",
            text: "#05355c",
        },
        AnnotationKind::Label => Palette {
            fill: "#ffe9d6",
            stroke: "#e0700d",
            text: "#5c2a05",
        },
        AnnotationKind::Heading => Palette {
            fill: "#e8ddff",
            stroke: "#6b3fe0",
            text: "#2a0f5c",
        },
    }
}

pub fn role_label(role: AriaRole) -> &'static str {
    ROLE_OPTIONS
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, label)| *label)
        .unwrap_or("Role")
}

pub fn heading_label(level: HeadingLevel) -> &'static str {
    HEADING_OPTIONS
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, label)| *label)
        .unwrap_or("Heading")
}

pub fn key_action_label(key: KeyAction) -> &'static str {
    KEY_ACTION_OPTIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or("Key")
}
