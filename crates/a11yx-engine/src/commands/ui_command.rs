//! Messages exchanged with the UI surface.

use std::str::FromStr;

use a11yx_core::errors::{A11yError, Result};
use a11yx_core::model::AnnotationKind;
use a11yx_core::CommandReport;
use a11yx_core_types::LinkId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message posted by the UI: `{action, payload}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiMessage {
    pub action: String,
    #[serde(default)]
    pub payload: Value,
}

impl UiMessage {
    pub fn new(action: impl Into<String>, payload: Value) -> Self {
        Self {
            action: action.into(),
            payload,
        }
    }
}

/// Reply posted back to the UI: `{status, logMessage?, toastMessage?}`
pub type UiResponse = CommandReport;

/// A recognized UI action with its payload decoded
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    /// Annotate every selected node with `kind`
    AddStop {
        kind: AnnotationKind,
        payload: Option<Value>,
    },
    ReorderStop {
        link_id: LinkId,
        to_index: usize,
    },
    RemoveStop {
        link_id: LinkId,
    },
    UpdateStopPayload {
        link_id: LinkId,
        payload: Value,
    },
    /// Rescan the page after external edits
    Refresh,
}

#[derive(Deserialize)]
struct AddStopArgs {
    kind: String,
    #[serde(default)]
    payload: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderArgs {
    link_id: LinkId,
    to_index: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkArgs {
    link_id: LinkId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateArgs {
    link_id: LinkId,
    payload: Value,
}

fn args<T: DeserializeOwned>(action: &str, payload: &Value) -> Result<T> {
    serde_json::from_value(payload.clone()).map_err(|e| A11yError::InvalidInput {
        reason: format!("{} payload: {}", action, e),
    })
}

impl UiCommand {
    /// Action name as sent by the UI
    pub fn action(&self) -> &'static str {
        match self {
            UiCommand::AddStop { .. } => "add-stop",
            UiCommand::ReorderStop { .. } => "reorder-stop",
            UiCommand::RemoveStop { .. } => "remove-stop",
            UiCommand::UpdateStopPayload { .. } => "update-stop-payload",
            UiCommand::Refresh => "refresh",
        }
    }

    /// Decode a UI message
    ///
    /// # Errors
    ///
    /// - `UnresolvedCommand` for an action the core does not handle
    /// - `InvalidInput` if the payload does not fit the action or names an
    ///   unknown annotation kind
    pub fn parse(message: &UiMessage) -> Result<Self> {
        let action = message.action.as_str();
        let payload = &message.payload;
        match action {
            "add-stop" => {
                let AddStopArgs { kind, payload } = args(action, payload)?;
                Ok(UiCommand::AddStop {
                    kind: AnnotationKind::from_str(&kind)?,
                    payload,
                })
            }
            "reorder-stop" => {
                let ReorderArgs { link_id, to_index } = args(action, payload)?;
                Ok(UiCommand::ReorderStop { link_id, to_index })
            }
            "remove-stop" => {
                let LinkArgs { link_id } = args(action, payload)?;
                Ok(UiCommand::RemoveStop { link_id })
            }
            "update-stop-payload" => {
                let UpdateArgs { link_id, payload } = args(action, payload)?;
                Ok(UiCommand::UpdateStopPayload { link_id, payload })
            }
            "refresh" => Ok(UiCommand::Refresh),
            other => Err(A11yError::UnresolvedCommand {
                action: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_add_stop() {
        let msg = UiMessage::new("add-stop", json!({"kind": "label", "payload": {"role": "link"}}));
        let cmd = UiCommand::parse(&msg).unwrap();
        assert_eq!(
            cmd,
            UiCommand::AddStop {
                kind: AnnotationKind::Label,
                payload: Some(json!({"role": "link"})),
            }
        );
    }

    #[test]
    fn test_parse_reorder_uses_camel_case() {
        let msg = UiMessage::new("reorder-stop", json!({"linkId": "l1", "toIndex": 2}));
        assert_eq!(
            UiCommand::parse(&msg).unwrap(),
            UiCommand::ReorderStop {
                link_id: LinkId::from_string("l1"),
                to_index: 2
            }
        );
    }

    #[test]
    fn test_unknown_action_is_unresolved() {
        let msg = UiMessage::new("resize-window", json!({}));
        assert!(matches!(
            UiCommand::parse(&msg),
            Err(A11yError::UnresolvedCommand { action }) if action == "resize-window"
        ));
    }

    #[test]
    fn test_bad_payload_is_invalid_input() {
        let msg = UiMessage::new("remove-stop", json!({"id": "l1"}));
        assert!(matches!(
            UiCommand::parse(&msg),
            Err(A11yError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_missing_payload_defaults_to_null() {
        let msg: UiMessage = serde_json::from_str(r#"{"action": "refresh"}"#).unwrap();
        assert_eq!(msg.payload, Value::Null);
        assert_eq!(UiCommand::parse(&msg).unwrap(), UiCommand::Refresh);
    }
}
