//! Synchronous mutation phase of a command.
//!
//! Everything here runs without suspension: record writes, registry
//! updates, list placement and renumbering complete before the session
//! awaits anything.

use a11yx_core::errors::{A11yError, Result};
use a11yx_core::model::AnnotationPayload;
use a11yx_core::ops::{
    add_annotation, remove_annotation, reorder_annotation, update_payload, AnnotationState,
};
use a11yx_core::HostDocument;

use crate::commands::ui_command::UiCommand;

/// What a command did, phrased for the user and the log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandEffect {
    pub toast: Option<String>,
    pub log: String,
}

/// Run `cmd` against `state`
///
/// Callers pass a clone of the live state and keep it only on `Ok`.
///
/// # Errors
///
/// - `EmptySelection` if `add-stop` runs with nothing selected
/// - `LinkNotFound` if the target link id is not live
/// - any error of the underlying annotation operation
pub fn apply_command(
    state: &mut AnnotationState,
    host: &mut dyn HostDocument,
    cmd: &UiCommand,
) -> Result<CommandEffect> {
    match cmd {
        UiCommand::AddStop { kind, payload } => {
            let selection = host.selection();
            if selection.is_empty() {
                return Err(A11yError::EmptySelection);
            }

            let mut created = 0;
            let mut updated = 0;
            for node in &selection {
                let payload = match payload {
                    Some(value) => AnnotationPayload::from_value(*kind, value.clone())?,
                    None => AnnotationPayload::default_for(*kind),
                };
                let outcome = add_annotation(state, host, node, payload)?;
                if outcome.created {
                    created += 1;
                } else if outcome.changed {
                    updated += 1;
                }
            }

            let toast = match (created, updated) {
                (0, 0) => None,
                (0, n) => Some(format!("Updated {} {}", n, kind.noun(n))),
                (n, _) => Some(format!("Added {} {}", n, kind.noun(n))),
            };
            Ok(CommandEffect {
                toast,
                log: format!(
                    "add-stop {}: {} created, {} updated, {} selected",
                    kind,
                    created,
                    updated,
                    selection.len()
                ),
            })
        }
        UiCommand::ReorderStop { link_id, to_index } => {
            let order = reorder_annotation(state, host, link_id, *to_index)?;
            Ok(CommandEffect {
                toast: None,
                log: format!("reorder-stop {}: now at order {}", link_id, order),
            })
        }
        UiCommand::RemoveStop { link_id } => {
            let record = remove_annotation(state, host, link_id)?;
            Ok(CommandEffect {
                toast: Some(format!("Removed 1 {}", record.kind.noun(1))),
                log: format!("remove-stop {} from node {}", link_id, record.node_ref),
            })
        }
        UiCommand::UpdateStopPayload { link_id, payload } => {
            let outcome = update_payload(state, host, link_id, payload.clone())?;
            Ok(CommandEffect {
                toast: None,
                log: format!(
                    "update-stop-payload {}: {}",
                    link_id,
                    if outcome.changed { "changed" } else { "unchanged" }
                ),
            })
        }
        UiCommand::Refresh => Ok(CommandEffect {
            toast: None,
            log: "refresh".to_string(),
        }),
    }
}
