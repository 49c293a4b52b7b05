//! Script replay
//!
//! Usage: a11yx replay --db <PATH> --script <JSONL> [--config <TOML>] [--snapshot-out <JSON>]
//!
//! Each script line is one step. A step may edit the document the way a
//! user would in the host (select, delete, duplicate nodes by name) and may
//! send one UI message:
//!
//! ```text
//! {"select": ["item-0-0", "item-0-1"], "action": "add-stop", "payload": {"kind": "keystop"}}
//! {"target": {"node": "item-0-1", "kind": "keystop"}, "action": "reorder-stop", "payload": {"toIndex": 0}}
//! {"delete": "item-0-0"}
//! ```
//!
//! `target` fills in `payload.linkId` with the id of that node's annotation.
//! Every response is printed to stdout as one JSON line.

use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use a11yx_core::model::AnnotationKind;
use a11yx_core::{MemoryDocument, Notifier};
use a11yx_core_types::NodeId;
use a11yx_engine::{RecordingPainter, Session, UiMessage};
use a11yx_store::db::open_document_db;
use a11yx_store::repo::{load_document, save_document};
use a11yx_store::write_snapshot;
use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use crate::commands::load_config;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    #[arg(long)]
    pub db: PathBuf,

    /// JSON-lines file of steps
    #[arg(long)]
    pub script: PathBuf,

    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the final stored snapshot here
    #[arg(long)]
    pub snapshot_out: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct Target {
    node: String,
    kind: AnnotationKind,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptStep {
    #[serde(default)]
    select: Option<Vec<String>>,
    #[serde(default)]
    delete: Option<String>,
    #[serde(default)]
    duplicate: Option<String>,
    #[serde(default)]
    target: Option<Target>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    payload: Value,
}

/// Toasts go to stderr, next to the log
struct ConsoleToasts;

impl Notifier for ConsoleToasts {
    fn notify(&mut self, message: &str, is_error: bool) {
        if is_error {
            eprintln!("✗ {}", message);
        } else {
            eprintln!("• {}", message);
        }
    }
}

fn node_named(doc: &MemoryDocument, line: usize, name: &str) -> Result<NodeId, String> {
    doc.find_by_name(name)
        .ok_or_else(|| format!("line {}: no node named '{}'", line, name))
}

pub fn execute(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref())?;
    let mut conn = open_document_db(&args.db)?;
    let mut doc = load_document(&conn)?
        .ok_or_else(|| format!("{} holds no document; run `a11yx init` first", args.db.display()))?;

    let file = std::fs::File::open(&args.script)?;
    let mut steps = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with("//") {
            continue;
        }
        let step: ScriptStep = serde_json::from_str(&line)
            .map_err(|e| format!("line {}: {}", index + 1, e))?;
        steps.push((index + 1, step));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut session = Session::open(config, &mut doc)?;
    let mut painter = RecordingPainter::new();
    let mut toasts = ConsoleToasts;

    let mut dispatched = 0;
    for (line, step) in steps {
        if let Some(names) = &step.select {
            let nodes = names
                .iter()
                .map(|name| node_named(&doc, line, name))
                .collect::<Result<Vec<_>, _>>()?;
            doc.select(&nodes);
        }
        if let Some(name) = &step.delete {
            let node = node_named(&doc, line, name)?;
            doc.delete_node(&node)?;
        }
        if let Some(name) = &step.duplicate {
            let node = node_named(&doc, line, name)?;
            doc.duplicate(&node)?;
        }

        let Some(action) = step.action else {
            continue;
        };
        let mut payload = step.payload;
        if let Some(target) = &step.target {
            let node = node_named(&doc, line, &target.node)?;
            let record = session
                .state()
                .records()
                .get(&doc, &node, target.kind)?
                .ok_or_else(|| {
                    format!("line {}: '{}' has no {}", line, target.node, target.kind)
                })?;
            if !payload.is_object() {
                payload = Value::Object(serde_json::Map::new());
            }
            if let Value::Object(map) = &mut payload {
                map.insert(
                    "linkId".to_string(),
                    Value::String(record.link_id.as_str().to_string()),
                );
            }
        }

        let message = UiMessage::new(action, payload);
        let response = runtime.block_on(session.dispatch(
            &mut doc,
            &mut painter,
            Some(&mut toasts),
            &message,
        ));
        println!("{}", serde_json::to_string(&response)?);
        dispatched += 1;
    }

    let saved = save_document(&mut conn, &doc)?;
    tracing::info!(
        dispatched,
        painted = painter.applied.len(),
        digest = %saved.digest,
        "replay finished"
    );

    if let Some(path) = &args.snapshot_out {
        write_snapshot(path, session.stored_snapshot())?;
    }
    Ok(())
}
