//! Human-readable summary renderer for diffs

use crate::diff::model::{ChangeClass, DiffClassification, DiffResult};
use crate::model::AnnotationKind;

/// Render a short Markdown summary of a [`DiffResult`]
///
/// Used as the log message of successful commands and by the CLI; it is
/// informational only.
pub fn render_human_summary(diff: &DiffResult) -> String {
    let mut out = String::new();
    out.push_str("## Annotation Diff\n\n");

    if diff.classification == DiffClassification::Identical {
        out.push_str(&format!(
            "_No changes_ ({} unchanged)\n",
            diff.entries.len()
        ));
        return out;
    }

    let counts = diff.counts();
    let line: Vec<String> = ChangeClass::ALL
        .iter()
        .map(|c| format!("{} {}", counts.get(c).copied().unwrap_or(0), c.as_str()))
        .collect();
    out.push_str(&format!("**Changes**: {}\n\n", line.join(", ")));

    for class in [
        ChangeClass::Added,
        ChangeClass::Removed,
        ChangeClass::Moved,
        ChangeClass::Updated,
    ] {
        let entries: Vec<_> = diff.entries_in(class).collect();
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("### {}\n\n", capitalize(class.as_str())));
        for kind in AnnotationKind::ALL {
            let of_kind: Vec<String> = entries
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| match e.current() {
                    Some(entry) => format!("`{}` ({})", e.link_id, entry.payload.describe()),
                    None => format!("`{}`", e.link_id),
                })
                .collect();
            if !of_kind.is_empty() {
                out.push_str(&format!(
                    "- {} {}: {}\n",
                    of_kind.len(),
                    kind.noun(of_kind.len()),
                    of_kind.join(", ")
                ));
            }
        }
        out.push('\n');
    }

    if !diff.invariant_violations.is_empty() {
        out.push_str(&format!(
            "### Invariant Violations\n\n- {} found (non-fatal)\n",
            diff.invariant_violations.len()
        ));
    }

    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
