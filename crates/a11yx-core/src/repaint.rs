//! Repaint planning
//!
//! Turns a [`DiffResult`] into an ordered list of directives for the badge
//! painter. Drawing itself happens outside the core.

use std::collections::BTreeSet;

use a11yx_core_types::{LinkId, NodeId};
use serde::Serialize;

use crate::config::{palette_for, Options};
use crate::diff::{ChangeClass, DiffEntry, DiffResult};
use crate::model::AnnotationKind;

/// Everything a painter needs to draw one badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeSpec {
    pub node: NodeId,
    pub container: NodeId,
    pub kind: AnnotationKind,
    pub order: u32,
    pub text: String,
    pub fill: &'static str,
    pub stroke: &'static str,
    pub text_color: &'static str,
}

impl BadgeSpec {
    fn from_entry(entry: &DiffEntry) -> Option<Self> {
        let current = entry.after.as_ref()?;
        let palette = palette_for(current.kind);
        Some(Self {
            node: current.node.clone(),
            container: current.container.clone(),
            kind: current.kind,
            order: current.order,
            text: current.payload.badge_text(current.order),
            fill: palette.fill,
            stroke: palette.stroke,
            text_color: palette.text,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RepaintDirective {
    RemoveBadge { link_id: LinkId, node: NodeId },
    DrawBadge { link_id: LinkId, badge: BadgeSpec },
    RedrawBadge { link_id: LinkId, badge: BadgeSpec },
    RepositionBadge { link_id: LinkId, badge: BadgeSpec },
    ReflowLegend { container: NodeId, kind: AnnotationKind },
}

impl RepaintDirective {
    pub fn link_id(&self) -> Option<&LinkId> {
        match self {
            RepaintDirective::RemoveBadge { link_id, .. }
            | RepaintDirective::DrawBadge { link_id, .. }
            | RepaintDirective::RedrawBadge { link_id, .. }
            | RepaintDirective::RepositionBadge { link_id, .. } => Some(link_id),
            RepaintDirective::ReflowLegend { .. } => None,
        }
    }

    /// Node that must still exist when the directive runs
    pub fn target(&self) -> &NodeId {
        match self {
            RepaintDirective::RemoveBadge { node, .. } => node,
            RepaintDirective::DrawBadge { badge, .. }
            | RepaintDirective::RedrawBadge { badge, .. }
            | RepaintDirective::RepositionBadge { badge, .. } => &badge.node,
            RepaintDirective::ReflowLegend { container, .. } => container,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RepaintDirective::RemoveBadge { .. } => "remove_badge",
            RepaintDirective::DrawBadge { .. } => "draw_badge",
            RepaintDirective::RedrawBadge { .. } => "redraw_badge",
            RepaintDirective::RepositionBadge { .. } => "reposition_badge",
            RepaintDirective::ReflowLegend { .. } => "reflow_legend",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepaintPlan {
    pub directives: Vec<RepaintDirective>,
    /// Badge text is drawn, so fonts must be loaded first
    pub needs_fonts: bool,
}

impl RepaintPlan {
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

fn text_changed(entry: &DiffEntry, badge: &BadgeSpec) -> bool {
    entry
        .before
        .as_ref()
        .map(|b| b.payload.badge_text(b.order) != badge.text)
        .unwrap_or(true)
}

/// Order the repaint work for a diff
///
/// Removals come first so a swap never shows two badges in one place. Draws,
/// redraws and repositions follow in ascending order (ties broken by
/// container, kind, link id). Legends of every touched list reflow last.
/// With badges hidden only removals are emitted.
pub fn plan_repaint(diff: &DiffResult, options: &Options) -> RepaintPlan {
    let mut directives = Vec::new();
    let mut touched: BTreeSet<(NodeId, AnnotationKind)> = BTreeSet::new();

    for entry in diff.entries_in(ChangeClass::Removed) {
        if let Some(before) = &entry.before {
            directives.push(RepaintDirective::RemoveBadge {
                link_id: entry.link_id.clone(),
                node: before.node.clone(),
            });
            touched.insert((before.container.clone(), before.kind));
        }
    }

    let mut paints: Vec<(&DiffEntry, BadgeSpec)> = diff
        .entries
        .values()
        .filter(|e| {
            matches!(
                e.class,
                ChangeClass::Added | ChangeClass::Updated | ChangeClass::Moved
            )
        })
        .filter_map(|e| BadgeSpec::from_entry(e).map(|badge| (e, badge)))
        .collect();
    paints.sort_by(|(a, ba), (b, bb)| {
        (ba.order, &ba.container, ba.kind, &a.link_id).cmp(&(bb.order, &bb.container, bb.kind, &b.link_id))
    });

    let mut needs_fonts = false;
    for (entry, badge) in paints {
        touched.insert((badge.container.clone(), badge.kind));
        if let Some(before) = &entry.before {
            if before.container != badge.container {
                touched.insert((before.container.clone(), before.kind));
            }
        }
        if !options.show_badges {
            continue;
        }
        let link_id = entry.link_id.clone();
        directives.push(match entry.class {
            ChangeClass::Added => {
                needs_fonts = true;
                RepaintDirective::DrawBadge { link_id, badge }
            }
            ChangeClass::Updated => {
                needs_fonts = true;
                RepaintDirective::RedrawBadge { link_id, badge }
            }
            // Keystop numbers follow the order, so a move can change text.
            _ if text_changed(entry, &badge) => {
                needs_fonts = true;
                RepaintDirective::RedrawBadge { link_id, badge }
            }
            _ => RepaintDirective::RepositionBadge { link_id, badge },
        });
    }

    if options.show_legends {
        for (container, kind) in touched {
            directives.push(RepaintDirective::ReflowLegend { container, kind });
        }
    }

    RepaintPlan {
        directives,
        needs_fonts,
    }
}
