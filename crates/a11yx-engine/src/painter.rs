//! Badge painter seam and repaint execution.
//!
//! The painter is the only part of a command that may suspend. By the time
//! [`execute_plan`] runs, the command's state mutation is already committed.

use std::collections::BTreeSet;

use a11yx_core::errors::{ExError, ExErrorKind};
use a11yx_core::repaint::{RepaintDirective, RepaintPlan};
use a11yx_core::HostDocument;
use a11yx_core_types::{LinkId, NodeId};
use async_trait::async_trait;

/// Draws annotation badges and legends on the host canvas
#[async_trait]
pub trait BadgePainter: Send {
    /// Load whatever drawing text needs (fonts). Awaited once per plan that
    /// draws text.
    async fn prepare(&mut self) -> Result<(), ExError>;

    async fn apply(&mut self, directive: &RepaintDirective) -> Result<(), ExError>;
}

/// Tally of one plan's execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaintOutcome {
    pub applied: usize,
    /// Targets that no longer existed when their directive came up
    pub skipped: Vec<NodeId>,
    pub failed: usize,
}

/// Run `plan` against `painter`, in plan order
///
/// A directive whose target node is gone is skipped and logged; a painter
/// error is logged and the batch continues.
pub async fn execute_plan(
    host: &dyn HostDocument,
    painter: &mut dyn BadgePainter,
    plan: &RepaintPlan,
) -> PaintOutcome {
    let mut outcome = PaintOutcome::default();
    if plan.is_empty() {
        return outcome;
    }

    if plan.needs_fonts {
        if let Err(err) = painter.prepare().await {
            tracing::error!(
                component = module_path!(),
                op = "repaint",
                err.code = err.code(),
                "font loading failed: {}",
                err
            );
        }
    }

    for directive in &plan.directives {
        let target = directive.target();
        if !host.exists(target) {
            tracing::warn!(
                component = module_path!(),
                op = "repaint",
                directive = directive.name(),
                node_id = %target,
                "skipping directive for missing node"
            );
            outcome.skipped.push(target.clone());
            continue;
        }
        match painter.apply(directive).await {
            Ok(()) => outcome.applied += 1,
            Err(err) => {
                tracing::error!(
                    component = module_path!(),
                    op = "repaint",
                    directive = directive.name(),
                    err.code = err.code(),
                    "{}",
                    err
                );
                outcome.failed += 1;
            }
        }
    }
    outcome
}

/// Painter that records every call instead of drawing
///
/// Used by the CLI and tests. Can be told to fail on given link ids.
#[derive(Debug, Clone, Default)]
pub struct RecordingPainter {
    pub applied: Vec<RepaintDirective>,
    pub prepare_calls: usize,
    fail_on: BTreeSet<LinkId>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, link_id: LinkId) -> Self {
        self.fail_on.insert(link_id);
        self
    }

    /// Directive names in application order
    pub fn names(&self) -> Vec<&'static str> {
        self.applied.iter().map(|d| d.name()).collect()
    }

    pub fn clear(&mut self) {
        self.applied.clear();
        self.prepare_calls = 0;
    }
}

#[async_trait]
impl BadgePainter for RecordingPainter {
    async fn prepare(&mut self) -> Result<(), ExError> {
        // Font loading is the host's suspension point.
        tokio::task::yield_now().await;
        self.prepare_calls += 1;
        Ok(())
    }

    async fn apply(&mut self, directive: &RepaintDirective) -> Result<(), ExError> {
        if let Some(link_id) = directive.link_id() {
            if self.fail_on.contains(link_id) {
                return Err(ExError::new(ExErrorKind::Painter)
                    .with_op(directive.name())
                    .with_link_id(link_id.clone())
                    .with_message("painter refused badge"));
            }
        }
        self.applied.push(directive.clone());
        Ok(())
    }
}
