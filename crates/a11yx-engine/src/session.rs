//! Command session
//!
//! One [`Session`] per open page. It owns the annotation state and the
//! stored snapshot; commands reach them only through [`Session::dispatch`].

use std::time::Instant;

use a11yx_core::diff::{compute_diff, render_human_summary};
use a11yx_core::errors::ExError;
use a11yx_core::host::journaled;
use a11yx_core::ops::{sync_page, AnnotationState, SyncReport};
use a11yx_core::{
    log_op_end, log_op_error, log_op_start, plan_repaint, CommandReport, HostDocument, Messenger,
    Notifier, Options, PageSnapshot, PluginConfig,
};
use a11yx_core_types::CommandContext;

use crate::commands::{apply_command, UiCommand, UiMessage, UiResponse};
use crate::painter::{execute_plan, BadgePainter, PaintOutcome};

pub struct Session {
    config: PluginConfig,
    state: AnnotationState,
    stored: PageSnapshot,
    messenger: Messenger,
    last_paint: PaintOutcome,
}

impl Session {
    /// Load annotation state from the page and repair it
    ///
    /// The snapshot taken after the repair becomes the baseline for the
    /// first command's diff.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration is unusable
    /// - `Serialization` if stored plugin data is corrupt
    /// - `Host` if a repair write is refused
    pub fn open(config: PluginConfig, host: &mut dyn HostDocument) -> Result<Self, ExError> {
        config.validate()?;
        let mut state = AnnotationState::load(host, config.key_space())?;
        let repairs = journaled(host, |host| sync_page(&mut state, host))?;
        if !repairs.is_clean() {
            tracing::info!(
                component = module_path!(),
                op = "open_session",
                removed = repairs.removed_count,
                rekeyed = repairs.rekeyed.len(),
                adopted = repairs.adopted.len(),
                "repaired annotation state on open"
            );
        }
        let stored = PageSnapshot::capture(&state, host)?;
        Ok(Self {
            messenger: Messenger::new(config.build_mode),
            config,
            state,
            stored,
            last_paint: PaintOutcome::default(),
        })
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn state(&self) -> &AnnotationState {
        &self.state
    }

    /// Snapshot of the state the badges currently show
    pub fn stored_snapshot(&self) -> &PageSnapshot {
        &self.stored
    }

    pub fn last_paint(&self) -> &PaintOutcome {
        &self.last_paint
    }

    /// Process one UI message to completion
    ///
    /// The mutation runs on a copy of the state that replaces the live one
    /// only when the whole synchronous phase succeeds; host writes made by a
    /// failed phase are undone before the error is reported. Repaint is awaited
    /// afterwards; the stored snapshot moves forward once painting is done.
    /// Every outcome, including failures, is reported through the messenger
    /// and returned.
    pub async fn dispatch(
        &mut self,
        host: &mut dyn HostDocument,
        painter: &mut dyn BadgePainter,
        notifier: Option<&mut dyn Notifier>,
        message: &UiMessage,
    ) -> UiResponse {
        let ctx = CommandContext::new(message.action.clone());
        let start = Instant::now();
        log_op_start!("dispatch", action = %ctx.action, command_id = %ctx.command_id);

        let report = match self.run(host, painter, message).await {
            Ok(report) => {
                log_op_end!(
                    "dispatch",
                    duration_ms = start.elapsed().as_millis() as u64,
                    command_id = %ctx.command_id
                );
                report
            }
            Err(err) => {
                let err = err.with_command_id(ctx.command_id.clone());
                log_op_error!(
                    "dispatch",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    command_id = %ctx.command_id
                );
                CommandReport::from_error(&err)
            }
        };

        self.messenger.report(&report, notifier);
        report
    }

    async fn run(
        &mut self,
        host: &mut dyn HostDocument,
        painter: &mut dyn BadgePainter,
        message: &UiMessage,
    ) -> Result<CommandReport, ExError> {
        let cmd = UiCommand::parse(message)?;

        let mut staged = self.state.clone();
        let fallback = self.config.options;
        let (effect, repairs, current, options) =
            journaled(host, |host| -> Result<_, ExError> {
                let effect = apply_command(&mut staged, host, &cmd)
                    .map_err(|e| ExError::from(e).with_op(cmd.action()))?;
                let repairs = sync_page(&mut staged, host)?;
                let current = PageSnapshot::capture(&staged, host)?;
                let options = Options::load(host, staged.keys(), fallback)?;
                Ok((effect, repairs, current, options))
            })?;
        self.state = staged;

        let diff = compute_diff(&self.stored, &current);
        for violation in &diff.invariant_violations {
            tracing::warn!(
                component = module_path!(),
                op = "diff",
                violation = ?violation,
                "stored snapshot violated a list invariant"
            );
        }
        let plan = plan_repaint(&diff, &options);

        self.last_paint = execute_plan(&*host, painter, &plan).await;
        self.stored = current;

        let mut log = effect.log;
        if let Some(line) = describe_repairs(&repairs) {
            log.push_str("; ");
            log.push_str(&line);
        }
        if diff.has_changes() {
            log.push_str("\n\n");
            log.push_str(&render_human_summary(&diff));
        }

        let mut report = CommandReport::success(log);
        if let Some(toast) = effect.toast {
            report = report.with_toast(toast);
        } else if matches!(cmd, UiCommand::Refresh) && repairs.removed_count > 0 {
            report = report.with_toast(format!(
                "Removed {} orphaned annotation{}",
                repairs.removed_count,
                if repairs.removed_count == 1 { "" } else { "s" }
            ));
        }
        Ok(report)
    }
}

fn describe_repairs(repairs: &SyncReport) -> Option<String> {
    if repairs.is_clean() {
        return None;
    }
    Some(format!(
        "sync: {} pruned, {} re-keyed, {} relocated, {} adopted, {} lists renumbered",
        repairs.removed_count,
        repairs.rekeyed.len(),
        repairs.relocated.len(),
        repairs.adopted.len(),
        repairs.renumbered.len()
    ))
}
