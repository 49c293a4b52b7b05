//! Outcome reporting
//!
//! Every command ends in one [`CommandReport`]: a log line plus an optional
//! toast. Logging never influences behaviour.

use serde::{Deserialize, Serialize};

use crate::config::BuildMode;
use crate::errors::{A11yError, ExError};
use crate::host::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Error,
}

/// Response sent back to the UI for each message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReport {
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toast_message: Option<String>,
}

impl CommandReport {
    pub fn success(log_message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Success,
            log_message: Some(log_message.into()),
            toast_message: None,
        }
    }

    /// Error report whose toast and log line both come from `err`
    pub fn from_error(err: &ExError) -> Self {
        Self {
            status: ReportStatus::Error,
            log_message: Some(err.to_string()),
            toast_message: Some(err.message().to_string()),
        }
    }

    pub fn with_toast(mut self, toast: impl Into<String>) -> Self {
        self.toast_message = Some(toast.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ReportStatus::Success
    }
}

/// How a report reached the outside world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Toasted,
    LoggedOnly,
    Silent,
}

/// Stateless reporting facade
#[derive(Debug, Clone, Copy, Default)]
pub struct Messenger {
    build_mode: BuildMode,
}

impl Messenger {
    pub fn new(build_mode: BuildMode) -> Self {
        Self { build_mode }
    }

    pub fn build_mode(&self) -> BuildMode {
        self.build_mode
    }

    /// Log the report and show its toast in the page context
    ///
    /// Without a page context the toast degrades to a `MissingContext` error
    /// line. Success lines are only logged in development builds; error
    /// lines always are.
    pub fn report(&self, report: &CommandReport, context: Option<&mut dyn Notifier>) -> Delivery {
        let logged = self.log(report);
        let is_error = report.status == ReportStatus::Error;

        match (&report.toast_message, context) {
            (Some(toast), Some(notifier)) => {
                notifier.notify(toast, is_error);
                Delivery::Toasted
            }
            (Some(toast), None) => {
                let err: ExError = A11yError::MissingContext {
                    message: toast.clone(),
                }
                .into();
                tracing::error!(
                    component = module_path!(),
                    op = "report",
                    err.code = err.code(),
                    "{}",
                    err
                );
                Delivery::LoggedOnly
            }
            (None, _) if logged => Delivery::LoggedOnly,
            (None, _) => Delivery::Silent,
        }
    }

    fn log(&self, report: &CommandReport) -> bool {
        let message = report
            .log_message
            .as_deref()
            .or(report.toast_message.as_deref());
        let Some(message) = message else {
            return false;
        };
        match report.status {
            ReportStatus::Error => {
                tracing::error!(component = module_path!(), op = "report", "{}", message);
                true
            }
            ReportStatus::Success if self.build_mode == BuildMode::Development => {
                tracing::info!(component = module_path!(), op = "report", "{}", message);
                true
            }
            ReportStatus::Success => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ToastLog;

    #[test]
    fn test_report_shape_is_camel_case() {
        let report = CommandReport::success("done").with_toast("Added");
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"status": "success", "logMessage": "done", "toastMessage": "Added"})
        );
    }

    #[test]
    fn test_toast_reaches_notifier() {
        let messenger = Messenger::new(BuildMode::Production);
        let mut toasts = ToastLog::default();
        let report = CommandReport::success("done").with_toast("Added 1 label");

        let delivery = messenger.report(&report, Some(&mut toasts));

        assert_eq!(delivery, Delivery::Toasted);
        assert_eq!(toasts.toasts, vec![("Added 1 label".to_string(), false)]);
    }

    #[test]
    fn test_missing_context_degrades_to_log() {
        let messenger = Messenger::new(BuildMode::Production);
        let report = CommandReport::success("done").with_toast("Added");
        assert_eq!(messenger.report(&report, None), Delivery::LoggedOnly);
    }

    #[test]
    fn test_production_success_without_toast_is_silent() {
        let report = CommandReport::success("done");
        assert_eq!(
            Messenger::new(BuildMode::Production).report(&report, None),
            Delivery::Silent
        );
        assert_eq!(
            Messenger::new(BuildMode::Development).report(&report, None),
            Delivery::LoggedOnly
        );
    }
}
