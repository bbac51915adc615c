//! Payloads carried by the window progress notifications.
//!
//! Optional fields are omitted from the wire when unset. On a report an
//! omitted field means "unchanged", so `None` and `Some("")` are different
//! things: the first keeps the previous message, the second replaces it with
//! an empty one.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters of `window/progressStart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStartParams {
    /// Identifier shared by every notification of the same progress.
    pub id: String,
    /// Short label for the operation, e.g. "Indexing".
    pub title: String,
    /// Whether a cancel affordance should be offered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellable: Option<bool>,
    /// Detail complementing the title, e.g. "3/25 files".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Percentage in `[0, 100]`. Absent means indeterminate progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl ProgressStartParams {
    /// Create start parameters with only the required fields.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cancellable: None,
            message: None,
            percentage: None,
        }
    }

    /// Set the cancellable hint.
    pub fn cancellable(mut self, cancellable: bool) -> Self {
        self.cancellable = Some(cancellable);
        self
    }

    /// Set the initial message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the initial percentage.
    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = Some(percentage);
        self
    }

    /// Cancellable hint, defaulting to `false` when absent.
    pub fn is_cancellable(&self) -> bool {
        self.cancellable.unwrap_or(false)
    }

    /// Whether the progress starts without a percentage.
    pub fn is_indeterminate(&self) -> bool {
        self.percentage.is_none()
    }
}

/// Parameters of `window/progressReport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReportParams {
    /// Identifier of an open progress.
    pub id: String,
    /// New message. If unset, the previous message is still valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// New percentage. If unset, the previous percentage is still valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl ProgressReportParams {
    /// Create an empty report, which changes nothing.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: None,
            percentage: None,
        }
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the percentage.
    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = Some(percentage);
        self
    }

    /// Whether the report carries no update at all.
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.percentage.is_none()
    }
}

/// Parameters of `window/progressDone`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDoneParams {
    /// Identifier of the progress being closed.
    pub id: String,
}

impl ProgressDoneParams {
    /// Create done parameters for `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
