//! Materialized view of a single progress session.

use cortex_progress_types::{ProgressReportParams, ProgressStartParams};
use serde::Serialize;

/// What the receiver currently knows about an open progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSession {
    pub id: String,
    pub title: String,
    pub cancellable: bool,
    pub message: Option<String>,
    pub percentage: Option<f64>,
    /// Number of reports applied since Start.
    pub reports: usize,
}

impl ProgressSession {
    /// Open a session from its Start payload.
    pub fn from_start(params: ProgressStartParams) -> Self {
        Self {
            cancellable: params.is_cancellable(),
            id: params.id,
            title: params.title,
            message: params.message,
            percentage: params.percentage,
            reports: 0,
        }
    }

    /// Apply a report. Fields absent from the report keep their value.
    pub fn apply_report(&mut self, report: ProgressReportParams) {
        if let Some(message) = report.message {
            self.message = Some(message);
        }
        if let Some(percentage) = report.percentage {
            self.percentage = Some(percentage);
        }
        self.reports += 1;
    }

    /// Whether no percentage has been reported yet.
    pub fn is_indeterminate(&self) -> bool {
        self.percentage.is_none()
    }
}
