//! Conformance checking of progress notification sequences.
//!
//! Per id the only valid shape is `Start, Report*, Done`. Ids are checked
//! independently; nothing is implied about ordering across ids. Server
//! capability hints are advisory and never produce a violation.

use std::collections::HashSet;

use cortex_progress_types::{
    JsonRpcNotification, ProgressNotification, Validate, ValidationError,
    WindowProgressClientCapabilities, WindowProgressServerCapabilities, methods,
};
use thiserror::Error;
use tracing::debug;

/// A rule broken by a notification sequence. `index` is the position of the
/// offending notification among those observed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    /// Report for an id that was never started or is already done.
    #[error("#{index}: report for '{id}' without an open session")]
    ReportBeforeStart { index: usize, id: String },

    /// Done for an id that was never started or is already done.
    #[error("#{index}: done for '{id}' without an open session")]
    DoneBeforeStart { index: usize, id: String },

    /// Start for an id that is still open.
    #[error("#{index}: start for '{id}' while it is still open")]
    DuplicateStart { index: usize, id: String },

    #[error("#{index}: percentage {percentage} for '{id}' is outside [0, 100]")]
    PercentageOutOfRange {
        index: usize,
        id: String,
        percentage: f64,
    },

    /// Payload that could not be decoded or breaks a schema constraint.
    #[error("#{index}: invalid payload: {reason}")]
    InvalidPayload { index: usize, reason: String },

    /// Progress sent although the client did not advertise support.
    #[error("#{index}: {method} sent to a client without window.progress support")]
    NotifiedWithoutClientSupport { index: usize, method: String },

    /// Session still open when the sequence ended.
    #[error("session '{id}' was never closed")]
    UnterminatedSession { id: String },
}

/// Outcome of a conformance check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConformanceReport {
    pub violations: Vec<Violation>,
    /// Requests whose method the server did not list in `window.progress`,
    /// in observation order. Informational only, never a violation.
    pub unhinted_requests: Vec<String>,
}

impl ConformanceReport {
    pub fn is_conformant(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Incremental checker fed one notification at a time.
#[derive(Debug, Default)]
pub struct ConformanceChecker {
    open: HashSet<String>,
    client_supports_progress: Option<bool>,
    server_capabilities: WindowProgressServerCapabilities,
    violations: Vec<Violation>,
    unhinted_requests: Vec<String>,
    observed: usize,
}

impl ConformanceChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag every progress notification when the client did not opt in.
    pub fn with_client_capabilities(mut self, caps: &WindowProgressClientCapabilities) -> Self {
        self.client_supports_progress = Some(caps.supports_progress());
        self
    }

    pub fn with_server_capabilities(mut self, caps: WindowProgressServerCapabilities) -> Self {
        self.server_capabilities = caps;
        self
    }

    /// Check a whole sequence at once.
    pub fn check<'a, I>(notifications: I) -> ConformanceReport
    where
        I: IntoIterator<Item = &'a ProgressNotification>,
    {
        let mut checker = Self::new();
        for notification in notifications {
            checker.observe(notification);
        }
        checker.finish()
    }

    /// Note a request the client sent. Requests the server did not hint at
    /// end up in [`ConformanceReport::unhinted_requests`]; listing a method in
    /// `window.progress` neither promises nor restricts progress for it, so
    /// no violation is ever raised here.
    pub fn observe_request(&mut self, method: &str) {
        if !self.server_capabilities.may_report_progress_for(method) {
            debug!(method, "Request not hinted to report progress");
            self.unhinted_requests.push(method.to_string());
        }
    }

    /// Observe a JSON-RPC notification. Non-progress methods are skipped.
    pub fn observe_jsonrpc(&mut self, notification: &JsonRpcNotification) {
        if !methods::is_progress_method(&notification.method) {
            return;
        }
        match ProgressNotification::from_jsonrpc(notification) {
            Ok(decoded) => self.observe(&decoded),
            Err(err) => {
                let index = self.next_index();
                self.violations.push(Violation::InvalidPayload {
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Observe a decoded notification.
    pub fn observe(&mut self, notification: &ProgressNotification) {
        let index = self.next_index();
        let id = notification.id();

        if self.client_supports_progress == Some(false) {
            self.violations.push(Violation::NotifiedWithoutClientSupport {
                index,
                method: notification.method().to_string(),
            });
        }

        match notification.validate() {
            Ok(()) => {}
            Err(ValidationError::PercentageOutOfRange(percentage)) => {
                self.violations.push(Violation::PercentageOutOfRange {
                    index,
                    id: id.to_string(),
                    percentage,
                });
            }
            Err(err) => self.violations.push(Violation::InvalidPayload {
                index,
                reason: err.to_string(),
            }),
        }

        match notification {
            ProgressNotification::Start(_) => {
                if !self.open.insert(id.to_string()) {
                    self.violations.push(Violation::DuplicateStart {
                        index,
                        id: id.to_string(),
                    });
                }
            }
            ProgressNotification::Report(_) => {
                if !self.open.contains(id) {
                    self.violations.push(Violation::ReportBeforeStart {
                        index,
                        id: id.to_string(),
                    });
                }
            }
            ProgressNotification::Done(_) => {
                if !self.open.remove(id) {
                    self.violations.push(Violation::DoneBeforeStart {
                        index,
                        id: id.to_string(),
                    });
                }
            }
        }
    }

    /// End the sequence, flagging sessions that were never closed.
    pub fn finish(mut self) -> ConformanceReport {
        let mut unterminated: Vec<_> = self.open.drain().collect();
        unterminated.sort();
        self.violations.extend(
            unterminated
                .into_iter()
                .map(|id| Violation::UnterminatedSession { id }),
        );
        ConformanceReport {
            violations: self.violations,
            unhinted_requests: self.unhinted_requests,
        }
    }

    fn next_index(&mut self) -> usize {
        let index = self.observed;
        self.observed += 1;
        index
    }
}
