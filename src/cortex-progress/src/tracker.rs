//! Receiver side tracking of open progress sessions.
//!
//! The tracker turns the stream of Start/Report/Done notifications into
//! [`ProgressEvent`]s a presentation layer can render. Misuse (unknown ids,
//! duplicate starts) never panics; how it is surfaced depends on
//! [`TrackerConfig`].

use std::num::NonZeroUsize;

use cortex_progress_types::{
    JsonRpcNotification, ProgressDoneParams, ProgressNotification, ProgressReportParams,
    ProgressStartParams, validate_percentage,
};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::config::{DuplicateStartPolicy, TrackerConfig, UnknownIdPolicy};
use crate::error::{ProgressError, Result};
use crate::session::ProgressSession;

/// Why a notification was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Report for an id with no open session.
    ReportForUnknownId,
    /// Done for an id with no open session.
    DoneForUnknownId,
}

/// Change observed after applying a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A new session was opened.
    Started(ProgressSession),
    /// An open session was replaced by a fresh one with the same id.
    Restarted {
        previous: ProgressSession,
        session: ProgressSession,
    },
    /// An open session was updated.
    Updated(ProgressSession),
    /// A session was closed; its id is free again.
    Finished(ProgressSession),
    /// The notification had no effect.
    Ignored { id: String, reason: IgnoreReason },
}

impl ProgressEvent {
    /// Id of the session the event concerns.
    pub fn id(&self) -> &str {
        match self {
            Self::Started(session)
            | Self::Updated(session)
            | Self::Finished(session)
            | Self::Restarted { session, .. } => &session.id,
            Self::Ignored { id, .. } => id,
        }
    }
}

/// Open progress sessions keyed by id, in the order they were started.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    config: TrackerConfig,
    sessions: IndexMap<String, ProgressSession>,
}

impl ProgressTracker {
    /// Create a tracker with default configuration.
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            config,
            sessions: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Decode a JSON-RPC notification and apply it.
    pub fn handle_jsonrpc(&mut self, notification: &JsonRpcNotification) -> Result<ProgressEvent> {
        let notification = ProgressNotification::from_jsonrpc(notification)?;
        self.apply(notification)
    }

    /// Apply a decoded notification.
    pub fn apply(&mut self, notification: ProgressNotification) -> Result<ProgressEvent> {
        trace!(
            method = notification.method(),
            id = notification.id(),
            "Applying progress notification"
        );

        if self.config.validate_percentage {
            if let Some(percentage) = notification.percentage() {
                validate_percentage(percentage).map_err(|source| ProgressError::Validation {
                    id: notification.id().to_string(),
                    source,
                })?;
            }
        }

        match notification {
            ProgressNotification::Start(params) => self.start(params),
            ProgressNotification::Report(params) => self.report(params),
            ProgressNotification::Done(params) => self.done(params),
        }
    }

    fn start(&mut self, params: ProgressStartParams) -> Result<ProgressEvent> {
        if let Some(existing) = self.sessions.get_mut(&params.id) {
            return match self.config.duplicate_start {
                DuplicateStartPolicy::Reject => {
                    warn!(id = %params.id, "Duplicate progress start rejected");
                    Err(ProgressError::DuplicateStart(params.id))
                }
                DuplicateStartPolicy::Restart => {
                    warn!(
                        id = %params.id,
                        title = %existing.title,
                        "Duplicate progress start, restarting session"
                    );
                    let session = ProgressSession::from_start(params);
                    let previous = std::mem::replace(existing, session.clone());
                    Ok(ProgressEvent::Restarted { previous, session })
                }
            };
        }

        if let Some(max) = self.config.max_open_sessions.map(NonZeroUsize::get) {
            if self.sessions.len() >= max {
                warn!(id = %params.id, max, "Progress session limit reached");
                return Err(ProgressError::TooManySessions { max });
            }
        }

        let session = ProgressSession::from_start(params);
        debug!(id = %session.id, title = %session.title, "Progress started");
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(ProgressEvent::Started(session))
    }

    fn report(&mut self, params: ProgressReportParams) -> Result<ProgressEvent> {
        match self.sessions.get_mut(&params.id) {
            Some(session) => {
                session.apply_report(params);
                trace!(id = %session.id, percentage = ?session.percentage, "Progress updated");
                Ok(ProgressEvent::Updated(session.clone()))
            }
            None => self.unknown_session(params.id, IgnoreReason::ReportForUnknownId),
        }
    }

    fn done(&mut self, params: ProgressDoneParams) -> Result<ProgressEvent> {
        match self.sessions.shift_remove(&params.id) {
            Some(session) => {
                debug!(id = %session.id, reports = session.reports, "Progress done");
                Ok(ProgressEvent::Finished(session))
            }
            None => self.unknown_session(params.id, IgnoreReason::DoneForUnknownId),
        }
    }

    fn unknown_session(&self, id: String, reason: IgnoreReason) -> Result<ProgressEvent> {
        match self.config.unknown_id {
            UnknownIdPolicy::Ignore => {
                debug!(id = %id, ?reason, "Ignoring progress notification for unknown id");
                Ok(ProgressEvent::Ignored { id, reason })
            }
            UnknownIdPolicy::Warn => {
                warn!(id = %id, ?reason, "Progress notification for unknown id");
                Ok(ProgressEvent::Ignored { id, reason })
            }
            UnknownIdPolicy::Reject => Err(ProgressError::UnknownSession(id)),
        }
    }

    /// Current view of an open session.
    pub fn get(&self, id: &str) -> Option<&ProgressSession> {
        self.sessions.get(id)
    }

    /// Open sessions in start order.
    pub fn open_sessions(&self) -> impl Iterator<Item = &ProgressSession> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every open session, e.g. when the server exits.
    pub fn clear(&mut self) -> Vec<ProgressSession> {
        let dropped: Vec<_> = self.sessions.drain(..).map(|(_, session)| session).collect();
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "Cleared open progress sessions");
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn start(id: &str) -> ProgressNotification {
        ProgressStartParams::new(id, "Indexing").into()
    }

    #[test]
    fn test_lifecycle() {
        let mut tracker = ProgressTracker::new();

        let event = tracker.apply(start("a")).expect("start");
        assert!(matches!(event, ProgressEvent::Started(_)));
        assert_eq!(tracker.len(), 1);

        let event = tracker
            .apply(ProgressReportParams::new("a").with_percentage(50.0).into())
            .expect("report");
        assert!(matches!(event, ProgressEvent::Updated(ref s) if s.percentage == Some(50.0)));

        let event = tracker.apply(ProgressDoneParams::new("a").into()).expect("done");
        assert!(matches!(event, ProgressEvent::Finished(ref s) if s.reports == 1));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_unknown_id_policies() {
        let mut tracker = ProgressTracker::new();
        let event = tracker.apply(ProgressDoneParams::new("x").into()).expect("ignored");
        assert_eq!(
            event,
            ProgressEvent::Ignored {
                id: "x".to_string(),
                reason: IgnoreReason::DoneForUnknownId,
            }
        );

        let mut tracker = ProgressTracker::with_config(
            TrackerConfig::default().with_unknown_id(UnknownIdPolicy::Reject),
        );
        let err = tracker
            .apply(ProgressReportParams::new("x").into())
            .unwrap_err();
        assert!(matches!(err, ProgressError::UnknownSession(ref id) if id == "x"));
        assert!(err.is_protocol_misuse());
    }

    #[test]
    fn test_duplicate_start_restart() {
        let mut tracker = ProgressTracker::new();
        tracker.apply(start("a")).expect("start");
        tracker
            .apply(ProgressReportParams::new("a").with_message("half").into())
            .expect("report");

        let event = tracker.apply(start("a")).expect("restart");
        match event {
            ProgressEvent::Restarted { previous, session } => {
                assert_eq!(previous.message.as_deref(), Some("half"));
                assert_eq!(session.message, None);
                assert_eq!(session.reports, 0);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_duplicate_start_reject() {
        let mut tracker = ProgressTracker::with_config(
            TrackerConfig::default().with_duplicate_start(DuplicateStartPolicy::Reject),
        );
        tracker
            .apply(ProgressStartParams::new("a", "First").into())
            .expect("start");
        let err = tracker
            .apply(ProgressStartParams::new("a", "Second").into())
            .unwrap_err();
        assert!(matches!(err, ProgressError::DuplicateStart(_)));
        assert_eq!(tracker.get("a").map(|s| s.title.as_str()), Some("First"));
    }

    #[test]
    fn test_percentage_validation() {
        let mut lenient = ProgressTracker::new();
        lenient
            .apply(ProgressStartParams::new("a", "x").with_percentage(120.0).into())
            .expect("accepted without validation");

        let mut strict = ProgressTracker::with_config(
            TrackerConfig::default().with_percentage_validation(true),
        );
        strict.apply(start("a")).expect("start");
        let err = strict
            .apply(ProgressReportParams::new("a").with_percentage(-1.0).into())
            .unwrap_err();
        assert!(matches!(err, ProgressError::Validation { .. }));
        assert_eq!(strict.get("a").and_then(|s| s.percentage), None);
    }

    #[test]
    fn test_session_limit() {
        let mut tracker = ProgressTracker::with_config(
            TrackerConfig::default().with_max_open_sessions(NonZeroUsize::MIN),
        );
        tracker.apply(start("a")).expect("start");
        let err = tracker.apply(start("b")).unwrap_err();
        assert!(matches!(err, ProgressError::TooManySessions { max: 1 }));

        tracker.apply(ProgressDoneParams::new("a").into()).expect("done");
        tracker.apply(start("b")).expect("slot freed");
    }

    #[test]
    fn test_open_sessions_in_start_order() {
        let mut tracker = ProgressTracker::new();
        for id in ["c", "a", "b"] {
            tracker.apply(start(id)).expect("start");
        }
        tracker.apply(ProgressDoneParams::new("a").into()).expect("done");

        let ids: Vec<_> = tracker.open_sessions().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);

        assert_eq!(tracker.clear().len(), 2);
        assert!(tracker.is_empty());
    }
}
