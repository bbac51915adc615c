//! Server side emission of progress notifications.
//!
//! Notifications are fire-and-forget: the sink reports nothing back, and a
//! closed channel is only visible in the logs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cortex_progress_types::{
    JsonRpcNotification, ProgressDoneParams, ProgressNotification, ProgressReportParams,
    ProgressStartParams, WindowProgressClientCapabilities,
};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::config::{DEFAULT_ID_PREFIX, ReporterConfig};

/// Destination for outgoing notifications, typically the RPC transport.
pub trait NotificationSink: Send + Sync {
    fn send(&self, notification: JsonRpcNotification);
}

impl NotificationSink for mpsc::UnboundedSender<JsonRpcNotification> {
    fn send(&self, notification: JsonRpcNotification) {
        if mpsc::UnboundedSender::send(self, notification).is_err() {
            trace!("Progress notification dropped, receiver closed");
        }
    }
}

/// Emits progress for a client, gated by the capability it advertised.
pub struct ProgressReporter {
    sink: Arc<dyn NotificationSink>,
    config: ReporterConfig,
    enabled: bool,
    next_id: AtomicU64,
}

impl ProgressReporter {
    /// Create a reporter with default configuration.
    pub fn new(sink: Arc<dyn NotificationSink>, client: &WindowProgressClientCapabilities) -> Self {
        Self::with_config(sink, client, ReporterConfig::default())
    }

    pub fn with_config(
        sink: Arc<dyn NotificationSink>,
        client: &WindowProgressClientCapabilities,
        config: ReporterConfig,
    ) -> Self {
        let mut config = config;
        if config.validate().is_err() {
            warn!(
                prefix = %config.id_prefix,
                "Invalid progress id prefix, using '{DEFAULT_ID_PREFIX}'"
            );
            config.id_prefix = DEFAULT_ID_PREFIX.to_string();
        }
        let enabled = client.supports_progress();
        if !enabled {
            debug!("Client did not advertise window.progress, progress reporting disabled");
        }
        Self {
            sink,
            config,
            enabled,
            next_id: AtomicU64::new(1),
        }
    }

    /// Whether notifications are actually sent.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn allocate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.config.id_prefix, n)
    }

    /// Start an indeterminate, non cancellable progress.
    pub fn start(&self, title: impl Into<String>) -> ProgressHandle {
        self.start_with(title, |params| params)
    }

    /// Start a progress, letting `configure` set the optional fields.
    /// The id is always allocated by the reporter.
    pub fn start_with(
        &self,
        title: impl Into<String>,
        configure: impl FnOnce(ProgressStartParams) -> ProgressStartParams,
    ) -> ProgressHandle {
        let id = self.allocate_id();
        let mut params = configure(ProgressStartParams::new(id.clone(), title));
        params.id = id.clone();
        params.percentage = finite_percentage(&id, params.percentage);

        let handle = ProgressHandle {
            id,
            sink: self.enabled.then(|| Arc::clone(&self.sink)),
            closed: false,
        };
        handle.emit(params.into());
        handle
    }
}

/// An open progress. Dropping it without [`ProgressHandle::done`] still
/// closes the session.
pub struct ProgressHandle {
    id: String,
    sink: Option<Arc<dyn NotificationSink>>,
    closed: bool,
}

impl ProgressHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Send a report; unset fields keep their previous value on the client.
    /// A non-finite percentage is logged and left out; a report left with
    /// nothing to update is not sent.
    pub fn report(&self, message: Option<String>, percentage: Option<f64>) {
        let percentage = finite_percentage(&self.id, percentage);
        if message.is_none() && percentage.is_none() {
            return;
        }
        let params = ProgressReportParams {
            id: self.id.clone(),
            message,
            percentage,
        };
        self.emit(params.into());
    }

    pub fn report_message(&self, message: impl Into<String>) {
        self.report(Some(message.into()), None);
    }

    pub fn report_percentage(&self, percentage: f64) {
        self.report(None, Some(percentage));
    }

    /// Close the progress.
    pub fn done(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.emit(ProgressDoneParams::new(self.id.clone()).into());
    }

    fn emit(&self, notification: ProgressNotification) {
        let Some(sink) = &self.sink else {
            return;
        };
        match notification.to_jsonrpc() {
            Ok(envelope) => {
                trace!(id = %self.id, method = %envelope.method, "Sending progress notification");
                sink.send(envelope);
            }
            Err(err) => warn!(id = %self.id, error = %err, "Failed to encode progress notification"),
        }
    }
}

fn finite_percentage(id: &str, percentage: Option<f64>) -> Option<f64> {
    match percentage {
        Some(p) if !p.is_finite() => {
            warn!(id, percentage = p, "Dropping non-finite progress percentage");
            None
        }
        other => other,
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ProgressHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressHandle")
            .field("id", &self.id)
            .field("enabled", &self.sink.is_some())
            .field("closed", &self.closed)
            .finish()
    }
}
