//! Window progress session handling for Cortex.
//!
//! Builds the collaborator side of the `window/progress*` notifications on
//! top of [`cortex_progress_types`]:
//! - [`ProgressTracker`] materializes open sessions on the client
//! - [`ConformanceChecker`] flags sequences that break the session lifecycle
//! - [`ProgressReporter`] emits notifications from the server
//!
//! # Example
//! ```rust
//! use cortex_progress::{ProgressEvent, ProgressTracker};
//! use cortex_progress_types::{ProgressReportParams, ProgressStartParams};
//!
//! let mut tracker = ProgressTracker::new();
//! tracker
//!     .apply(ProgressStartParams::new("a", "Indexing").with_message("A").into())
//!     .unwrap();
//! let event = tracker.apply(ProgressReportParams::new("a").into()).unwrap();
//! assert!(matches!(event, ProgressEvent::Updated(ref s) if s.message.as_deref() == Some("A")));
//! ```

pub mod config;
pub mod conformance;
pub mod error;
pub mod reporter;
pub mod session;
pub mod tracker;

pub use config::{
    DEFAULT_ID_PREFIX, DuplicateStartPolicy, ProgressConfig, ReporterConfig, TrackerConfig,
    UnknownIdPolicy,
};
pub use conformance::{ConformanceChecker, ConformanceReport, Violation};
pub use error::{ConfigError, ConfigResult, ProgressError, Result};
pub use reporter::{NotificationSink, ProgressHandle, ProgressReporter};
pub use session::ProgressSession;
pub use tracker::{IgnoreReason, ProgressEvent, ProgressTracker};
