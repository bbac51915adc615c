//! Cortex Progress Types - window progress notification definitions.
//!
//! Defines the `window/progressStart`, `window/progressReport` and
//! `window/progressDone` notifications a language server uses to report
//! long running operations, together with the capability fragments both
//! sides advertise during initialization.
//!
//! # Features
//! - Typed payloads with serde, omitting unset optional fields
//! - Notification descriptors implementing `lsp_types::notification::Notification`
//! - Decoding from JSON-RPC notification envelopes by method name
//! - JSON Schema generation with schemars
//!
//! # Example
//! ```rust
//! use cortex_progress_types::{ProgressNotification, ProgressStartParams};
//!
//! let start = ProgressStartParams::new("index-1", "Indexing").with_message("3/25 files");
//! let envelope = ProgressNotification::from(start).to_jsonrpc().unwrap();
//! assert_eq!(envelope.method, "window/progressStart");
//! ```

mod capabilities;
mod jsonrpc;
mod notifications;
mod params;
mod validation;

/// Progress method name constants.
pub mod methods;

pub use capabilities::{
    WindowClientProgress, WindowProgressClientCapabilities, WindowProgressServerCapabilities,
    WindowServerProgress,
};
pub use jsonrpc::{JSONRPC_VERSION, JsonRpcNotification};
pub use notifications::{
    DecodeError, EncodeError, ProgressDoneNotification, ProgressNotification,
    ProgressReportNotification, ProgressStartNotification,
};
pub use params::{ProgressDoneParams, ProgressReportParams, ProgressStartParams};
pub use validation::{
    MAX_PERCENTAGE, MIN_PERCENTAGE, Validate, ValidationError, validate_percentage,
};

pub use lsp_types::notification::Notification;
