//! Capability fragments advertised during initialization.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client side `window` fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WindowClientProgress {
    /// Whether the client supports handling progress notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<bool>,
}

/// Client capabilities for window progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WindowProgressClientCapabilities {
    /// Window specific client capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowClientProgress>,
}

impl WindowProgressClientCapabilities {
    /// Advertise support (or explicit lack of it) for progress notifications.
    pub fn with_progress(mut self, supported: bool) -> Self {
        self.window = Some(WindowClientProgress {
            progress: Some(supported),
        });
        self
    }

    /// Whether the client accepts progress notifications. Absent means no.
    pub fn supports_progress(&self) -> bool {
        self.window
            .as_ref()
            .and_then(|window| window.progress)
            .unwrap_or(false)
    }

    /// Read the fragment out of a full client capabilities object.
    ///
    /// Unrelated fields are ignored; a malformed `window` yields the default.
    pub fn from_capabilities(capabilities: &Value) -> Self {
        serde_json::from_value(capabilities.clone()).unwrap_or_default()
    }
}

/// Server side `window` fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WindowServerProgress {
    /// The requests for which the server will report progress
    /// (e.g. `textDocument/references`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Vec<String>>,
}

/// Server capabilities for window progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WindowProgressServerCapabilities {
    /// Window specific server capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowServerProgress>,
}

impl WindowProgressServerCapabilities {
    /// Advertise the methods that may report progress.
    pub fn with_progress<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.window = Some(WindowServerProgress {
            progress: Some(methods.into_iter().map(Into::into).collect()),
        });
        self
    }

    /// Methods the server listed, empty when nothing was advertised.
    pub fn progress_methods(&self) -> &[String] {
        self.window
            .as_ref()
            .and_then(|window| window.progress.as_deref())
            .unwrap_or(&[])
    }

    /// Whether the server hinted that `method` may report progress.
    ///
    /// This is a hint for hooking up a progress UI. `false` does not mean the
    /// method will stay silent, and `true` does not promise any progress.
    pub fn may_report_progress_for(&self, method: &str) -> bool {
        self.progress_methods().iter().any(|m| m == method)
    }

    /// Read the fragment out of a full server capabilities object.
    pub fn from_capabilities(capabilities: &Value) -> Self {
        serde_json::from_value(capabilities.clone()).unwrap_or_default()
    }
}
