//! Notification descriptors binding each method name to its payload.

use lsp_types::notification::Notification;
use serde_json::Value;
use thiserror::Error;

use crate::jsonrpc::JsonRpcNotification;
use crate::methods;
use crate::params::{ProgressDoneParams, ProgressReportParams, ProgressStartParams};

/// The `window/progressStart` notification, sent from the server to the
/// client to open a progress.
#[derive(Debug)]
pub enum ProgressStartNotification {}

impl Notification for ProgressStartNotification {
    type Params = ProgressStartParams;
    const METHOD: &'static str = methods::PROGRESS_START;
}

/// The `window/progressReport` notification, sent from the server to the
/// client to update an open progress.
#[derive(Debug)]
pub enum ProgressReportNotification {}

impl Notification for ProgressReportNotification {
    type Params = ProgressReportParams;
    const METHOD: &'static str = methods::PROGRESS_REPORT;
}

/// The `window/progressDone` notification, sent from the server to the
/// client to close a progress.
#[derive(Debug)]
pub enum ProgressDoneNotification {}

impl Notification for ProgressDoneNotification {
    type Params = ProgressDoneParams;
    const METHOD: &'static str = methods::PROGRESS_DONE;
}

/// Errors raised while decoding a progress notification from its envelope.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The method is not one of the progress notifications.
    #[error("Not a progress notification: {0}")]
    UnknownMethod(String),

    /// The notification carried no params.
    #[error("Missing params for {method}")]
    MissingParams { method: String },

    /// The params did not match the payload shape.
    #[error("Invalid params for {method}: {source}")]
    InvalidParams {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while encoding a progress notification into its envelope.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// NaN and infinities have no JSON representation and would be written
    /// as `null`, which the receiver reads as "unchanged".
    #[error("Percentage {percentage} for '{id}' is not a finite number")]
    NonFinitePercentage { id: String, percentage: f64 },

    #[error("Failed to serialize progress params: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any one of the three progress notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressNotification {
    Start(ProgressStartParams),
    Report(ProgressReportParams),
    Done(ProgressDoneParams),
}

impl ProgressNotification {
    /// Identifier of the progress this notification belongs to.
    pub fn id(&self) -> &str {
        match self {
            Self::Start(params) => &params.id,
            Self::Report(params) => &params.id,
            Self::Done(params) => &params.id,
        }
    }

    /// Method name this notification is sent under.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Start(_) => ProgressStartNotification::METHOD,
            Self::Report(_) => ProgressReportNotification::METHOD,
            Self::Done(_) => ProgressDoneNotification::METHOD,
        }
    }

    /// Percentage carried by this notification, if any.
    pub fn percentage(&self) -> Option<f64> {
        match self {
            Self::Start(params) => params.percentage,
            Self::Report(params) => params.percentage,
            Self::Done(_) => None,
        }
    }

    /// Wrap the notification in a JSON-RPC envelope.
    ///
    /// Fails for a non-finite percentage. Finite values outside `[0, 100]`
    /// are encoded as-is so the receiver can flag them.
    pub fn to_jsonrpc(&self) -> Result<JsonRpcNotification, EncodeError> {
        if let Some(percentage) = self.percentage().filter(|p| !p.is_finite()) {
            return Err(EncodeError::NonFinitePercentage {
                id: self.id().to_string(),
                percentage,
            });
        }
        let params = match self {
            Self::Start(params) => serde_json::to_value(params)?,
            Self::Report(params) => serde_json::to_value(params)?,
            Self::Done(params) => serde_json::to_value(params)?,
        };
        Ok(JsonRpcNotification::new(self.method()).with_params(params))
    }

    /// Decode a progress notification from a JSON-RPC envelope by method name.
    pub fn from_jsonrpc(notification: &JsonRpcNotification) -> Result<Self, DecodeError> {
        let method = notification.method.as_str();
        let params = || {
            notification
                .params
                .clone()
                .ok_or_else(|| DecodeError::MissingParams {
                    method: method.to_string(),
                })
        };

        match method {
            methods::PROGRESS_START => decode(method, params()?).map(Self::Start),
            methods::PROGRESS_REPORT => decode(method, params()?).map(Self::Report),
            methods::PROGRESS_DONE => decode(method, params()?).map(Self::Done),
            other => Err(DecodeError::UnknownMethod(other.to_string())),
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(method: &str, params: Value) -> Result<T, DecodeError> {
    serde_json::from_value(params).map_err(|source| DecodeError::InvalidParams {
        method: method.to_string(),
        source,
    })
}

impl From<ProgressStartParams> for ProgressNotification {
    fn from(params: ProgressStartParams) -> Self {
        Self::Start(params)
    }
}

impl From<ProgressReportParams> for ProgressNotification {
    fn from(params: ProgressReportParams) -> Self {
        Self::Report(params)
    }
}

impl From<ProgressDoneParams> for ProgressNotification {
    fn from(params: ProgressDoneParams) -> Self {
        Self::Done(params)
    }
}
