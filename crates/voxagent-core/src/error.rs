//! Error types module
//!
//! `ApiError` is what every remote call returns. `UploadError` describes why an
//! upload job failed, or why a job rejected a state change.
//! Upload step failures never leave the orchestrator: they end up as the
//! job's failure reason.

use crate::constants::{
    ALLOCATION_FAILED_MESSAGE, NETWORK_ERROR_MESSAGE, REGISTRATION_FAILED_MESSAGE,
    TRANSFER_FAILED_MESSAGE,
};
use crate::models::JobStatus;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Errors returned by the remote agent backend and its storage targets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{}", status_display(*.status, .message.as_deref()))]
    Status {
        status: u16,
        /// `message` field of the JSON error body, when the server supplied one.
        message: Option<String>,
    },

    /// No response was received (connection refused, timeout, reset).
    #[error("Network error. Please check your connection.")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to build request: {0}")]
    Build(String),
}

fn status_display(status: u16, message: Option<&str>) -> String {
    match message {
        Some(message) => message.to_string(),
        None => format!("Request failed with status code {}", status),
    }
}

impl ApiError {
    /// Message supplied by the server in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Text shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for remote calls
pub type ApiResult<T> = Result<T, ApiError>;

/// The three remote exchanges of an upload job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStep {
    Allocate,
    Transfer,
    Register,
}

impl UploadStep {
    /// Message used when the server did not explain the failure.
    pub fn generic_message(&self) -> &'static str {
        match self {
            UploadStep::Allocate => ALLOCATION_FAILED_MESSAGE,
            UploadStep::Transfer => TRANSFER_FAILED_MESSAGE,
            UploadStep::Register => REGISTRATION_FAILED_MESSAGE,
        }
    }
}

impl Display for UploadStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStep::Allocate => write!(f, "allocate"),
            UploadStep::Transfer => write!(f, "transfer"),
            UploadStep::Register => write!(f, "register"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("{0}")]
    Allocation(String),

    #[error("{0}")]
    Transfer(String),

    #[error("{0}")]
    Registration(String),

    /// Never surfaced to users: unsupported candidates are dropped silently.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Illegal upload state transition from {from} to {to}")]
    IllegalTransition { from: JobStatus, to: JobStatus },
}

impl UploadError {
    /// Convert a remote failure into the error of the step it interrupted.
    ///
    /// The server-supplied message wins; otherwise the step's generic message
    /// is used. Network failures are folded into the interrupted step.
    pub fn at_step(step: UploadStep, source: &ApiError) -> Self {
        let message = source
            .server_message()
            .unwrap_or_else(|| step.generic_message())
            .to_string();

        match step {
            UploadStep::Allocate => UploadError::Allocation(message),
            UploadStep::Transfer => UploadError::Transfer(message),
            UploadStep::Register => UploadError::Registration(message),
        }
    }

    /// Step that failed, for remote-call failures.
    pub fn step(&self) -> Option<UploadStep> {
        match self {
            UploadError::Allocation(_) => Some(UploadStep::Allocate),
            UploadError::Transfer(_) => Some(UploadStep::Transfer),
            UploadError::Registration(_) => Some(UploadStep::Register),
            _ => None,
        }
    }
}
