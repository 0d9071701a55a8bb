//! Client error types and error normalization

use padron_core::{ApiError, ValidationError};
use reqwest::Response;
use serde_json::Value;
use thiserror::Error;

/// Low-level client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    Status {
        status: u16,
        message: String,
        /// Decoded response body, kept for normalization.
        body: Option<Value>,
    },

    /// Authentication failed and could not be recovered
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Error surfaced by every resource operation.
#[derive(Debug, Error)]
pub enum PadronError {
    /// The payload failed its schema checks; nothing was dispatched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend or the transport rejected the call, normalized to the
    /// uniform error shape.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Convert a failed call into the uniform backend error shape.
///
/// A response is normalized from its body with HTTP-status fallbacks; a
/// failure with no response at all collapses into the fixed unknown-error
/// shape carrying the transport message.
pub fn normalize_error(error: &ClientError) -> ApiError {
    match error {
        ClientError::Status { status, body, .. } => {
            ApiError::from_body(*status, body.as_ref().unwrap_or(&Value::Null))
        }
        other => ApiError::unknown(other.to_string()),
    }
}

/// Capture an error response, keeping the decoded body around for
/// normalization at the call site.
pub(crate) async fn from_response(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| format!("HTTP {status}"));
    let body = serde_json::from_str::<Value>(&text).ok();
    let message = if text.is_empty() {
        format!("HTTP {status}")
    } else {
        text
    };

    ClientError::Status {
        status,
        message,
        body,
    }
}
