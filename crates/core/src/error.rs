//! The normalized API error shape shared by every resource call

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Code reported when no structured response is available at all.
pub const UNKNOWN_ERROR_CODE: u32 = 9999;
/// Codestring for unstructured transport failures.
pub const UNKNOWN_ERROR_CODESTRING: &str = "UNKNOWN_ERROR";
/// Codestring used when a response exists but carries no `codestring` field.
pub const API_ERROR_CODESTRING: &str = "API_ERROR";
/// Message used when a response exists but carries no `message` field.
pub const DEFAULT_SERVER_ERROR_MESSAGE: &str = "Error desconocido en el servidor";
/// Message used when a transport failure carries no message of its own.
pub const DEFAULT_CONNECTION_ERROR_MESSAGE: &str = "Error inesperado en la conexión";

/// Uniform error shape produced by the backend, or synthesized from
/// whatever failure actually occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{codestring}: {message}")]
pub struct ApiError {
    pub code: u32,
    pub codestring: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ApiError {
    /// Read a value that already carries the normalized shape.
    ///
    /// Returns `None` unless `code`, `codestring` and `message` are all
    /// present with the expected types; the value passes through unchanged.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            code: u32::try_from(obj.get("code")?.as_u64()?).ok()?,
            codestring: obj.get("codestring")?.as_str()?.to_string(),
            message: obj.get("message")?.as_str()?.to_string(),
            meta: obj.get("meta").cloned(),
        })
    }

    /// Build the normalized shape from an error response body.
    ///
    /// A body that already matches the shape (either at the top level or
    /// under an `error` key) passes through unchanged; otherwise individual
    /// fields are picked out with the HTTP status and fixed defaults as
    /// fallbacks.
    pub fn from_body(status: u16, body: &Value) -> Self {
        if let Some(err) = body.get("error").and_then(Self::from_value) {
            return err;
        }
        if let Some(err) = Self::from_value(body) {
            return err;
        }
        Self {
            code: body
                .get("code")
                .and_then(Value::as_u64)
                .and_then(|code| u32::try_from(code).ok())
                .unwrap_or_else(|| u32::from(status)),
            codestring: body
                .get("codestring")
                .and_then(Value::as_str)
                .unwrap_or(API_ERROR_CODESTRING)
                .to_string(),
            message: body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_SERVER_ERROR_MESSAGE)
                .to_string(),
            meta: None,
        }
    }

    /// Build the fallback shape for a failure with no response at all.
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            DEFAULT_CONNECTION_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            code: UNKNOWN_ERROR_CODE,
            codestring: UNKNOWN_ERROR_CODESTRING.to_string(),
            message,
            meta: None,
        }
    }
}
