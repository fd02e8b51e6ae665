use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

#[derive(Debug)]
pub enum DocgenApiError {
    /// Authorization-code exchange failed; no session was established.
    AuthExchange(String),
    /// Request stayed unauthorized after the single refresh-and-retry.
    Unauthorized,
    /// Any other non-success response, buffered or pre-stream.
    Status(StatusCode, String),
    /// Network-level failure, distinct from a server error status.
    Request(reqwest::Error),
    InvalidBaseUrl(String),
    InvalidHeader(String),
    Serde(JsonError),
    Cancelled,
}

/// Error bodies, where present, are JSON with an optional `detail` string.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub detail: Option<String>,
}

impl fmt::Display for DocgenApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthExchange(message) => write!(f, "authentication failed: {message}"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::InvalidBaseUrl(value) => write!(f, "invalid URL: {value}"),
            Self::InvalidHeader(value) => write!(f, "invalid header: {value}"),
            Self::Serde(error) => write!(f, "serialization error: {error}"),
            Self::Cancelled => write!(f, "request was cancelled"),
        }
    }
}

impl std::error::Error for DocgenApiError {}

impl From<reqwest::Error> for DocgenApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for DocgenApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

/// Extract the server-supplied `detail` message from an error body.
///
/// Falls back to the raw body when it is not `{detail}`-shaped JSON, and to
/// the status canonical reason when the body is empty.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(detail) = payload.detail.as_deref() {
            if !detail.trim().is_empty() {
                return detail.to_string();
            }
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}
