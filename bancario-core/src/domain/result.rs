//! Result and error types for the core library

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Fallback when no message can be extracted from a failure
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// Client-side validation failed; no request was sent
    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// No usable session (not logged in, or credentials rejected)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The backend rejected the stored session with 401/403
    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The transaction record could not be created; nothing to roll back
    #[error("Transaction creation failed: {0}")]
    TransactionCreation(Box<Error>),

    /// The transaction exists but the balance update did not go through
    #[error("Balance update failed: {0}")]
    BalanceUpdate(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True if this error (or the error it wraps) means the session was dropped
    pub fn is_session_expired(&self) -> bool {
        match self {
            Error::SessionExpired(_) => true,
            Error::TransactionCreation(inner) => inner.is_session_expired(),
            _ => false,
        }
    }

    /// Reduce any error to a single human-readable string for presentation
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(errors) if errors.is_empty() => UNKNOWN_ERROR.to_string(),
            Error::Validation(errors) => errors.join(", "),
            Error::Auth(msg)
            | Error::SessionExpired(msg)
            | Error::NotFound(msg)
            | Error::BalanceUpdate(msg)
            | Error::Network(msg)
            | Error::Config(msg)
            | Error::Other(msg) => non_empty_or_unknown(msg),
            Error::Api { message, .. } => non_empty_or_unknown(message),
            Error::TransactionCreation(inner) => inner.user_message(),
            Error::Io(e) => e.to_string(),
            Error::Json(e) => e.to_string(),
        }
    }
}

fn non_empty_or_unknown(msg: &str) -> String {
    if msg.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        msg.to_string()
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by the HTTP collaborator
#[derive(Error, Debug, Clone)]
pub enum HttpError {
    /// The backend answered with a non-success status
    #[error("HTTP {status}")]
    Status { status: u16, body: Option<JsonValue> },

    /// The request never produced a response (connect, DNS, TLS...)
    #[error("{0}")]
    Transport(String),

    /// The response body was not valid JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl HttpError {
    /// Status code, if the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Best-effort message: `detail` field, then `message` field,
    /// then the transport text, then a generic fallback.
    pub fn message(&self) -> String {
        match self {
            HttpError::Status { body, .. } => body
                .as_ref()
                .and_then(extract_error_message)
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            HttpError::Transport(msg) | HttpError::Decode(msg) => non_empty_or_unknown(msg),
        }
    }
}

/// Pull a message out of an error body.
///
/// `detail` may be a plain string or a list of `{ "msg": ... }` objects
/// (validation responses); both are accepted.
pub fn extract_error_message(body: &JsonValue) -> Option<String> {
    if let Some(detail) = body.get("detail") {
        match detail {
            JsonValue::String(s) if !s.trim().is_empty() => return Some(s.clone()),
            JsonValue::Array(items) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|item| match item {
                        JsonValue::String(s) => Some(s.clone()),
                        other => other.get("msg").and_then(|m| m.as_str()).map(str::to_string),
                    })
                    .collect();
                if !msgs.is_empty() {
                    return Some(msgs.join(", "));
                }
            }
            _ => {}
        }
    }

    body.get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}
