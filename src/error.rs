//! Failure types for outbound calls and their HTTP rendering.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const AIRTABLE_UNREACHABLE: &str =
    "Impossible de contacter Airtable - vérifiez la connexion réseau";
pub const AIRTABLE_TIMEOUT: &str = "Airtable timeout - la requête a pris trop de temps";

/// Failure of a single outbound HTTP call.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// No response before the client timeout elapsed.
    #[error("upstream timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// A response arrived with a non-2xx status.
    #[error("upstream responded {status} {status_text}")]
    Status {
        status: u16,
        status_text: String,
        body: Value,
    },

    /// The request never got a response (DNS, refused connection, reset...).
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    /// A 2xx response whose body could not be interpreted.
    #[error("invalid upstream payload: {0}")]
    InvalidPayload(String),

    /// The outbound request could not be built.
    #[error("invalid upstream request: {0}")]
    Request(String),
}

impl UpstreamError {
    pub fn from_reqwest(e: reqwest::Error, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            return Self::Timeout { timeout_secs };
        }
        if e.is_decode() {
            return Self::InvalidPayload(e.to_string());
        }
        if e.is_builder() {
            return Self::Request(e.to_string());
        }
        Self::Unreachable(e.to_string())
    }

    /// Upstream error body when there is one, the error text otherwise.
    pub fn details(&self) -> Value {
        match self {
            Self::Status { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

/// Reads a response body, turning non-2xx statuses into [`UpstreamError::Status`].
///
/// JSON bodies are parsed; anything else is kept as a raw string.
pub async fn read_body(resp: reqwest::Response, timeout_secs: u64) -> Result<Value, UpstreamError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| UpstreamError::from_reqwest(e, timeout_secs))?;
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        });
    }
    Ok(body)
}

/// Error body returned to callers: `{error, details?}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: msg.into(),
            details: None,
        }
    }

    pub fn internal(msg: impl Into<String>, details: Value) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: msg.into(),
            details: Some(details),
        }
    }

    /// Maps a backing-store failure. Timeouts and connectivity failures get
    /// their own message; everything else uses `generic`.
    pub fn from_store(err: &UpstreamError, generic: &str) -> Self {
        let msg = match err {
            UpstreamError::Timeout { .. } => AIRTABLE_TIMEOUT,
            UpstreamError::Unreachable(_) => AIRTABLE_UNREACHABLE,
            UpstreamError::Status { .. }
            | UpstreamError::InvalidPayload(_)
            | UpstreamError::Request(_) => generic,
        };
        Self::internal(msg, err.details())
    }

    /// A query string axum could not decode fails the operation like a bad
    /// upstream answer would.
    pub fn from_query(rejection: QueryRejection, generic: &str) -> Self {
        Self::internal(generic, Value::String(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
