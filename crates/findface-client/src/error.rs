//! FindFace client error types.

use serde_json::Value;
use thiserror::Error;

/// Result type for FindFace operations.
pub type FindfaceResult<T> = Result<T, FindfaceError>;

/// Errors that can occur while talking to the FindFace API.
#[derive(Debug, Error)]
pub enum FindfaceError {
    /// Client is not usable as configured (missing access token, bad endpoint or proxy).
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status without a service error code in the body.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: Value },

    /// The service answered with an embedded error `code`.
    #[error("FindFace error {code}: {body}")]
    Client { code: String, body: Value },

    /// Response did not have the shape of the expected entity.
    #[error("Unexpected response shape: {0}")]
    Mapping(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FindfaceError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::Mapping(msg.into())
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, FindfaceError::Configuration(_))
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, FindfaceError::Client { .. })
    }

    /// True for failures below the FindFace protocol (network or bare HTTP status).
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            FindfaceError::Transport(_) | FindfaceError::HttpStatus { .. }
        )
    }

    /// Service error code, if the service reported one.
    pub fn code(&self) -> Option<&str> {
        match self {
            FindfaceError::Client { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Raw response body attached to the error, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            FindfaceError::Client { body, .. } | FindfaceError::HttpStatus { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FindfaceError::Configuration(_) => "configuration_error",
            FindfaceError::Transport(_) | FindfaceError::HttpStatus { .. } => "transport_error",
            FindfaceError::Client { .. } => "client_error",
            FindfaceError::Mapping(_) | FindfaceError::Json(_) => "mapping_error",
            FindfaceError::InvalidRequest(_) => "invalid_request",
        }
    }

    /// HTTP status associated with the error, if known.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            FindfaceError::HttpStatus { status, .. } => Some(*status),
            FindfaceError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
