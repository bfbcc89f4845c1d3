//! Proxy error types
//!
//! Every variant maps to a status code and a short, stable message. Upstream
//! detail is logged server side and never placed in a response body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::{Component, ErrorBody, component_error, component_warn};
use thiserror::Error;

use crate::types::RunStatus;

/// Failures reported by the assistant provider client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("authentication with the assistant provider failed")]
    AuthenticationFailed,

    #[error("assistant provider rate limit exceeded")]
    RateLimitExceeded,

    #[error("network error: {0}")]
    Network(String),

    #[error("assistant provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid response from assistant provider: {0}")]
    InvalidResponse(String),
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Invalid request: {message}")]
    Validation { message: String },

    #[error("Rate limit exceeded for {key}")]
    RateLimited { key: String },

    #[error("Assistant credentials rejected or missing")]
    AuthConfiguration,

    #[error("Run did not finish after {attempts} poll attempts")]
    UpstreamTimeout { attempts: u32 },

    #[error("Run ended with status {status}: {detail}")]
    UpstreamFailure { status: RunStatus, detail: String },

    #[error("Malformed assistant response: {reason}")]
    MalformedUpstreamResponse { reason: String },

    #[error("Session creation failed: {0}")]
    SessionUnavailable(UpstreamError),

    #[error("Upstream request failed: {0}")]
    Upstream(UpstreamError),

    #[error("Request cancelled before the run finished")]
    Cancelled,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type ProxyResult<T> = Result<T, ProxyError>;

impl ProxyError {
    pub fn validation(message: impl Into<String>) -> Self {
        ProxyError::Validation { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ProxyError::Config { message: message.into() }
    }

    /// Translate an upstream failure during session creation
    pub fn from_session_upstream(error: UpstreamError) -> Self {
        match error {
            UpstreamError::AuthenticationFailed => ProxyError::AuthConfiguration,
            other => ProxyError::SessionUnavailable(other),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Validation { .. } => StatusCode::BAD_REQUEST,
            ProxyError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ProxyError::AuthConfiguration => StatusCode::UNAUTHORIZED,
            ProxyError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::UpstreamFailure { .. }
            | ProxyError::MalformedUpstreamResponse { .. }
            | ProxyError::SessionUnavailable(_)
            | ProxyError::Upstream(_)
            | ProxyError::Config { .. }
            | ProxyError::ServerStartup(_)
            | ProxyError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        match self {
            ProxyError::Validation { message } => message.clone(),
            ProxyError::RateLimited { .. } => "Too many requests. Please try again later.".to_string(),
            ProxyError::AuthConfiguration => "Assistant service is not configured".to_string(),
            ProxyError::UpstreamTimeout { .. } => "The assistant took too long to respond".to_string(),
            ProxyError::UpstreamFailure { .. } => "The assistant failed to respond".to_string(),
            ProxyError::MalformedUpstreamResponse { .. } => {
                "Received an unexpected response from the assistant".to_string()
            }
            ProxyError::SessionUnavailable(_) => "Failed to create session".to_string(),
            ProxyError::Cancelled => "Request was cancelled".to_string(),
            ProxyError::Upstream(_)
            | ProxyError::Config { .. }
            | ProxyError::ServerStartup(_)
            | ProxyError::IoError(_) => "Internal server error".to_string(),
        }
    }
}

impl From<UpstreamError> for ProxyError {
    fn from(error: UpstreamError) -> Self {
        match error {
            UpstreamError::AuthenticationFailed => ProxyError::AuthConfiguration,
            UpstreamError::InvalidResponse(reason) => ProxyError::MalformedUpstreamResponse { reason },
            other => ProxyError::Upstream(other),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            component_error!(Component::current(), status = status.as_u16(), error = %self, "Request failed");
        } else {
            component_warn!(Component::current(), status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(ErrorBody::new(self.public_message()))).into_response()
    }
}
