//! Proxy-level error type and its HTTP mapping.
//!
//! Resolution failures (missing credentials, no active job) map to 400;
//! transport and decode failures to 502; a non-2xx answer from the printer
//! is proxied with its own status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("username not found for the printer with IP: {0}")]
    MissingUsername(String),

    #[error("password not found for the printer with IP: {0}")]
    MissingPassword(String),

    #[error("no job found for the printer with IP: {0}")]
    NoActiveJob(String),

    #[error("{0}")]
    Transport(#[from] diqwest::error::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer from the printer; `message` is the status line as the
    /// printer's HTTP layer reported it, e.g. `404 Not Found`.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("failed to decode printer response: {0}")]
    Decode(#[from] serde_json::Error),

    /// An operation invocation failed; wraps the underlying failure with the
    /// operation name for response bodies.
    #[error("Failed to {op} the printer: {source}")]
    Operation {
        op: &'static str,
        #[source]
        source: Box<ProxyError>,
    },
}

impl ProxyError {
    /// Status code this error surfaces with on the proxy's own API.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingUsername(_) | Self::MissingPassword(_) | Self::NoActiveJob(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Transport(_) | Self::Http(_) | Self::Decode(_) => StatusCode::BAD_GATEWAY,
            Self::Upstream { status, .. } => *status,
            Self::Operation { source, .. } => source.status_code(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
