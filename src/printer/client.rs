//! Digest-authenticated HTTP wrapper over the printer API.
//!
//! Thin verbs over a shared `reqwest::Client`: GET returns body bytes,
//! PUT sends an empty JSON object, DELETE sends no body. Success is a
//! status in [200,300) for every verb; anything else surfaces as an
//! upstream error carrying the printer's status line. The client never
//! retries and sets no deadline, so a stalled printer stalls the caller.

use axum::http::StatusCode;
use diqwest::WithDigestAuth;
use reqwest::header::CONTENT_TYPE;

use crate::error::ProxyError;

#[derive(Debug, Clone, Default)]
pub struct PrinterClient {
    http: reqwest::Client,
}

impl PrinterClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// GET `url` with digest auth and return the full response body.
    pub async fn get(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> Result<Vec<u8>, ProxyError> {
        let response = self
            .http
            .get(url)
            .send_with_digest_auth(username, password)
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ProxyError::Upstream {
                status,
                message: status_line(status),
            });
        }
        Ok(body.to_vec())
    }

    /// PUT an empty JSON object to `url` with digest auth.
    pub async fn put(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> Result<StatusCode, ProxyError> {
        let response = self
            .http
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .body("{}")
            .send_with_digest_auth(username, password)
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(%status, body = %String::from_utf8_lossy(&body), "PUT response");

        // The success log line covers (200,300) only; the functional success
        // check below is the full [200,300) range.
        if status.as_u16() > 200 && status.as_u16() < 300 {
            tracing::info!(%status, "PUT request with digest authentication successful");
        } else {
            tracing::info!(%status, "PUT request with digest authentication failed or unexpected status code");
        }

        classify(status)
    }

    /// DELETE `url` with digest auth.
    pub async fn delete(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> Result<StatusCode, ProxyError> {
        let response = self
            .http
            .delete(url)
            .send_with_digest_auth(username, password)
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(%status, body = %String::from_utf8_lossy(&body), "DELETE response");

        if status.is_success() {
            tracing::info!(%status, "DELETE request with digest authentication successful");
        } else {
            tracing::info!(%status, "DELETE request with digest authentication failed or unexpected status code");
        }

        classify(status)
    }
}

fn classify(status: StatusCode) -> Result<StatusCode, ProxyError> {
    if status.is_success() {
        Ok(status)
    } else {
        Err(ProxyError::Upstream {
            status,
            message: status_line(status),
        })
    }
}

/// Render a status the way an HTTP status line reads, e.g. `404 Not Found`.
fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
