//! One-shot HTTP execution for channel adapters.
//!
//! Exactly one round trip per call: no retries, no redirect handling
//! beyond the client default. A resend at this layer would duplicate a
//! chat message, so retry policy deliberately does not exist here.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Network/HTTP-layer failure: DNS, TLS, connection reset, timeout.
///
/// Carries the underlying `reqwest` cause. HTTP error *statuses* are not
/// transport errors — they come back as a normal [`HttpResponse`].
#[derive(Debug, Error)]
#[error("transport failure: {source}")]
pub struct TransportError {
    #[from]
    source: reqwest::Error,
}

impl TransportError {
    /// Whether the request died waiting on the wire.
    pub fn is_timeout(&self) -> bool {
        self.source.is_timeout()
    }
}

/// Response body, parsed as JSON only when the server declared it.
#[derive(Clone, Debug)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

/// Outcome of one HTTP round trip.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// JSON body, if the server sent one.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(v) => Some(v),
            ResponseBody::Text(_) => None,
        }
    }
}

/// Shared HTTP client with a bounded per-request wait.
#[derive(Clone, Debug)]
pub struct Transport {
    client: reqwest::Client,
}

impl Transport {
    pub fn new(timeout: Duration) -> Self {
        Transport {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to create HTTP client"),
        }
    }

    /// POST a JSON body, with optional bearer authentication.
    pub async fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &Value,
    ) -> Result<HttpResponse, TransportError> {
        let mut req = self.client.post(url).json(body);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        read_response(resp).await
    }

    /// POST a multipart form.
    pub async fn post_multipart(
        &self,
        url: &str,
        form: reqwest::multipart::Form,
    ) -> Result<HttpResponse, TransportError> {
        let resp = self.client.post(url).multipart(form).send().await?;
        read_response(resp).await
    }
}

impl Default for Transport {
    fn default() -> Self {
        Transport::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

async fn read_response(resp: reqwest::Response) -> Result<HttpResponse, TransportError> {
    let status = resp.status().as_u16();
    let declared_json = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false);

    let text = resp.text().await?;
    let body = if declared_json {
        match serde_json::from_str(&text) {
            Ok(v) => ResponseBody::Json(v),
            Err(_) => ResponseBody::Text(text),
        }
    } else {
        ResponseBody::Text(text)
    };

    debug!(status = status, json = declared_json, "http round trip complete");
    Ok(HttpResponse { status, body })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
