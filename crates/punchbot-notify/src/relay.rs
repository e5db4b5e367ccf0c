//! Image relay — hosts a screenshot on a webhook channel and returns the
//! attachment's CDN URL.
//!
//! Channels whose push API only accepts image URLs (not raw bytes) relay
//! through here. The hosting channel imposes an expiry on the returned
//! URL (~24 h); nothing in this system reads the URL back later, so the
//! expiry is a documented property, not an enforced invariant.

use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::transport::{Transport, TransportError};

/// Result of hosting one image. Valid for the current notification flow
/// only.
#[derive(Clone, Debug)]
pub struct UploadResult {
    pub cdn_url: String,
}

/// The hosting channel did not yield a usable URL.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("image upload returned HTTP {0}")]
    Status(u16),
    #[error("no attachment url returned")]
    NoAttachmentUrl,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Uploads images to one hosting webhook.
#[derive(Clone, Debug)]
pub struct ImageRelay {
    transport: Transport,
    webhook_url: String,
}

impl ImageRelay {
    pub fn new(transport: Transport, webhook_url: impl Into<String>) -> Self {
        ImageRelay {
            transport,
            webhook_url: webhook_url.into(),
        }
    }

    /// Pure upload — no visible message appears in the hosting channel.
    pub async fn upload(&self, image: Vec<u8>, filename: &str) -> Result<UploadResult, RelayError> {
        self.upload_inner(image, filename, None).await
    }

    /// Upload with a caption shown in the hosting channel's timeline.
    pub async fn upload_with_message(
        &self,
        image: Vec<u8>,
        filename: &str,
        caption: &str,
    ) -> Result<UploadResult, RelayError> {
        self.upload_inner(image, filename, Some(caption)).await
    }

    async fn upload_inner(
        &self,
        image: Vec<u8>,
        filename: &str,
        caption: Option<&str>,
    ) -> Result<UploadResult, RelayError> {
        // `wait=true` makes the webhook return the created message body
        // (HTTP 200) instead of an empty 204 — we need the attachment URL.
        let url = append_wait(&self.webhook_url);

        let mut control = json!({ "attachments": [{ "id": 0, "filename": filename }] });
        if let Some(text) = caption {
            control["content"] = json!(text);
        }

        let file_part = reqwest::multipart::Part::bytes(image)
            .file_name(filename.to_string())
            .mime_str("image/png")
            .map_err(TransportError::from)?;

        let form = reqwest::multipart::Form::new()
            .text("payload_json", control.to_string())
            .part("files[0]", file_part);

        let resp = self.transport.post_multipart(&url, form).await?;
        if resp.status != 200 {
            return Err(RelayError::Status(resp.status));
        }

        let cdn_url = resp
            .json()
            .and_then(|v| v["attachments"][0]["url"].as_str())
            .map(str::to_string)
            .ok_or(RelayError::NoAttachmentUrl)?;

        debug!(url = %cdn_url, filename = filename, "image hosted");
        Ok(UploadResult { cdn_url })
    }
}

fn append_wait(webhook_url: &str) -> String {
    if webhook_url.contains('?') {
        format!("{webhook_url}&wait=true")
    } else {
        format!("{webhook_url}?wait=true")
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
