//! Discord webhook channel — native file attachments in a single call.
//!
//! Priority order for one invocation: explicit image URL > screenshot
//! bytes/path > text-only. Exactly one network round trip happens per
//! notification except the not-configured no-op.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use punchbot_core::config::DiscordConfig;
use punchbot_core::log::{NotifyEvent, NotifyLog};
use punchbot_core::types::NotificationRequest;

use crate::base::{
    resolve_screenshot_bytes, ChannelAdapter, NotificationOutcome, NotifyError,
};
use crate::transport::{HttpResponse, Transport, TransportError};

/// Webhook-attachment channel adapter.
pub struct DiscordAdapter {
    config: DiscordConfig,
    transport: Transport,
    log: Arc<dyn NotifyLog>,
}

impl DiscordAdapter {
    pub fn new(config: DiscordConfig, transport: Transport, log: Arc<dyn NotifyLog>) -> Self {
        DiscordAdapter {
            config,
            transport,
            log,
        }
    }

    /// Plain JSON message.
    async fn send_text(&self, content: &str) -> Result<(), NotifyError> {
        let resp = self
            .transport
            .post_json(&self.config.webhook_url, None, &json!({ "content": content }))
            .await?;
        ensure_delivered(&resp)
    }

    /// One multipart call carrying both the message payload and the
    /// binary attachment.
    async fn send_with_attachment(
        &self,
        content: &str,
        image: Vec<u8>,
        filename: &str,
    ) -> Result<(), NotifyError> {
        let control = json!({
            "content": content,
            "attachments": [{ "id": 0, "filename": filename }],
        });

        let file_part = reqwest::multipart::Part::bytes(image)
            .file_name(filename.to_string())
            .mime_str("image/png")
            .map_err(TransportError::from)?;

        let form = reqwest::multipart::Form::new()
            .text("payload_json", control.to_string())
            .part("files[0]", file_part);

        let resp = self
            .transport
            .post_multipart(&self.config.webhook_url, form)
            .await?;
        ensure_delivered(&resp)
    }

    async fn deliver(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        // Already-hosted image: one text message with the link appended,
        // screenshot sources are never touched.
        if let Some(ref url) = request.image_url {
            return self.send_text(&format!("{}\n{}", request.message, url)).await;
        }

        if let Some(bytes) = resolve_screenshot_bytes(self.name(), request, &self.log).await {
            return self
                .send_with_attachment(&request.message, bytes, &request.attachment_name())
                .await;
        }

        // No image, or the file read already logged its warning.
        self.send_text(&request.message).await
    }
}

/// Webhooks answer 200 (with `wait=true`) or 204; anything else is a
/// delivery failure.
fn ensure_delivered(resp: &HttpResponse) -> Result<(), NotifyError> {
    if resp.is_success() {
        Ok(())
    } else {
        Err(NotifyError::Other(format!(
            "webhook returned HTTP {}",
            resp.status
        )))
    }
}

#[async_trait]
impl ChannelAdapter for DiscordAdapter {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn notify(&self, request: &NotificationRequest) -> NotificationOutcome {
        if !self.config.is_configured() {
            self.log
                .event(self.name(), NotifyEvent::Skipped, "webhook url not set");
            return NotificationOutcome::Skipped("not configured");
        }

        let detail = if request.has_image() {
            "notifying (with image)"
        } else {
            "notifying (text only)"
        };
        self.log.event(self.name(), NotifyEvent::Start, detail);

        match self.deliver(request).await {
            Ok(()) => {
                debug!(channel = self.name(), "notification delivered");
                self.log.event(self.name(), NotifyEvent::Sent, "delivered");
                NotificationOutcome::Sent
            }
            Err(e) => {
                self.log.event(self.name(), NotifyEvent::Failed, &e.to_string());
                NotificationOutcome::Failed(e)
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
