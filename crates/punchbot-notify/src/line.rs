//! LINE Messaging API channel — a push endpoint that accepts image URLs,
//! never raw bytes.
//!
//! The text message always goes out first, as its own call, so a later
//! image problem can never suppress it. Screenshots are hosted through
//! the [`ImageRelay`] because the push API has nowhere to put bytes.
//!
//! HTTP 429 on the text send means the monthly push quota is exhausted;
//! when a webhook channel is wired in, the whole notification is
//! redirected there instead.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use serde_json::json;
use tracing::debug;

use punchbot_core::config::LineConfig;
use punchbot_core::log::{NotifyEvent, NotifyLog};
use punchbot_core::types::NotificationRequest;

use crate::base::{
    resolve_screenshot_bytes, ChannelAdapter, NotificationOutcome, NotifyError,
};
use crate::discord::DiscordAdapter;
use crate::relay::ImageRelay;
use crate::transport::{Transport, TransportError};

/// Status code LINE uses to signal exhausted push quota.
const QUOTA_STATUS: u16 = 429;

/// Result of the leading text push. The image phase only runs from
/// `Delivered`; `QuotaExceeded` diverts to the fallback channel.
enum TextSend {
    Delivered,
    QuotaExceeded,
    Failed(NotifyError),
}

/// Push-API channel adapter.
pub struct LineAdapter {
    config: LineConfig,
    transport: Transport,
    log: Arc<dyn NotifyLog>,
    /// Screenshot hosting; push messages carry URLs, never bytes.
    relay: Option<ImageRelay>,
    /// Substitute destination once the push quota is exhausted.
    fallback: Option<Arc<DiscordAdapter>>,
}

impl LineAdapter {
    pub fn new(config: LineConfig, transport: Transport, log: Arc<dyn NotifyLog>) -> Self {
        LineAdapter {
            config,
            transport,
            log,
            relay: None,
            fallback: None,
        }
    }

    /// Wire in the image-hosting relay.
    pub fn with_relay(mut self, relay: ImageRelay) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Wire in the webhook channel used when the push quota runs out.
    pub fn with_fallback(mut self, fallback: Arc<DiscordAdapter>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    fn push_url(&self) -> String {
        format!(
            "{}/v2/bot/message/push",
            self.config.api_base.trim_end_matches('/')
        )
    }

    async fn push(
        &self,
        messages: serde_json::Value,
    ) -> Result<crate::transport::HttpResponse, TransportError> {
        self.transport
            .post_json(
                &self.push_url(),
                Some(&self.config.access_token),
                &json!({ "to": self.config.user_id, "messages": messages }),
            )
            .await
    }

    async fn send_text(&self, text: &str) -> TextSend {
        match self.push(json!([{ "type": "text", "text": text }])).await {
            Ok(resp) if resp.is_success() => TextSend::Delivered,
            Ok(resp) if resp.status == QUOTA_STATUS => TextSend::QuotaExceeded,
            Ok(resp) => TextSend::Failed(NotifyError::Other(format!(
                "push endpoint returned HTTP {}",
                resp.status
            ))),
            Err(e) => TextSend::Failed(e.into()),
        }
    }

    async fn send_image(&self, url: &str) -> Result<(), NotifyError> {
        // The push API rejects plain-http image URLs.
        if !url.starts_with("https://") {
            return Err(NotifyError::Other(format!("image url must be https: {url}")));
        }
        let resp = self
            .push(json!([{
                "type": "image",
                "originalContentUrl": url,
                "previewImageUrl": url,
            }]))
            .await?;
        if resp.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Other(format!(
                "image push returned HTTP {}",
                resp.status
            )))
        }
    }

    /// Best-effort image phase. The text message is already out, so
    /// nothing in here may fail the notification.
    async fn send_image_phase(&self, request: &NotificationRequest) {
        if let Some(ref url) = request.image_url {
            if let Err(e) = self.send_image(url).await {
                self.log
                    .event(self.name(), NotifyEvent::Warning, &format!("image send failed: {e}"));
            }
            return;
        }

        let Some(ref relay) = self.relay else {
            if request.has_image() {
                self.log.event(
                    self.name(),
                    NotifyEvent::Warning,
                    "no upload webhook configured; image not sent",
                );
            }
            return;
        };

        let Some(bytes) = resolve_screenshot_bytes(self.name(), request, &self.log).await
        else {
            return;
        };

        match relay.upload(bytes, &request.attachment_name()).await {
            Ok(hosted) => {
                debug!(url = %hosted.cdn_url, "screenshot hosted for push");
                if let Err(e) = self.send_image(&hosted.cdn_url).await {
                    self.log.event(
                        self.name(),
                        NotifyEvent::Warning,
                        &format!("image send failed: {e}"),
                    );
                }
            }
            Err(e) => {
                self.log.event(
                    self.name(),
                    NotifyEvent::Warning,
                    &format!("image upload failed: {e}"),
                );
            }
        }
    }

    /// Divert the whole notification to the webhook channel, original
    /// message prefixed with a quota banner and timestamp.
    async fn redirect_to_fallback(&self, request: &NotificationRequest) -> NotificationOutcome {
        let Some(ref fallback) = self.fallback else {
            self.log.event(
                self.name(),
                NotifyEvent::Failed,
                "push quota exhausted and no webhook channel to fall back to",
            );
            return NotificationOutcome::Failed(NotifyError::Other(
                "push quota exhausted".into(),
            ));
        };

        self.log.event(
            self.name(),
            NotifyEvent::Fallback,
            "push quota exhausted; redirecting to webhook channel",
        );

        let banner = format!(
            "⚠️ LINE push quota exceeded ({})",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        let substitute = NotificationRequest {
            message: format!("{banner}\n{}", request.message),
            ..request.clone()
        };
        fallback.notify(&substitute).await
    }
}

#[async_trait]
impl ChannelAdapter for LineAdapter {
    fn name(&self) -> &'static str {
        "line"
    }

    async fn notify(&self, request: &NotificationRequest) -> NotificationOutcome {
        if !self.config.is_configured() {
            self.log.event(
                self.name(),
                NotifyEvent::Skipped,
                "access token or user id not set",
            );
            return NotificationOutcome::Skipped("not configured");
        }

        let detail = if request.has_image() {
            "notifying (with image)"
        } else {
            "notifying (text only)"
        };
        self.log.event(self.name(), NotifyEvent::Start, detail);

        // Text first — a later image failure must never suppress it.
        match self.send_text(&request.message).await {
            TextSend::Delivered => {}
            TextSend::QuotaExceeded => return self.redirect_to_fallback(request).await,
            TextSend::Failed(e) => {
                self.log.event(self.name(), NotifyEvent::Failed, &e.to_string());
                return NotificationOutcome::Failed(e);
            }
        }

        self.send_image_phase(request).await;

        self.log.event(self.name(), NotifyEvent::Sent, "delivered");
        NotificationOutcome::Sent
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{as_dyn, RecordingLog};
    use punchbot_core::config::DiscordConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn line_config(api_base: &str) -> LineConfig {
        LineConfig {
            access_token: "tok".into(),
            user_id: "U42".into(),
            api_base: api_base.into(),
        }
    }

    fn make_adapter(api_base: &str) -> (LineAdapter, Arc<RecordingLog>) {
        let log = RecordingLog::shared();
        let adapter = LineAdapter::new(line_config(api_base), Transport::default(), as_dyn(&log));
        (adapter, log)
    }

    fn text_push_mock(text: &str) -> Mock {
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/push"))
            .and(header("Authorization", "Bearer tok"))
            .and(body_partial_json(json!({
                "to": "U42",
                "messages": [{ "type": "text", "text": text }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
    }

    #[tokio::test]
    async fn test_not_configured_skips() {
        let log = RecordingLog::shared();
        let adapter = LineAdapter::new(LineConfig::default(), Transport::default(), as_dyn(&log));

        let outcome = adapter.notify(&NotificationRequest::new("hello")).await;
        assert!(outcome.is_skipped());
        assert!(log.has_event("line", NotifyEvent::Skipped));
    }

    #[tokio::test]
    async fn test_text_only_request_sends_single_push() {
        let server = MockServer::start().await;
        text_push_mock("check-in ok").expect(1).mount(&server).await;

        let (adapter, _log) = make_adapter(&server.uri());
        let outcome = adapter.notify(&NotificationRequest::new("check-in ok")).await;

        assert!(outcome.is_sent());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_buffer_without_relay_sends_text_only() {
        // Scenario: screenshot present but no upload webhook configured —
        // the text push alone satisfies the contract.
        let server = MockServer::start().await;
        text_push_mock("check-in ok").expect(1).mount(&server).await;

        let (adapter, log) = make_adapter(&server.uri());
        let request =
            NotificationRequest::new("check-in ok").with_bytes(b"fake-png-data".to_vec());

        let outcome = adapter.notify(&request).await;
        assert!(outcome.is_sent());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
        assert!(log.has_event("line", NotifyEvent::Warning));
    }

    #[tokio::test]
    async fn test_image_url_pushes_image_directly() {
        let server = MockServer::start().await;
        text_push_mock("msg").mount(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/push"))
            .and(body_partial_json(json!({
                "messages": [{
                    "type": "image",
                    "originalContentUrl": "https://cdn.test/shot.png",
                    "previewImageUrl": "https://cdn.test/shot.png"
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let (adapter, _log) = make_adapter(&server.uri());
        let request =
            NotificationRequest::new("msg").with_image_url("https://cdn.test/shot.png");

        let outcome = adapter.notify(&request).await;
        assert!(outcome.is_sent());
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_text_precedes_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/push"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let (adapter, _log) = make_adapter(&server.uri());
        let request =
            NotificationRequest::new("msg").with_image_url("https://cdn.test/shot.png");
        adapter.notify(&request).await;

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        let first = String::from_utf8_lossy(&requests[0].body).into_owned();
        let second = String::from_utf8_lossy(&requests[1].body).into_owned();
        assert!(first.contains("\"text\""));
        assert!(second.contains("\"image\""));
    }

    #[tokio::test]
    async fn test_relay_failure_keeps_text_send() {
        let line = MockServer::start().await;
        text_push_mock("msg").expect(1).mount(&line).await;

        // Hosting webhook answers 500: the upload fails, the text stands
        let hosting = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&hosting)
            .await;

        let log = RecordingLog::shared();
        let adapter = LineAdapter::new(line_config(&line.uri()), Transport::default(), as_dyn(&log))
            .with_relay(ImageRelay::new(
                Transport::default(),
                format!("{}/webhook", hosting.uri()),
            ));

        let request = NotificationRequest::new("msg").with_bytes(b"fake-png-data".to_vec());
        let outcome = adapter.notify(&request).await;

        // Only the text push reached LINE, and the outcome is still Sent
        assert!(outcome.is_sent());
        assert_eq!(line.received_requests().await.unwrap().len(), 1);
        assert!(log.has_event("line", NotifyEvent::Warning));
    }

    #[tokio::test]
    async fn test_screenshot_relayed_then_pushed() {
        let line = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/push"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(2)
            .mount(&line)
            .await;

        let hosting = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("files[0]"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "attachments": [{ "url": "https://cdn.test/hosted.png" }]
            })))
            .expect(1)
            .mount(&hosting)
            .await;

        let log = RecordingLog::shared();
        let adapter = LineAdapter::new(line_config(&line.uri()), Transport::default(), as_dyn(&log))
            .with_relay(ImageRelay::new(
                Transport::default(),
                format!("{}/webhook", hosting.uri()),
            ));

        let request = NotificationRequest::new("msg")
            .with_bytes(b"fake-png-data".to_vec())
            .with_filename("a.png");
        let outcome = adapter.notify(&request).await;
        assert!(outcome.is_sent());

        let pushes = line.received_requests().await.unwrap();
        let image_push = String::from_utf8_lossy(&pushes[1].body).into_owned();
        assert!(image_push.contains("https://cdn.test/hosted.png"));
    }

    #[tokio::test]
    async fn test_quota_redirects_to_webhook_channel() {
        let line = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/push"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "message": "You have reached your monthly limit."
            })))
            .expect(1)
            .mount(&line)
            .await;

        let webhook = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("quota exceeded"))
            .and(body_string_contains("check-in ok"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&webhook)
            .await;

        let log = RecordingLog::shared();
        let discord = Arc::new(DiscordAdapter::new(
            DiscordConfig {
                webhook_url: format!("{}/hook", webhook.uri()),
            },
            Transport::default(),
            as_dyn(&log),
        ));
        let adapter = LineAdapter::new(line_config(&line.uri()), Transport::default(), as_dyn(&log))
            .with_fallback(discord);

        let outcome = adapter.notify(&NotificationRequest::new("check-in ok")).await;
        assert!(outcome.is_sent());
        assert!(log.has_event("line", NotifyEvent::Fallback));
    }

    #[tokio::test]
    async fn test_quota_without_fallback_logs_and_returns() {
        let line = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&line)
            .await;

        let (adapter, log) = make_adapter(&line.uri());
        let outcome = adapter.notify(&NotificationRequest::new("msg")).await;

        assert!(outcome.is_failed());
        assert!(log.has_event("line", NotifyEvent::Failed));
    }

    #[tokio::test]
    async fn test_non_https_image_url_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let (adapter, log) = make_adapter(&server.uri());
        let request =
            NotificationRequest::new("msg").with_image_url("http://insecure.test/shot.png");
        let outcome = adapter.notify(&request).await;

        // Text delivered; insecure image skipped with a warning
        assert!(outcome.is_sent());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
        let warnings = log.details("line", NotifyEvent::Warning);
        assert!(warnings[0].contains("https"));
    }

    #[tokio::test]
    async fn test_unreachable_push_endpoint_fails_quietly() {
        let (adapter, log) = make_adapter("http://127.0.0.1:1");
        let outcome = adapter.notify(&NotificationRequest::new("msg")).await;

        assert!(outcome.is_failed());
        assert!(log.has_event("line", NotifyEvent::Failed));
    }
}
