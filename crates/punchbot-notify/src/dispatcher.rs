//! Dispatcher — concurrent fan-out of one notification to every
//! configured channel.
//!
//! Adapters are already non-throwing; the dispatcher additionally
//! isolates a panicking adapter and bounds each one with a deadline so a
//! misbehaving channel can neither abort nor starve the others. Delivery
//! is advisory: the caller gets labelled outcomes, never an error, and
//! is free to ignore them.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::debug;

use punchbot_core::config::Config;
use punchbot_core::log::{NotifyEvent, NotifyLog};
use punchbot_core::types::NotificationRequest;

use crate::base::{ChannelAdapter, NotificationOutcome, NotifyError};
use crate::discord::DiscordAdapter;
use crate::line::LineAdapter;
use crate::relay::ImageRelay;
use crate::transport::Transport;

/// One adapter's labelled outcome.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: &'static str,
    pub outcome: NotificationOutcome,
}

/// Fans notifications out to all registered channel adapters.
pub struct Dispatcher {
    adapters: Vec<Arc<dyn ChannelAdapter>>,
    log: Arc<dyn NotifyLog>,
    deadline: Duration,
}

impl Dispatcher {
    pub fn new(log: Arc<dyn NotifyLog>, deadline: Duration) -> Self {
        Dispatcher {
            adapters: Vec::new(),
            log,
            deadline,
        }
    }

    /// Wire a dispatcher from loaded configuration.
    ///
    /// Disabled channels are not registered. The LINE adapter receives
    /// the webhook adapter as its quota fallback and the upload relay
    /// when those slots are configured.
    pub fn from_config(config: &Config, log: Arc<dyn NotifyLog>) -> Self {
        let transport = Transport::new(Duration::from_secs(config.dispatch.request_timeout_secs));
        let mut dispatcher = Dispatcher::new(
            log.clone(),
            Duration::from_secs(config.dispatch.deadline_secs),
        );

        let discord = if config.channels.discord.is_configured() {
            let adapter = Arc::new(DiscordAdapter::new(
                config.channels.discord.clone(),
                transport.clone(),
                log.clone(),
            ));
            dispatcher.register(adapter.clone());
            Some(adapter)
        } else {
            None
        };

        if config.channels.line.is_configured() {
            let mut line = LineAdapter::new(
                config.channels.line.clone(),
                transport.clone(),
                log.clone(),
            );
            if config.channels.upload.is_configured() {
                line = line.with_relay(ImageRelay::new(
                    transport.clone(),
                    config.channels.upload.webhook_url.clone(),
                ));
            }
            if let Some(discord) = discord {
                line = line.with_fallback(discord);
            }
            dispatcher.register(Arc::new(line));
        }

        dispatcher
    }

    /// Register a channel adapter.
    pub fn register(&mut self, adapter: Arc<dyn ChannelAdapter>) {
        debug!(channel = adapter.name(), "registered notification channel");
        self.adapters.push(adapter);
    }

    /// Names of all registered channels, in registration order.
    pub fn channel_names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Fan one notification out to every registered adapter.
    ///
    /// All adapters start before any is awaited. The returned outcomes
    /// are observability only — there is nothing here for a test to
    /// fail on.
    pub async fn dispatch(&self, request: &NotificationRequest) -> Vec<ChannelOutcome> {
        let request = Arc::new(request.clone());

        let tasks: Vec<_> = self
            .adapters
            .iter()
            .map(|adapter| {
                let adapter = adapter.clone();
                let request = request.clone();
                let deadline = self.deadline;
                let name = adapter.name();
                let handle = tokio::spawn(async move {
                    tokio::time::timeout(deadline, adapter.notify(&request)).await
                });
                (name, handle)
            })
            .collect();

        let (names, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
        let results = join_all(handles).await;

        names
            .into_iter()
            .zip(results)
            .map(|(name, result)| {
                let outcome = match result {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(_elapsed)) => {
                        self.log
                            .event(name, NotifyEvent::Failed, "dispatch deadline exceeded");
                        NotificationOutcome::Failed(NotifyError::Other(
                            "dispatch deadline exceeded".into(),
                        ))
                    }
                    Err(join_err) => {
                        // An adapter violated its no-panic contract;
                        // isolate it and keep the other channels' results.
                        self.log.event(
                            name,
                            NotifyEvent::Failed,
                            &format!("adapter crashed: {join_err}"),
                        );
                        NotificationOutcome::Failed(NotifyError::Other(format!(
                            "adapter crashed: {join_err}"
                        )))
                    }
                };
                ChannelOutcome {
                    channel: name,
                    outcome,
                }
            })
            .collect()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
