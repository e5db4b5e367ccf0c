//! Configuration schema — typed channel settings.
//!
//! Hierarchy: `Config` → `ChannelSettings` (`discord`, `line`, `upload`)
//! and `DispatchConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.
//!
//! A channel with empty required fields is *disabled*: adapters skip it
//! silently instead of treating it as an error.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `punchbot.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub channels: ChannelSettings,
    pub dispatch: DispatchConfig,
}

// ─────────────────────────────────────────────
// Channels
// ─────────────────────────────────────────────

/// Per-channel credentials and destinations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelSettings {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub line: LineConfig,
    /// Dedicated image-hosting webhook, separate from `discord` so
    /// relayed screenshots never appear as stray messages in the
    /// operator-facing channel.
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Discord incoming-webhook destination.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscordConfig {
    #[serde(default)]
    pub webhook_url: String,
}

impl DiscordConfig {
    /// Whether this channel has a destination to post to.
    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }
}

/// LINE Messaging API push destination.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineConfig {
    /// Channel access token for bearer authentication.
    #[serde(default)]
    pub access_token: String,
    /// Recipient user ID for push messages.
    #[serde(default)]
    pub user_id: String,
    /// API base URL; overridable so tests can point at a mock server.
    #[serde(default = "default_line_api_base")]
    pub api_base: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        LineConfig {
            access_token: String::new(),
            user_id: String::new(),
            api_base: default_line_api_base(),
        }
    }
}

impl LineConfig {
    /// Both the token and the recipient are required.
    pub fn is_configured(&self) -> bool {
        !self.access_token.is_empty() && !self.user_id.is_empty()
    }
}

fn default_line_api_base() -> String {
    "https://api.line.me".to_string()
}

/// Image-hosting webhook used by the relay.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadConfig {
    #[serde(default)]
    pub webhook_url: String,
}

impl UploadConfig {
    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }
}

// ─────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────

/// Timing bounds for one notification fan-out.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispatchConfig {
    /// Upper bound on one whole dispatch, per adapter, in seconds.
    pub deadline_secs: u64,
    /// Per-HTTP-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            deadline_secs: 30,
            request_timeout_secs: 15,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
