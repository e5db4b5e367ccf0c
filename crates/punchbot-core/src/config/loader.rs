//! Config loader — reads `punchbot.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `./punchbot.json`
//! 3. Environment variables (override JSON)
//!
//! The loader never fails the caller: a missing, unreadable, or invalid
//! file logs a warning and falls back to defaults. Notification channels
//! are advisory, so a broken config degrades to "all channels disabled".

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path (current working directory).
pub fn get_config_path() -> PathBuf {
    PathBuf::from("punchbot.json")
}

/// Load configuration from the default path + env vars.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Channel credentials use the conventional names operators already
/// export for the test suite:
/// - `DISCORD_WEBHOOK_URL` → `channels.discord.webhook_url`
/// - `DISCORD_UPLOAD_WEBHOOK_URL` → `channels.upload.webhook_url`
/// - `LINE_CHANNEL_ACCESS_TOKEN` → `channels.line.access_token`
/// - `LINE_USER_ID` → `channels.line.user_id`
/// - `LINE_API_BASE` → `channels.line.api_base`
///
/// Dispatch bounds use the `PUNCHBOT_<SECTION>__<FIELD>` format:
/// - `PUNCHBOT_DISPATCH__DEADLINE_SECS`
/// - `PUNCHBOT_DISPATCH__REQUEST_TIMEOUT_SECS`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("DISCORD_WEBHOOK_URL") {
        config.channels.discord.webhook_url = val;
    }
    if let Ok(val) = std::env::var("DISCORD_UPLOAD_WEBHOOK_URL") {
        config.channels.upload.webhook_url = val;
    }
    if let Ok(val) = std::env::var("LINE_CHANNEL_ACCESS_TOKEN") {
        config.channels.line.access_token = val;
    }
    if let Ok(val) = std::env::var("LINE_USER_ID") {
        config.channels.line.user_id = val;
    }
    if let Ok(val) = std::env::var("LINE_API_BASE") {
        config.channels.line.api_base = val;
    }

    if let Ok(val) = std::env::var("PUNCHBOT_DISPATCH__DEADLINE_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.dispatch.deadline_secs = n;
        }
    }
    if let Ok(val) = std::env::var("PUNCHBOT_DISPATCH__REQUEST_TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.dispatch.request_timeout_secs = n;
        }
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
