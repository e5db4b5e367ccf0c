//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use punchbot_core::config;
//!
//! let cfg = config::load_config(None);
//! if cfg.channels.discord.is_configured() {
//!     println!("Discord notifications enabled");
//! }
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{get_config_path, load_config, save_config};
pub use schema::{ChannelSettings, Config, DiscordConfig, DispatchConfig, LineConfig, UploadConfig};
