//! Punchbot Core — shared types, configuration, and the logging capability.
//!
//! This crate provides:
//! - **types**: `NotificationRequest` — the normalized notification value
//!   consumed by every channel
//! - **config**: typed settings schema + layered loader (file + env vars)
//! - **log**: `NotifyLog` — the injected notification event sink
//! - **report**: status-report composition for check-in/check-out runs
//!
//! Channel adapters and the dispatcher live in `punchbot-notify`.

pub mod config;
pub mod log;
pub mod report;
pub mod types;

pub use config::{ChannelSettings, Config};
pub use log::{NotifyEvent, NotifyLog, TracingLog};
pub use types::NotificationRequest;
