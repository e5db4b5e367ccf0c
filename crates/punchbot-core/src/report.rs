//! Status-report composition for check-in/check-out runs.
//!
//! Test steps build the notification text here so every channel shows the
//! same wording: outcome line, local timestamp, optional place line.

use chrono::{DateTime, Local};

/// Which attendance action the run exercised.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckAction {
    CheckIn,
    CheckOut,
}

impl CheckAction {
    pub fn label(&self) -> &'static str {
        match self {
            CheckAction::CheckIn => "Check-in",
            CheckAction::CheckOut => "Check-out",
        }
    }
}

/// Outcome of one attendance run, composed into the notification message.
#[derive(Clone, Debug)]
pub struct StatusReport {
    pub action: CheckAction,
    pub succeeded: bool,
    pub at: DateTime<Local>,
    pub location: Option<String>,
}

impl StatusReport {
    /// Successful run stamped with the current local time.
    pub fn success(action: CheckAction) -> Self {
        StatusReport {
            action,
            succeeded: true,
            at: Local::now(),
            location: None,
        }
    }

    /// Failed run stamped with the current local time.
    pub fn failure(action: CheckAction) -> Self {
        StatusReport {
            succeeded: false,
            ..StatusReport::success(action)
        }
    }

    /// Override the timestamp (tests, replayed runs).
    pub fn at(mut self, at: DateTime<Local>) -> Self {
        self.at = at;
        self
    }

    /// Add the resolved place name.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Render the notification text.
    pub fn compose(&self) -> String {
        let outcome = if self.succeeded {
            format!("✅ {} succeeded", self.action.label())
        } else {
            format!("❌ {} failed", self.action.label())
        };
        let mut lines = vec![
            outcome,
            format!("🕒 {}", self.at.format("%Y-%m-%d %H:%M:%S")),
        ];
        if let Some(ref place) = self.location {
            lines.push(format!("📍 {place}"));
        }
        lines.join("\n")
    }
}
