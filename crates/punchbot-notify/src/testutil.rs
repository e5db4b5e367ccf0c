//! Test helpers shared by the adapter and dispatcher test modules.

use std::sync::{Arc, Mutex};

use punchbot_core::log::{NotifyEvent, NotifyLog};

/// A `NotifyLog` that records every event for assertions.
#[derive(Default)]
pub struct RecordingLog {
    events: Mutex<Vec<(String, NotifyEvent, String)>>,
}

impl RecordingLog {
    pub fn shared() -> Arc<RecordingLog> {
        Arc::new(RecordingLog::default())
    }

    pub fn events(&self) -> Vec<(String, NotifyEvent, String)> {
        self.events.lock().unwrap().clone()
    }

    pub fn has_event(&self, channel: &str, event: NotifyEvent) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .any(|(c, e, _)| c == channel && *e == event)
    }

    /// Details recorded for one event kind on one channel.
    pub fn details(&self, channel: &str, event: NotifyEvent) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, e, _)| c == channel && *e == event)
            .map(|(_, _, d)| d.clone())
            .collect()
    }
}

impl NotifyLog for RecordingLog {
    fn event(&self, channel: &str, event: NotifyEvent, detail: &str) {
        self.events
            .lock()
            .unwrap()
            .push((channel.to_string(), event, detail.to_string()));
    }
}

/// Upcast an `Arc<RecordingLog>` to the `Arc<dyn NotifyLog>` adapters take.
pub fn as_dyn(log: &Arc<RecordingLog>) -> Arc<dyn NotifyLog> {
    log.clone()
}
