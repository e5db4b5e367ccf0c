//! Notification value types shared between the test steps and the
//! channel adapters.

use std::path::PathBuf;

/// Attachment name used when neither an explicit filename nor a
/// screenshot path provides one.
pub const DEFAULT_FILENAME: &str = "screenshot.png";

/// A single status notification.
///
/// Built once per test assertion point, handed to the dispatcher, and
/// discarded — there is no queue, no retry, no cross-request state.
///
/// Image source priority, applied identically by every adapter:
/// `image_url` (already hosted, nothing to upload) > `screenshot_bytes`
/// > `screenshot_path`. A path that fails to read degrades the
/// notification to text-only; it never fails it.
#[derive(Clone, Debug, Default)]
pub struct NotificationRequest {
    /// Human-readable status text.
    pub message: String,
    /// In-memory PNG screenshot. Wins over `screenshot_path`.
    pub screenshot_bytes: Option<Vec<u8>>,
    /// On-disk screenshot, read lazily when no bytes are present.
    pub screenshot_path: Option<PathBuf>,
    /// Explicit attachment filename.
    pub filename: Option<String>,
    /// Already-hosted image URL; screenshot sourcing is skipped entirely.
    pub image_url: Option<String>,
}

impl NotificationRequest {
    /// Create a text-only notification.
    pub fn new(message: impl Into<String>) -> Self {
        NotificationRequest {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Attach an in-memory screenshot.
    pub fn with_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.screenshot_bytes = Some(bytes);
        self
    }

    /// Attach an on-disk screenshot.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot_path = Some(path.into());
        self
    }

    /// Override the attachment filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Use an already-hosted image URL instead of uploading.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Resolved attachment name: explicit filename, else the screenshot
    /// path's basename, else [`DEFAULT_FILENAME`].
    pub fn attachment_name(&self) -> String {
        if let Some(ref name) = self.filename {
            return name.clone();
        }
        if let Some(ref path) = self.screenshot_path {
            if let Some(base) = path.file_name() {
                return base.to_string_lossy().into_owned();
            }
        }
        DEFAULT_FILENAME.to_string()
    }

    /// Whether any image source accompanies the message.
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
            || self.screenshot_bytes.is_some()
            || self.screenshot_path.is_some()
    }
}
