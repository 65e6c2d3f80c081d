//! Clipboard change monitoring.
//!
//! `ClipboardMonitor` is a trait, not a concrete poller: platform shims
//! implement it (Windows via a hidden-window clipboard-format-listener,
//! mirroring the original `IClipboardMonitor` abstract base), and the
//! controller only ever holds a `Box<dyn ClipboardMonitor>`.

use super::error::Result;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorContentType {
    Text,
    Image,
    Unknown,
}

/// One observed clipboard change. `content_hash` is filled in by the
/// monitor so the controller can dedup before touching the store.
#[derive(Debug, Clone)]
pub struct ClipboardContent {
    pub content_type: MonitorContentType,
    pub text_data: Option<String>,
    pub image_data: Option<Vec<u8>>,
    pub image_format: Option<String>,
    pub source_app: Option<String>,
    pub content_hash: String,
}

impl ClipboardContent {
    pub fn is_valid(&self) -> bool {
        match self.content_type {
            MonitorContentType::Text => self.text_data.as_deref().is_some_and(|s| !s.is_empty()),
            MonitorContentType::Image => self.image_data.as_deref().is_some_and(|b| !b.is_empty()),
            MonitorContentType::Unknown => false,
        }
    }

    pub fn size(&self) -> usize {
        match self.content_type {
            MonitorContentType::Text => self.text_data.as_ref().map_or(0, |s| s.len()),
            MonitorContentType::Image => self.image_data.as_ref().map_or(0, |b| b.len()),
            MonitorContentType::Unknown => 0,
        }
    }
}

pub type ClipboardChangedCallback = Box<dyn Fn(ClipboardContent) + Send + Sync>;

/// Platform clipboard monitor abstraction. One implementation per OS;
/// the controller is generic over it.
pub trait ClipboardMonitor: Send + Sync {
    fn start(&mut self, callback: ClipboardChangedCallback) -> Result<()>;
    fn stop(&mut self);
    fn is_running(&self) -> bool;

    fn write_to_clipboard(&self, content: &ClipboardContent) -> Result<()>;
    fn read_current_content(&self) -> Result<Option<ClipboardContent>>;
    fn current_front_app(&self) -> Option<String>;

    fn poll_interval(&self) -> Duration;
    fn set_poll_interval(&mut self, interval: Duration);
}

/// Stand-in used until a real platform clipboard-format-listener is wired
/// in: reports running but never observes a change. Keeps the controller
/// (and the store/image-store it owns) constructible and testable end to
/// end ahead of the Win32 clipboard bridge.
#[derive(Default)]
pub struct NullMonitor {
    running: bool,
    interval: Duration,
}

impl NullMonitor {
    pub fn new() -> Self {
        Self {
            running: false,
            interval: Duration::from_millis(500),
        }
    }
}

impl ClipboardMonitor for NullMonitor {
    fn start(&mut self, _callback: ClipboardChangedCallback) -> Result<()> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn write_to_clipboard(&self, _content: &ClipboardContent) -> Result<()> {
        Ok(())
    }

    fn read_current_content(&self) -> Result<Option<ClipboardContent>> {
        Ok(None)
    }

    fn current_front_app(&self) -> Option<String> {
        None
    }

    fn poll_interval(&self) -> Duration {
        self.interval
    }

    fn set_poll_interval(&mut self, interval: Duration) {
        self.interval = clamp_poll_interval(interval);
    }
}

/// Clamps a requested poll interval to the valid `100..=5000` ms range.
fn clamp_poll_interval(interval: Duration) -> Duration {
    Duration::from_millis(interval.as_millis().clamp(100, 5000) as u64)
}
