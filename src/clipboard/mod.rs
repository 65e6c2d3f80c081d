//! Clipboard history: a platform [`monitor::ClipboardMonitor`] feeds a
//! SQLite-backed [`store::ClipboardStore`] (text) and [`image_store::ImageStore`]
//! (images) through a [`controller::ClipboardController`] that owns both on a
//! single background task.

pub mod controller;
pub mod error;
pub mod image_store;
pub mod monitor;
pub mod store;

pub use controller::{ClipboardController, ClipboardEvent, ClipboardEventListener};
pub use error::{ClipboardError, Result};
pub use image_store::{ImageStorageResult, ImageStore};
pub use monitor::{ClipboardContent, ClipboardMonitor, MonitorContentType};
pub use store::{ClipboardRecord, ClipboardStore, ContentType};
