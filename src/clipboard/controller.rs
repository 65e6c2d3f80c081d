//! Wires a [`ClipboardMonitor`] to the [`ClipboardStore`]/[`ImageStore`]
//! pair: the monitor's callback runs on whatever thread the platform
//! delivers it from, so it only ever pushes onto a channel; a single
//! background task owns the store and the monitor and does all the actual
//! I/O, the same "one owner, message passing in" shape the session
//! registry uses.

use super::error::{recovery_action, RecoveryAction, Result};
use super::image_store::ImageStore;
use super::monitor::{ClipboardContent, ClipboardMonitor, MonitorContentType};
use super::store::{ClipboardRecord, ClipboardStore, ContentType};
use crate::config::ClipboardConfig;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Clipboard content larger than this is rejected outright rather than
/// stored — the candidate window never needs to render a multi-megabyte
/// paste preview.
const MAX_TEXT_BYTES: usize = 65_536;

/// Events a UI layer can subscribe to without polling the store.
#[derive(Debug, Clone)]
pub enum ClipboardEvent {
    /// A new (not a hash-dedup bump) record was stored.
    RecordAdded(i64),
    /// `paste(id)` finished; `true` on success. The UI dismisses any visible
    /// clipboard window on this event regardless of outcome.
    PasteCompleted(i64, bool),
    /// `clear_history()` finished.
    HistoryCleared,
}

pub type ClipboardEventListener = Box<dyn Fn(ClipboardEvent) + Send + Sync>;

fn hash_content(content: &ClipboardContent) -> String {
    let mut hasher = Sha256::new();
    match content.content_type {
        MonitorContentType::Text => {
            hasher.update(content.text_data.as_deref().unwrap_or_default().as_bytes());
        }
        MonitorContentType::Image => {
            hasher.update(content.image_data.as_deref().unwrap_or_default());
        }
        MonitorContentType::Unknown => {}
    }
    format!("{:x}", hasher.finalize())
}

/// Handle returned to callers that want to control the clipboard pipeline
/// (start/stop monitoring, paste, trigger retention) without touching the
/// store directly.
pub struct ClipboardController {
    sender: mpsc::Sender<ControllerMessage>,
}

enum ControllerMessage {
    ContentChanged(ClipboardContent),
    Prune { max_age_days: u32, max_count: u32 },
    Paste { id: i64, reply: oneshot::Sender<bool> },
    ClearHistory,
}

impl ClipboardController {
    /// Spawns the background task that owns the store, image store, and
    /// monitor, and registers the monitor's callback to feed it.
    pub fn spawn(
        data_dir: &Path,
        config: ClipboardConfig,
        mut monitor: Box<dyn ClipboardMonitor>,
        event_listeners: Vec<ClipboardEventListener>,
    ) -> Result<Self> {
        let store = ClipboardStore::open(&data_dir.join("clipboard.db"))?;
        let images = ImageStore::new(&data_dir.join("clipboard"))?;
        let (tx, mut rx) = mpsc::channel::<ControllerMessage>(64);

        let tx_for_monitor = tx.clone();
        monitor.start(Box::new(move |content| {
            if tx_for_monitor
                .try_send(ControllerMessage::ContentChanged(content))
                .is_err()
            {
                warn!("clipboard controller channel full, dropping change event");
            }
        }))?;

        tokio::spawn(async move {
            let monitor = monitor;
            let emit = |event: ClipboardEvent| {
                for listener in &event_listeners {
                    listener(event.clone());
                }
            };
            while let Some(msg) = rx.recv().await {
                match msg {
                    ControllerMessage::ContentChanged(content) => {
                        if let Some(id) = handle_content_changed(&store, &images, &config, content)
                        {
                            emit(ClipboardEvent::RecordAdded(id));
                        }
                    }
                    ControllerMessage::Prune { max_age_days, max_count } => {
                        cleanup(&store, &images, max_age_days, max_count);
                    }
                    ControllerMessage::Paste { id, reply } => {
                        let ok = paste(&store, &images, monitor.as_ref(), id);
                        if ok {
                            emit(ClipboardEvent::PasteCompleted(id, true));
                        } else {
                            emit(ClipboardEvent::PasteCompleted(id, false));
                        }
                        let _ = reply.send(ok);
                    }
                    ControllerMessage::ClearHistory => {
                        clear_history(&store, &images);
                        emit(ClipboardEvent::HistoryCleared);
                    }
                }
            }
        });

        Ok(Self { sender: tx })
    }

    pub async fn prune_expired(&self, max_age_days: u32, max_count: u32) {
        let _ = self
            .sender
            .send(ControllerMessage::Prune { max_age_days, max_count })
            .await;
    }

    /// Writes record `id` back to the platform clipboard. Resolves once the
    /// write (or its failure) has been recorded.
    pub async fn paste(&self, id: i64) -> bool {
        let (reply, rx) = oneshot::channel();
        if self
            .sender
            .send(ControllerMessage::Paste { id, reply })
            .await
            .is_err()
        {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    pub async fn clear_history(&self) {
        let _ = self.sender.send(ControllerMessage::ClearHistory).await;
    }
}

/// Returns `Some(id)` when a genuinely new record was stored (as opposed to
/// a hash-dedup bump, which never emits `record_added`).
fn handle_content_changed(
    store: &ClipboardStore,
    images: &ImageStore,
    config: &ClipboardConfig,
    mut content: ClipboardContent,
) -> Option<i64> {
    if !config.enabled || !content.is_valid() {
        return None;
    }
    if content.content_hash.is_empty() {
        content.content_hash = hash_content(&content);
    }

    let result = match content.content_type {
        MonitorContentType::Text => {
            let text = content.text_data.as_deref().unwrap_or_default();
            if text.len() > MAX_TEXT_BYTES || text.trim().is_empty() {
                return None;
            }
            store.add_record(
                ContentType::Text,
                text,
                &content.content_hash,
                content.source_app.as_deref(),
                None,
                None,
                None,
                None,
                None,
            )
        }
        MonitorContentType::Image => {
            let data = content.image_data.as_deref().unwrap_or_default();
            let format = content.image_format.as_deref().unwrap_or("png");
            match images.save_image(data, format, &content.content_hash) {
                Ok(saved) => {
                    let inserted = store.add_record(
                        ContentType::Image,
                        content.content_hash.as_str(),
                        &content.content_hash,
                        content.source_app.as_deref(),
                        saved.thumbnail_path.to_str(),
                        Some(format),
                        Some(saved.width),
                        Some(saved.height),
                        Some(saved.file_size),
                    );
                    if inserted.is_err() {
                        // Avoid orphaning the files we just wrote.
                        let _ = images.delete_image(&saved.image_path, &saved.thumbnail_path);
                    }
                    inserted
                }
                Err(e) => Err(e),
            }
        }
        MonitorContentType::Unknown => return None,
    };

    match result {
        Ok(added) if added.is_new => Some(added.id),
        Ok(_) => None,
        Err(e) => {
            log_recoverable(&e, "failed to record clipboard content");
            None
        }
    }
}

/// Writes a stored record back to the platform clipboard and bumps its
/// `last_used_at` on success.
fn paste(store: &ClipboardStore, images: &ImageStore, monitor: &dyn ClipboardMonitor, id: i64) -> bool {
    let Ok(Some(record)) = store.get_record(id) else {
        return false;
    };
    let content = match record.content_type {
        ContentType::Text => ClipboardContent {
            content_type: MonitorContentType::Text,
            text_data: Some(record.content.clone()),
            image_data: None,
            image_format: None,
            source_app: None,
            content_hash: record.content_hash.clone(),
        },
        ContentType::Image => {
            let format = record.image_format.as_deref().unwrap_or("png");
            let path = images.image_path_for(&record.content_hash, format);
            let Ok(bytes) = images.load_image(&path) else {
                return false;
            };
            ClipboardContent {
                content_type: MonitorContentType::Image,
                text_data: None,
                image_data: Some(bytes),
                image_format: Some(format.to_string()),
                source_app: None,
                content_hash: record.content_hash.clone(),
            }
        }
        ContentType::Unknown => return false,
    };

    if monitor.write_to_clipboard(&content).is_err() {
        return false;
    }
    let _ = store.update_last_used_time(id);
    true
}

/// Applies the retention policy and unlinks the image files of every
/// expired record so they don't outlive their database row.
fn cleanup(store: &ClipboardStore, images: &ImageStore, max_age_days: u32, max_count: u32) {
    match store.delete_expired_records(max_age_days, max_count) {
        Ok(victims) => {
            debug!(deleted = victims.len(), "pruned expired clipboard records");
            unlink_image_files(images, &victims);
        }
        Err(e) => warn!(error = %e, "clipboard retention pass failed"),
    }
}

fn clear_history(store: &ClipboardStore, images: &ImageStore) {
    match store.clear_all() {
        Ok(victims) => unlink_image_files(images, &victims),
        Err(e) => warn!(error = %e, "failed to clear clipboard history"),
    }
}

fn unlink_image_files(images: &ImageStore, records: &[ClipboardRecord]) {
    for record in records {
        if record.content_type != ContentType::Image {
            continue;
        }
        let format = record.image_format.as_deref().unwrap_or("png");
        let image_path = images.image_path_for(&record.content_hash, format);
        let thumb_path = images.thumbnail_path_for(&record.content_hash);
        if let Err(e) = images.delete_image(&image_path, &thumb_path) {
            warn!(error = %e, id = record.id, "failed to unlink expired clipboard image");
        }
    }
}

fn log_recoverable(e: &super::error::ClipboardError, context: &str) {
    match recovery_action(e, 0) {
        RecoveryAction::Retry(_) | RecoveryAction::Fail => warn!(error = %e, context),
        RecoveryAction::Skip | RecoveryAction::ResetState => debug!(error = %e, context),
    }
}
