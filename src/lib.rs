//! # suyan-host
//!
//! Server half of the SuYan Chinese input method: owns the RIME-derived
//! composition session, the candidate window geometry, and the clipboard
//! history subsystem, and talks to the platform text-service client (a thin
//! DLL/shim, out of this crate's scope) over named-pipe IPC.
//!
//! # Architecture
//!
//! ```text
//! suyan-host
//!   ├─> ipc       (named-pipe transport, wire protocol, per-connection dispatch)
//!   ├─> session   (per-client input state machine, composition-engine seam)
//!   ├─> input     (keysym codec, X11-style key classification)
//!   ├─> candidate (pure layout geometry, caret location, window placement)
//!   ├─> clipboard (monitor → content-addressed store → image storage)
//!   ├─> config    (config.yaml load/validate/save, typed change events)
//!   └─> utils     (shared error formatting)
//! ```
//!
//! # Data Flow
//!
//! **Input path:** platform client → named pipe → [`ipc::server::dispatch`] →
//! [`session::registry::SessionRegistry`] → [`session::input_session::InputSession`] →
//! composition engine (external).
//!
//! **Candidate path:** engine state → [`candidate::view::layout`] →
//! [`candidate::window::place_window`] → platform window (out of scope).
//!
//! **Clipboard path:** platform clipboard → [`clipboard::monitor::ClipboardMonitor`] →
//! [`clipboard::controller::ClipboardController`] → [`clipboard::store::ClipboardStore`] /
//! [`clipboard::image_store::ImageStore`].

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Pure candidate-view layout and window-placement geometry.
pub mod candidate;

/// Clipboard history: monitor, content-addressed store, image storage.
pub mod clipboard;

/// `config.yaml` load/validate/save and typed change-event fan-out.
pub mod config;

/// Key event normalization and X11-style keysym classification.
pub mod input;

/// Named-pipe transport, wire protocol, and per-connection dispatch.
pub mod ipc;

/// Per-client input session state machine and the composition-engine seam.
pub mod session;

/// Shared error formatting.
pub mod utils;
