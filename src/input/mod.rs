//! Canonical key event translation.
//!
//! # Overview
//!
//! The platform shim (TSF on Windows, IMK-equivalent elsewhere) delivers raw
//! virtual-key / scancode pairs. This module translates them into the
//! canonical [`KeyEvent`] the engine and IPC layer both speak: an X11-style
//! keysym plus a [`Modifiers`] bitmask, independent of which physical key
//! variant (left/right Shift, NumPad vs. top-row digit) produced it.
//!
//! ```
//! use suyan_host::input::{keysym, KeyEvent, Modifiers};
//!
//! let ev = KeyEvent::new(keysym::XK_A, Modifiers::SHIFT);
//! assert!(ev.modifiers.contains(Modifiers::SHIFT));
//! assert!(is_character_key(ev.keysym));
//! ```

pub mod codec;
pub mod keysym;

pub use codec::{is_character_key, is_function_key, is_navigation_key, KeyCodec};

use std::time::SystemTime;

/// Modifier bitmask, laid out to match the original engine's `KeyModifier`
/// namespace (`Shift = 1<<0`, `Control = 1<<2`, `Alt = 1<<3`, `Super = 1<<6`).
/// Left and right variants of the same physical modifier always collapse to
/// the same bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1 << 0);
    pub const CONTROL: Modifiers = Modifiers(1 << 2);
    pub const ALT: Modifiers = Modifiers(1 << 3);
    pub const SUPER: Modifiers = Modifiers(1 << 6);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn from_bits(bits: u32) -> Self {
        Modifiers(bits)
    }

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Modifiers) -> Modifiers {
        self.union(rhs)
    }
}

/// A canonical, platform-independent key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub keysym: u32,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(keysym: u32, modifiers: Modifiers) -> Self {
        Self { keysym, modifiers }
    }
}

/// Timestamped key event as consumed by the session; timestamps are used
/// only for diagnostics, never for ordering (the pipe already orders
/// requests per session).
#[derive(Debug, Clone, Copy)]
pub struct TimedKeyEvent {
    pub event: KeyEvent,
    pub at: SystemTime,
}

pub use codec::is_modifier_key;
