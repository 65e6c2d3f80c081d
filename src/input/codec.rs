//! Virtual-key → keysym translation table.
//!
//! Windows virtual-key codes already coincide with ASCII for letters
//! (`0x41..=0x5A`) and digits (`0x30..=0x39`), so those ranges pass through
//! unchanged. Everything else (editing keys, navigation, function keys,
//! modifiers) goes through an explicit table, mirroring the table-driven
//! scancode mapper this module is modeled on.

use super::keysym;
use std::collections::HashMap;

/// Windows virtual-key code for a non-ASCII key that needs an explicit
/// table entry (editing/navigation/function/modifier keys).
pub type VirtualKey = u32;

pub const VK_BACK: VirtualKey = 0x08;
pub const VK_TAB: VirtualKey = 0x09;
pub const VK_RETURN: VirtualKey = 0x0d;
pub const VK_SHIFT: VirtualKey = 0x10;
pub const VK_CONTROL: VirtualKey = 0x11;
pub const VK_MENU: VirtualKey = 0x12; // Alt
pub const VK_ESCAPE: VirtualKey = 0x1b;
pub const VK_SPACE: VirtualKey = 0x20;
pub const VK_PRIOR: VirtualKey = 0x21; // Page Up
pub const VK_NEXT: VirtualKey = 0x22; // Page Down
pub const VK_END: VirtualKey = 0x23;
pub const VK_HOME: VirtualKey = 0x24;
pub const VK_LEFT: VirtualKey = 0x25;
pub const VK_UP: VirtualKey = 0x26;
pub const VK_RIGHT: VirtualKey = 0x27;
pub const VK_DOWN: VirtualKey = 0x28;
pub const VK_DELETE: VirtualKey = 0x2e;
pub const VK_LWIN: VirtualKey = 0x5b;
pub const VK_RWIN: VirtualKey = 0x5c;
pub const VK_F1: VirtualKey = 0x70;
pub const VK_F12: VirtualKey = 0x7b;
pub const VK_NUMPAD0: VirtualKey = 0x60;
pub const VK_NUMPAD9: VirtualKey = 0x69;
pub const VK_OEM_MINUS: VirtualKey = 0xbd;
pub const VK_OEM_PLUS: VirtualKey = 0xbb;
pub const VK_OEM_4: VirtualKey = 0xdb; // '['
pub const VK_OEM_6: VirtualKey = 0xdd; // ']'
pub const VK_OEM_PERIOD: VirtualKey = 0xbe;
pub const VK_OEM_COMMA: VirtualKey = 0xbc;
pub const VK_OEM_1: VirtualKey = 0xba; // ';' unshifted, ':' shifted
pub const VK_LSHIFT: VirtualKey = 0xa0;
pub const VK_RSHIFT: VirtualKey = 0xa1;
pub const VK_LCONTROL: VirtualKey = 0xa2;
pub const VK_RCONTROL: VirtualKey = 0xa3;
pub const VK_LMENU: VirtualKey = 0xa4;
pub const VK_RMENU: VirtualKey = 0xa5;

/// Translates raw Windows virtual-key codes into canonical X11-style
/// keysyms. Built once and shared across sessions (the table is static
/// data, no per-session state).
pub struct KeyCodec {
    table: HashMap<VirtualKey, u32>,
}

impl KeyCodec {
    pub fn new() -> Self {
        let mut table = HashMap::new();
        table.insert(VK_BACK, keysym::XK_BackSpace);
        table.insert(VK_TAB, keysym::XK_Tab);
        table.insert(VK_RETURN, keysym::XK_Return);
        table.insert(VK_ESCAPE, keysym::XK_Escape);
        table.insert(VK_SPACE, keysym::XK_Space);
        table.insert(VK_PRIOR, keysym::XK_Page_Up);
        table.insert(VK_NEXT, keysym::XK_Page_Down);
        table.insert(VK_END, keysym::XK_End);
        table.insert(VK_HOME, keysym::XK_Home);
        table.insert(VK_LEFT, keysym::XK_Left);
        table.insert(VK_UP, keysym::XK_Up);
        table.insert(VK_RIGHT, keysym::XK_Right);
        table.insert(VK_DOWN, keysym::XK_Down);
        table.insert(VK_DELETE, keysym::XK_Delete);
        table.insert(VK_LSHIFT, keysym::XK_Shift_L);
        table.insert(VK_RSHIFT, keysym::XK_Shift_R);
        table.insert(VK_SHIFT, keysym::XK_Shift_L);
        table.insert(VK_LCONTROL, keysym::XK_Control_L);
        table.insert(VK_RCONTROL, keysym::XK_Control_R);
        table.insert(VK_CONTROL, keysym::XK_Control_L);
        table.insert(VK_LMENU, keysym::XK_Alt_L);
        table.insert(VK_RMENU, keysym::XK_Alt_R);
        table.insert(VK_MENU, keysym::XK_Alt_L);
        table.insert(VK_LWIN, keysym::XK_Super_L);
        table.insert(VK_RWIN, keysym::XK_Super_R);
        table.insert(VK_OEM_MINUS, keysym::XK_Minus);
        table.insert(VK_OEM_PLUS, keysym::XK_Equal);
        table.insert(VK_OEM_4, keysym::XK_BracketL);
        table.insert(VK_OEM_6, keysym::XK_BracketR);
        table.insert(VK_OEM_PERIOD, keysym::XK_Period);
        table.insert(VK_OEM_COMMA, keysym::XK_Comma);
        table.insert(VK_OEM_1, keysym::XK_Semicolon);
        for (i, f) in (VK_F1..=VK_F12).enumerate() {
            table.insert(f, 0xffbe + i as u32);
        }
        for n in VK_NUMPAD0..=VK_NUMPAD9 {
            table.insert(n, 0xffb0 + (n - VK_NUMPAD0));
        }
        Self { table }
    }

    /// Translate a virtual key to its canonical keysym, honoring shift for
    /// the ASCII letter range (`a`..`z` vs. `A`..`Z`).
    pub fn translate(&self, vk: VirtualKey, shift: bool) -> Option<u32> {
        if (0x41..=0x5a).contains(&vk) {
            // VK_A..VK_Z coincide with uppercase ASCII.
            let lower = vk + 0x20;
            return Some(if shift { vk } else { lower });
        }
        if (0x30..=0x39).contains(&vk) {
            return Some(vk); // VK_0..VK_9 coincide with ASCII digits.
        }
        if vk == VK_OEM_1 {
            return Some(if shift { keysym::XK_Colon } else { keysym::XK_Semicolon });
        }
        self.table.get(&vk).copied()
    }
}

impl Default for KeyCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// A printable character the engine should treat as ordinary text input.
pub fn is_character_key(sym: u32) -> bool {
    (keysym::XK_a..=keysym::XK_z).contains(&sym)
        || (keysym::XK_A..=keysym::XK_Z).contains(&sym)
        || (keysym::XK_0..=keysym::XK_9).contains(&sym)
        || sym == keysym::XK_Space
        || sym == keysym::XK_Minus
        || sym == keysym::XK_Equal
        || sym == keysym::XK_BracketL
        || sym == keysym::XK_BracketR
}

pub fn is_modifier_key(sym: u32) -> bool {
    matches!(
        sym,
        keysym::XK_Shift_L
            | keysym::XK_Shift_R
            | keysym::XK_Control_L
            | keysym::XK_Control_R
            | keysym::XK_Alt_L
            | keysym::XK_Alt_R
            | keysym::XK_Super_L
            | keysym::XK_Super_R
            | keysym::XK_Caps_Lock
    )
}

pub fn is_function_key(sym: u32) -> bool {
    keysym::FUNCTION_KEY_RANGE.contains(&sym)
}

pub fn is_navigation_key(sym: u32) -> bool {
    matches!(
        sym,
        keysym::XK_Home
            | keysym::XK_End
            | keysym::XK_Left
            | keysym::XK_Up
            | keysym::XK_Right
            | keysym::XK_Down
            | keysym::XK_Page_Up
            | keysym::XK_Page_Down
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_respect_shift() {
        let codec = KeyCodec::new();
        assert_eq!(codec.translate(0x41, false), Some('a' as u32));
        assert_eq!(codec.translate(0x41, true), Some('A' as u32));
    }

    #[test]
    fn digits_pass_through() {
        let codec = KeyCodec::new();
        assert_eq!(codec.translate(0x31, false), Some('1' as u32));
    }

    #[test]
    fn left_right_shift_collapse_to_modifier_class() {
        assert!(is_modifier_key(keysym::XK_Shift_L));
        assert!(is_modifier_key(keysym::XK_Shift_R));
    }

    #[test]
    fn navigation_keys_classified() {
        assert!(is_navigation_key(keysym::XK_Page_Down));
        assert!(!is_navigation_key(keysym::XK_Return));
    }

    #[test]
    fn unmapped_vk_returns_none() {
        let codec = KeyCodec::new();
        assert_eq!(codec.translate(0xffee_u32, false), None);
    }
}
