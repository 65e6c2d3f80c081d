//! X11-style keysym constants.
//!
//! Carried forward from the original engine's `KeyCode` namespace so the
//! composition engine (which expects these exact values) needs no
//! translation layer of its own.

#![allow(non_upper_case_globals, dead_code)]

pub const XK_BackSpace: u32 = 0xff08;
pub const XK_Tab: u32 = 0xff09;
pub const XK_Return: u32 = 0xff0d;
pub const XK_Escape: u32 = 0xff1b;
pub const XK_Delete: u32 = 0xffff;

pub const XK_Home: u32 = 0xff50;
pub const XK_Left: u32 = 0xff51;
pub const XK_Up: u32 = 0xff52;
pub const XK_Right: u32 = 0xff53;
pub const XK_Down: u32 = 0xff54;
pub const XK_Page_Up: u32 = 0xff55;
pub const XK_Page_Down: u32 = 0xff56;
pub const XK_End: u32 = 0xff57;

pub const XK_Shift_L: u32 = 0xffe1;
pub const XK_Shift_R: u32 = 0xffe2;
pub const XK_Control_L: u32 = 0xffe3;
pub const XK_Control_R: u32 = 0xffe4;
pub const XK_Caps_Lock: u32 = 0xffe5;
pub const XK_Alt_L: u32 = 0xffe9;
pub const XK_Alt_R: u32 = 0xffea;
pub const XK_Super_L: u32 = 0xffeb;
pub const XK_Super_R: u32 = 0xffec;

pub const XK_Space: u32 = 0x0020;
pub const XK_Minus: u32 = '-' as u32;
pub const XK_Equal: u32 = '=' as u32;
pub const XK_BracketL: u32 = '[' as u32;
pub const XK_BracketR: u32 = ']' as u32;
pub const XK_Period: u32 = '.' as u32;
pub const XK_Comma: u32 = ',' as u32;
pub const XK_Semicolon: u32 = ';' as u32;
pub const XK_Colon: u32 = ':' as u32;

/// `'0'..='9'` map straight to their ASCII codepoints, as in X11.
pub const XK_0: u32 = '0' as u32;
pub const XK_9: u32 = '9' as u32;
/// `'a'..='z'` map straight to their ASCII codepoints (lowercase canonical;
/// Shift state is carried separately in [`crate::input::Modifiers`]).
pub const XK_a: u32 = 'a' as u32;
pub const XK_z: u32 = 'z' as u32;
pub const XK_A: u32 = 'A' as u32;
pub const XK_Z: u32 = 'Z' as u32;

pub const FUNCTION_KEY_RANGE: std::ops::RangeInclusive<u32> = 0xffbe..=0xffc9; // F1-F12

pub const NUMPAD_RANGE: std::ops::RangeInclusive<u32> = 0xff80..=0xffb9;
