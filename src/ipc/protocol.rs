//! Wire protocol: fixed-header framed request/response messages over a
//! named pipe. Field layout matches the original engine's
//! `IPCMessage`/`IPCResponse` structs exactly — this is the authoritative
//! contract the Windows TSF shim (a separate process) links against.

/// `\\.\pipe\SuYanInputMethod`
pub const PIPE_NAME: &str = r"\\.\pipe\SuYanInputMethod";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Command {
    Echo = 1,
    StartSession = 2,
    EndSession = 3,
    ProcessKey = 4,
    TestKey = 5,
    FocusIn = 6,
    FocusOut = 7,
    UpdatePosition = 8,
    Commit = 9,
    Clear = 10,
    SelectCandidate = 11,
    Shutdown = 12,
}

impl Command {
    pub fn from_u32(v: u32) -> Option<Command> {
        Some(match v {
            1 => Command::Echo,
            2 => Command::StartSession,
            3 => Command::EndSession,
            4 => Command::ProcessKey,
            5 => Command::TestKey,
            6 => Command::FocusIn,
            7 => Command::FocusOut,
            8 => Command::UpdatePosition,
            9 => Command::Commit,
            10 => Command::Clear,
            11 => Command::SelectCandidate,
            12 => Command::Shutdown,
            _ => return None,
        })
    }
}

/// 16-byte fixed request header: `cmd`, `session_id`, `param1`, `param2`,
/// each a little-endian `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub cmd: u32,
    pub session_id: u32,
    pub param1: u32,
    pub param2: u32,
}

impl Message {
    pub const WIRE_SIZE: usize = 16;

    pub fn to_bytes(self) -> [u8; Self::WIRE_SIZE] {
        let mut buf = [0u8; Self::WIRE_SIZE];
        buf[0..4].copy_from_slice(&self.cmd.to_le_bytes());
        buf[4..8].copy_from_slice(&self.session_id.to_le_bytes());
        buf[8..12].copy_from_slice(&self.param1.to_le_bytes());
        buf[12..16].copy_from_slice(&self.param2.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; Self::WIRE_SIZE]) -> Self {
        Message {
            cmd: u32::from_le_bytes(buf[0..4].try_into().unwrap()),
            session_id: u32::from_le_bytes(buf[4..8].try_into().unwrap()),
            param1: u32::from_le_bytes(buf[8..12].try_into().unwrap()),
            param2: u32::from_le_bytes(buf[12..16].try_into().unwrap()),
        }
    }
}

/// 8-byte fixed response header: `result`, `data_size`, both little-endian
/// `u32`. A variable-length UTF-16LE payload of `data_size` bytes follows
/// when non-zero (composition/candidate text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub result: u32,
    pub data_size: u32,
}

impl Response {
    pub const WIRE_SIZE: usize = 8;

    pub const fn zero() -> Self {
        Response {
            result: 0,
            data_size: 0,
        }
    }

    pub const fn ok() -> Self {
        Response {
            result: 1,
            data_size: 0,
        }
    }

    pub fn with_data(data_size: u32) -> Self {
        Response {
            result: 1,
            data_size,
        }
    }

    pub fn to_bytes(self) -> [u8; Self::WIRE_SIZE] {
        let mut buf = [0u8; Self::WIRE_SIZE];
        buf[0..4].copy_from_slice(&self.result.to_le_bytes());
        buf[4..8].copy_from_slice(&self.data_size.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; Self::WIRE_SIZE]) -> Self {
        Response {
            result: u32::from_le_bytes(buf[0..4].try_into().unwrap()),
            data_size: u32::from_le_bytes(buf[4..8].try_into().unwrap()),
        }
    }
}

/// Modifier flag layout for the `param1`/`param2` fields that carry key
/// modifiers over the wire; independent of [`crate::input::Modifiers`]'s
/// bit layout (the wire format predates and is pinned by the shim).
pub mod modifier_flags {
    pub const NONE: u32 = 0x00;
    pub const SHIFT: u32 = 0x01;
    pub const CONTROL: u32 = 0x02;
    pub const ALT: u32 = 0x04;
}

/// Packs a signed (x, y) screen coordinate pair into one `u32`: `x` in the
/// low 16 bits, `y` in the high 16 bits, both as `i16`.
pub fn pack_coordinates(x: i16, y: i16) -> u32 {
    (x as u16 as u32) | ((y as u16 as u32) << 16)
}

pub fn unpack_coordinates(packed: u32) -> (i16, i16) {
    let x = (packed & 0xffff) as u16 as i16;
    let y = ((packed >> 16) & 0xffff) as u16 as i16;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn message_round_trips() {
        let msg = Message {
            cmd: Command::ProcessKey as u32,
            session_id: 7,
            param1: 0x41,
            param2: modifier_flags::SHIFT,
        };
        let bytes = msg.to_bytes();
        assert_eq!(Message::from_bytes(&bytes), msg);
    }

    #[test]
    fn response_round_trips() {
        let resp = Response::with_data(128);
        assert_eq!(Response::from_bytes(&resp.to_bytes()), resp);
    }

    proptest! {
        #[test]
        fn coordinate_packing_round_trips(x: i16, y: i16) {
            let packed = pack_coordinates(x, y);
            prop_assert_eq!(unpack_coordinates(packed), (x, y));
        }
    }

    #[test]
    fn unknown_command_is_none() {
        assert!(Command::from_u32(999).is_none());
    }
}
