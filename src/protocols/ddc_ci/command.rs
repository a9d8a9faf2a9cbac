// SPDX-License-Identifier: GPL-3.0-only
//! DDC/CI command payloads

/// Opcodes used on the wire
pub mod opcode {
    /// Read a control value
    pub const READ_CONTROL: u8 = 0x01;
    /// Reply to a control read
    pub const READ_CONTROL_REPLY: u8 = 0x02;
    /// Write a control value
    pub const WRITE_CONTROL: u8 = 0x03;
    /// Persist current settings in the display
    pub const SAVE_SETTINGS: u8 = 0x0c;
    /// Reply carrying one capability chunk
    pub const CAPABILITIES_REPLY: u8 = 0xe3;
    /// Request one capability chunk
    pub const CAPABILITIES: u8 = 0xf3;
    /// ACCESS.bus presence check
    pub const PRESENCE: u8 = 0xf7;
}

/// Payload size of a read-control reply
pub const CONTROL_REPLY_LEN: usize = 8;

/// One host-to-display command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask for the current and maximum value of a control
    ReadControl(u8),
    /// Set a control to a new value
    WriteControl { control: u8, value: u16 },
    /// Ask for the capability string starting at `offset`
    Capabilities { offset: u16 },
    /// Single opcode with no arguments (save, presence check)
    Bare(u8),
}

impl Command {
    /// Payload bytes handed to the frame codec
    pub fn payload(&self) -> Vec<u8> {
        match *self {
            Command::ReadControl(control) => vec![opcode::READ_CONTROL, control],
            Command::WriteControl { control, value } => {
                let [high, low] = value.to_be_bytes();
                vec![opcode::WRITE_CONTROL, control, high, low]
            }
            Command::Capabilities { offset } => {
                let [high, low] = offset.to_be_bytes();
                vec![opcode::CAPABILITIES, high, low]
            }
            Command::Bare(op) => vec![op],
        }
    }

    /// Largest reply payload expected, `None` for write-only commands.
    ///
    /// `caps_chunk_len` bounds capability replies.
    pub fn reply_len(&self, caps_chunk_len: usize) -> Option<usize> {
        match self {
            Command::ReadControl(_) => Some(CONTROL_REPLY_LEN),
            Command::Capabilities { .. } => Some(caps_chunk_len),
            Command::WriteControl { .. } | Command::Bare(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payloads() {
        assert_eq!(Command::ReadControl(0x12).payload(), vec![0x01, 0x12]);
        assert_eq!(
            Command::WriteControl {
                control: 0x10,
                value: 50
            }
            .payload(),
            vec![0x03, 0x10, 0x00, 0x32]
        );
        assert_eq!(
            Command::WriteControl {
                control: 0xf5,
                value: 0x1234
            }
            .payload(),
            vec![0x03, 0xf5, 0x12, 0x34]
        );
        assert_eq!(
            Command::Capabilities { offset: 0x0120 }.payload(),
            vec![0xf3, 0x01, 0x20]
        );
        assert_eq!(Command::Bare(opcode::SAVE_SETTINGS).payload(), vec![0x0c]);
    }

    #[test]
    fn test_reply_lengths() {
        assert_eq!(Command::ReadControl(0x10).reply_len(35), Some(8));
        assert_eq!(Command::Capabilities { offset: 0 }.reply_len(35), Some(35));
        assert_eq!(Command::Bare(opcode::PRESENCE).reply_len(35), None);
        assert_eq!(
            Command::WriteControl {
                control: 0x10,
                value: 1
            }
            .reply_len(35),
            None
        );
    }
}
