// SPDX-License-Identifier: GPL-3.0-only
//! Capability string reassembly
//!
//! The capability string is too long for one frame, so the host asks for it
//! in pieces: each request names an offset, each reply echoes that offset
//! followed by the next few bytes. A reply with no data ends the string.

use std::fmt::Write;

use super::command::opcode;
use crate::error::{DdcError, Result, SequenceError};

/// Opcode plus 16-bit offset at the start of every reply
pub const HEADER_LEN: usize = 3;

/// Default ceiling on chunk requests for one capability fetch
pub const DEFAULT_MAX_CHUNKS: usize = 256;

/// One decoded capabilities reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityChunk {
    pub offset: u16,
    pub data: Vec<u8>,
}

impl CapabilityChunk {
    /// Decode a reply payload `[0xe3, offset_hi, offset_lo, data..]`
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() < HEADER_LEN {
            return Err(DdcError::ProtocolSequence(SequenceError::ShortChunk(
                payload.len(),
            )));
        }

        if payload[0] != opcode::CAPABILITIES_REPLY {
            return Err(DdcError::ProtocolSequence(SequenceError::WrongOpcode(
                payload[0],
            )));
        }

        Ok(Self {
            offset: u16::from_be_bytes([payload[1], payload[2]]),
            data: payload[HEADER_LEN..].to_vec(),
        })
    }

    /// A chunk without data terminates the stream
    pub fn is_terminal(&self) -> bool {
        self.data.is_empty()
    }
}

/// Where the reassembly stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapsState {
    /// Next request goes out at this offset
    Requesting(u16),
    /// Terminal chunk seen
    Done,
}

/// Accumulates chunks in order and tracks the next offset to request
#[derive(Debug)]
pub struct CapabilityAssembler {
    state: CapsState,
    buffer: Vec<u8>,
    requests: usize,
    max_chunks: usize,
}

impl CapabilityAssembler {
    pub fn new(max_chunks: usize) -> Self {
        Self {
            state: CapsState::Requesting(0),
            buffer: Vec::new(),
            requests: 0,
            max_chunks,
        }
    }

    /// Offset for the next request, or `None` once finished.
    ///
    /// Fails once the request ceiling is reached without a terminal chunk.
    pub fn next_offset(&mut self) -> Result<Option<u16>> {
        match self.state {
            CapsState::Done => Ok(None),
            CapsState::Requesting(offset) => {
                if self.requests >= self.max_chunks {
                    return Err(DdcError::CapabilityLimit(self.max_chunks));
                }
                self.requests += 1;
                Ok(Some(offset))
            }
        }
    }

    /// Feed the reply to the most recent request
    pub fn accept(&mut self, chunk: CapabilityChunk) -> Result<()> {
        let CapsState::Requesting(expected) = self.state else {
            return Ok(());
        };

        if chunk.offset != expected {
            return Err(DdcError::ProtocolSequence(SequenceError::OffsetMismatch {
                expected,
                found: chunk.offset,
            }));
        }

        if chunk.is_terminal() {
            self.state = CapsState::Done;
            return Ok(());
        }

        let next = u16::try_from(chunk.data.len())
            .ok()
            .and_then(|len| expected.checked_add(len))
            .ok_or(DdcError::ProtocolSequence(SequenceError::OffsetOverflow(
                expected,
            )))?;

        trace!(offset = expected, len = chunk.data.len(), "Capability chunk");
        self.buffer.extend_from_slice(&chunk.data);
        self.state = CapsState::Requesting(next);
        Ok(())
    }

    /// The reassembled capability bytes
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

/// Render capability bytes for display.
///
/// Printable ASCII is kept, anything else is shown as `0x..`.
pub fn render_capabilities(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if (0x20..0x7f).contains(&b) {
            out.push(b as char);
        } else {
            let _ = write!(out, "0x{b:02x} ");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(offset: u16, data: &[u8]) -> CapabilityChunk {
        CapabilityChunk {
            offset,
            data: data.to_vec(),
        }
    }

    #[test]
    fn test_parse_chunk() {
        let parsed = CapabilityChunk::parse(&[0xe3, 0x00, 0x20, b'(', b'p']).unwrap();
        assert_eq!(parsed, chunk(0x20, b"(p"));
        assert!(!parsed.is_terminal());

        let terminal = CapabilityChunk::parse(&[0xe3, 0x01, 0x00]).unwrap();
        assert_eq!(terminal.offset, 0x100);
        assert!(terminal.is_terminal());
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        assert!(matches!(
            CapabilityChunk::parse(&[0xe3, 0x00]),
            Err(DdcError::ProtocolSequence(SequenceError::ShortChunk(2)))
        ));
        assert!(matches!(
            CapabilityChunk::parse(&[0x02, 0x00, 0x00, 0x41]),
            Err(DdcError::ProtocolSequence(SequenceError::WrongOpcode(0x02)))
        ));
    }

    #[test]
    fn test_assembles_in_order() {
        let mut asm = CapabilityAssembler::new(DEFAULT_MAX_CHUNKS);

        assert_eq!(asm.next_offset().unwrap(), Some(0));
        asm.accept(chunk(0, b"(prot(mon")).unwrap();
        assert_eq!(asm.next_offset().unwrap(), Some(9));
        asm.accept(chunk(9, b"itor))")).unwrap();
        assert_eq!(asm.next_offset().unwrap(), Some(15));
        asm.accept(chunk(15, b"")).unwrap();

        assert_eq!(asm.state, CapsState::Done);
        assert_eq!(asm.next_offset().unwrap(), None);
        assert_eq!(asm.finish(), b"(prot(monitor))".to_vec());
    }

    #[test]
    fn test_offset_echo_mismatch_is_fatal() {
        let mut asm = CapabilityAssembler::new(DEFAULT_MAX_CHUNKS);
        asm.next_offset().unwrap();
        asm.accept(chunk(0, b"abcd")).unwrap();
        asm.next_offset().unwrap();

        assert!(matches!(
            asm.accept(chunk(0, b"abcd")),
            Err(DdcError::ProtocolSequence(SequenceError::OffsetMismatch {
                expected: 4,
                found: 0
            }))
        ));
    }

    #[test]
    fn test_request_ceiling() {
        let mut asm = CapabilityAssembler::new(2);
        for offset in [0u16, 1] {
            assert_eq!(asm.next_offset().unwrap(), Some(offset));
            asm.accept(chunk(offset, b"x")).unwrap();
        }
        assert!(matches!(
            asm.next_offset(),
            Err(DdcError::CapabilityLimit(2))
        ));
    }

    #[test]
    fn test_offset_overflow() {
        let mut asm = CapabilityAssembler::new(DEFAULT_MAX_CHUNKS);
        asm.state = CapsState::Requesting(u16::MAX - 1);
        assert!(matches!(
            asm.accept(chunk(u16::MAX - 1, b"abc")),
            Err(DdcError::ProtocolSequence(SequenceError::OffsetOverflow(0xfffe)))
        ));
    }

    #[test]
    fn test_render_capabilities() {
        assert_eq!(render_capabilities(b"(vcp(10 12))"), "(vcp(10 12))");
        assert_eq!(render_capabilities(&[b'a', 0x00, b'b']), "a0x00 b");
    }
}
