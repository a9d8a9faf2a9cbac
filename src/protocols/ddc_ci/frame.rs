// SPDX-License-Identifier: GPL-3.0-only
//! DDC/CI frame codec
//!
//! Outbound: `[0x51, 0x80 | len, payload.., checksum]`, checksum seeded with
//! the destination address shifted left.
//!
//! Inbound: `[address * 2, 0x80 | len, payload.., checksum]`, checksum seeded
//! with the host's virtual address `0x50`. A correctly formed inbound frame
//! xors to zero.

use crate::error::{DdcError, FrameError, Rejection};

/// Source byte of every host frame
pub const HOST_SOURCE: u8 = 0x51;

/// Tag ored into the length byte
pub const LENGTH_TAG: u8 = 0x80;

/// Checksum seed for frames coming back from the display
pub const REPLY_SEED: u8 = 0x50;

/// Longest payload a length byte can describe
pub const MAX_PAYLOAD: usize = 127;

/// Size of the physical receive buffer
pub const RECV_BUFFER: usize = 127;

/// Marker bytes plus checksum around every payload
pub const FRAME_OVERHEAD: usize = 3;

/// Leading bytes a display returns while it has no frame ready
const BUSY_MARKERS: [u8; 2] = [0x51, 0xff];

/// Three-way classification of a raw read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// Display is still processing the request
    Busy,
    /// Bytes do not form a valid frame
    Invalid(FrameError),
    /// Validated payload, markers and checksum stripped
    Frame(&'a [u8]),
}

impl Decoded<'_> {
    /// Convert into the crate error taxonomy, copying the payload out.
    ///
    /// `raw` is attached to malformed-frame errors for diagnostics.
    pub fn into_result(self, raw: &[u8]) -> Result<Vec<u8>, DdcError> {
        match self {
            Decoded::Busy => Err(DdcError::NotReady(Rejection::Busy)),
            Decoded::Invalid(reason) => Err(DdcError::Malformed {
                reason,
                raw: raw.to_vec(),
            }),
            Decoded::Frame(payload) => Ok(payload.to_vec()),
        }
    }
}

fn build(seed: u8, source: u8, payload: &[u8]) -> Result<Vec<u8>, DdcError> {
    if payload.len() > MAX_PAYLOAD {
        return Err(DdcError::PayloadTooLarge(payload.len()));
    }

    let mut frame = Vec::with_capacity(payload.len() + FRAME_OVERHEAD);
    frame.push(source);
    frame.push(LENGTH_TAG | payload.len() as u8);
    frame.extend_from_slice(payload);

    let checksum = frame.iter().fold(seed, |xor, b| xor ^ b);
    frame.push(checksum);
    Ok(frame)
}

/// Encode a host-to-display frame for the display at `address`
pub fn encode(address: u8, payload: &[u8]) -> Result<Vec<u8>, DdcError> {
    build(address << 1, HOST_SOURCE, payload)
}

/// Encode a frame the way the display at `address` sends it back
#[cfg(test)]
pub fn encode_reply(address: u8, payload: &[u8]) -> Result<Vec<u8>, DdcError> {
    build(REPLY_SEED, address << 1, payload)
}

/// Validate a frame read from the display at `address`.
///
/// `max_len` is the largest payload the caller is prepared to accept.
pub fn decode(address: u8, raw: &[u8], max_len: usize) -> Decoded<'_> {
    let Some(&first) = raw.first() else {
        return Decoded::Busy;
    };

    if BUSY_MARKERS.contains(&first) {
        return Decoded::Busy;
    }

    let expected = address.wrapping_mul(2);
    if first != expected {
        return Decoded::Invalid(FrameError::AddressMismatch {
            expected,
            found: first,
        });
    }

    let Some(&marker) = raw.get(1) else {
        return Decoded::Invalid(FrameError::Truncated {
            needed: FRAME_OVERHEAD,
            got: raw.len(),
        });
    };

    if marker & LENGTH_TAG == 0 {
        return Decoded::Invalid(FrameError::MissingTag(marker));
    }

    let len = usize::from(marker & !LENGTH_TAG);
    if len > max_len || len > RECV_BUFFER {
        return Decoded::Invalid(FrameError::LengthOverflow {
            declared: len,
            max: max_len.min(RECV_BUFFER),
        });
    }

    let end = len + FRAME_OVERHEAD;
    if raw.len() < end {
        return Decoded::Invalid(FrameError::Truncated {
            needed: end,
            got: raw.len(),
        });
    }

    let xor = raw[..end].iter().fold(REPLY_SEED, |xor, b| xor ^ b);
    if xor != 0 {
        return Decoded::Invalid(FrameError::ChecksumMismatch { xor, len });
    }

    Decoded::Frame(&raw[2..2 + len])
}
