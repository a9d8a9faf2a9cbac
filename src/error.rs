// SPDX-License-Identifier: GPL-3.0-only
//! Error types for the DDC/CI engine
//!
//! `DdcError` is what every protocol operation returns. The split between
//! retryable and fatal failures lives here so the retry policy does not need
//! to know about individual commands.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons an inbound frame failed structural validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Leading byte is not the display's address shifted left
    #[error("first byte is 0x{found:02x}, should be 0x{expected:02x}")]
    AddressMismatch { expected: u8, found: u8 },

    /// Length marker lacks the 0x80 tag
    #[error("length marker 0x{0:02x} is missing the tag bit")]
    MissingTag(u8),

    /// Declared length exceeds what the caller or the receive buffer allows
    #[error("length is {declared}, should be {max} at most")]
    LengthOverflow { declared: usize, max: usize },

    /// Fewer bytes arrived than the frame header declares
    #[error("frame needs {needed} bytes, only {got} received")]
    Truncated { needed: usize, got: usize },

    /// Running xor over the frame did not come out to zero
    #[error("corrupted data, xor is 0x{xor:02x}, length 0x{len:02x}")]
    ChecksumMismatch { xor: u8, len: usize },
}

/// Why the display is considered not ready
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The display answered with a busy marker instead of a frame
    #[error("display is busy")]
    Busy,

    /// Reply opcode is not the one expected for the request
    #[error("unexpected reply opcode 0x{0:02x}")]
    WrongOpcode(u8),

    /// Reply echoes a different control than the one requested
    #[error("reply is for control 0x{echoed:02x}, requested 0x{requested:02x}")]
    ControlMismatch { requested: u8, echoed: u8 },

    /// The display flagged the control value as invalid
    #[error("control 0x{0:02x} reported as invalid")]
    Invalid(u8),

    /// Reply payload has the wrong size for a control read
    #[error("reply has {0} bytes, expected 8")]
    ShortReply(usize),
}

/// Ways a capability chunk can break the request/reply sequence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// Reply too short to hold the opcode and offset
    #[error("chunk has {0} bytes, header needs 3")]
    ShortChunk(usize),

    /// Reply is not a capabilities reply
    #[error("unexpected reply opcode 0x{0:02x}")]
    WrongOpcode(u8),

    /// Reply echoes a different offset than requested
    #[error("expected offset {expected}, got {found}")]
    OffsetMismatch { expected: u16, found: u16 },

    /// Next offset would not fit in 16 bits
    #[error("offset overflows after {0}")]
    OffsetOverflow(u16),
}

/// Errors produced by DDC/CI operations
#[derive(Error, Debug)]
pub enum DdcError {
    /// Bus write or read failed at the OS level
    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),

    /// Display is busy or refused the reply
    #[error("not ready: {0}")]
    NotReady(Rejection),

    /// Reply frame failed validation
    #[error("invalid response: {reason}")]
    Malformed { reason: FrameError, raw: Vec<u8> },

    /// Capability chunk broke the request/reply sequence
    #[error("invalid sequence in capabilities: {0}")]
    ProtocolSequence(SequenceError),

    /// Outbound payload does not fit in a frame
    #[error("payload of {0} bytes exceeds the 127 byte frame limit")]
    PayloadTooLarge(usize),

    /// Capability fetch hit the configured request ceiling
    #[error("capability string did not terminate within {0} chunks")]
    CapabilityLimit(usize),
}

impl DdcError {
    /// Whether the retry policy may absorb this failure
    pub fn is_retryable(&self) -> bool {
        matches!(self, DdcError::NotReady(_) | DdcError::Malformed { .. })
    }
}

/// Result type alias for DdcError
pub type Result<T> = std::result::Result<T, DdcError>;

/// EDID decoding errors
#[derive(Error, Debug)]
pub enum EdidError {
    /// Block ends before the identity fields
    #[error("EDID block has {0} bytes, need at least 21")]
    Short(usize),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for our schema
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is outside its allowed range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
