// SPDX-License-Identifier: GPL-3.0-only
//! Read-control reply interpretation

use super::command::{CONTROL_REPLY_LEN, opcode};
use crate::error::{DdcError, Rejection, Result};

/// Decoded payload of a read-control reply
///
/// Wire layout: `[0x02, validity, control, reserved, max_hi, max_lo, cur_hi, cur_lo]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlReply {
    pub opcode: u8,
    /// Non-zero validity byte, the display does not vouch for the value
    pub invalid: bool,
    pub control: u8,
    pub maximum: u16,
    pub current: u16,
}

impl ControlReply {
    /// Split an 8-byte reply payload into its fields
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let bytes: &[u8; CONTROL_REPLY_LEN] = payload
            .try_into()
            .map_err(|_| DdcError::NotReady(Rejection::ShortReply(payload.len())))?;

        Ok(Self {
            opcode: bytes[0],
            invalid: bytes[1] != 0,
            control: bytes[2],
            maximum: u16::from_be_bytes([bytes[4], bytes[5]]),
            current: u16::from_be_bytes([bytes[6], bytes[7]]),
        })
    }
}

/// An accepted control reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlValue {
    pub control: u8,
    pub current: u16,
    pub maximum: u16,
    /// Validity as reported by the display, may be false when forced
    pub valid: bool,
}

/// Accept or reject `reply` as the answer to a read of `requested`.
///
/// With `force` the validity flag is ignored; opcode and control id must
/// still match.
pub fn interpret(reply: &ControlReply, requested: u8, force: bool) -> Result<ControlValue> {
    if reply.opcode != opcode::READ_CONTROL_REPLY {
        return Err(DdcError::NotReady(Rejection::WrongOpcode(reply.opcode)));
    }

    if reply.control != requested {
        return Err(DdcError::NotReady(Rejection::ControlMismatch {
            requested,
            echoed: reply.control,
        }));
    }

    if reply.invalid && !force {
        return Err(DdcError::NotReady(Rejection::Invalid(requested)));
    }

    Ok(ControlValue {
        control: requested,
        current: reply.current,
        maximum: reply.maximum,
        valid: !reply.invalid,
    })
}
