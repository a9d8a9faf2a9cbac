// SPDX-License-Identifier: GPL-3.0-only
//! Frame traffic observation
//!
//! The display object reports every frame it sends, every payload it
//! accepts, every frame it rejects and every failed attempt to a
//! `FrameObserver`. The default implementation turns those into `tracing`
//! events; tests can swap in a recorder.

use crate::error::{DdcError, FrameError};
use crate::hexdump::hexdump;

/// Receives notifications about bus traffic
pub trait FrameObserver {
    /// A complete frame was written to the bus
    fn frame_sent(&self, _address: u8, _frame: &[u8]) {}

    /// A reply frame validated and its payload was extracted
    fn payload_received(&self, _address: u8, _payload: &[u8]) {}

    /// The display answered with a busy marker
    fn busy(&self, _address: u8) {}

    /// A reply failed structural validation
    fn frame_rejected(&self, _address: u8, _raw: &[u8], _reason: &FrameError) {}

    /// A guarded read attempt failed
    fn attempt_failed(&self, _attempt: u32, _max_attempts: u32, _error: &DdcError) {}
}

/// Observer that logs through `tracing`.
///
/// `verbosity` 0 only logs rejected frames, 1 adds decoded payloads, 2 and
/// above also dumps every outbound frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver {
    verbosity: u8,
}

impl TracingObserver {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }
}

impl FrameObserver for TracingObserver {
    fn frame_sent(&self, address: u8, frame: &[u8]) {
        if self.verbosity > 1 {
            trace!("Send to 0x{:02x}:\n{}", address, hexdump(frame));
        }
    }

    fn payload_received(&self, address: u8, payload: &[u8]) {
        if self.verbosity > 0 {
            debug!("Recv from 0x{:02x}:\n{}", address, hexdump(payload));
        }
    }

    fn busy(&self, address: u8) {
        trace!("Display at 0x{:02x} is busy", address);
    }

    fn frame_rejected(&self, address: u8, raw: &[u8], reason: &FrameError) {
        warn!("{}", rejection_report(address, raw, reason));
    }

    fn attempt_failed(&self, attempt: u32, max_attempts: u32, error: &DdcError) {
        debug!(attempt, max_attempts, "DDC/CI read attempt failed: {}", error);
    }
}

/// Rejection reason followed by a hex dump of the raw bytes
fn rejection_report(address: u8, raw: &[u8], reason: &FrameError) -> String {
    format!(
        "Invalid response from 0x{:02x}, {}\n{}",
        address,
        reason,
        hexdump(raw)
    )
}
