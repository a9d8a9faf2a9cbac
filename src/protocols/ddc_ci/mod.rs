// SPDX-License-Identifier: GPL-3.0-only
//! DDC/CI (Display Data Channel Command Interface) protocol implementation
//!
//! DDC/CI is a standard protocol for controlling monitors over I2C bus.
//! It's supported by most modern external monitors via the video cable.
//!
//! Every command is one strict round trip: encode, write, wait for the
//! display to settle, read, validate. The display object owns the bus for
//! its whole lifetime, so there is never more than one command in flight.

pub mod caps;
pub mod command;
pub mod controls;
pub mod frame;
pub mod observer;
pub mod reply;
pub mod retry;

use std::fmt;

use crate::error::Result;
use crate::transport::Transport;

use caps::{CapabilityAssembler, CapabilityChunk};
use command::{Command, opcode};
use frame::{Decoded, FRAME_OVERHEAD};
use observer::{FrameObserver, TracingObserver};
use reply::{ControlReply, ControlValue};
use retry::RetryPolicy;

/// Default DDC/CI address, where the display's command logic sits
pub const DEFAULT_ADDRESS: u8 = 0x37;

/// Default cap on a capabilities reply payload
pub const DEFAULT_CAPS_CHUNK_LEN: usize = 35;

/// DDC/CI display reachable over a bus transport
pub struct DdcCiDisplay<T, O = TracingObserver> {
    transport: T,
    address: u8,
    policy: RetryPolicy,
    caps_chunk_len: usize,
    max_caps_chunks: usize,
    observer: O,
}

impl<T: Transport> DdcCiDisplay<T> {
    /// Create a display wrapper with default timing and a tracing observer
    pub fn new(transport: T, address: u8) -> Self {
        Self {
            transport,
            address,
            policy: RetryPolicy::default(),
            caps_chunk_len: DEFAULT_CAPS_CHUNK_LEN,
            max_caps_chunks: caps::DEFAULT_MAX_CHUNKS,
            observer: TracingObserver::default(),
        }
    }
}

impl<T: Transport, O: FrameObserver> DdcCiDisplay<T, O> {
    /// Replace the frame observer
    pub fn with_observer<P: FrameObserver>(self, observer: P) -> DdcCiDisplay<T, P> {
        DdcCiDisplay {
            transport: self.transport,
            address: self.address,
            policy: self.policy,
            caps_chunk_len: self.caps_chunk_len,
            max_caps_chunks: self.max_caps_chunks,
            observer,
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the largest capability reply payload and the request ceiling
    pub fn with_capability_limits(mut self, chunk_len: usize, max_chunks: usize) -> Self {
        self.caps_chunk_len = chunk_len;
        self.max_caps_chunks = max_chunks;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Direct access to the bus, for protocols that share it (EDID)
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Send a command that has no reply.
    ///
    /// Write failures are returned as-is, never retried.
    pub fn send(&mut self, command: Command) -> Result<()> {
        let encoded = frame::encode(self.address, &command.payload())?;
        self.observer.frame_sent(self.address, &encoded);
        self.transport.write(self.address, &encoded)?;
        Ok(())
    }

    /// Send a command and return the validated reply payload.
    ///
    /// Each attempt writes the request, waits the settle delay and reads the
    /// reply. Busy and malformed replies are retried per the retry policy; a
    /// failed write or read aborts at once.
    pub fn request(&mut self, command: Command) -> Result<Vec<u8>> {
        let max_len = command.reply_len(self.caps_chunk_len).unwrap_or(0);
        let encoded = frame::encode(self.address, &command.payload())?;

        let address = self.address;
        let policy = self.policy;
        let transport = &mut self.transport;
        let observer = &self.observer;

        policy.run(observer, |_| {
            observer.frame_sent(address, &encoded);
            transport.write(address, &encoded)?;
            policy.settle();

            let raw = transport.read(address, max_len + FRAME_OVERHEAD)?;
            let decoded = frame::decode(address, &raw, max_len);
            match &decoded {
                Decoded::Frame(payload) => observer.payload_received(address, payload),
                Decoded::Invalid(reason) => observer.frame_rejected(address, &raw, reason),
                Decoded::Busy => observer.busy(address),
            }
            decoded.into_result(&raw)
        })
    }

    /// Read the current and maximum value of `control`.
    ///
    /// With `force` a reply the display flags as invalid is still accepted.
    pub fn read_control(&mut self, control: u8, force: bool) -> Result<ControlValue> {
        let payload = self.request(Command::ReadControl(control))?;
        let reply = ControlReply::parse(&payload)?;
        reply::interpret(&reply, control, force)
    }

    /// Set `control` to `value`
    pub fn write_control(&mut self, control: u8, value: u16) -> Result<()> {
        debug!("Writing 0x{:02x} = {} at 0x{:02x}", control, value, self.address);
        self.send(Command::WriteControl { control, value })
    }

    /// Ask the display to persist its current settings
    pub fn save_settings(&mut self) -> Result<()> {
        self.send(Command::Bare(opcode::SAVE_SETTINGS))
    }

    /// ACCESS.bus presence check, used to see if anything answers
    pub fn presence_check(&mut self) -> Result<()> {
        self.send(Command::Bare(opcode::PRESENCE))
    }

    /// Turn the Samsung vendor DDC/CI gate on or off
    pub fn set_vendor_enable(&mut self, enabled: bool) -> Result<()> {
        self.write_control(controls::SAMSUNG_ENABLE, u16::from(enabled))
    }

    /// Fetch the whole capability string, chunk by chunk
    pub fn capabilities(&mut self) -> Result<Vec<u8>> {
        let mut assembler = CapabilityAssembler::new(self.max_caps_chunks);

        while let Some(offset) = assembler.next_offset()? {
            let payload = self.request(Command::Capabilities { offset })?;
            assembler.accept(CapabilityChunk::parse(&payload)?)?;
        }

        let caps = assembler.finish();
        debug!("Capability string is {} bytes", caps.len());
        Ok(caps)
    }
}

impl<T, O> fmt::Debug for DdcCiDisplay<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DdcCiDisplay(address: 0x{:02x}, attempts: {})",
            self.address,
            self.policy.max_attempts()
        )
    }
}
