// SPDX-License-Identifier: GPL-3.0-only
//! Test doubles for the bus transport

use std::collections::{HashMap, VecDeque};
use std::io;

use super::Transport;
use crate::protocols::ddc_ci::frame;

/// Bus that replays canned read results and records every write
#[derive(Debug, Default)]
pub struct ScriptedBus {
    pub writes: Vec<(u8, Vec<u8>)>,
    pub reads: usize,
    pub fail_writes: bool,
    replies: VecDeque<io::Result<Vec<u8>>>,
}

impl ScriptedBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_read(&mut self, bytes: Vec<u8>) {
        self.replies.push_back(Ok(bytes));
    }

    pub fn push_read_error(&mut self) {
        self.replies
            .push_back(Err(io::Error::new(io::ErrorKind::TimedOut, "read timed out")));
    }
}

impl Transport for ScriptedBus {
    fn write(&mut self, address: u8, data: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::other("no acknowledgment"));
        }
        self.writes.push((address, data.to_vec()));
        Ok(data.len())
    }

    fn read(&mut self, _address: u8, len: usize) -> io::Result<Vec<u8>> {
        self.reads += 1;
        let mut bytes = self
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(io::Error::other("no scripted reply")))?;
        bytes.resize(len, 0);
        Ok(bytes)
    }
}

/// A monitor's control value as the simulator stores it
#[derive(Debug, Clone, Copy)]
pub struct SimControl {
    pub invalid: bool,
    pub maximum: u16,
    pub current: u16,
}

/// Display that answers DDC/CI requests the way real hardware does
#[derive(Debug)]
pub struct SimulatedDisplay {
    pub address: u8,
    pub controls: HashMap<u8, SimControl>,
    pub capabilities: Vec<u8>,
    /// Data bytes per capability chunk
    pub chunk_len: usize,
    /// Reads left that answer with a busy marker
    pub busy_reads: usize,
    /// Echo this offset instead of the requested one
    pub wrong_offset: Option<u16>,
    /// Payloads of every accepted host frame
    pub received: Vec<Vec<u8>>,
    /// Every address a write or read was issued to, in order
    pub traffic: Vec<u8>,
    pub reads: usize,
    pending: Option<Vec<u8>>,
}

impl SimulatedDisplay {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            controls: HashMap::new(),
            capabilities: Vec::new(),
            chunk_len: 32,
            busy_reads: 0,
            wrong_offset: None,
            received: Vec::new(),
            traffic: Vec::new(),
            reads: 0,
            pending: None,
        }
    }

    pub fn with_control(mut self, control: u8, current: u16, maximum: u16) -> Self {
        self.controls.insert(
            control,
            SimControl {
                invalid: false,
                maximum,
                current,
            },
        );
        self
    }

    pub fn with_capabilities(mut self, caps: &[u8], chunk_len: usize) -> Self {
        self.capabilities = caps.to_vec();
        self.chunk_len = chunk_len;
        self
    }

    fn handle(&mut self, payload: &[u8]) {
        match payload {
            [0x01, control] => {
                let reply = match self.controls.get(control) {
                    Some(c) => {
                        let [max_hi, max_lo] = c.maximum.to_be_bytes();
                        let [cur_hi, cur_lo] = c.current.to_be_bytes();
                        vec![0x02, u8::from(c.invalid), *control, 0, max_hi, max_lo, cur_hi, cur_lo]
                    }
                    None => vec![0x02, 0x01, *control, 0, 0, 0, 0, 0],
                };
                self.pending = Some(reply);
            }
            [0x03, control, high, low] => {
                let value = u16::from_be_bytes([*high, *low]);
                self.controls
                    .entry(*control)
                    .and_modify(|c| c.current = value)
                    .or_insert(SimControl {
                        invalid: false,
                        maximum: u16::MAX,
                        current: value,
                    });
            }
            [0xf3, high, low] => {
                let offset = u16::from_be_bytes([*high, *low]);
                let start = usize::from(offset).min(self.capabilities.len());
                let end = (start + self.chunk_len).min(self.capabilities.len());
                let echoed = self.wrong_offset.unwrap_or(offset);

                let mut reply = vec![0xe3];
                reply.extend_from_slice(&echoed.to_be_bytes());
                reply.extend_from_slice(&self.capabilities[start..end]);
                self.pending = Some(reply);
            }
            _ => {}
        }
    }
}

impl Transport for SimulatedDisplay {
    fn write(&mut self, address: u8, data: &[u8]) -> io::Result<usize> {
        self.traffic.push(address);
        if address != self.address {
            return Err(io::Error::other("no acknowledgment"));
        }

        let checksum = data.iter().fold(address << 1, |xor, b| xor ^ b);
        if data.len() < 3 || data[0] != frame::HOST_SOURCE || checksum != 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "bad host frame"));
        }

        let len = usize::from(data[1] & !frame::LENGTH_TAG);
        let payload = data[2..2 + len].to_vec();
        self.handle(&payload);
        self.received.push(payload);
        Ok(data.len())
    }

    fn read(&mut self, address: u8, len: usize) -> io::Result<Vec<u8>> {
        self.traffic.push(address);
        self.reads += 1;

        if self.busy_reads > 0 {
            self.busy_reads -= 1;
            return Ok(vec![0xff; len]);
        }

        let mut bytes = match self.pending.take() {
            Some(reply) => frame::encode_reply(self.address, &reply)
                .map_err(|e| io::Error::other(e.to_string()))?,
            None => vec![0xff; len],
        };
        bytes.resize(len, 0);
        Ok(bytes)
    }
}
