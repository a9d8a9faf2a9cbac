// SPDX-License-Identifier: GPL-3.0-only
//! EDID identity block
//!
//! The EDID EEPROM sits at its own bus address and is read as plain memory:
//! write the start offset, read the block back. No framing, checksum folding
//! or retries are involved.

use std::io;

use crate::error::EdidError;
use crate::transport::Transport;

/// Bus address of the EDID EEPROM
pub const EDID_ADDRESS: u8 = 0x50;

/// Size of the base EDID block
pub const EDID_BLOCK_LEN: usize = 128;

/// Byte holding the video input definition
const INPUT_TYPE: usize = 20;

/// Identity fields pulled out of the base block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdidSummary {
    /// Three-letter PnP manufacturer id
    pub manufacturer: String,
    pub product: u16,
    pub digital: bool,
}

impl EdidSummary {
    pub fn parse(block: &[u8]) -> Result<Self, EdidError> {
        if block.len() <= INPUT_TYPE {
            return Err(EdidError::Short(block.len()));
        }

        let id = u16::from_be_bytes([block[8], block[9]]);
        let letter = |shift: u16| char::from(b'@' + ((id >> shift) & 0x1f) as u8);
        let manufacturer = [letter(10), letter(5), letter(0)].iter().collect();

        Ok(Self {
            manufacturer,
            product: u16::from_le_bytes([block[10], block[11]]),
            digital: block[INPUT_TYPE] & 0x80 != 0,
        })
    }

    /// Plug and Play id, manufacturer followed by product code in hex
    pub fn pnp_id(&self) -> String {
        format!("{}{:04X}", self.manufacturer, self.product)
    }

    pub fn input_type(&self) -> &'static str {
        if self.digital { "Digital" } else { "Analog" }
    }
}

/// Read the raw base EDID block
pub fn read_block<T: Transport + ?Sized>(transport: &mut T) -> io::Result<Vec<u8>> {
    transport.write(EDID_ADDRESS, &[0x00])?;
    transport.read(EDID_ADDRESS, EDID_BLOCK_LEN)
}
