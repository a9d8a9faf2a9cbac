// SPDX-License-Identifier: GPL-3.0-only
//! Display protocols spoken over the bus transport
//!
//! DDC/CI carries the command traffic (control reads and writes,
//! capabilities). EDID is the monitor's identity EEPROM on the same bus.

pub mod ddc_ci;
pub mod edid;
