// SPDX-License-Identifier: GPL-3.0-only
//! Raw bus transport
//!
//! The DDC/CI engine only needs two addressed operations from the bus: write
//! a buffer and read a fixed number of bytes back. Everything above this trait
//! is hardware independent, which is what lets the tests drive the protocol
//! against a simulated display.

mod linux;
#[cfg(test)]
pub mod mock;

pub use linux::LinuxI2c;

use std::io;

/// Addressed, blocking byte exchange with a bus peripheral
pub trait Transport {
    /// Write `data` to the 7-bit `address` as a single message.
    ///
    /// Returns the number of bytes handed to the bus.
    fn write(&mut self, address: u8, data: &[u8]) -> io::Result<usize>;

    /// Read exactly `len` bytes from the 7-bit `address`.
    fn read(&mut self, address: u8, len: usize) -> io::Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, address: u8, data: &[u8]) -> io::Result<usize> {
        (**self).write(address, data)
    }

    fn read(&mut self, address: u8, len: usize) -> io::Result<Vec<u8>> {
        (**self).read(address, len)
    }
}
