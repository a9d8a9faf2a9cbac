// SPDX-License-Identifier: GPL-3.0-only
//! Linux `i2c-dev` transport
//!
//! Talks to `/dev/i2c-N` through the `I2C_RDWR` ioctl, one message per
//! transfer. The kernel module `i2c-dev` must be loaded for the device node
//! to exist.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use super::Transport;

/// `I2C_RDWR` request number from `linux/i2c-dev.h`
const I2C_RDWR: libc::c_ulong = 0x0707;

/// Read flag for `i2c_msg.flags`
const I2C_M_RD: u16 = 0x0001;

/// Mirror of `struct i2c_msg`
#[repr(C)]
struct I2cMsg {
    addr: u16,
    flags: u16,
    len: u16,
    buf: *mut u8,
}

/// Mirror of `struct i2c_rdwr_ioctl_data`
#[repr(C)]
struct I2cRdwrIoctlData {
    msgs: *mut I2cMsg,
    nmsgs: u32,
}

/// An open I2C adapter character device
#[derive(Debug)]
pub struct LinuxI2c {
    file: File,
    path: PathBuf,
}

impl LinuxI2c {
    /// Open an adapter such as `/dev/i2c-4` for reading and writing
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().read(true).write(true).open(&path)?;
        debug!("Opened I2C adapter {}", path.display());
        Ok(Self { file, path })
    }

    /// Path of the device node this transport was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn transfer(&mut self, address: u8, flags: u16, buf: &mut [u8]) -> io::Result<()> {
        let len = u16::try_from(buf.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("transfer of {} bytes is too large", buf.len()),
            )
        })?;

        let mut msg = I2cMsg {
            addr: u16::from(address),
            flags,
            len,
            buf: buf.as_mut_ptr(),
        };
        let mut data = I2cRdwrIoctlData {
            msgs: &mut msg,
            nmsgs: 1,
        };

        // SAFETY: `msg` and `data` outlive the call and `msg.buf` points at
        // `len` writable bytes owned by `buf`.
        let ret = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                I2C_RDWR as _,
                &mut data as *mut I2cRdwrIoctlData,
            )
        };

        if ret < 0 {
            let err = io::Error::last_os_error();
            debug!(
                "I2C_RDWR on {} at 0x{:02x} failed: {}",
                self.path.display(),
                address,
                err
            );
            return Err(err);
        }

        Ok(())
    }
}

impl Transport for LinuxI2c {
    fn write(&mut self, address: u8, data: &[u8]) -> io::Result<usize> {
        // The ioctl takes a mutable pointer even for writes
        let mut buf = data.to_vec();
        self.transfer(address, 0, &mut buf)?;
        Ok(buf.len())
    }

    fn read(&mut self, address: u8, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.transfer(address, I2C_M_RD, &mut buf)?;
        Ok(buf)
    }
}
