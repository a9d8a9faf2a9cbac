// SPDX-License-Identifier: GPL-3.0-only
//! Settle delay and bounded retry for reads from the display

use std::thread;
use std::time::Duration;

use super::observer::FrameObserver;
use crate::error::Result;

/// How long to wait after a write and how often to retry a read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    settle_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(30);

    /// Build a policy; at least one attempt is always made
    pub fn new(max_attempts: u32, settle_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            settle_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Block for the settle delay
    pub fn settle(&self) {
        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }
    }

    /// Run `attempt` until it succeeds, fails fatally or runs out of tries.
    ///
    /// Only errors for which `DdcError::is_retryable` holds are retried,
    /// with a settle delay in between. The last error is returned when every
    /// attempt failed.
    pub fn run<T, O, F>(&self, observer: &O, mut attempt: F) -> Result<T>
    where
        O: FrameObserver + ?Sized,
        F: FnMut(u32) -> Result<T>,
    {
        let mut n = 1;
        loop {
            match attempt(n) {
                Ok(value) => {
                    if n > 1 {
                        debug!("DDC/CI read succeeded on attempt {}", n);
                    }
                    return Ok(value);
                }
                Err(e) if e.is_retryable() => {
                    observer.attempt_failed(n, self.max_attempts, &e);
                    if n >= self.max_attempts {
                        return Err(e);
                    }
                    self.settle();
                    n += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_SETTLE_DELAY)
    }
}
