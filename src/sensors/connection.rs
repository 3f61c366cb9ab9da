//! Bounded-retry connection establishment.
//!
//! Each attempt runs the sensor's handshake once. A failed attempt logs
//! `attempt n/max` and, if attempts remain, waits a fixed backoff before the
//! next one. The delay is injected through [`DelayNs`] so tests run without
//! real time passing.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::error::TransportError;

/// Retry parameters for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u8,
    pub backoff_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryState {
    Attempt(u8),
    Backoff(u8),
    Connected,
    Exhausted,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u8, backoff_ms: u32) -> Self {
        Self {
            max_attempts,
            backoff_ms,
        }
    }

    /// Same backoff, different attempt budget (bus recovery uses one).
    pub const fn with_attempts(self, max_attempts: u8) -> Self {
        Self {
            max_attempts,
            ..self
        }
    }

    /// Run `handshake` until it succeeds or the budget is spent.
    ///
    /// The handshake receives the delay so it can insert its own settle
    /// times. Returns whether the sensor ended up connected.
    pub fn run<D, F>(&self, label: &str, delay: &mut D, mut handshake: F) -> bool
    where
        D: DelayNs,
        F: FnMut(&mut D) -> Result<(), TransportError>,
    {
        let mut state = if self.max_attempts == 0 {
            RetryState::Exhausted
        } else {
            RetryState::Attempt(1)
        };

        loop {
            state = match state {
                RetryState::Attempt(n) => {
                    info!("{}: init attempt {}/{}", label, n, self.max_attempts);
                    match handshake(delay) {
                        Ok(()) => RetryState::Connected,
                        Err(e) => {
                            warn!(
                                "{}: attempt {}/{} failed: {}",
                                label, n, self.max_attempts, e
                            );
                            if n >= self.max_attempts {
                                RetryState::Exhausted
                            } else {
                                RetryState::Backoff(n)
                            }
                        }
                    }
                }
                RetryState::Backoff(n) => {
                    delay.delay_ms(self.backoff_ms);
                    RetryState::Attempt(n + 1)
                }
                RetryState::Connected => {
                    info!("{}: online", label);
                    return true;
                }
                RetryState::Exhausted => {
                    warn!(
                        "{}: failed to initialise after {} attempt(s)",
                        label, self.max_attempts
                    );
                    return false;
                }
            };
        }
    }
}
