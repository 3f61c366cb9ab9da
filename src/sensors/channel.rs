//! Generic acquisition channel: sample gating, smoothing, fallback cache
//! and the consecutive-error counter shared by every sensor driver.
//!
//! A driver owns one `Channel<N>` (N = number of measured quantities) and
//! hands [`Channel::poll`] a closure that performs the actual transport
//! read. The channel decides whether that closure runs at all, folds a
//! fresh sample into the filter, and always answers with the best value it
//! has.
//!
//! ## Poll outcomes
//!
//! | Outcome   | Timestamp | Error count | Cache            |
//! |-----------|-----------|-------------|------------------|
//! | Skipped   | unchanged | unchanged   | unchanged        |
//! | Fresh     | `now`     | reset to 0  | smoothed update  |
//! | NotReady  | `now`     | reset to 0  | unchanged        |
//! | Failed    | `now`     | +1          | unchanged        |

use crate::error::{SensorError, TransportError};
use crate::sensors::filter::Smoother;
use crate::sensors::schedule::IntervalGate;

/// What a single [`Channel::poll`] call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollStatus {
    /// Channel is disconnected; nothing was attempted.
    Disconnected,
    /// Sample interval has not elapsed; nothing was attempted.
    Skipped,
    /// A new sample was read and filtered.
    Fresh,
    /// The sensor had no new data. Not an error.
    NotReady,
    /// The transport failed; `consecutive` is the updated error count.
    Failed {
        error: TransportError,
        consecutive: u8,
    },
}

/// Point-in-time view of a channel for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelHealth {
    pub connected: bool,
    pub has_reading: bool,
    pub consecutive_errors: u8,
    pub last_sample_ms: Option<u32>,
    /// Bus recoveries run on this channel (only the SCD41 recovers).
    pub recoveries: u32,
}

/// Shared per-sensor state machine.
#[derive(Debug, Clone)]
pub struct Channel<const N: usize> {
    connected: bool,
    smoother: Smoother<N>,
    gate: IntervalGate,
    consecutive_errors: u8,
    /// Why the last attempt yielded nothing; reported until a value exists.
    last_miss: SensorError,
}

impl<const N: usize> Channel<N> {
    pub fn new(sample_interval_ms: u32, smoothing: f32) -> Self {
        Self {
            connected: false,
            smoother: Smoother::new(smoothing),
            gate: IntervalGate::immediate(sample_interval_ms),
            consecutive_errors: 0,
            last_miss: SensorError::NotReady,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Set by the connection manager. Never touches the cache.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn has_reading(&self) -> bool {
        self.smoother.value().is_some()
    }

    pub fn consecutive_errors(&self) -> u8 {
        self.consecutive_errors
    }

    pub fn reset_errors(&mut self) {
        self.consecutive_errors = 0;
    }

    pub fn last_sample_ms(&self) -> Option<u32> {
        self.gate.last_ms()
    }

    /// Attempt a fresh read if the sample interval has elapsed.
    ///
    /// `fetch` returns `Ok(Some(raw))` for new data, `Ok(None)` when the
    /// sensor reports nothing new yet, or the transport error.
    pub fn poll<F>(&mut self, now_ms: u32, fetch: F) -> PollStatus
    where
        F: FnOnce() -> Result<Option<[f32; N]>, TransportError>,
    {
        if !self.connected {
            return PollStatus::Disconnected;
        }
        if !self.gate.claim(now_ms) {
            return PollStatus::Skipped;
        }

        match fetch() {
            Ok(Some(raw)) => {
                self.smoother.update(raw);
                self.consecutive_errors = 0;
                PollStatus::Fresh
            }
            Ok(None) => {
                self.consecutive_errors = 0;
                self.last_miss = SensorError::NotReady;
                PollStatus::NotReady
            }
            Err(error) => {
                self.consecutive_errors = self.consecutive_errors.saturating_add(1);
                self.last_miss = SensorError::Transport(error);
                PollStatus::Failed {
                    error,
                    consecutive: self.consecutive_errors,
                }
            }
        }
    }

    /// The freshest filtered values, possibly stale.
    ///
    /// Fails with `NotConnected` whenever the channel is down, even if a
    /// value is cached.
    pub fn reading(&self) -> Result<[f32; N], SensorError> {
        if !self.connected {
            return Err(SensorError::NotConnected);
        }
        self.smoother.value().ok_or(self.last_miss)
    }

    pub fn health(&self) -> ChannelHealth {
        ChannelHealth {
            connected: self.connected,
            has_reading: self.has_reading(),
            consecutive_errors: self.consecutive_errors,
            last_sample_ms: self.gate.last_ms(),
            recoveries: 0,
        }
    }
}
