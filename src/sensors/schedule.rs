//! Time gates for sampling and baseline saves.
//!
//! Timestamps are `u32` milliseconds from a free-running monotonic counter
//! that wraps every ~49.7 days. Elapsed time is always computed with
//! `wrapping_sub`, never by comparing timestamps, so a wrap between two
//! checks is harmless.

/// What a gate does before it has ever fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstFire {
    /// Fire on the very first check.
    Immediate,
    /// Start the interval on the first check; fire one interval later.
    Deferred,
}

/// Fires at most once per `interval_ms`.
#[derive(Debug, Clone, Copy)]
pub struct IntervalGate {
    interval_ms: u32,
    last_ms: Option<u32>,
    first: FirstFire,
}

impl IntervalGate {
    pub fn new(interval_ms: u32, first: FirstFire) -> Self {
        Self {
            interval_ms,
            last_ms: None,
            first,
        }
    }

    /// Gate that fires on the first check.
    pub fn immediate(interval_ms: u32) -> Self {
        Self::new(interval_ms, FirstFire::Immediate)
    }

    /// Gate whose first firing is one full interval after the first check.
    pub fn deferred(interval_ms: u32) -> Self {
        Self::new(interval_ms, FirstFire::Deferred)
    }

    /// Non-mutating check.
    pub fn is_due(&self, now_ms: u32) -> bool {
        match self.last_ms {
            Some(last) => now_ms.wrapping_sub(last) >= self.interval_ms,
            None => self.first == FirstFire::Immediate,
        }
    }

    /// If the gate is due, record `now_ms` as the new start and return
    /// `true`. A deferred gate that has never been checked is armed at
    /// `now_ms` and returns `false`.
    pub fn claim(&mut self, now_ms: u32) -> bool {
        if self.last_ms.is_none() && self.first == FirstFire::Deferred {
            self.last_ms = Some(now_ms);
            return false;
        }
        if self.is_due(now_ms) {
            self.last_ms = Some(now_ms);
            true
        } else {
            false
        }
    }

    pub fn last_ms(&self) -> Option<u32> {
        self.last_ms
    }
}
