//! Unified error types for the acquisition layer.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! caller's error handling uniform. All variants are `Copy` so they can be
//! cached inside a channel and handed back on every failed poll without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor channel could not produce a reading.
    Sensor(SensorError),
    /// Non-volatile storage is unavailable or returned bad data.
    Storage(StorageError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Why a channel returned no value.
///
/// Transport failures are absorbed by the channel whenever a cached reading
/// exists; callers only see one of these when there is nothing to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Never initialised, or the last (re)initialisation exhausted its attempts.
    NotConnected,
    /// The last bus transaction failed and no earlier reading is cached.
    Transport(TransportError),
    /// The sensor has not produced its first measurement yet.
    NotReady,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::NotReady => write!(f, "no data ready"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

impl From<TransportError> for SensorError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// A single failed transaction reported by a transport adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Device did not acknowledge its address.
    Nack,
    /// Arbitration loss or other bus-level fault.
    Bus,
    /// Response failed its checksum.
    Crc,
    /// Device did not answer in time.
    Timeout,
    /// Response decoded but is physically implausible.
    OutOfRange,
    /// Vendor library error code with no finer mapping.
    Vendor(u16),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nack => write!(f, "NACK"),
            Self::Bus => write!(f, "bus fault"),
            Self::Crc => write!(f, "CRC mismatch"),
            Self::Timeout => write!(f, "timeout"),
            Self::OutOfRange => write!(f, "value out of range"),
            Self::Vendor(code) => write!(f, "vendor error 0x{code:04x}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Sensor(SensorError::Transport(e))
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Persistence is degraded but never fatal: every variant means
/// "carry on without calibration persistence".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The storage medium was not mounted at startup.
    NotMounted,
    /// Open, read or write failed.
    Io,
    /// The stored content could not be parsed.
    Malformed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMounted => write!(f, "medium not mounted"),
            Self::Io => write!(f, "I/O error"),
            Self::Malformed => write!(f, "malformed content"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
