//! AQMon air-quality monitor acquisition library.
//!
//! Drives an SCD41 (CO2, temperature, humidity), an SGP30 (TVOC) and a
//! BMP280 (pressure, altitude) on one shared I²C bus, and turns their raw
//! output into smoothed, cached readings for a display. Sensor transports,
//! bus control, storage and display are port traits (see [`app::ports`]);
//! all ESP-IDF-specific code is guarded by `#[cfg(feature = "espidf")]`
//! within each adapter.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod sensors;

pub use config::MonitorConfig;
pub use error::{Error, Result};
pub use sensors::{SensorHub, SensorReadings};
