//! Port traits — the hexagonal boundary between the acquisition core and
//! the outside world.
//!
//! ```text
//!   Vendor library / HAL ──▶ Port trait ──▶ sensor channel (domain)
//! ```
//!
//! Transport adapters wrap the vendor sensor libraries and perform the
//! actual bus transactions; the drivers in [`crate::sensors`] consume them
//! via generics and never touch the bus protocol themselves.

use crate::error::{StorageError, TransportError};
use crate::sensors::SensorReadings;

// ───────────────────────────────────────────────────────────────
// Transport ports (driven adapters: sensor → domain)
// ───────────────────────────────────────────────────────────────

/// One raw SCD41 measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2Sample {
    pub co2_ppm: u16,
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Photoacoustic CO2 / temperature / humidity sensor (SCD41 class).
pub trait Co2Transport {
    /// Bind the vendor driver to the device at `address`.
    fn begin(&mut self, address: u8) -> Result<(), TransportError>;

    /// Stop any measurement left running from before a reset.
    fn stop_periodic_measurement(&mut self) -> Result<(), TransportError>;

    /// Start the 5 s periodic measurement cycle.
    fn start_periodic_measurement(&mut self) -> Result<(), TransportError>;

    /// Whether a new measurement is waiting to be read.
    fn data_ready(&mut self) -> Result<bool, TransportError>;

    /// Read (and consume) the pending measurement.
    fn read_measurement(&mut self) -> Result<Co2Sample, TransportError>;
}

/// One raw SGP30 IAQ measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IaqSample {
    pub tvoc_ppb: u16,
    pub eco2_ppm: u16,
}

/// The SGP30's learned calibration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineRecord {
    pub eco2: u16,
    pub tvoc: u16,
}

/// Metal-oxide VOC sensor with an on-chip baseline (SGP30 class).
pub trait VocTransport {
    fn begin(&mut self, address: u8) -> Result<(), TransportError>;

    /// Start the IAQ algorithm; baseline learning begins from scratch.
    fn iaq_init(&mut self) -> Result<(), TransportError>;

    fn set_iaq_baseline(&mut self, baseline: BaselineRecord) -> Result<(), TransportError>;

    fn get_iaq_baseline(&mut self) -> Result<BaselineRecord, TransportError>;

    /// Absolute humidity in mg/m³ used for on-chip compensation.
    fn set_absolute_humidity(&mut self, mg_per_m3: u32) -> Result<(), TransportError>;

    fn measure_iaq(&mut self) -> Result<IaqSample, TransportError>;
}

/// Barometric pressure sensor (BMP280 class).
pub trait PressureTransport {
    /// Bind to `address` and configure normal mode with oversampling.
    fn begin(&mut self, address: u8) -> Result<(), TransportError>;

    /// Compensated pressure in pascals.
    fn read_pressure_pa(&mut self) -> Result<f32, TransportError>;

    /// Barometric altitude in metres relative to `sea_level_hpa`.
    fn read_altitude_m(&mut self, sea_level_hpa: f32) -> Result<f32, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Bus control port (driven adapter: domain → I²C peripheral / GPIO)
// ───────────────────────────────────────────────────────────────

/// Low-level control over the shared I²C bus, used only by bus recovery.
///
/// While a recovery runs, no other channel may touch the bus. In the
/// single-threaded polling model this holds by construction; a threaded
/// caller must hold the bus mutex for the whole procedure.
pub trait BusControl {
    /// Tear down the I²C controller session.
    fn release_bus(&mut self);

    /// Take SCL as a push-pull output and drive it to `high`.
    fn drive_clock(&mut self, high: bool);

    /// Return SCL and SDA to inputs with pull-ups.
    fn float_lines(&mut self);

    /// Re-create the I²C controller session.
    fn acquire_bus(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ SD card / flash)
// ───────────────────────────────────────────────────────────────

/// A small file store on removable or flash media.
pub trait StorageMedium {
    /// Bring the medium online. Called once at startup.
    fn mount(&mut self) -> Result<(), StorageError>;

    /// Whole-file contents, or `Ok(None)` if the file does not exist.
    fn read(&mut self, file: &str) -> Result<Option<String>, StorageError>;

    /// Replace the file's contents (truncate, never append).
    fn overwrite(&mut self, file: &str, contents: &str) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → screen)
// ───────────────────────────────────────────────────────────────

/// Read-only consumer of finished snapshots. Nothing flows back.
pub trait DisplaySink {
    /// Append one line to the boot-progress page.
    fn boot_line(&mut self, message: &str);

    /// Draw the live page for one snapshot.
    fn render(&mut self, readings: &SensorReadings);
}
