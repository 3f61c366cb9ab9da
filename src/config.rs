//! System configuration parameters
//!
//! All tunable parameters for the acquisition layer. Defaults match the
//! shipped board; any subset can be overridden by a `config.json` on the
//! storage medium.

use anyhow::Context as _;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::StorageMedium;
use crate::error::Error;
use crate::pins;
use crate::sensors::baseline::BASELINE_FILE;
use crate::sensors::connection::RetryPolicy;
use crate::sensors::recovery::RECOVERY_CLOCK_PULSES;

/// Config file name on the storage medium.
pub const CONFIG_FILE: &str = "config.json";

/// Acquisition configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Connection ---
    /// Handshake attempts per (re)initialisation at boot
    pub init_attempts: u8,
    /// Delay between failed handshake attempts (milliseconds)
    pub init_backoff_ms: u32,

    // --- CO2 / temperature / humidity (SCD41) ---
    pub co2_address: u8,
    /// Minimum time between transport reads (milliseconds)
    pub co2_sample_interval_ms: u32,
    /// EMA weight of the newest sample, in (0, 1)
    pub co2_smoothing: f32,
    /// Wait after stopping periodic measurement before restarting it
    pub co2_settle_ms: u32,

    // --- Bus recovery ---
    /// Consecutive transport errors that trigger bus recovery
    pub bus_error_threshold: u8,
    /// SCL pulses sent during recovery
    pub recovery_clock_pulses: u8,

    // --- VOC (SGP30) ---
    pub voc_address: u8,
    pub voc_sample_interval_ms: u32,
    pub voc_smoothing: f32,
    /// Baseline snapshot cadence (milliseconds)
    pub baseline_save_interval_ms: u32,
    pub baseline_file: heapless::String<32>,

    // --- Pressure / altitude (BMP280) ---
    pub pressure_address: u8,
    pub pressure_sample_interval_ms: u32,
    pub pressure_smoothing: f32,
    /// Reference pressure for altitude (hPa)
    pub sea_level_hpa: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let mut baseline_file = heapless::String::new();
        let _ = baseline_file.push_str(BASELINE_FILE);

        Self {
            // Connection
            init_attempts: 3,
            init_backoff_ms: 200,

            // SCD41
            co2_address: pins::SCD41_I2C_ADDR,
            co2_sample_interval_ms: 5_000, // sensor period
            co2_smoothing: 0.2,
            co2_settle_ms: 500,

            // Recovery
            bus_error_threshold: 3,
            recovery_clock_pulses: RECOVERY_CLOCK_PULSES,

            // SGP30
            voc_address: pins::SGP30_I2C_ADDR,
            voc_sample_interval_ms: 2_000,
            voc_smoothing: 0.3,
            baseline_save_interval_ms: 3_600_000, // 1 h
            baseline_file,

            // BMP280
            pressure_address: pins::BMP280_I2C_ADDR,
            pressure_sample_interval_ms: 1_000,
            pressure_smoothing: 0.2,
            sea_level_hpa: 1013.25,
        }
    }
}

fn smoothing_in_range(alpha: f32) -> bool {
    alpha > 0.0 && alpha < 1.0
}

impl MonitorConfig {
    /// Range-check every field. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), Error> {
        if self.init_attempts == 0 {
            return Err(Error::Config("init_attempts must be at least 1"));
        }
        if self.init_backoff_ms > 10_000 {
            return Err(Error::Config("init_backoff_ms must be 0–10000"));
        }
        if self.co2_sample_interval_ms == 0
            || self.voc_sample_interval_ms == 0
            || self.pressure_sample_interval_ms == 0
        {
            return Err(Error::Config("sample intervals must be non-zero"));
        }
        if !smoothing_in_range(self.co2_smoothing)
            || !smoothing_in_range(self.voc_smoothing)
            || !smoothing_in_range(self.pressure_smoothing)
        {
            return Err(Error::Config("smoothing factors must be in (0, 1)"));
        }
        if self.bus_error_threshold == 0 {
            return Err(Error::Config("bus_error_threshold must be at least 1"));
        }
        if self.recovery_clock_pulses == 0 {
            return Err(Error::Config("recovery_clock_pulses must be at least 1"));
        }
        if self.baseline_save_interval_ms < 60_000 {
            return Err(Error::Config("baseline_save_interval_ms must be >= 60000"));
        }
        if self.baseline_file.is_empty() {
            return Err(Error::Config("baseline_file must not be empty"));
        }
        if !(800.0..=1100.0).contains(&self.sea_level_hpa) {
            return Err(Error::Config("sea_level_hpa must be 800–1100"));
        }
        Ok(())
    }

    /// Parse and validate a (possibly partial) JSON document.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(text).context("config is not valid JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load [`CONFIG_FILE`] from `medium`, falling back to defaults when it
    /// is missing, unreadable or invalid.
    pub fn load<M: StorageMedium>(medium: &mut M) -> Self {
        let text = match medium.read(CONFIG_FILE) {
            Ok(Some(text)) => text,
            Ok(None) => {
                info!("Config: no {} found, using defaults", CONFIG_FILE);
                return Self::default();
            }
            Err(e) => {
                warn!("Config: read failed ({}), using defaults", e);
                return Self::default();
            }
        };
        match Self::from_json(&text) {
            Ok(cfg) => {
                info!("Config: loaded {}", CONFIG_FILE);
                cfg
            }
            Err(e) => {
                warn!("Config: {:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Retry policy used for boot-time initialisation.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.init_attempts, self.init_backoff_ms)
    }
}
