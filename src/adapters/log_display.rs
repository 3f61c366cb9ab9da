//! Log-based display adapter.
//!
//! Implements [`DisplaySink`] by writing boot progress and live snapshots
//! to the logger (UART / USB-CDC in production). A panel driver would
//! implement the same trait.

use core::fmt::{self, Display};

use log::info;

use crate::app::ports::DisplaySink;
use crate::sensors::SensorReadings;

/// Renders a missing value as `--`.
struct Field<T>(Option<T>, usize);

impl<T: Display> Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(v) => write!(f, "{:.*}", self.1, v),
            None => f.write_str("--"),
        }
    }
}

/// Adapter that logs every boot line and snapshot to the serial console.
#[derive(Default)]
pub struct LogDisplay {
    frames: u32,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots rendered so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl DisplaySink for LogDisplay {
    fn boot_line(&mut self, message: &str) {
        info!("BOOT | {}", message);
    }

    fn render(&mut self, r: &SensorReadings) {
        self.frames = self.frames.wrapping_add(1);
        info!(
            "AIR | CO2={}ppm | T={}\u{00b0}C/{}\u{00b0}F | RH={}% | \
             TVOC={}ppb ({}mg/m\u{00b3}) | P={}inHg | alt={}m/{}ft",
            Field(r.co2_ppm, 0),
            Field(r.temperature_c, 1),
            Field(r.temperature_f, 1),
            Field(r.humidity_pct, 1),
            Field(r.tvoc_ppb, 0),
            Field(r.tvoc_mg_m3, 3),
            Field(r.pressure_inhg, 2),
            Field(r.altitude_m, 1),
            Field(r.altitude_ft, 0),
        );
    }
}
