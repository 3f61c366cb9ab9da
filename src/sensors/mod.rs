//! Sensor subsystem — individual channel drivers and the aggregating
//! [`SensorHub`].
//!
//! The hub owns every driver and produces a [`SensorReadings`] snapshot per
//! poll for the display sink. Each driver is built from the same pieces:
//!
//! | Piece                  | Module         |
//! |------------------------|----------------|
//! | bounded-retry init     | [`connection`] |
//! | sample gating          | [`schedule`]   |
//! | EMA filter             | [`filter`]     |
//! | fallback cache, errors | [`channel`]    |
//! | bus recovery (SCD41)   | [`recovery`]   |
//! | baseline (SGP30)       | [`baseline`]   |

pub mod baseline;
pub mod channel;
pub mod co2;
pub mod connection;
pub mod filter;
pub mod pressure;
pub mod recovery;
pub mod schedule;
pub mod voc;

use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::{
    BusControl, Co2Transport, DisplaySink, PressureTransport, StorageMedium, VocTransport,
};
use channel::ChannelHealth;
use co2::Co2Sensor;
use pressure::PressureSensor;
use voc::{Ambient, VocSensor};

/// One aggregated snapshot. A field is `None` when its channel reported
/// failure for this poll.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReadings {
    pub co2_ppm: Option<u16>,
    pub temperature_c: Option<f32>,
    pub temperature_f: Option<f32>,
    pub humidity_pct: Option<f32>,
    pub tvoc_ppb: Option<u16>,
    pub tvoc_mg_m3: Option<f32>,
    pub pressure_inhg: Option<f32>,
    pub altitude_m: Option<f32>,
    pub altitude_ft: Option<f32>,
}

/// Which channels came up at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    pub pressure: bool,
    pub co2: bool,
    pub voc: bool,
}

impl BootReport {
    pub fn all_online(&self) -> bool {
        self.pressure && self.co2 && self.voc
    }
}

/// Aggregates the three channel drivers.
pub struct SensorHub<PT, CT, B, VT, M: StorageMedium, D> {
    pub pressure: PressureSensor<PT, D>,
    pub co2: Co2Sensor<CT, B, D>,
    pub voc: VocSensor<VT, M, D>,
    init_attempts: u8,
}

impl<PT, CT, B, VT, M, D> SensorHub<PT, CT, B, VT, M, D>
where
    PT: PressureTransport,
    CT: Co2Transport,
    B: BusControl,
    VT: VocTransport,
    M: StorageMedium,
    D: DelayNs,
{
    /// Construct a hub from pre-built drivers.
    pub fn new(
        pressure: PressureSensor<PT, D>,
        co2: Co2Sensor<CT, B, D>,
        voc: VocSensor<VT, M, D>,
        init_attempts: u8,
    ) -> Self {
        Self {
            pressure,
            co2,
            voc,
            init_attempts,
        }
    }

    /// Initialise every channel and report progress on the boot page.
    ///
    /// A channel that fails to come up does not stop the others.
    pub fn begin<S: DisplaySink>(&mut self, display: &mut S) -> BootReport {
        let report = BootReport {
            pressure: self.pressure.begin(self.init_attempts),
            co2: self.co2.begin(self.init_attempts),
            voc: self.voc.begin(self.init_attempts),
        };

        report_line(display, "BMP280", report.pressure);
        report_line(display, "SCD41", report.co2);
        report_line(display, "SGP30", report.voc);
        if !self.voc.store().is_mounted() {
            display.boot_line("SD card: not mounted, baseline will not persist");
        }

        info!(
            "SensorHub: boot complete (BMP280={} SCD41={} SGP30={})",
            report.pressure, report.co2, report.voc
        );
        report
    }

    /// Poll every channel in bus order and return a unified snapshot.
    ///
    /// The SGP30 is compensated with the SCD41's temperature and humidity
    /// whenever the SCD41 has a value (fresh or cached).
    pub fn read_all(&mut self, now_ms: u32) -> SensorReadings {
        let pressure = self.pressure.read(now_ms).ok();
        let co2 = self.co2.read(now_ms).ok();
        let ambient = co2.map(|c| Ambient {
            temperature_c: c.temperature_c,
            humidity_pct: c.humidity_pct,
        });
        let voc = self.voc.read(now_ms, ambient).ok();

        SensorReadings {
            co2_ppm: co2.map(|c| c.co2_ppm),
            temperature_c: co2.map(|c| c.temperature_c),
            temperature_f: co2.map(|c| c.temperature_f()),
            humidity_pct: co2.map(|c| c.humidity_pct),
            tvoc_ppb: voc.map(|v| v.tvoc_ppb),
            tvoc_mg_m3: voc.map(|v| v.tvoc_mg_m3),
            pressure_inhg: pressure.map(|p| p.pressure_inhg),
            altitude_m: pressure.map(|p| p.altitude_m),
            altitude_ft: pressure.map(|p| p.altitude_ft),
        }
    }

    /// Per-channel health, labelled, in bus order.
    pub fn health(&self) -> [(&'static str, ChannelHealth); 3] {
        [
            ("BMP280", self.pressure.health()),
            ("SCD41", self.co2.health()),
            ("SGP30", self.voc.health()),
        ]
    }

    /// Log one health line per channel; unhealthy channels at `warn`.
    pub fn log_health(&self) {
        for (label, h) in self.health() {
            if h.connected && h.consecutive_errors == 0 {
                info!(
                    "{}: ok (last sample {:?} ms, recoveries {})",
                    label, h.last_sample_ms, h.recoveries
                );
            } else {
                warn!(
                    "{}: connected={} errors={} cached={} recoveries={}",
                    label, h.connected, h.consecutive_errors, h.has_reading, h.recoveries
                );
            }
        }
    }
}

fn report_line<S: DisplaySink>(display: &mut S, label: &str, online: bool) {
    let mut line: heapless::String<48> = heapless::String::new();
    let _ = write!(line, "{}: {}", label, if online { "online" } else { "not found" });
    display.boot_line(&line);
}
