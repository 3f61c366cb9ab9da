//! Bosch BMP280 barometric pressure / altitude channel.
//!
//! Three quantities are smoothed independently: pressure (inHg), altitude
//! (m) and altitude (ft). Feet are derived from the *raw* metre value
//! before smoothing, so the two altitude outputs never compound each
//! other's rounding.

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::app::ports::PressureTransport;
use crate::config::MonitorConfig;
use crate::error::{SensorError, TransportError};
use crate::sensors::channel::{Channel, ChannelHealth, PollStatus};
use crate::sensors::connection::RetryPolicy;

const LABEL: &str = "BMP280";

pub const PA_PER_INHG: f32 = 3386.39;
pub const FEET_PER_METER: f32 = 3.28084;

/// Smoothed BMP280 output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureReading {
    pub pressure_inhg: f32,
    pub altitude_m: f32,
    pub altitude_ft: f32,
}

impl PressureReading {
    fn from_filtered([pressure_inhg, altitude_m, altitude_ft]: [f32; 3]) -> Self {
        Self {
            pressure_inhg,
            altitude_m,
            altitude_ft,
        }
    }
}

pub struct PressureSensor<T, D> {
    transport: T,
    delay: D,
    channel: Channel<3>,
    address: u8,
    retry: RetryPolicy,
    sea_level_hpa: f32,
}

impl<T, D> PressureSensor<T, D>
where
    T: PressureTransport,
    D: DelayNs,
{
    pub fn new(transport: T, delay: D, config: &MonitorConfig) -> Self {
        Self {
            transport,
            delay,
            channel: Channel::new(
                config.pressure_sample_interval_ms,
                config.pressure_smoothing,
            ),
            address: config.pressure_address,
            retry: config.retry_policy(),
            sea_level_hpa: config.sea_level_hpa,
        }
    }

    pub fn begin(&mut self, max_attempts: u8) -> bool {
        let policy = self.retry.with_attempts(max_attempts);
        let address = self.address;
        let transport = &mut self.transport;
        let connected = policy.run(LABEL, &mut self.delay, |_| transport.begin(address));
        self.channel.set_connected(connected);
        connected
    }

    pub fn read(&mut self, now_ms: u32) -> Result<PressureReading, SensorError> {
        let transport = &mut self.transport;
        let sea_level_hpa = self.sea_level_hpa;
        let status = self.channel.poll(now_ms, || {
            let pa = transport.read_pressure_pa()?;
            if pa <= 0.0 || !pa.is_finite() {
                return Err(TransportError::OutOfRange);
            }
            let alt_m = transport.read_altitude_m(sea_level_hpa)?;
            Ok(Some([pa / PA_PER_INHG, alt_m, alt_m * FEET_PER_METER]))
        });

        if let PollStatus::Failed { error, consecutive } = status {
            warn!("{}: read failed ({}), {} in a row", LABEL, error, consecutive);
        }

        self.channel.reading().map(PressureReading::from_filtered)
    }

    /// Change the altitude reference (e.g. from a local weather report).
    pub fn set_sea_level_hpa(&mut self, hpa: f32) {
        self.sea_level_hpa = hpa;
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    pub fn health(&self) -> ChannelHealth {
        self.channel.health()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
