//! Sensirion SCD41 CO2 / temperature / humidity channel.
//!
//! The SCD41 measures on its own 5 s cycle and exposes a data-ready flag,
//! so a fresh attempt may legitimately find nothing new. It is also the
//! sensor most prone to wedging the shared bus after a brown-out, so this
//! channel owns the bus-recovery procedure.
//!
//! ## Error escalation
//!
//! ```text
//!  transport error ──▶ count += 1 ──▶ count >= threshold?
//!                                          │ yes
//!                                          ▼
//!        release bus → 9×SCL → float lines → re-acquire bus
//!                                          │
//!                              handshake (single attempt)
//!                                          │
//!                                     count = 0
//! ```

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::app::ports::{BusControl, Co2Transport};
use crate::config::MonitorConfig;
use crate::error::SensorError;
use crate::sensors::channel::{Channel, ChannelHealth, PollStatus};
use crate::sensors::connection::RetryPolicy;
use crate::sensors::recovery::unwedge_bus;

const LABEL: &str = "SCD41";

/// Smoothed SCD41 output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2Reading {
    pub co2_ppm: u16,
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

impl Co2Reading {
    fn from_filtered([co2, temp_c, rh]: [f32; 3]) -> Self {
        Self {
            co2_ppm: co2.round().clamp(0.0, f32::from(u16::MAX)) as u16,
            temperature_c: temp_c,
            humidity_pct: rh,
        }
    }

    pub fn temperature_f(&self) -> f32 {
        self.temperature_c * 9.0 / 5.0 + 32.0
    }
}

/// SCD41 driver with fallback caching and bus recovery.
pub struct Co2Sensor<T, B, D> {
    transport: T,
    bus: B,
    delay: D,
    channel: Channel<3>,
    address: u8,
    retry: RetryPolicy,
    settle_ms: u32,
    error_threshold: u8,
    recovery_pulses: u8,
    recoveries: u32,
}

impl<T, B, D> Co2Sensor<T, B, D>
where
    T: Co2Transport,
    B: BusControl,
    D: DelayNs,
{
    pub fn new(transport: T, bus: B, delay: D, config: &MonitorConfig) -> Self {
        Self {
            transport,
            bus,
            delay,
            channel: Channel::new(config.co2_sample_interval_ms, config.co2_smoothing),
            address: config.co2_address,
            retry: config.retry_policy(),
            settle_ms: config.co2_settle_ms,
            error_threshold: config.bus_error_threshold,
            recovery_pulses: config.recovery_clock_pulses,
            recoveries: 0,
        }
    }

    /// Run the handshake up to `max_attempts` times.
    ///
    /// Cached readings survive: a reconnect after recovery resumes serving
    /// the last good value immediately.
    pub fn begin(&mut self, max_attempts: u8) -> bool {
        let policy = self.retry.with_attempts(max_attempts);
        let address = self.address;
        let settle_ms = self.settle_ms;
        let transport = &mut self.transport;

        let connected = policy.run(LABEL, &mut self.delay, |delay| {
            transport.begin(address)?;
            transport.stop_periodic_measurement()?;
            delay.delay_ms(settle_ms);
            transport.start_periodic_measurement()
        });
        self.channel.set_connected(connected);
        connected
    }

    /// Poll the sensor and return the freshest smoothed reading.
    ///
    /// A fresh bus read happens at most once per sample interval; between
    /// reads, and whenever a read fails, the cached value is returned.
    pub fn read(&mut self, now_ms: u32) -> Result<Co2Reading, SensorError> {
        let transport = &mut self.transport;
        let status = self.channel.poll(now_ms, || {
            if !transport.data_ready()? {
                return Ok(None);
            }
            let s = transport.read_measurement()?;
            Ok(Some([f32::from(s.co2_ppm), s.temperature_c, s.humidity_pct]))
        });

        if let PollStatus::Failed { error, consecutive } = status {
            warn!("{}: read failed ({}), {} in a row", LABEL, error, consecutive);
            if consecutive >= self.error_threshold {
                warn!("{}: too many consecutive errors, attempting I2C recovery", LABEL);
                self.recover_bus();
            }
        }

        self.channel.reading().map(Co2Reading::from_filtered)
    }

    /// Recover a wedged bus and reinitialise the sensor in place.
    ///
    /// The error counter is reset whatever the outcome so a sensor that
    /// stays dead does not trigger recovery on every poll.
    pub fn recover_bus(&mut self) -> bool {
        info!("{}: entering bus recovery", LABEL);
        self.recoveries = self.recoveries.saturating_add(1);

        unwedge_bus(&mut self.bus, &mut self.delay, self.recovery_pulses);
        let ok = self.begin(1);
        if ok {
            info!("{}: recovered I2C bus and re-initialised sensor", LABEL);
        } else {
            error!("{}: recovery failed, sensor remains disconnected", LABEL);
        }

        self.channel.reset_errors();
        ok
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    pub fn health(&self) -> ChannelHealth {
        ChannelHealth {
            recoveries: self.recoveries,
            ..self.channel.health()
        }
    }

    /// Completed recovery cycles since construction.
    pub fn recoveries(&self) -> u32 {
        self.recoveries
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}
