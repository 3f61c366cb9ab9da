//! Sensirion SGP30 total-VOC channel.
//!
//! Reads are humidity-compensated from the SCD41's temperature and
//! humidity when those are available. The SGP30's learned baseline is
//! restored from storage at boot and snapshotted back once per
//! `baseline_save_interval_ms`, on its own timer independent of sampling.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::{StorageMedium, VocTransport};
use crate::config::MonitorConfig;
use crate::error::SensorError;
use crate::sensors::baseline::BaselineStore;
use crate::sensors::channel::{Channel, ChannelHealth, PollStatus};
use crate::sensors::connection::RetryPolicy;
use crate::sensors::schedule::IntervalGate;

const LABEL: &str = "SGP30";

/// mg/m³ per ppb for a VOC mixture with molar weight ≈ 100 g/mol.
pub const MG_M3_PER_PPB: f32 = 0.00409;

/// Largest absolute humidity the SGP30 compensation register accepts.
pub const MAX_ABS_HUMIDITY_MG_M3: u32 = 256_000;

/// Ambient conditions used for humidity compensation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ambient {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Absolute humidity in mg/m³ from temperature and relative humidity
/// (Magnus approximation), clamped to the sensor's accepted range.
pub fn absolute_humidity_mg_m3(temperature_c: f32, humidity_pct: f32) -> u32 {
    let t_k = temperature_c + 273.15;
    let svp_hpa = 6.112 * ((17.62 * temperature_c) / (243.12 + temperature_c)).exp();
    let ah_g_m3 = 216.7 * (humidity_pct / 100.0) * svp_hpa / t_k;
    let mg = (ah_g_m3 * 1000.0).max(0.0);
    (mg as u32).min(MAX_ABS_HUMIDITY_MG_M3)
}

/// Smoothed SGP30 output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VocReading {
    pub tvoc_ppb: u16,
    pub tvoc_mg_m3: f32,
}

impl VocReading {
    fn from_filtered([ppb, mg]: [f32; 2]) -> Self {
        Self {
            tvoc_ppb: ppb.round().clamp(0.0, f32::from(u16::MAX)) as u16,
            tvoc_mg_m3: mg,
        }
    }
}

/// SGP30 driver with baseline persistence.
pub struct VocSensor<T, M: StorageMedium, D> {
    transport: T,
    delay: D,
    store: BaselineStore<M>,
    channel: Channel<2>,
    baseline_gate: IntervalGate,
    address: u8,
    retry: RetryPolicy,
}

impl<T, M, D> VocSensor<T, M, D>
where
    T: VocTransport,
    M: StorageMedium,
    D: DelayNs,
{
    pub fn new(transport: T, medium: M, delay: D, config: &MonitorConfig) -> Self {
        Self {
            transport,
            delay,
            store: BaselineStore::new(medium, &config.baseline_file),
            channel: Channel::new(config.voc_sample_interval_ms, config.voc_smoothing),
            baseline_gate: IntervalGate::deferred(config.baseline_save_interval_ms),
            address: config.voc_address,
            retry: config.retry_policy(),
        }
    }

    /// Mount storage (first call only), then run the handshake up to
    /// `max_attempts` times. On success, IAQ learning is started and any
    /// persisted baseline is applied.
    ///
    /// Storage failure never fails initialisation.
    pub fn begin(&mut self, max_attempts: u8) -> bool {
        let storage_ok = self.store.mount();

        let policy = self.retry.with_attempts(max_attempts);
        let address = self.address;
        let transport = &mut self.transport;
        let connected = policy.run(LABEL, &mut self.delay, |_| {
            transport.begin(address)?;
            transport.iaq_init()
        });
        self.channel.set_connected(connected);

        if connected && storage_ok {
            self.restore_baseline();
        }
        connected
    }

    fn restore_baseline(&mut self) {
        let Some(baseline) = self.store.load() else {
            info!("{}: no stored baseline, learning from scratch", LABEL);
            return;
        };
        match self.transport.set_iaq_baseline(baseline) {
            Ok(()) => info!(
                "{}: baseline applied  eCO2={}  TVOC={}",
                LABEL, baseline.eco2, baseline.tvoc
            ),
            Err(e) => warn!("{}: could not apply stored baseline: {}", LABEL, e),
        }
    }

    /// Poll the sensor and return the freshest smoothed reading.
    ///
    /// `ambient` (typically from the SCD41) enables humidity compensation
    /// for this measurement; `None` measures uncompensated.
    pub fn read(
        &mut self,
        now_ms: u32,
        ambient: Option<Ambient>,
    ) -> Result<VocReading, SensorError> {
        let transport = &mut self.transport;
        let status = self.channel.poll(now_ms, || {
            if let Some(a) = ambient {
                let ah = absolute_humidity_mg_m3(a.temperature_c, a.humidity_pct);
                if let Err(e) = transport.set_absolute_humidity(ah) {
                    warn!("{}: humidity compensation not applied: {}", LABEL, e);
                }
            }
            let sample = transport.measure_iaq()?;
            let ppb = f32::from(sample.tvoc_ppb);
            Ok(Some([ppb, ppb * MG_M3_PER_PPB]))
        });

        match status {
            PollStatus::Fresh => self.maybe_save_baseline(now_ms),
            PollStatus::Failed { error, consecutive } => {
                warn!("{}: measurement failed ({}), {} in a row", LABEL, error, consecutive);
            }
            _ => {}
        }

        self.channel.reading().map(VocReading::from_filtered)
    }

    /// Snapshot the baseline if its interval has elapsed. The timer restarts
    /// whether or not the save succeeds.
    fn maybe_save_baseline(&mut self, now_ms: u32) {
        if !self.baseline_gate.claim(now_ms) || !self.store.is_mounted() {
            return;
        }
        match self.transport.get_iaq_baseline() {
            // Failure is logged inside the store and never propagates.
            Ok(baseline) => {
                let _ = self.store.save(baseline);
            }
            Err(e) => warn!("{}: could not read baseline for saving: {}", LABEL, e),
        }
    }

    /// One uncompensated measurement straight from the sensor, bypassing
    /// the sample gate, the filter and the cache.
    pub fn measure_raw_ppb(&mut self) -> Result<u16, SensorError> {
        if !self.channel.is_connected() {
            return Err(SensorError::NotConnected);
        }
        self.transport
            .measure_iaq()
            .map(|s| s.tvoc_ppb)
            .map_err(SensorError::from)
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

    pub fn store(&self) -> &BaselineStore<M> {
        &self.store
    }
}
