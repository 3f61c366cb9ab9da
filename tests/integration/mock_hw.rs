//! Mock sensor transports, bus, storage and display for integration tests.
//!
//! Each transport is scripted with per-call queues; when a queue runs dry
//! the mock falls back to its steady-state behaviour (`present` decides
//! whether the device ACKs). Every call is counted so tests can assert on
//! the exact bus traffic without touching real I²C.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use aqmon::app::ports::{
    BaselineRecord, BusControl, Co2Sample, Co2Transport, DisplaySink, IaqSample,
    PressureTransport, StorageMedium, VocTransport,
};
use aqmon::error::{StorageError, TransportError};
use aqmon::sensors::SensorReadings;
use embedded_hal::delay::DelayNs;

// ── Delay ─────────────────────────────────────────────────────

/// Accumulates requested delay instead of sleeping. Clones share the
/// same counter so the hub's drivers can all report into one total.
#[derive(Clone, Default)]
pub struct MockDelay {
    elapsed_ns: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns.get() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ns));
    }
}

// ── SCD41 ─────────────────────────────────────────────────────

pub struct MockCo2 {
    pub present: bool,
    pub ready_script: VecDeque<Result<bool, TransportError>>,
    pub samples: VecDeque<Co2Sample>,
    pub begin_calls: u32,
    pub start_calls: u32,
    pub stop_calls: u32,
    pub read_calls: u32,
}

#[allow(dead_code)]
impl MockCo2 {
    pub fn new(present: bool) -> Self {
        Self {
            present,
            ready_script: VecDeque::new(),
            samples: VecDeque::new(),
            begin_calls: 0,
            start_calls: 0,
            stop_calls: 0,
            read_calls: 0,
        }
    }

    pub fn queue_sample(&mut self, co2_ppm: u16, temperature_c: f32, humidity_pct: f32) {
        self.samples.push_back(Co2Sample {
            co2_ppm,
            temperature_c,
            humidity_pct,
        });
    }

    /// The next `n` data-ready checks fail with `error`.
    pub fn queue_failures(&mut self, n: usize, error: TransportError) {
        for _ in 0..n {
            self.ready_script.push_back(Err(error));
        }
    }

    fn ack(&self) -> Result<(), TransportError> {
        if self.present {
            Ok(())
        } else {
            Err(TransportError::Nack)
        }
    }
}

impl Co2Transport for MockCo2 {
    fn begin(&mut self, _address: u8) -> Result<(), TransportError> {
        self.begin_calls += 1;
        self.ack()
    }

    fn stop_periodic_measurement(&mut self) -> Result<(), TransportError> {
        self.stop_calls += 1;
        self.ack()
    }

    fn start_periodic_measurement(&mut self) -> Result<(), TransportError> {
        self.start_calls += 1;
        self.ack()
    }

    fn data_ready(&mut self) -> Result<bool, TransportError> {
        if let Some(r) = self.ready_script.pop_front() {
            return r;
        }
        self.ack()?;
        Ok(!self.samples.is_empty())
    }

    fn read_measurement(&mut self) -> Result<Co2Sample, TransportError> {
        self.read_calls += 1;
        self.samples.pop_front().ok_or(TransportError::Bus)
    }
}

// ── SGP30 ─────────────────────────────────────────────────────

pub struct MockVoc {
    pub present: bool,
    pub tvoc_ppb: u16,
    pub measure_script: VecDeque<Result<IaqSample, TransportError>>,
    /// What `get_iaq_baseline` reports.
    pub device_baseline: BaselineRecord,
    /// Last baseline written by `set_iaq_baseline`.
    pub applied_baseline: Option<BaselineRecord>,
    pub humidity_writes: Vec<u32>,
    pub iaq_init_calls: u32,
    pub measure_calls: u32,
}

#[allow(dead_code)]
impl MockVoc {
    pub fn new(present: bool) -> Self {
        Self {
            present,
            tvoc_ppb: 0,
            measure_script: VecDeque::new(),
            device_baseline: BaselineRecord {
                eco2: 0x8000,
                tvoc: 0x8100,
            },
            applied_baseline: None,
            humidity_writes: Vec::new(),
            iaq_init_calls: 0,
            measure_calls: 0,
        }
    }

    fn ack(&self) -> Result<(), TransportError> {
        if self.present {
            Ok(())
        } else {
            Err(TransportError::Nack)
        }
    }
}

impl VocTransport for MockVoc {
    fn begin(&mut self, _address: u8) -> Result<(), TransportError> {
        self.ack()
    }

    fn iaq_init(&mut self) -> Result<(), TransportError> {
        self.iaq_init_calls += 1;
        self.ack()
    }

    fn set_iaq_baseline(&mut self, baseline: BaselineRecord) -> Result<(), TransportError> {
        self.ack()?;
        self.applied_baseline = Some(baseline);
        Ok(())
    }

    fn get_iaq_baseline(&mut self) -> Result<BaselineRecord, TransportError> {
        self.ack()?;
        Ok(self.device_baseline)
    }

    fn set_absolute_humidity(&mut self, mg_per_m3: u32) -> Result<(), TransportError> {
        self.ack()?;
        self.humidity_writes.push(mg_per_m3);
        Ok(())
    }

    fn measure_iaq(&mut self) -> Result<IaqSample, TransportError> {
        self.measure_calls += 1;
        if let Some(r) = self.measure_script.pop_front() {
            return r;
        }
        self.ack()?;
        Ok(IaqSample {
            tvoc_ppb: self.tvoc_ppb,
            eco2_ppm: 400,
        })
    }
}

// ── BMP280 ────────────────────────────────────────────────────

pub struct MockPressure {
    pub present: bool,
    pub pressure_pa: f32,
    pub altitude_m: f32,
    pub pa_script: VecDeque<Result<f32, TransportError>>,
    pub last_sea_level_hpa: Option<f32>,
}

#[allow(dead_code)]
impl MockPressure {
    pub fn new(present: bool) -> Self {
        Self {
            present,
            pressure_pa: 101_325.0,
            altitude_m: 0.0,
            pa_script: VecDeque::new(),
            last_sea_level_hpa: None,
        }
    }
}

impl PressureTransport for MockPressure {
    fn begin(&mut self, _address: u8) -> Result<(), TransportError> {
        if self.present {
            Ok(())
        } else {
            Err(TransportError::Nack)
        }
    }

    fn read_pressure_pa(&mut self) -> Result<f32, TransportError> {
        if let Some(r) = self.pa_script.pop_front() {
            return r;
        }
        Ok(self.pressure_pa)
    }

    fn read_altitude_m(&mut self, sea_level_hpa: f32) -> Result<f32, TransportError> {
        self.last_sea_level_hpa = Some(sea_level_hpa);
        Ok(self.altitude_m)
    }
}

// ── Bus control ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Release,
    Clock(bool),
    Float,
    Acquire,
}

#[derive(Default)]
pub struct MockBus {
    pub ops: Vec<BusOp>,
}

#[allow(dead_code)]
impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rising_edges(&self) -> usize {
        self.ops.iter().filter(|op| **op == BusOp::Clock(true)).count()
    }
}

impl BusControl for MockBus {
    fn release_bus(&mut self) {
        self.ops.push(BusOp::Release);
    }

    fn drive_clock(&mut self, high: bool) {
        self.ops.push(BusOp::Clock(high));
    }

    fn float_lines(&mut self) {
        self.ops.push(BusOp::Float);
    }

    fn acquire_bus(&mut self) {
        self.ops.push(BusOp::Acquire);
    }
}

// ── Storage ───────────────────────────────────────────────────

pub struct MemStorage {
    pub files: HashMap<String, String>,
    pub mount_ok: bool,
    pub fail_writes: bool,
    pub mount_calls: u32,
    pub writes: u32,
}

#[allow(dead_code)]
impl MemStorage {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            mount_ok: true,
            fail_writes: false,
            mount_calls: 0,
            writes: 0,
        }
    }

    pub fn unmountable() -> Self {
        Self {
            mount_ok: false,
            ..Self::new()
        }
    }

    pub fn with_file(name: &str, contents: &str) -> Self {
        let mut s = Self::new();
        s.files.insert(name.to_string(), contents.to_string());
        s
    }

    pub fn file(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }
}

impl StorageMedium for MemStorage {
    fn mount(&mut self) -> Result<(), StorageError> {
        self.mount_calls += 1;
        if self.mount_ok {
            Ok(())
        } else {
            Err(StorageError::NotMounted)
        }
    }

    fn read(&mut self, file: &str) -> Result<Option<String>, StorageError> {
        Ok(self.files.get(file).cloned())
    }

    fn overwrite(&mut self, file: &str, contents: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io);
        }
        self.writes += 1;
        self.files.insert(file.to_string(), contents.to_string());
        Ok(())
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub boot_lines: Vec<String>,
    pub frames: Vec<SensorReadings>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for MockDisplay {
    fn boot_line(&mut self, message: &str) {
        self.boot_lines.push(message.to_string());
    }

    fn render(&mut self, readings: &SensorReadings) {
        self.frames.push(*readings);
    }
}
