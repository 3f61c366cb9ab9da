//! Integration tests for the SensorHub: boot reporting and unified
//! snapshots across all three channels.

use crate::mock_hw::{MemStorage, MockBus, MockCo2, MockDelay, MockDisplay, MockPressure, MockVoc};

use aqmon::app::ports::DisplaySink;
use aqmon::config::MonitorConfig;
use aqmon::sensors::SensorHub;
use aqmon::sensors::co2::Co2Sensor;
use aqmon::sensors::pressure::PressureSensor;
use aqmon::sensors::voc::VocSensor;

type TestHub = SensorHub<MockPressure, MockCo2, MockBus, MockVoc, MemStorage, MockDelay>;

fn make_hub(pressure: MockPressure, co2: MockCo2, voc: MockVoc, storage: MemStorage) -> TestHub {
    let config = MonitorConfig::default();
    let delay = MockDelay::new();
    SensorHub::new(
        PressureSensor::new(pressure, delay.clone(), &config),
        Co2Sensor::new(co2, MockBus::new(), delay.clone(), &config),
        VocSensor::new(voc, storage, delay, &config),
        config.init_attempts,
    )
}

fn all_present() -> TestHub {
    let mut co2 = MockCo2::new(true);
    co2.queue_sample(415, 21.0, 50.0);
    let mut voc = MockVoc::new(true);
    voc.tvoc_ppb = 42;
    make_hub(MockPressure::new(true), co2, voc, MemStorage::new())
}

#[test]
fn boot_reports_every_channel() {
    let mut hub = all_present();
    let mut display = MockDisplay::new();

    let report = hub.begin(&mut display);

    assert!(report.all_online());
    assert_eq!(
        display.boot_lines,
        vec!["BMP280: online", "SCD41: online", "SGP30: online"]
    );
}

#[test]
fn missing_sensor_does_not_block_the_others() {
    let mut hub = make_hub(
        MockPressure::new(true),
        MockCo2::new(false),
        MockVoc::new(true),
        MemStorage::new(),
    );
    let mut display = MockDisplay::new();

    let report = hub.begin(&mut display);

    assert!(report.pressure && report.voc);
    assert!(!report.co2);
    assert!(display.boot_lines.contains(&"SCD41: not found".to_string()));

    let snap = hub.read_all(0);
    assert!(snap.co2_ppm.is_none());
    assert!(snap.temperature_c.is_none());
    assert!(snap.tvoc_ppb.is_some());
    assert!(snap.pressure_inhg.is_some());
}

#[test]
fn unmounted_storage_is_reported_on_boot() {
    let mut hub = make_hub(
        MockPressure::new(true),
        MockCo2::new(true),
        MockVoc::new(true),
        MemStorage::unmountable(),
    );
    let mut display = MockDisplay::new();

    let report = hub.begin(&mut display);

    assert!(report.all_online());
    assert_eq!(display.boot_lines.len(), 4);
    assert!(display.boot_lines[3].starts_with("SD card"));
}

#[test]
fn snapshot_carries_all_quantities() {
    let mut hub = all_present();
    hub.begin(&mut MockDisplay::new());

    let snap = hub.read_all(0);

    assert_eq!(snap.co2_ppm, Some(415));
    assert_eq!(snap.temperature_c, Some(21.0));
    assert!((snap.temperature_f.unwrap() - 69.8).abs() < 1e-3);
    assert_eq!(snap.humidity_pct, Some(50.0));
    assert_eq!(snap.tvoc_ppb, Some(42));
    assert!(snap.pressure_inhg.is_some());
    assert!(snap.altitude_m.is_some());
    assert!(snap.altitude_ft.is_some());
}

#[test]
fn voc_is_compensated_with_co2_ambient() {
    let mut hub = all_present();
    hub.begin(&mut MockDisplay::new());

    hub.read_all(0);

    assert_eq!(hub.voc.transport_mut().humidity_writes.len(), 1);
}

#[test]
fn snapshots_render_to_display() {
    let mut hub = all_present();
    let mut display = MockDisplay::new();
    hub.begin(&mut display);

    for t in [0, 1_000, 2_000] {
        let snap = hub.read_all(t);
        display.render(&snap);
    }

    assert_eq!(display.frames.len(), 3);
    // CO2 sampled once; later frames show the cached value.
    assert!(display.frames.iter().all(|f| f.co2_ppm == Some(415)));
}

#[test]
fn health_lists_channels_in_bus_order() {
    let mut hub = make_hub(
        MockPressure::new(true),
        MockCo2::new(false),
        MockVoc::new(true),
        MemStorage::new(),
    );
    hub.begin(&mut MockDisplay::new());
    hub.read_all(0);
    hub.log_health();

    let health = hub.health();
    let labels: Vec<_> = health.iter().map(|(l, _)| *l).collect();
    assert_eq!(labels, ["BMP280", "SCD41", "SGP30"]);
    assert!(health[0].1.has_reading);
    assert!(!health[1].1.connected);
    assert_eq!(health[2].1.last_sample_ms, Some(0));
}
