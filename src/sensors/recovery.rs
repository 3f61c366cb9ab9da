//! I²C bus recovery.
//!
//! A peripheral reset mid-read can be left holding SDA low, waiting for
//! clocks that never come; every controller transaction then fails. Nine
//! SCL pulses are enough to clock out any partial byte plus the ACK slot,
//! after which the peripheral releases SDA and the bus is idle again.
//!
//! This module performs the bus-level part only (steps 1–3). Re-running
//! the sensor handshake and resetting the error counter is the driver's
//! job, since only it knows how to talk to its sensor.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::ports::BusControl;

/// Clock pulses needed to flush one byte plus the ACK bit.
pub const RECOVERY_CLOCK_PULSES: u8 = 9;

/// Half-period of a recovery pulse (≈100 kHz).
const HALF_PERIOD_US: u32 = 5;

/// Release the bus session, clock out a stuck peripheral, float both lines
/// and re-acquire the session. Every step completes before the next.
pub fn unwedge_bus<B, D>(bus: &mut B, delay: &mut D, pulses: u8)
where
    B: BusControl,
    D: DelayNs,
{
    bus.release_bus();

    for _ in 0..pulses {
        bus.drive_clock(false);
        delay.delay_us(HALF_PERIOD_US);
        bus.drive_clock(true);
        delay.delay_us(HALF_PERIOD_US);
    }
    bus.float_lines();
    debug!("bus recovery: {} clock pulses sent, lines released", pulses);

    bus.acquire_bus();
}
