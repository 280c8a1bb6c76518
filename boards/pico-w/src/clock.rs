#![deny(unsafe_code)]
#![deny(warnings)]
//! Uptime from the embassy-time driver

use embassy_time::Instant;
use hal_abstractions::UptimeClock;

/// Monotonic uptime backed by the RP2040 TIMER peripheral
///
/// `Instant` counts from boot, so no start time needs to be captured.
#[derive(Clone, Copy, Debug, Default)]
pub struct BootClock;

impl UptimeClock for BootClock {
    fn uptime_micros(&self) -> u64 {
        Instant::now().as_micros()
    }
}
