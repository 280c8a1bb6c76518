//! Monotonic uptime clock

/// Monotonic clock counting from process start
pub trait UptimeClock {
    /// Microseconds elapsed since boot
    fn uptime_micros(&self) -> u64;

    /// Seconds elapsed since boot, with sub-second precision
    fn uptime_secs(&self) -> f64 {
        self.uptime_micros() as f64 / 1_000_000.0
    }
}
