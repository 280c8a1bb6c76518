//! Endpoint handlers
//!
//! Each handler owns or borrows exactly the collaborators it needs. Nothing
//! here caches state between requests: every call reads the sensors, the
//! address and the clock fresh.

use hal_abstractions::{AddressSource, AnalogBank, AnalogChannel, UptimeClock};

use crate::calibration::CalibrationParameters;
use crate::report::{HealthReport, SensorEntry, SensorReport};
use crate::thermistor::{convert, TemperatureReading};

/// Reported sensor names and the analog channels they are wired to, in
/// response order
pub const SENSOR_CHANNELS: [(&str, AnalogChannel); 2] =
    [("T1", AnalogChannel::A0), ("T2", AnalogChannel::A1)];

/// Telemetry context: owns the calibration, borrows the analog bank
pub struct SensorContext<'a, B: AnalogBank> {
    calibration: CalibrationParameters,
    bank: &'a mut B,
}

impl<'a, B: AnalogBank> SensorContext<'a, B> {
    pub fn new(calibration: CalibrationParameters, bank: &'a mut B) -> Self {
        Self { calibration, bank }
    }

    pub fn calibration(&self) -> &CalibrationParameters {
        &self.calibration
    }

    /// Read and convert one channel
    ///
    /// A failed read is a single failed attempt and reports as a fault.
    pub async fn read(&mut self, name: &str, channel: AnalogChannel) -> TemperatureReading {
        match self.bank.read(channel).await {
            Ok(raw) => {
                let reading = convert(raw, &self.calibration);
                trace!("{}: raw {} -> {:?}", name, raw, reading);
                reading
            }
            Err(e) => {
                warn!("{}: analog read failed: {:?}", name, e);
                TemperatureReading::Fault
            }
        }
    }

    /// Build the `/api/temps` report, T1 first then T2
    pub async fn telemetry(&mut self) -> SensorReport {
        let (t1_name, t1_channel) = SENSOR_CHANNELS[0];
        let (t2_name, t2_channel) = SENSOR_CHANNELS[1];

        let t1 = self.read(t1_name, t1_channel).await;
        let t2 = self.read(t2_name, t2_channel).await;

        SensorReport {
            sensors: [
                SensorEntry {
                    name: t1_name,
                    reading: t1,
                },
                SensorEntry {
                    name: t2_name,
                    reading: t2,
                },
            ],
        }
    }
}

/// Health context: borrows the network and clock collaborators
pub struct HealthContext<'a, N: AddressSource, C: UptimeClock> {
    network: &'a N,
    clock: &'a C,
}

impl<'a, N: AddressSource, C: UptimeClock> HealthContext<'a, N, C> {
    pub fn new(network: &'a N, clock: &'a C) -> Self {
        Self { network, clock }
    }

    /// Build the `/api/health` report
    ///
    /// Never fails; a missing address is reported as "unknown".
    pub fn report(&self) -> HealthReport {
        let address = self.network.ipv4_address();
        if address.is_none() {
            debug!("health: no IPv4 address");
        }
        HealthReport::new(address, self.clock.uptime_secs())
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::*;
    use super::*;
    use core::net::Ipv4Addr;
    use embassy_futures::block_on;
    use hal_abstractions::AnalogError;

    #[test]
    fn test_telemetry_order_and_values() {
        let mut bank = FixedBank::new(Ok(32768), Ok(0));
        let mut ctx = SensorContext::new(CalibrationParameters::default(), &mut bank);
        let report = block_on(ctx.telemetry());

        assert_eq!(report.sensors[0].name, "T1");
        assert_eq!(report.sensors[1].name, "T2");
        assert_eq!(report.sensors[0].reading.presented(), Some(25.0));
        assert!(report.sensors[1].reading.is_fault());
        assert_eq!(bank.reads.as_slice(), &[AnalogChannel::A0, AnalogChannel::A1]);
    }

    #[test]
    fn test_telemetry_both_faulted_is_well_formed() {
        let mut bank = FixedBank::new(Ok(u16::MAX), Err(AnalogError::Timeout));
        let mut ctx = SensorContext::new(CalibrationParameters::default(), &mut bank);
        let report = block_on(ctx.telemetry());

        assert_eq!(report.sensors.len(), 2);
        assert!(report.entry("T1").unwrap().reading.is_fault());
        assert!(report.entry("T2").unwrap().reading.is_fault());
    }

    #[test]
    fn test_read_failure_is_fault() {
        let mut bank = FixedBank::new(Err(AnalogError::Hardware), Ok(30_000));
        let mut ctx = SensorContext::new(CalibrationParameters::default(), &mut bank);
        let report = block_on(ctx.telemetry());

        assert!(report.sensors[0].reading.is_fault());
        assert!(report.sensors[1].reading.celsius().is_some());
    }

    #[test]
    fn test_telemetry_reads_fresh_each_call() {
        let mut bank = FixedBank::new(Ok(32768), Ok(32768));
        let mut ctx = SensorContext::new(CalibrationParameters::default(), &mut bank);
        block_on(ctx.telemetry());
        block_on(ctx.telemetry());
        assert_eq!(bank.reads.len(), 4);
    }

    #[test]
    fn test_health_with_address() {
        let network = FixedAddress(Some(Ipv4Addr::new(192, 168, 4, 20)));
        let clock = SteppingClock::starting_at(1_500_000);
        let report = HealthContext::new(&network, &clock).report();

        assert_eq!(report.status, "ok");
        assert_eq!(report.platform, "rp2040");
        assert_eq!(report.ip.as_str(), "192.168.4.20");
        assert_eq!(report.uptime, 1.5);
    }

    #[test]
    fn test_health_without_address_is_still_ok() {
        let network = FixedAddress(None);
        let clock = SteppingClock::starting_at(0);
        let report = HealthContext::new(&network, &clock).report();

        assert_eq!(report.status, "ok");
        assert_eq!(report.ip.as_str(), "unknown");
    }

    #[test]
    fn test_health_queries_clock_fresh() {
        let network = FixedAddress(None);
        let clock = SteppingClock::starting_at(0);
        let health = HealthContext::new(&network, &clock);

        let first = health.report().uptime;
        let second = health.report().uptime;
        assert!(second > first);
    }
}
