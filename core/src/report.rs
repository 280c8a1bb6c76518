//! Response bodies for the JSON endpoints

use core::fmt::Write;
use core::net::Ipv4Addr;

use heapless::String;
use serde::{Serialize, Serializer};

use crate::thermistor::TemperatureReading;

/// Status literal reported by a successful health check
pub const STATUS_OK: &str = "ok";

/// Platform identifier reported by the health check
pub const PLATFORM: &str = "rp2040";

/// Marker used when the device has no address
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// Longest dotted quad, "255.255.255.255"
const ADDRESS_TEXT_LEN: usize = 15;

/// Name and reading of one sensor
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SensorEntry {
    pub name: &'static str,
    #[serde(rename = "temperature_celsius", serialize_with = "serialize_reading")]
    pub reading: TemperatureReading,
}

/// Faults become an explicit `null`, values are rounded here and only here
fn serialize_reading<S: Serializer>(
    reading: &TemperatureReading,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match reading.presented() {
        Some(value) => serializer.serialize_some(&value),
        None => serializer.serialize_none(),
    }
}

/// Body of `/api/temps`
///
/// Always exactly two entries, T1 then T2.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SensorReport {
    pub sensors: [SensorEntry; 2],
}

impl SensorReport {
    pub fn entry(&self, name: &str) -> Option<&SensorEntry> {
        self.sensors.iter().find(|entry| entry.name == name)
    }
}

/// Body of `/api/health`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub platform: &'static str,
    pub ip: String<ADDRESS_TEXT_LEN>,
    /// Seconds since boot
    pub uptime: f64,
}

impl HealthReport {
    pub fn new(address: Option<Ipv4Addr>, uptime: f64) -> Self {
        Self {
            status: STATUS_OK,
            platform: PLATFORM,
            ip: address_text(address),
            uptime,
        }
    }
}

/// Dotted-quad text for an address, or the unknown marker
pub fn address_text(address: Option<Ipv4Addr>) -> String<ADDRESS_TEXT_LEN> {
    let mut text = String::new();
    // Both forms fit ADDRESS_TEXT_LEN, so the writes cannot overflow
    let _ = match address {
        Some(ip) => write!(text, "{}", ip),
        None => text.push_str(UNKNOWN_ADDRESS).map_err(|_| core::fmt::Error),
    };
    text
}

/// Body of every error response
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_json<T: Serialize>(value: &T) -> String<256> {
        serde_json_core::to_string(value).unwrap()
    }

    #[test]
    fn test_sensor_report_serialization() {
        let report = SensorReport {
            sensors: [
                SensorEntry {
                    name: "T1",
                    reading: TemperatureReading::Celsius(25.000682),
                },
                SensorEntry {
                    name: "T2",
                    reading: TemperatureReading::Fault,
                },
            ],
        };
        assert_eq!(
            to_json(&report).as_str(),
            r#"{"sensors":[{"name":"T1","temperature_celsius":25.0},{"name":"T2","temperature_celsius":null}]}"#
        );
    }

    #[test]
    fn test_reading_is_rounded_on_serialization() {
        let entry = SensorEntry {
            name: "T1",
            reading: TemperatureReading::Celsius(-12.3456),
        };
        assert_eq!(
            to_json(&entry).as_str(),
            r#"{"name":"T1","temperature_celsius":-12.35}"#
        );
    }

    #[test]
    fn test_health_report_serialization() {
        let report = HealthReport::new(Some(Ipv4Addr::new(192, 168, 1, 42)), 12.5);
        assert_eq!(
            to_json(&report).as_str(),
            r#"{"status":"ok","platform":"rp2040","ip":"192.168.1.42","uptime":12.5}"#
        );
    }

    #[test]
    fn test_address_text() {
        assert_eq!(address_text(None).as_str(), "unknown");
        assert_eq!(
            address_text(Some(Ipv4Addr::new(255, 255, 255, 255))).as_str(),
            "255.255.255.255"
        );
        assert_eq!(address_text(Some(Ipv4Addr::new(10, 0, 0, 7))).as_str(), "10.0.0.7");
    }

    #[test]
    fn test_error_body() {
        assert_eq!(
            to_json(&ErrorBody { error: "not found" }).as_str(),
            r#"{"error":"not found"}"#
        );
    }
}
