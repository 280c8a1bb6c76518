//! Raw sample to temperature conversion
//!
//! `convert` is a pure function: the same sample and parameters always give
//! a bit-identical result. Readings are kept at full precision and only
//! rounded when presented.

use hal_abstractions::RawSample;

use crate::calibration::{CalibrationParameters, SAMPLE_FULL_SCALE};

/// Readings are presented with two decimal places
const PRESENTATION_SCALE: f64 = 100.0;

/// Result of one conversion
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TemperatureReading {
    /// Finite temperature in Celsius, full precision
    Celsius(f64),
    /// Sensor disconnected, shorted, or otherwise outside the physical range
    Fault,
}

impl TemperatureReading {
    /// Wrap a computed value, marking non-finite results as faults
    fn from_computed(celsius: f64) -> Self {
        if celsius.is_finite() {
            Self::Celsius(celsius)
        } else {
            Self::Fault
        }
    }

    /// Full-precision value, `None` for a fault
    pub fn celsius(&self) -> Option<f64> {
        match *self {
            Self::Celsius(value) => Some(value),
            Self::Fault => None,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault)
    }

    /// Value rounded to two decimals, `None` for a fault
    pub fn presented(&self) -> Option<f64> {
        self.celsius()
            .map(|value| libm::round(value * PRESENTATION_SCALE) / PRESENTATION_SCALE)
    }
}

/// Convert a raw divider sample into a temperature
///
/// A voltage at either rail means an open or shorted circuit and yields
/// [`TemperatureReading::Fault`] before any division or logarithm.
pub fn convert(raw: RawSample, params: &CalibrationParameters) -> TemperatureReading {
    let voltage = raw as f64 * params.supply_voltage / SAMPLE_FULL_SCALE;
    if voltage <= 0.0 || voltage >= params.supply_voltage {
        return TemperatureReading::Fault;
    }

    let resistance = params.resistance_at(voltage);
    TemperatureReading::from_computed(params.celsius_at(resistance))
}
