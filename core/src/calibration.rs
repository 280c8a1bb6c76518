//! Thermistor calibration parameters
//!
//! Describes the divider circuit and the NTC thermistor's beta model. One
//! instance is fixed at startup and never mutated.

/// Full-scale value of a [`RawSample`](hal_abstractions::RawSample)
pub const SAMPLE_FULL_SCALE: f64 = 65535.0;

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// Which leg of the voltage divider the thermistor sits on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DividerTopology {
    /// Thermistor between supply and the ADC pin, series resistor to ground
    ThermistorHigh,
    /// Series resistor between supply and the ADC pin, thermistor to ground
    ThermistorLow,
}

/// Calibration for a thermistor read through a voltage divider
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationParameters {
    /// Divider supply voltage, also the ADC reference (volts)
    pub supply_voltage: f64,
    /// Fixed resistor in the divider (ohms)
    pub series_resistor_ohms: f64,
    /// Thermistor resistance at the reference temperature (ohms)
    pub reference_resistance_ohms: f64,
    /// Reference temperature (kelvin)
    pub reference_temperature_kelvin: f64,
    /// Beta coefficient of the thermistor (kelvin)
    pub beta: f64,
    /// Divider wiring
    pub topology: DividerTopology,
}

impl CalibrationParameters {
    /// 100k NTC, B = 3950, on a 3.3 V divider with a 100k series resistor
    pub const NTC_100K_3950: Self = Self {
        supply_voltage: 3.3,
        series_resistor_ohms: 100_000.0,
        reference_resistance_ohms: 100_000.0,
        reference_temperature_kelvin: 25.0 + KELVIN_OFFSET,
        beta: 3950.0,
        topology: DividerTopology::ThermistorHigh,
    };

    /// Same parameters with a different divider wiring
    pub const fn with_topology(self, topology: DividerTopology) -> Self {
        Self { topology, ..self }
    }

    /// Reference temperature in Celsius
    pub fn reference_celsius(&self) -> f64 {
        self.reference_temperature_kelvin - KELVIN_OFFSET
    }

    /// Thermistor resistance implied by a divider voltage
    ///
    /// Caller guarantees `0 < voltage < supply_voltage`.
    pub fn resistance_at(&self, voltage: f64) -> f64 {
        let drop = self.supply_voltage - voltage;
        match self.topology {
            DividerTopology::ThermistorHigh => drop * self.series_resistor_ohms / voltage,
            DividerTopology::ThermistorLow => voltage * self.series_resistor_ohms / drop,
        }
    }

    /// Beta-model temperature in Celsius for a thermistor resistance
    ///
    /// `1/T = 1/T0 + ln(R/R0) / B`
    pub fn celsius_at(&self, resistance_ohms: f64) -> f64 {
        let ratio = resistance_ohms / self.reference_resistance_ohms;
        let inverse_kelvin =
            1.0 / self.reference_temperature_kelvin + libm::log(ratio) / self.beta;
        1.0 / inverse_kelvin - KELVIN_OFFSET
    }
}

impl Default for CalibrationParameters {
    fn default() -> Self {
        Self::NTC_100K_3950
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = CalibrationParameters::default();
        assert_eq!(params.supply_voltage, 3.3);
        assert_eq!(params.series_resistor_ohms, 100_000.0);
        assert_eq!(params.reference_resistance_ohms, 100_000.0);
        assert_eq!(params.beta, 3950.0);
        assert_eq!(params.topology, DividerTopology::ThermistorHigh);
        assert!((params.reference_celsius() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_resistance_gives_reference_temperature() {
        let params = CalibrationParameters::default();
        let temp = params.celsius_at(params.reference_resistance_ohms);
        assert!((temp - params.reference_celsius()).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint_voltage_is_balanced_divider() {
        let params = CalibrationParameters::default();
        let r = params.resistance_at(params.supply_voltage / 2.0);
        assert!((r - params.series_resistor_ohms).abs() < 1e-6);
    }

    #[test]
    fn test_topologies_mirror_each_other() {
        let high = CalibrationParameters::default();
        let low = high.with_topology(DividerTopology::ThermistorLow);
        let v = 1.0;
        let r_high = high.resistance_at(v);
        let r_low = low.resistance_at(high.supply_voltage - v);
        assert!((r_high - r_low).abs() < 1e-6);
    }

    #[test]
    fn test_ntc_is_colder_at_higher_resistance() {
        let params = CalibrationParameters::default();
        assert!(params.celsius_at(200_000.0) < params.reference_celsius());
        assert!(params.celsius_at(50_000.0) > params.reference_celsius());
    }
}
