#![deny(unsafe_code)]
#![deny(warnings)]
//! RP2040 ADC adapter for the thermistor inputs
//!
//! The RP2040 converts at 12 bits; samples are widened to the 16-bit range
//! the calibration expects. Each conversion is bounded by a timeout so a
//! stuck converter reports a fault instead of hanging the request.

use defmt::warn;
use embassy_rp::adc::{self, Adc, Async, Channel};
use embassy_rp::gpio::Pull;
use embassy_rp::peripherals::{ADC, PIN_26, PIN_27};
use embassy_rp::Peri;
use embassy_time::{with_timeout, Duration};
use hal_abstractions::{widen_12bit, AnalogBank, AnalogChannel, AnalogError, RawSample};

use crate::config::SensorConfig;
use crate::Irqs;

/// Analog peripherals bundle
pub struct SensorPeripherals {
    pub adc: Peri<'static, ADC>,
    pub a0: Peri<'static, PIN_26>,
    pub a1: Peri<'static, PIN_27>,
}

/// Both thermistor channels behind the single ADC
///
/// A0 is GP26 (ADC0), A1 is GP27 (ADC1).
pub struct ThermistorBank {
    adc: Adc<'static, Async>,
    channels: [Channel<'static>; 2],
    timeout: Duration,
}

impl ThermistorBank {
    /// Set up the ADC with both pins floating (the divider drives them)
    pub fn new(periph: SensorPeripherals, config: &SensorConfig) -> Self {
        let SensorPeripherals {
            adc: adc_periph,
            a0,
            a1,
        } = periph;
        Self {
            adc: Adc::new(adc_periph, Irqs, adc::Config::default()),
            channels: [
                Channel::new_pin(a0, Pull::None),
                Channel::new_pin(a1, Pull::None),
            ],
            timeout: Duration::from_millis(config.read_timeout_ms),
        }
    }
}

impl AnalogBank for ThermistorBank {
    async fn read(&mut self, channel: AnalogChannel) -> Result<RawSample, AnalogError> {
        let pin = self
            .channels
            .get_mut(channel.index() as usize)
            .ok_or(AnalogError::UnknownChannel)?;

        match with_timeout(self.timeout, self.adc.read(pin)).await {
            Ok(Ok(raw)) => Ok(widen_12bit(raw)),
            Ok(Err(e)) => {
                warn!("ADC conversion failed on {}: {:?}", channel, e);
                Err(AnalogError::Hardware)
            }
            Err(_) => Err(AnalogError::Timeout),
        }
    }
}
