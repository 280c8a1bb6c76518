//! Analog input abstraction
//!
//! Samples are always presented as 16-bit values regardless of the native
//! converter resolution, so calibration math is independent of the chip.

/// Quantized analog voltage, full scale is `u16::MAX`
pub type RawSample = u16;

/// Analog channel identifier
///
/// Uses a single byte with predefined constants for the board's labelled
/// analog pins. The adapter decides which physical pin each index maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogChannel(pub u8);

impl AnalogChannel {
    /// Board pin labelled A0
    pub const A0: AnalogChannel = AnalogChannel(0);

    /// Board pin labelled A1
    pub const A1: AnalogChannel = AnalogChannel(1);

    /// Board pin labelled A2
    pub const A2: AnalogChannel = AnalogChannel(2);

    /// Get the raw channel index
    pub const fn index(&self) -> u8 {
        self.0
    }
}

/// Error type for analog reads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogError {
    /// Conversion did not complete within the read timeout
    Timeout,
    /// Converter reported a failed conversion
    Hardware,
    /// Channel is not wired on this board
    UnknownChannel,
}

impl core::fmt::Display for AnalogError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "Analog read timeout"),
            Self::Hardware => write!(f, "Analog conversion failed"),
            Self::UnknownChannel => write!(f, "Unknown analog channel"),
        }
    }
}

impl core::error::Error for AnalogError {}

/// Port for reading analog channels
///
/// A single owner holds the bank and reads channels one after another; the
/// underlying converter is sequential, so no locking is involved.
///
/// # Example Implementation
///
/// ```ignore
/// struct ThermistorBank {
///     adc: Adc<'static, Async>,
///     channels: [Channel<'static>; 2],
/// }
///
/// impl AnalogBank for ThermistorBank {
///     async fn read(&mut self, channel: AnalogChannel) -> Result<RawSample, AnalogError> {
///         let pin = self.channels.get_mut(channel.index() as usize)
///             .ok_or(AnalogError::UnknownChannel)?;
///         let raw = self.adc.read(pin).await.map_err(|_| AnalogError::Hardware)?;
///         Ok(widen_12bit(raw))
///     }
/// }
/// ```
pub trait AnalogBank {
    /// Take one fresh sample from `channel`
    fn read(
        &mut self,
        channel: AnalogChannel,
    ) -> impl core::future::Future<Output = Result<RawSample, AnalogError>>;
}

/// Widen a 12-bit conversion result to the 16-bit sample range
///
/// Replicates the top bits into the bottom nibble so that 0 maps to 0 and
/// 4095 maps to 65535. Bits above the 12th are ignored.
#[inline]
pub const fn widen_12bit(raw: u16) -> RawSample {
    let raw = raw & 0x0fff;
    (raw << 4) | (raw >> 8)
}
