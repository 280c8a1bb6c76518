#![deny(unsafe_code)]
#![deny(warnings)]
//! Wi-Fi hardware layer module
//!
//! The Pico W's CYW43439 hangs off a half-duplex SPI bus bit-banged by PIO0.
//! Its power-enable and chip-select are ordinary GPIOs.

use cyw43::{Control, JoinOptions, NetDriver, PowerManagementMode, Runner};
use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::{info, warn};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::Pio;
use embassy_rp::Peri;
use embassy_time::Timer;
use static_cell::StaticCell;

use super::error::NetworkError;
use crate::config::WifiConfig;
use crate::firmware;
use crate::Irqs;

/// GPIO on the CYW43 wired to the on-board LED
const LED_GPIO: u8 = 0;

/// Type alias for the CYW43 runner used with embassy-net
pub type WifiRunner = Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>;

/// Wi-Fi peripherals bundle
pub struct WifiPeripherals {
    pub pwr: Peri<'static, PIN_23>,
    pub dio: Peri<'static, PIN_24>,
    pub cs: Peri<'static, PIN_25>,
    pub clk: Peri<'static, PIN_29>,
    pub pio: Peri<'static, PIO0>,
    pub dma: Peri<'static, DMA_CH0>,
}

/// Initialize the CYW43439 and load its firmware
///
/// Returns the network driver, control handle, and runner. Runner must be
/// continuously polled for device operation, and [`start`] must run once
/// the runner is being polled.
pub async fn init_cyw43(
    periph: WifiPeripherals,
) -> (NetDriver<'static>, Control<'static>, WifiRunner) {
    let WifiPeripherals {
        pwr,
        dio,
        cs,
        clk,
        pio,
        dma,
    } = periph;

    let pwr = Output::new(pwr, Level::Low);
    let cs = Output::new(cs, Level::High);
    let mut pio = Pio::new(pio, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        dio,
        clk,
        dma,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());

    info!("Loading CYW43 firmware...");
    cyw43::new(state, pwr, spi, firmware::wifi_firmware()).await
}

/// Load the CLM and enable power saving
pub async fn start(control: &mut Control<'static>) {
    control.init(firmware::clm()).await;
    control
        .set_power_management(PowerManagementMode::PowerSave)
        .await;
    info!("CYW43 initialized");
}

/// Join the configured network, retrying up to `join_attempts` times
///
/// # Errors
///
/// Returns `NetworkError::JoinFailed` once every attempt has failed
pub async fn join(control: &mut Control<'static>, config: &WifiConfig) -> Result<(), NetworkError> {
    for attempt in 1..=config.join_attempts {
        info!(
            "Joining Wi-Fi '{}' (attempt {}/{})",
            config.ssid, attempt, config.join_attempts
        );

        let options = if config.password.is_empty() {
            JoinOptions::new_open()
        } else {
            JoinOptions::new(config.password.as_bytes())
        };

        match control.join(config.ssid, options).await {
            Ok(()) => {
                info!("Wi-Fi joined");
                return Ok(());
            }
            Err(e) => {
                warn!("Wi-Fi join failed with status {}", e.status);
                Timer::after_millis(config.retry_delay_ms).await;
            }
        }
    }

    Err(NetworkError::JoinFailed)
}

/// Blink the on-board LED forever
pub async fn heartbeat(control: &mut Control<'static>) -> ! {
    info!("Heartbeat started");
    loop {
        control.gpio_set(LED_GPIO, true).await;
        Timer::after_millis(100).await;
        control.gpio_set(LED_GPIO, false).await;
        Timer::after_millis(4900).await;
    }
}
