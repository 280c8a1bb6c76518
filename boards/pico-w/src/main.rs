#![deny(unsafe_code)]
#![deny(warnings)]
#![no_main]
#![no_std]

use defmt_rtt as _; // global logger
use panic_probe as _;
use rtic::app;

mod analog;
mod clock;
mod config;
mod firmware;
mod network;

embassy_rp::bind_interrupts!(pub struct Irqs {
    ADC_IRQ_FIFO => embassy_rp::adc::InterruptHandler;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<embassy_rp::peripherals::PIO0>;
});

/// Dashboard served at `/`
static INDEX_HTML: &[u8] = include_bytes!("../static/index.html");

// TIMER_IRQ_0 belongs to the embassy-time driver
#[app(device = embassy_rp::pac, peripherals = false, dispatchers = [TIMER_IRQ_1, TIMER_IRQ_2])]
mod app {
    use super::*;
    use defmt::{error, info};
    use embassy_futures::join::{join, join3};
    use embassy_rp::clocks::RoscRng;
    use rand_core::RngCore;
    use thermo_core::{
        CalibrationParameters, HealthContext, Router, SensorContext, Service, StaticAsset,
    };

    use analog::{SensorPeripherals, ThermistorBank};
    use clock::BootClock;
    use config::{HttpConfig, SensorConfig, WifiConfig};
    use network::{manager, server, wifi, StackAddress};

    #[shared]
    struct Shared {}

    #[local]
    struct Local {}

    #[init]
    fn init(_cx: init::Context) -> (Shared, Local) {
        info!("pico-thermo starting...");

        let p = embassy_rp::init(Default::default());
        info!("RP2040 initialized, embassy-time driver on TIMER");

        let wifi_periph = wifi::WifiPeripherals {
            pwr: p.PIN_23,
            dio: p.PIN_24,
            cs: p.PIN_25,
            clk: p.PIN_29,
            pio: p.PIO0,
            dma: p.DMA_CH0,
        };

        let sensor_periph = SensorPeripherals {
            adc: p.ADC,
            a0: p.PIN_26,
            a1: p.PIN_27,
        };

        network_task::spawn(wifi_periph, sensor_periph).ok();

        (Shared {}, Local {})
    }

    /// Network task - owns the Wi-Fi chip, the stack, and the HTTP server
    ///
    /// Stack is !Send and must remain within this task. The analog bank is
    /// owned here too, so sensor reads are strictly sequential.
    #[task(priority = 1)]
    async fn network_task(
        _cx: network_task::Context,
        wifi_periph: wifi::WifiPeripherals,
        sensor_periph: SensorPeripherals,
    ) {
        use embassy_net::{Config, StackResources};
        use static_cell::StaticCell;

        info!("Network task started");

        let mut bank = ThermistorBank::new(sensor_periph, &SensorConfig::default());
        info!("ADC initialized: T1 on GP26, T2 on GP27");

        let (device, mut control, wifi_runner) = wifi::init_cyw43(wifi_periph).await;

        static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
        let (stack, mut net_runner) = embassy_net::new(
            device,
            Config::dhcpv4(Default::default()),
            RESOURCES.init(StackResources::new()),
            RoscRng.next_u64(),
        );
        info!("Network stack initialized with DHCP");

        let app_logic = async {
            wifi::start(&mut control).await;

            // Never serve from a half-initialized network; reset and retry
            if let Err(e) = wifi::join(&mut control, &WifiConfig::default()).await {
                error!("Startup failed: {} - resetting", e);
                cortex_m::peripheral::SCB::sys_reset();
            }
            manager::wait_for_config(&stack).await;

            let calibration = CalibrationParameters::default();
            info!("Calibration: {}", calibration);

            let address = StackAddress::new(stack);
            let clock = BootClock;
            let assets = [StaticAsset::new("/index.html", INDEX_HTML)];
            let mut service = Service::new(
                Router::standard(),
                SensorContext::new(calibration, &mut bank),
                HealthContext::new(&address, &clock),
                &assets,
            );

            join(
                server::run(stack, &mut service, &HttpConfig::default()),
                wifi::heartbeat(&mut control),
            )
            .await;
        };

        join3(wifi_runner.run(), net_runner.run(), app_logic).await;
    }

    /// RTIC idle task - WFI sleep mode when no tasks active
    #[idle]
    fn idle(_cx: idle::Context) -> ! {
        info!("Idle task started - entering WFI loop");
        loop {
            cortex_m::asm::wfi();
        }
    }
}
