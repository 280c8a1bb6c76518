#![deny(unsafe_code)]
#![deny(warnings)]
//! Network stack manager
//!
//! Waits for DHCP and exposes the stack's live address to the core.

use core::net::Ipv4Addr;

use defmt::info;
use embassy_net::Stack;
use hal_abstractions::AddressSource;

/// Wait for network configuration (DHCP) and log IP address
pub async fn wait_for_config(stack: &Stack<'_>) {
    info!("Waiting for DHCP...");
    stack.wait_config_up().await;
    info!("Network is UP!");

    if let Some(config) = stack.config_v4() {
        let ip = config.address.address();
        let octets = ip.octets();
        info!(
            "IP: {}.{}.{}.{}",
            octets[0], octets[1], octets[2], octets[3]
        );

        if let Some(gateway) = config.gateway {
            let gw_octets = gateway.octets();
            info!(
                "Gateway: {}.{}.{}.{}",
                gw_octets[0], gw_octets[1], gw_octets[2], gw_octets[3]
            );
        }
    }
}

/// Address source reading the stack's current DHCP lease
///
/// Queried on every health request; nothing is cached.
#[derive(Clone, Copy)]
pub struct StackAddress {
    stack: Stack<'static>,
}

impl StackAddress {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack }
    }
}

impl AddressSource for StackAddress {
    fn ipv4_address(&self) -> Option<Ipv4Addr> {
        self.stack
            .config_v4()
            .map(|config| Ipv4Addr::from(config.address.address().octets()))
    }
}
