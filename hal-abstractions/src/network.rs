//! Network address abstraction

use core::net::Ipv4Addr;

/// Source of the device's current IPv4 address
///
/// Implementations query the live network stack on every call.
pub trait AddressSource {
    /// Current address, or `None` while the link or DHCP lease is down
    fn ipv4_address(&self) -> Option<Ipv4Addr>;
}
