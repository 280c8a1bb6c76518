//! Hardware abstraction traits for pico-thermo firmware
//!
//! This crate defines the collaborators the platform-agnostic core consumes.
//! Board crates implement these traits on top of their HAL.
//!
//! - **`AnalogBank`**: raw samples from numbered analog channels
//! - **`UptimeClock`**: monotonic time since boot
//! - **`AddressSource`**: the device's current IPv4 address

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod analog;
pub mod clock;
pub mod network;

pub use analog::{widen_12bit, AnalogBank, AnalogChannel, AnalogError, RawSample};
pub use clock::UptimeClock;
pub use network::AddressSource;
