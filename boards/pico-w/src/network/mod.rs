#![deny(warnings)]
//! Network module: CYW43 Wi-Fi with embassy-net
//!
//! This module provides the device's network side:
//! - **`wifi`**: CYW43439 bring-up over PIO SPI and association
//! - **`manager`**: DHCP wait and the live address source
//! - **`socket`**: TCP connection wrapper for embedded-io-async
//! - **`server`**: HTTP accept loop around `thermo_core::Service`
//! - **`error`**: Simple error enum for network operations
//!
//! ## Architecture
//!
//! Follows the "Init-Inside-Task" pattern: raw peripherals (Send) are passed
//! to the network task, and the Wi-Fi runner, stack, and server (!Send) are
//! constructed and joined inside it. One connection is served to completion
//! before the next is accepted.

pub mod error;
pub mod manager;
pub mod server;
pub mod socket;
pub mod wifi;

// Re-export commonly used types
pub use error::NetworkError;
pub use manager::StackAddress;
