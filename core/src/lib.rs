//! Platform-agnostic core logic for pico-thermo firmware
//!
//! This crate turns raw thermistor samples into calibrated temperatures and
//! answers the device's HTTP API. It has NO hardware dependencies: sensors,
//! clock, and network address come in through the traits in
//! `hal-abstractions`, and connections through `embedded-io-async`.
//!
//! # Layout
//!
//! ```text
//! calibration ──► thermistor ──► report ──► handlers ──┐
//!                                                      ├──► server
//! http (request/response) ──► router ──► assets ───────┘
//! ```

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod assets;
pub mod calibration;
pub mod error;
pub mod handlers;
pub mod http;
pub mod report;
pub mod router;
pub mod server;
pub mod thermistor;

pub use assets::StaticAsset;
pub use calibration::{CalibrationParameters, DividerTopology};
pub use error::ServeError;
pub use handlers::{HealthContext, SensorContext};
pub use report::{HealthReport, SensorEntry, SensorReport};
pub use router::{Endpoint, Router};
pub use server::Service;
pub use thermistor::{convert, TemperatureReading};
