//! CYW43439 firmware and CLM blobs
//!
//! The blobs are not linked into the image. They are flashed once to fixed
//! offsets past the application and read in place:
//!
//! ```text
//! probe-rs download 43439A0.bin     --binary-format bin --chip RP2040 --base-address 0x10100000
//! probe-rs download 43439A0_clm.bin --binary-format bin --chip RP2040 --base-address 0x10140000
//! ```
//!
//! This keeps flashing the application fast during development.
//!
//! # Safety
//!
//! Flash is memory-mapped read-only through XIP and nothing writes these
//! regions at runtime, so handing out `&'static` slices is sound as long as
//! the blobs were flashed at the addresses below. `memory.x` keeps the
//! application below `FIRMWARE_ADDR`.

#![allow(unsafe_code)] // Required to view the XIP flash regions as slices
#![deny(warnings)]

/// XIP address of the Wi-Fi firmware blob
const FIRMWARE_ADDR: usize = 0x1010_0000;

/// Size of `43439A0.bin`
const FIRMWARE_LEN: usize = 230_321;

/// XIP address of the country locale matrix blob
const CLM_ADDR: usize = 0x1014_0000;

/// Size of `43439A0_clm.bin`
const CLM_LEN: usize = 4_752;

/// Wi-Fi chip firmware
pub fn wifi_firmware() -> &'static [u8] {
    // SAFETY: see module docs; region is mapped, immutable, and in bounds
    unsafe { core::slice::from_raw_parts(FIRMWARE_ADDR as *const u8, FIRMWARE_LEN) }
}

/// Country locale matrix (regulatory limits)
pub fn clm() -> &'static [u8] {
    // SAFETY: see module docs; region is mapped, immutable, and in bounds
    unsafe { core::slice::from_raw_parts(CLM_ADDR as *const u8, CLM_LEN) }
}
