//! fwstamp-core
//!
//! Core library for build-time firmware checks.
//!
//! This crate holds the two jobs a firmware build calls out to:
//! - `fwid`: find the `OpenHC32Boot` identifier embedded in a compiled image and
//!   make sure the image fits below the application base address it declares.
//! - `version`: derive the bootloader version string and its build constants
//!   from repository state, queried through the `vcs` capability trait.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends (the `fwstamp` CLI, build scripts, etc.).

pub mod config;
pub mod fwid;
pub mod model;
pub mod vcs;
pub mod version;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
