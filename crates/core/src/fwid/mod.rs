//! Firmware identifier extraction and image size validation.
//!
//! A bootloader build prints a line such as `OpenHC32Boot A:0x4000 V:1.0.0`
//! into its own image. After linking, the image is scanned for that line and
//! the declared application base address is compared with the image size: the
//! bootloader must fit entirely below the application it hands off to.
//!
//! - `marker`: the hand-written parser for the identifier grammar.
//! - `check`: reading an image and enforcing the size constraint.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub mod check;
pub mod marker;

pub use check::{
    check_image, ensure_fits, inspect_image, min_base_address, CheckRequest, ImageReport,
    DEFAULT_ALIGNMENT,
};
pub use marker::{extract_identifier, parse_identifier, MARKER_PREFIX, VERSION_DELIMITER};

/// Error type for firmware image checks.
#[derive(Debug, Error)]
pub enum CheckError {
    /// No well-formed identifier marker anywhere in the image.
    #[error("Failed to read FWID from '{}'", .path.display())]
    IdentifierAbsent { path: PathBuf },

    /// The image would overlap the application region it declares.
    ///
    /// `min_base_address` is the smallest aligned base address that would fit.
    #[error(
        "Firmware size ({image_size:#x}) is too large for APP_BASE_ADDRESS={app_base_address:#x}; \
         set APP_BASE_ADDRESS to {min_base_address:#x}"
    )]
    ImageTooLarge { image_size: u64, app_base_address: u32, min_base_address: u64 },

    /// The image could not be read from disk.
    #[error("Failed to read firmware image {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Convenience result type for image checks.
pub type CheckResult<T> = Result<T, CheckError>;
