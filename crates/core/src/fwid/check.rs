use std::fs;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::fwid::{extract_identifier, CheckError, CheckResult};
use crate::model::FirmwareIdentifier;

/// Flash region granularity assumed when suggesting a new base address.
pub const DEFAULT_ALIGNMENT: NonZeroU64 = match NonZeroU64::new(0x2000) {
    Some(alignment) => alignment,
    None => unreachable!(),
};

/// Input for a single image check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    /// Path to the linked `.bin` image.
    pub image_path: PathBuf,
    /// Granularity used for the minimal base address suggestion.
    pub alignment: NonZeroU64,
}

impl CheckRequest {
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self { image_path: image_path.into(), alignment: DEFAULT_ALIGNMENT }
    }

    pub fn with_alignment(mut self, alignment: NonZeroU64) -> Self {
        self.alignment = alignment;
        self
    }
}

/// What was learned from an image that carries an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReport {
    pub image_path: PathBuf,
    /// Size of the image file on disk, in bytes.
    pub image_size: u64,
    /// Hex-encoded SHA-256 of the image contents.
    pub image_sha256: String,
    pub identifier: FirmwareIdentifier,
}

/// Smallest non-negative multiple of `alignment` that is `>= image_size`.
pub fn min_base_address(image_size: u64, alignment: NonZeroU64) -> u64 {
    let alignment = alignment.get();
    image_size.div_ceil(alignment).saturating_mul(alignment)
}

/// Read an image and extract its identifier without enforcing the size limit.
///
/// Frontends call this first so the identifier can be reported even when the
/// size check later fails.
pub fn inspect_image(image_path: &Path) -> CheckResult<ImageReport> {
    let bytes = fs::read(image_path)
        .map_err(|source| CheckError::Io { path: image_path.to_path_buf(), source })?;
    debug!(path = %image_path.display(), len = bytes.len(), "read firmware image");

    let identifier = extract_identifier(&bytes)
        .ok_or_else(|| CheckError::IdentifierAbsent { path: image_path.to_path_buf() })?;

    let image_size = fs::metadata(image_path)
        .map_err(|source| CheckError::Io { path: image_path.to_path_buf(), source })?
        .len();

    Ok(ImageReport {
        image_path: image_path.to_path_buf(),
        image_size,
        image_sha256: sha256_bytes(&bytes),
        identifier,
    })
}

/// Fail when the image would reach into the application region.
///
/// An image exactly as large as the base address still fits.
pub fn ensure_fits(report: &ImageReport, alignment: NonZeroU64) -> CheckResult<()> {
    let app_base_address = report.identifier.app_base_address;
    if report.image_size > u64::from(app_base_address) {
        let min_base_address = min_base_address(report.image_size, alignment);
        return Err(CheckError::ImageTooLarge {
            image_size: report.image_size,
            app_base_address,
            min_base_address,
        });
    }
    info!(
        image_size = report.image_size,
        app_base_address, "firmware image fits below application base"
    );
    Ok(())
}

/// Inspect and validate an image in one step.
pub fn check_image(request: &CheckRequest) -> CheckResult<ImageReport> {
    let report = inspect_image(&request.image_path)?;
    ensure_fits(&report, request.alignment)?;
    Ok(report)
}

fn sha256_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}
