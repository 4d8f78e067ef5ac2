use std::path::PathBuf;

use anyhow::{anyhow, Result};
use fwstamp_core::config::StampConfig;
use fwstamp_core::fwid::{ensure_fits, inspect_image, ImageReport};

use crate::canonicalize_or_current;
use crate::commands::load_effective_config;

/// Where the image to check comes from, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ImageSource {
    pub image: Option<String>,
    pub build_dir: Option<String>,
    pub prog_name: Option<String>,
}

/// Pick the image path: `--image` wins, then the (possibly overridden) build env.
pub fn resolve_image_path(source: &ImageSource, config: &mut StampConfig) -> Result<PathBuf> {
    if let Some(image) = &source.image {
        return canonicalize_or_current(image);
    }
    if let Some(dir) = &source.build_dir {
        config.build.build_dir = Some(canonicalize_or_current(dir)?);
    }
    if let Some(name) = &source.prog_name {
        config.build.prog_name = Some(name.clone());
    }
    config.build.image_path().ok_or_else(|| {
        anyhow!("Specify --image, or --build-dir with --prog-name (or set them in the config)")
    })
}

/// Post-build hook: verify the image carries a firmware ID and fits below the
/// application base address it declares.
pub fn check_fwid_command(
    source: &ImageSource,
    alignment: Option<u64>,
    config_path: Option<&str>,
    json: bool,
) -> Result<ImageReport> {
    let mut config = load_effective_config(config_path)?;
    if let Some(alignment) = alignment {
        config.check.alignment = alignment;
    }
    let alignment = config.check.alignment()?;
    let image_path = resolve_image_path(source, &mut config)?;

    let report = inspect_image(&image_path)?;
    let found = format!(
        "Read Firmware ID '{}' from '{}'",
        report.identifier.raw_marker,
        report.image_path.display()
    );
    // stdout stays a single JSON document in --json mode.
    if json {
        eprintln!("{found}");
    } else {
        println!("{found}");
    }

    ensure_fits(&report, alignment)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Firmware size ({:#x}) fits below APP_BASE_ADDRESS={:#x}",
            report.image_size, report.identifier.app_base_address
        );
    }

    Ok(report)
}
