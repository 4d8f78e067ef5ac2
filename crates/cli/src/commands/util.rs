use std::path::Path;

use anyhow::Result;
use fwstamp_core::config::{load_config, StampConfig, DEFAULT_CONFIG_FILE};
use tracing::debug;

use crate::canonicalize_or_current;

/// Load the configuration a command should run with.
///
/// An explicit path must exist. Without one, `fwstamp.json` in the current
/// directory is used when present, otherwise built-in defaults.
pub fn load_effective_config(config_path: Option<&str>) -> Result<StampConfig> {
    if let Some(path) = config_path {
        let path = canonicalize_or_current(path)?;
        debug!(path = %path.display(), "loading explicit config");
        return load_config(&path);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        let path = canonicalize_or_current(DEFAULT_CONFIG_FILE)?;
        debug!(path = %path.display(), "loading config from current directory");
        return load_config(&path);
    }

    debug!("no config file; using defaults");
    Ok(StampConfig::default())
}
