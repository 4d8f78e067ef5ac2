use std::path::Path;

use anyhow::{anyhow, Result};
use fwstamp_core::config::{write_config, StampConfig};

use crate::canonicalize_or_current;
use crate::commands::load_effective_config;

/// Write a default config file (JSON, or YAML for `.yaml`/`.yml`).
pub fn init_config_command(path: &str, force: bool) -> Result<()> {
    let path = canonicalize_or_current(path)?;
    if path.exists() && !force {
        return Err(anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }

    let config = StampConfig::default();
    write_config(&path, &config)?;

    println!("Initialized fwstamp config:");
    println!("  Path: {}", path.display());
    println!("  Repo dir: {}", config.vcs.repo_dir.display());
    println!("  Timeout: {} ms", config.vcs.timeout_ms);
    println!("  Alignment: {:#x}", config.check.alignment);
    print_hint(&path);

    Ok(())
}

/// Print the effective configuration as JSON.
pub fn show_config_command(config_path: Option<&str>) -> Result<()> {
    let config = load_effective_config(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn print_hint(path: &Path) {
    println!(
        "Set build.build_dir and build.prog_name in {} to let check-fwid find the image.",
        path.display()
    );
}
