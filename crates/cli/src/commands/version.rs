use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use fwstamp_core::model::VersionInfo;
use fwstamp_core::vcs::{GitCli, VcsQuery};
use fwstamp_core::version::{diagnostic_line, resolve_version, BuildConstants, ConstantsFormat};

use crate::canonicalize_or_current;
use crate::commands::load_effective_config;

/// Parse a `--format` value.
pub fn parse_constants_format(format: &str) -> Result<ConstantsFormat> {
    format.parse::<ConstantsFormat>().map_err(|e| anyhow!(e))
}

/// Resolve the version through `vcs` and write the constants to `output` or stdout.
///
/// The diagnostic summary goes to stderr so stdout stays machine-readable.
pub fn emit_version_constants(
    vcs: &dyn VcsQuery,
    format: ConstantsFormat,
    output: Option<&Path>,
) -> Result<VersionInfo> {
    let version = resolve_version(vcs)?;
    eprintln!("{}", diagnostic_line(&version));

    let rendered = BuildConstants::from_version(&version).render(format);
    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write constants to {}", path.display()))?;
            println!("Wrote {format} constants to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(version)
}

/// Pre-build hook: derive the version constants from git.
pub fn version_command(
    repo: Option<&str>,
    git: Option<&str>,
    timeout_ms: Option<u64>,
    format: &str,
    output: Option<&str>,
    config_path: Option<&str>,
) -> Result<VersionInfo> {
    let format = parse_constants_format(format)?;
    let mut config = load_effective_config(config_path)?;
    if let Some(repo) = repo {
        config.vcs.repo_dir = canonicalize_or_current(repo)?;
    }
    if let Some(git) = git {
        config.vcs.git = Some(git.into());
    }
    if let Some(timeout_ms) = timeout_ms {
        config.vcs.timeout_ms = timeout_ms;
    }
    config.validate()?;

    let options = config.vcs.git_options();
    tracing::debug!(
        repo = %options.repo_dir.display(),
        timeout = ?Duration::from_millis(config.vcs.timeout_ms),
        "resolving version"
    );
    let git = GitCli::new(options);
    let output = output.map(canonicalize_or_current).transpose()?;
    emit_version_constants(&git, format, output.as_deref())
}
