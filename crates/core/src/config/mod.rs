//! Explicit configuration for the build hooks.
//!
//! The build orchestrator supplies paths (build directory, program name,
//! repository location) through a `StampConfig` value rather than ambient
//! globals. It can be loaded from JSON or YAML, and every field has a default
//! so an empty file (or no file) is valid.

use std::fs;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::fwid::{CheckRequest, DEFAULT_ALIGNMENT};
use crate::vcs::{resolve_git_path, GitOptions, DEFAULT_TIMEOUT};

/// Default file name looked up by frontends when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "fwstamp.json";

/// Paths provided by the build orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildEnv {
    /// Directory the linker writes the image into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<PathBuf>,
    /// Program name; the image is `<build_dir>/<prog_name>.bin`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prog_name: Option<String>,
}

impl BuildEnv {
    pub fn new(build_dir: impl Into<PathBuf>, prog_name: impl Into<String>) -> Self {
        Self { build_dir: Some(build_dir.into()), prog_name: Some(prog_name.into()) }
    }

    /// Path of the linked image, when both halves are known.
    pub fn image_path(&self) -> Option<PathBuf> {
        match (&self.build_dir, &self.prog_name) {
            (Some(dir), Some(name)) => Some(dir.join(format!("{name}.bin"))),
            _ => None,
        }
    }
}

/// Repository query settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VcsConfig {
    /// Optional git executable; see `resolve_git_path` for the fallback order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<PathBuf>,
    /// Directory inside the repository to query.
    pub repo_dir: PathBuf,
    /// Per-invocation timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            git: None,
            repo_dir: PathBuf::from("."),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl VcsConfig {
    pub fn git_options(&self) -> GitOptions {
        GitOptions::new(&self.repo_dir)
            .with_git_path(resolve_git_path(self.git.as_deref()))
            .with_timeout(Duration::from_millis(self.timeout_ms))
    }
}

/// Image check settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Flash alignment used when suggesting a base address.
    pub alignment: u64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self { alignment: DEFAULT_ALIGNMENT.get() }
    }
}

impl CheckConfig {
    pub fn alignment(&self) -> Result<NonZeroU64> {
        NonZeroU64::new(self.alignment).ok_or_else(|| anyhow!("check.alignment must be non-zero"))
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampConfig {
    /// Schema/config version. This is about the config format, not firmware version.
    pub config_version: String,
    pub build: BuildEnv,
    pub vcs: VcsConfig,
    pub check: CheckConfig,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            config_version: "0.1.0".to_string(),
            build: BuildEnv::default(),
            vcs: VcsConfig::default(),
            check: CheckConfig::default(),
        }
    }
}

impl StampConfig {
    /// Reject values that would make a hook misbehave.
    pub fn validate(&self) -> Result<()> {
        self.check.alignment()?;
        if self.vcs.timeout_ms == 0 {
            return Err(anyhow!("vcs.timeout_ms must be non-zero"));
        }
        Ok(())
    }

    /// Make relative paths relative to `base` (typically the config file's directory).
    pub fn resolve_relative_to(&mut self, base: &Path) {
        if self.vcs.repo_dir.is_relative() {
            self.vcs.repo_dir = base.join(&self.vcs.repo_dir);
        }
        if let Some(dir) = &self.build.build_dir {
            if dir.is_relative() {
                self.build.build_dir = Some(base.join(dir));
            }
        }
    }

    /// Build a check request for the configured image, if the build env names one.
    pub fn check_request(&self) -> Result<Option<CheckRequest>> {
        let alignment = self.check.alignment()?;
        Ok(self.build.image_path().map(|path| CheckRequest::new(path).with_alignment(alignment)))
    }
}

/// YAML for `.yaml`/`.yml`, JSON otherwise.
fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml"))
}

/// Load, resolve and validate a configuration file.
pub fn load_config(path: &Path) -> Result<StampConfig> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let mut config: StampConfig = if is_yaml(path) {
        serde_yaml::from_str(&body).context("Failed to parse config YAML")?
    } else {
        serde_json::from_str(&body).context("Failed to parse config JSON")?
    };
    config.validate().with_context(|| format!("Invalid config at {}", path.display()))?;

    let base = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    config.resolve_relative_to(base);
    Ok(config)
}

/// Serialize `config` to `path`, picking the format from the extension.
pub fn write_config(path: &Path, config: &StampConfig) -> Result<()> {
    let body = if is_yaml(path) {
        serde_yaml::to_string(config).context("Failed to serialize config to YAML")?
    } else {
        serde_json::to_string_pretty(config).context("Failed to serialize config to JSON")?
    };
    fs::write(path, body).with_context(|| format!("Failed to write config: {}", path.display()))
}
