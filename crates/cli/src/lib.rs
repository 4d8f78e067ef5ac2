use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub mod commands;

/// Environment variable holding the log filter (e.g. `fwstamp_core=debug`).
pub const LOG_ENV_VAR: &str = "FWSTAMP_LOG";

/// Install the stderr log subscriber.
///
/// Stdout carries the hook's actual output (constants, reports), so logs never go there.
/// Defaults to `warn` when `FWSTAMP_LOG` is unset or unparsable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}

/// Canonicalize a path if possible, falling back to the given string
/// relative to the current working directory.
pub fn canonicalize_or_current(path: &str) -> Result<PathBuf> {
    let path = Path::new(path);
    if path == Path::new(".") {
        Ok(env::current_dir().context("Failed to get current directory")?)
    } else {
        // Try to canonicalize; if it fails (e.g., path does not exist),
        // join it with the current dir to get an absolute path.
        match path.canonicalize() {
            Ok(p) => Ok(p),
            Err(_) => {
                let cwd = env::current_dir().context("Failed to get current directory")?;
                Ok(cwd.join(path))
            }
        }
    }
}
