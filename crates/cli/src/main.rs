use anyhow::Result;
use clap::{Parser, Subcommand};
use fwstamp::commands::{
    check_fwid_command, init_config_command, show_config_command, version_command, ImageSource,
};

/// Build-time firmware checks and version stamping.
///
/// This CLI is a thin wrapper around `fwstamp-core` (exposed in code as `fwstamp_core`).
/// Build pipelines call it as a pre-build hook (`version`) and a post-build
/// hook (`check-fwid`); a non-zero exit stops the build.
#[derive(Parser, Debug)]
#[command(
    name = "fwstamp",
    version,
    about = "Firmware identifier checks and version stamping for bootloader builds",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify the firmware ID embedded in a linked image.
    ///
    /// This will:
    /// - Search the image for `OpenHC32Boot A:0x<HEX> V:<version>`.
    /// - Fail if the image is larger than the declared APP_BASE_ADDRESS, and
    ///   suggest the smallest aligned address that would fit.
    CheckFwid {
        /// Path to the image. Overrides --build-dir/--prog-name.
        #[arg(long)]
        image: Option<String>,

        /// Build output directory; the image is `<build-dir>/<prog-name>.bin`.
        #[arg(long)]
        build_dir: Option<String>,

        /// Program name used to derive the image file name.
        #[arg(long)]
        prog_name: Option<String>,

        /// Flash alignment for the suggested base address (e.g. 8192).
        #[arg(long)]
        alignment: Option<u64>,

        /// Config file (JSON or YAML). Defaults to ./fwstamp.json when present.
        #[arg(long)]
        config: Option<String>,

        /// Emit the image report as JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Derive the bootloader version constants from git.
    ///
    /// Prints a `resolved version: ...` summary to stderr and the constants
    /// (BOOTLOADER_VERSION, _BRANCH, _COMMIT_HASH, _IS_DIRTY) to stdout or --output.
    Version {
        /// Directory inside the repository. Defaults to the config value or `.`.
        #[arg(long)]
        repo: Option<String>,

        /// git executable (otherwise config, then FWSTAMP_GIT, then `git`).
        #[arg(long)]
        git: Option<String>,

        /// Timeout for each git invocation, in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Output format: flags, header, cargo, or json.
        #[arg(long, default_value = "flags")]
        format: String,

        /// Write constants to this file instead of stdout.
        #[arg(long)]
        output: Option<String>,

        /// Config file (JSON or YAML). Defaults to ./fwstamp.json when present.
        #[arg(long)]
        config: Option<String>,
    },

    /// Write a default config file.
    InitConfig {
        /// Destination path (.json, .yaml or .yml).
        #[arg(long, default_value = "fwstamp.json")]
        path: String,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Print the effective configuration as JSON.
    ShowConfig {
        /// Config file (JSON or YAML). Defaults to ./fwstamp.json when present.
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    fwstamp::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::CheckFwid { image, build_dir, prog_name, alignment, config, json } => {
            let source = ImageSource { image, build_dir, prog_name };
            check_fwid_command(&source, alignment, config.as_deref(), json)?;
        }
        Command::Version { repo, git, timeout_ms, format, output, config } => {
            version_command(
                repo.as_deref(),
                git.as_deref(),
                timeout_ms,
                &format,
                output.as_deref(),
                config.as_deref(),
            )?;
        }
        Command::InitConfig { path, force } => init_config_command(&path, force)?,
        Command::ShowConfig { config } => show_config_command(config.as_deref())?,
    }

    Ok(())
}
