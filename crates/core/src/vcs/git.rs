use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::vcs::{VcsError, VcsQuery, VcsResult};

/// Upper bound on how long any single git invocation may run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How often a running git child is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Environment variable naming the git executable when none is configured.
pub const GIT_ENV_VAR: &str = "FWSTAMP_GIT";

/// Settings for the git command-line backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOptions {
    /// git executable to run.
    pub git_path: PathBuf,
    /// Working directory for every invocation (inside the repository).
    pub repo_dir: PathBuf,
    /// Per-invocation timeout; expiry kills the child.
    pub timeout: Duration,
}

impl GitOptions {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            git_path: resolve_git_path(None),
            repo_dir: repo_dir.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_git_path(mut self, git_path: impl Into<PathBuf>) -> Self {
        self.git_path = git_path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Resolve the git executable.
///
/// Precedence:
/// - an explicitly configured path,
/// - `FWSTAMP_GIT` from the environment,
/// - `git` looked up on `PATH`.
pub fn resolve_git_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(GIT_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("git"))
}

/// `VcsQuery` backed by the git command-line tool.
#[derive(Debug, Clone)]
pub struct GitCli {
    options: GitOptions,
}

impl GitCli {
    pub fn new(options: GitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GitOptions {
        &self.options
    }

    /// Run git with `args`, optionally capturing its output, under the timeout.
    ///
    /// When `capture` is false the child's stdout/stderr go to the null device,
    /// so a chatty command can never block on a full pipe.
    fn run(&self, args: &[&str], capture: bool) -> VcsResult<Output> {
        let query = args.join(" ");
        debug!(git = %self.options.git_path.display(), %query, "running git");

        let mut command = Command::new(&self.options.git_path);
        command.args(args).current_dir(&self.options.repo_dir).stdin(Stdio::null());
        if capture {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let child = command.spawn().map_err(|e| spawn_error(&self.options.git_path, &query, e))?;
        wait_with_timeout(child, self.options.timeout).map_err(|reason| {
            warn!(%query, %reason, "git invocation failed");
            VcsError::QueryFailed { query, reason }
        })
    }

    /// Run a query whose answer is a single trimmed, non-empty line of stdout.
    fn query_line(&self, args: &[&str]) -> VcsResult<String> {
        let output = self.run(args, true)?;
        let query = args.join(" ");
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                format!("git exited with {}", output.status)
            } else {
                format!("git exited with {}: {stderr}", output.status)
            };
            return Err(VcsError::QueryFailed { query, reason });
        }
        let line = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if line.is_empty() {
            return Err(VcsError::QueryFailed { query, reason: "git produced no output".into() });
        }
        debug!(%query, answer = %line, "git query answered");
        Ok(line)
    }
}

impl VcsQuery for GitCli {
    fn ensure_repository(&self) -> VcsResult<()> {
        let output = self.run(&["status"], false)?;
        if !output.status.success() {
            return Err(VcsError::RepositoryUnavailable(format!(
                "not a git repository or git not installed ({} in {})",
                output.status,
                self.options.repo_dir.display()
            )));
        }
        Ok(())
    }

    fn branch(&self) -> VcsResult<String> {
        self.query_line(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn short_hash(&self) -> VcsResult<String> {
        self.query_line(&["rev-parse", "--short", "HEAD"])
    }

    fn is_dirty(&self) -> VcsResult<bool> {
        // Exit code 0 means clean, 1 means tracked changes; anything else is an error.
        let args = ["diff-index", "--quiet", "HEAD", "--"];
        let output = self.run(&args, false)?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(VcsError::QueryFailed {
                query: args.join(" "),
                reason: format!("git exited with {}", output.status),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "git"
    }
}

fn spawn_error(git_path: &Path, query: &str, err: io::Error) -> VcsError {
    if err.kind() == io::ErrorKind::NotFound {
        VcsError::RepositoryUnavailable(format!(
            "git not installed or repository directory missing ({}: {err})",
            git_path.display()
        ))
    } else {
        VcsError::QueryFailed {
            query: query.to_string(),
            reason: format!("failed to spawn git: {err}"),
        }
    }
}

/// Poll `child` until it exits or `timeout` elapses, then collect its output.
///
/// Piped stdout/stderr are drained on reader threads while polling so a child
/// that writes more than a pipe buffer can still run to completion.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<Output, String> {
    let stdout = child.stdout.take().map(drain_pipe);
    let stderr = child.stderr.take().map(drain_pipe);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(format!("timed out after {} ms", timeout.as_millis()));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(format!("failed to wait for git: {e}"));
            }
        }
    };

    Ok(Output { status, stdout: join_pipe(stdout)?, stderr: join_pipe(stderr)? })
}

type PipeReader = JoinHandle<io::Result<Vec<u8>>>;

fn drain_pipe<R: Read + Send + 'static>(mut pipe: R) -> PipeReader {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_pipe(reader: Option<PipeReader>) -> Result<Vec<u8>, String> {
    let Some(reader) = reader else {
        return Ok(Vec::new());
    };
    reader
        .join()
        .map_err(|_| "git output reader panicked".to_string())?
        .map_err(|e| format!("failed to collect git output: {e}"))
}
