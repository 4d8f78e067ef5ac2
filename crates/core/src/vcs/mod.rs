//! Version-control queries needed to stamp a build.
//!
//! The version resolver only ever needs four answers from a repository, so
//! they are expressed as the narrow `VcsQuery` capability. `GitCli` answers
//! them by shelling out to `git`; tests substitute their own implementation.

use thiserror::Error;

pub mod git;

pub use git::{resolve_git_path, GitCli, GitOptions, DEFAULT_TIMEOUT, GIT_ENV_VAR};

/// Error type for repository queries.
#[derive(Debug, Error)]
pub enum VcsError {
    /// Not inside a repository, or the VCS tool itself is missing.
    #[error("cannot get version info: {0}")]
    RepositoryUnavailable(String),

    /// A query ran but did not produce a usable answer.
    #[error("version query '{query}' failed: {reason}")]
    QueryFailed { query: String, reason: String },
}

/// Convenience result type for repository queries.
pub type VcsResult<T> = Result<T, VcsError>;

/// Repository state queries used by the version resolver.
pub trait VcsQuery {
    /// Succeeds only when a repository is present and the tool can reach it.
    fn ensure_repository(&self) -> VcsResult<()>;

    /// Current branch name, untruncated.
    fn branch(&self) -> VcsResult<String>;

    /// Abbreviated hash of the current commit.
    fn short_hash(&self) -> VcsResult<String>;

    /// Whether tracked files differ from the current commit.
    ///
    /// Untracked files are not considered.
    fn is_dirty(&self) -> VcsResult<bool>;

    /// Returns a human-readable name for the backend.
    fn name(&self) -> &'static str;
}
