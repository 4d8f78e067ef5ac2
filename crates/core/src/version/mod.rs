//! Version resolution from repository state.
//!
//! The resolver asks a `VcsQuery` for branch, short hash and dirty state and
//! composes them into a `VersionInfo`. There is no "unknown" fallback: a
//! build that cannot determine its version stops.

use tracing::info;

use crate::model::VersionInfo;
use crate::vcs::{VcsQuery, VcsResult};

pub mod constants;

pub use constants::{
    BuildConstant, BuildConstants, ConstantValue, ConstantsFormat, BRANCH_CONSTANT,
    COMMIT_HASH_CONSTANT, IS_DIRTY_CONSTANT, VERSION_CONSTANT,
};

/// Query `vcs` and build the version descriptor for this build.
///
/// Any failed query aborts resolution; the first error is returned as-is.
pub fn resolve_version(vcs: &dyn VcsQuery) -> VcsResult<VersionInfo> {
    vcs.ensure_repository()?;
    let branch = vcs.branch()?;
    let commit_hash = vcs.short_hash()?;
    let is_dirty = vcs.is_dirty()?;

    let version = VersionInfo::new(branch, commit_hash, is_dirty);
    info!(
        backend = vcs.name(),
        version = %version.version_string(),
        branch = %version.branch,
        commit_hash = %version.commit_hash,
        dirty = version.is_dirty,
        "resolved version"
    );
    Ok(version)
}

/// One-line summary printed by the version hook.
pub fn diagnostic_line(version: &VersionInfo) -> String {
    format!(
        "resolved version: {} ({}, {}, {})",
        version.version_string(),
        version.branch,
        version.commit_hash,
        version.state_label()
    )
}
