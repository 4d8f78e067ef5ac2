//! Core data model shared by the identifier check and the version resolver.
//!
//! Both types are built once per invocation and discarded after the build step
//! has consumed them; nothing here is persisted.

use serde::{Deserialize, Serialize};

/// Maximum number of branch characters kept in the composed version string.
pub const BRANCH_DISPLAY_LEN: usize = 10;

/// Maximum number of commit hash characters kept in the composed version string.
pub const HASH_DISPLAY_LEN: usize = 7;

/// Identifier record embedded in a bootloader image.
///
/// Only ever produced by a complete marker match; absence is represented with
/// `Option::None` by the extractor, never with a zeroed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareIdentifier {
    /// The exact matched marker text, e.g. `OpenHC32Boot A:0x4000 V:1.0.0`.
    pub raw_marker: String,
    /// Flash offset at which the application image is expected to begin.
    pub app_base_address: u32,
    /// Bootloader version text following `V:`.
    pub bootloader_version: String,
}

/// Repository state used to stamp a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Full branch name as reported by the VCS.
    pub branch: String,
    /// Abbreviated commit hash as reported by the VCS.
    pub commit_hash: String,
    /// Tracked files differ from the current commit.
    pub is_dirty: bool,
}

impl VersionInfo {
    pub fn new(branch: impl Into<String>, commit_hash: impl Into<String>, is_dirty: bool) -> Self {
        Self { branch: branch.into(), commit_hash: commit_hash.into(), is_dirty }
    }

    /// Compose `<branch[:10]>-<hash[:7]>` with a trailing `+` for dirty trees.
    ///
    /// Truncation counts characters, so multi-byte branch names never split
    /// inside a code point.
    pub fn version_string(&self) -> String {
        let branch: String = self.branch.chars().take(BRANCH_DISPLAY_LEN).collect();
        let hash: String = self.commit_hash.chars().take(HASH_DISPLAY_LEN).collect();
        let suffix = if self.is_dirty { "+" } else { "" };
        format!("{branch}-{hash}{suffix}")
    }

    /// Human-readable tree state used in diagnostics.
    pub fn state_label(&self) -> &'static str {
        if self.is_dirty {
            "dirty"
        } else {
            "clean"
        }
    }
}
