//! Dependency source modes.
//!
//! A tracked dependency is always declared with exactly one source: a local
//! path, a git revision, a git branch, or a published version. Each mode
//! names the attribute keys it introduces; switching removes every key in
//! [`SOURCE_KEYS`] first, so no trace of the previous source survives.

use std::fmt;

/// Every attribute key that identifies where a dependency comes from.
pub const SOURCE_KEYS: [&str; 5] = ["path", "git", "rev", "branch", "version"];

/// Returns `true` if `key` identifies a dependency source.
pub fn is_source_key(key: &str) -> bool {
    SOURCE_KEYS.contains(&key)
}

/// Target source for a dependency family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    /// Local checkout; the path comes from the family registry.
    Local,
    /// Pinned git commit.
    Revision(String),
    /// Tip of a git branch.
    Branch(String),
    /// Published version from the registry.
    Version(String),
}

impl SourceMode {
    /// Mode name as written on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            SourceMode::Local => "local",
            SourceMode::Revision(_) => "rev",
            SourceMode::Branch(_) => "branch",
            SourceMode::Version(_) => "version",
        }
    }

    /// Keys this mode introduces, in the order they are written.
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            SourceMode::Local => &["path"],
            SourceMode::Revision(_) => &["git", "rev"],
            SourceMode::Branch(_) => &["git", "branch"],
            SourceMode::Version(_) => &["version"],
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::Local => write!(f, "local"),
            SourceMode::Revision(rev) => write!(f, "rev {rev}"),
            SourceMode::Branch(branch) => write!(f, "branch {branch}"),
            SourceMode::Version(version) => write!(f, "version {version}"),
        }
    }
}
