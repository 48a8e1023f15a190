//! Source mode rewriting for located declarations.
//!
//! Every rewrite removes all source keys (`path`, `git`, `rev`, `branch`,
//! `version`) and then puts the keys of the target mode in front of the
//! remaining attributes:
//!
//! ```toml
//! # before (target: rev abc123)
//! dashcore = { path = "../dash", features = ["std"] }
//! # after
//! dashcore = { git = "https://github.com/dashpay/rust-dashcore", rev = "abc123", features = ["std"] }
//! ```
//!
//! A bare version string (`grovedb = "3.0.0"`) cannot carry a path or git
//! source, so switching it to `local`, `rev` or `branch` turns it into an
//! inline table. Switching to `version` keeps or produces a bare string only
//! when the declaration was bare to begin with.

use crate::family::DependencyFamily;
use crate::manifest::scan::{BlockKind, DependencyBlock};
use crate::manifest::table::{AttributePair, parse_pairs, quote, serialize_pairs};
use crate::source::{SourceMode, is_source_key};

/// Builds the source attributes `mode` introduces for dependency `name`.
///
/// For [`SourceMode::Local`], `name` must be tracked by `family`; an
/// untracked name yields no `path` key.
pub fn source_pairs(family: &DependencyFamily, name: &str, mode: &SourceMode) -> Vec<AttributePair> {
    match mode {
        SourceMode::Local => family
            .local_path(name)
            .map(|path| vec![AttributePair::new("path", quote(path))])
            .unwrap_or_default(),
        SourceMode::Revision(rev) => vec![
            AttributePair::new("git", quote(&family.git_url)),
            AttributePair::new("rev", quote(rev)),
        ],
        SourceMode::Branch(branch) => vec![
            AttributePair::new("git", quote(&family.git_url)),
            AttributePair::new("branch", quote(branch)),
        ],
        SourceMode::Version(version) => vec![AttributePair::new("version", quote(version))],
    }
}

/// Replaces the source attributes in `pairs` with `new_source`.
///
/// Non-source attributes keep their relative order behind the new keys.
pub fn replace_source(
    pairs: Vec<AttributePair>,
    new_source: Vec<AttributePair>,
) -> Vec<AttributePair> {
    let mut result = new_source;
    result.extend(pairs.into_iter().filter(|p| !is_source_key(&p.key)));
    result
}

/// Produces the new text for one located declaration.
pub fn rewrite_block(
    content: &str,
    block: &DependencyBlock,
    family: &DependencyFamily,
    mode: &SourceMode,
) -> String {
    let prefix = block.prefix(content);

    match (block.kind, mode) {
        (BlockKind::BareString, SourceMode::Version(version)) => {
            format!("{prefix}{}", quote(version))
        }
        (BlockKind::BareString, _) => {
            log::debug!(
                "Converting bare declaration of '{}' to an inline table",
                block.name
            );
            serialize_pairs(prefix, &source_pairs(family, &block.name, mode))
        }
        (BlockKind::InlineTable, _) => {
            let pairs = parse_pairs(block.inner(content));
            let pairs = replace_source(pairs, source_pairs(family, &block.name, mode));
            serialize_pairs(prefix, &pairs)
        }
    }
}
