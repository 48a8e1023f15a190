//! Manifest discovery.
//!
//! Walks a directory tree and yields every file named exactly like the
//! manifest (`Cargo.toml`), pruning build output, VCS metadata and dependency
//! caches. Ignore files are not consulted: a manifest listed in `.gitignore`
//! still references the family and is still switched.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Lazily yields manifest paths below `root` in file-name order.
///
/// A missing `root` yields nothing.
pub fn find_manifests<'a>(
    root: &Path,
    manifest_name: &'a str,
    skip_dirs: &'a [String],
) -> impl Iterator<Item = PathBuf> + 'a {
    let skip: Vec<String> = skip_dirs.to_vec();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |e| {
            let is_dir = e.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir && e.depth() > 0 && skip.iter().any(|s| e.file_name() == s.as_str()))
        })
        .build();

    walker.filter_map(move |entry| {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                return None;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            return None;
        }

        if entry.file_name() != manifest_name {
            return None;
        }

        Some(entry.into_path())
    })
}
