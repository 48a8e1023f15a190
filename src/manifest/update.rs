//! Applying rewritten declarations to a manifest.
//!
//! Edits are applied from the end of the file towards the start, so the
//! offsets of edits not yet applied stay valid. Only the located spans are
//! replaced: line endings, comments and unrelated declarations are carried
//! over untouched.

use crate::error::Result;
use crate::family::DependencyFamily;
use crate::manifest::rewrite::rewrite_block;
use crate::manifest::scan::BlockScanner;
use crate::source::SourceMode;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Replacement text for one span of the original content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub replacement: String,
}

/// Applies non-overlapping `edits` to `content`.
///
/// Returns `None` if no edit changes its span.
pub fn apply_edits(content: &str, mut edits: Vec<Edit>) -> Option<String> {
    edits.retain(|e| content[e.span.clone()] != *e.replacement);
    if edits.is_empty() {
        return None;
    }

    edits.sort_by(|a, b| b.span.start.cmp(&a.span.start));

    let mut result = content.to_string();
    for edit in edits {
        result.replace_range(edit.span, &edit.replacement);
    }
    Some(result)
}

/// A manifest read from disk.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    pub path: PathBuf,
    pub content: String,
}

impl ManifestFile {
    pub fn read(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            content: fs::read_to_string(path)?,
        })
    }

    /// Rewrites every tracked declaration to `mode`.
    ///
    /// Returns the new content, or `None` if nothing changed.
    pub fn switch(
        &self,
        scanner: &BlockScanner,
        family: &DependencyFamily,
        mode: &SourceMode,
    ) -> Option<String> {
        let edits: Vec<Edit> = scanner
            .scan(&self.content)
            .iter()
            .map(|block| Edit {
                span: block.span(),
                replacement: rewrite_block(&self.content, block, family, mode),
            })
            .collect();

        log::debug!(
            "{}: {} tracked declaration(s)",
            self.path.display(),
            edits.len()
        );

        apply_edits(&self.content, edits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_apply_edits_back_to_front() {
        let content = "aaa bbb ccc";
        let edits = vec![
            Edit {
                span: 0..3,
                replacement: "A".into(),
            },
            Edit {
                span: 8..11,
                replacement: "CCCCC".into(),
            },
        ];
        assert_eq!(apply_edits(content, edits).unwrap(), "A bbb CCCCC");
    }

    #[test]
    fn test_apply_edits_unchanged() {
        let content = "aaa bbb";
        let edits = vec![Edit {
            span: 4..7,
            replacement: "bbb".into(),
        }];
        assert_eq!(apply_edits(content, edits), None);
        assert_eq!(apply_edits(content, Vec::new()), None);
    }

    #[test]
    fn test_switch_preserves_surrounding_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Cargo.toml");
        let input = "[package]\r\nname = \"drive\"\r\n\r\n[dependencies]\r\n# pinned for now\r\ngrovedb = { version = \"3.0.0\", optional = true }  # storage\r\nserde = \"1\"\r\ngrovedb-costs = \"3.0.0\"\r\n";
        fs::write(&path, input).unwrap();

        let manifest = ManifestFile::read(&path).unwrap();
        let family = DependencyFamily::grovedb();
        let scanner = BlockScanner::new(family.crate_names()).unwrap();
        let output = manifest
            .switch(&scanner, &family, &SourceMode::Branch("develop".into()))
            .unwrap();

        assert_eq!(
            output,
            "[package]\r\nname = \"drive\"\r\n\r\n[dependencies]\r\n# pinned for now\r\ngrovedb = { git = \"https://github.com/dashpay/grovedb\", branch = \"develop\", optional = true }  # storage\r\nserde = \"1\"\r\ngrovedb-costs = { git = \"https://github.com/dashpay/grovedb\", branch = \"develop\" }\r\n"
        );
    }

    #[test]
    fn test_switch_without_tracked_deps() {
        let manifest = ManifestFile {
            path: PathBuf::from("Cargo.toml"),
            content: "[dependencies]\nserde = \"1\"\n".into(),
        };
        let family = DependencyFamily::dashcore();
        let scanner = BlockScanner::new(family.crate_names()).unwrap();
        assert_eq!(manifest.switch(&scanner, &family, &SourceMode::Local), None);
    }
}
