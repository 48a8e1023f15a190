//! Dependency declaration scanner.
//!
//! Finds every `name = { ... }` and `name = "..."` assignment for a set of
//! tracked crate names. The scanner works on raw text rather than a TOML
//! document so that everything outside the located spans, comments and
//! formatting included, stays byte-for-byte identical.
//!
//! A name only matches as a whole key: it must start a line or follow
//! whitespace, `{` or `,`, and be followed by optional whitespace and `=`.
//! `grovedb` therefore never matches `grovedb-costs = ...` or
//! `my-grovedb = ...`.
//!
//! Declarations on commented-out lines are skipped.

use crate::error::Result;
use regex::Regex;
use std::ops::Range;

/// Syntactic shape of a located declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `name = { key = value, ... }`
    InlineTable,
    /// `name = "1.2.3"`
    BareString,
}

/// A located dependency declaration.
///
/// `start..end` covers the whole assignment, from the first byte of the
/// name to the closing `}` or `"`. `value_start` is the offset of the opening
/// `{` or `"`, so `start..value_start` is the key and `=` with their original
/// spacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyBlock {
    pub start: usize,
    pub value_start: usize,
    pub end: usize,
    pub name: String,
    pub kind: BlockKind,
}

impl DependencyBlock {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Full declaration text.
    pub fn text<'a>(&self, content: &'a str) -> &'a str {
        &content[self.span()]
    }

    /// Text preceding the value, e.g. `grovedb = `.
    pub fn prefix<'a>(&self, content: &'a str) -> &'a str {
        &content[self.start..self.value_start]
    }

    /// Value text with its delimiters stripped.
    pub fn inner<'a>(&self, content: &'a str) -> &'a str {
        &content[self.value_start + 1..self.end - 1]
    }
}

/// Compiled matcher for one set of tracked names.
#[derive(Debug, Clone)]
pub struct BlockScanner {
    pattern: Option<Regex>,
}

impl BlockScanner {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut names: Vec<&str> = names.into_iter().collect();
        if names.is_empty() {
            return Ok(Self { pattern: None });
        }

        // Longest first so alternation prefers `grovedb-costs` over `grovedb`.
        names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = Regex::new(&format!(
            r#"(?:^|[\s{{,])(?P<name>{alternation})\s*=[ \t]*(?:(?P<table>\{{[^{{}}]*\}})|(?P<bare>"[^"\r\n]*"))"#
        ))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Returns every uncommented declaration in `content`, in file order.
    pub fn scan(&self, content: &str) -> Vec<DependencyBlock> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        pattern
            .captures_iter(content)
            .filter_map(|caps| {
                let name = caps.name("name")?;
                let (value, kind) = match (caps.name("table"), caps.name("bare")) {
                    (Some(table), _) => (table, BlockKind::InlineTable),
                    (None, Some(bare)) => (bare, BlockKind::BareString),
                    (None, None) => return None,
                };

                if is_commented(content, name.start()) {
                    log::debug!("Skipping commented declaration of '{}'", name.as_str());
                    return None;
                }

                Some(DependencyBlock {
                    start: name.start(),
                    value_start: value.start(),
                    end: value.end(),
                    name: name.as_str().to_string(),
                    kind,
                })
            })
            .collect()
    }
}

/// Whether `offset` sits behind a `#` comment marker on its line.
fn is_commented(content: &str, offset: usize) -> bool {
    let line_start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
    let before = &content[line_start..offset];

    let mut in_string: Option<char> = None;
    for c in before.chars() {
        match in_string {
            Some(q) if c == q => in_string = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => in_string = Some(c),
            None if c == '#' => return true,
            None => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> BlockScanner {
        BlockScanner::new(["grovedb", "grovedb-costs", "dashcore"]).unwrap()
    }

    #[test]
    fn test_finds_tables_and_bare_strings() {
        let content = r#"[dependencies]
grovedb = { git = "https://github.com/dashpay/grovedb", rev = "abc" }
grovedb-costs = "3.0.0"
serde = "1"
"#;
        let blocks = scanner().scan(content);
        assert_eq!(blocks.len(), 2);

        assert_eq!(blocks[0].name, "grovedb");
        assert_eq!(blocks[0].kind, BlockKind::InlineTable);
        assert_eq!(
            blocks[0].text(content),
            r#"grovedb = { git = "https://github.com/dashpay/grovedb", rev = "abc" }"#
        );
        assert_eq!(blocks[0].prefix(content), "grovedb = ");

        assert_eq!(blocks[1].name, "grovedb-costs");
        assert_eq!(blocks[1].kind, BlockKind::BareString);
        assert_eq!(blocks[1].inner(content), "3.0.0");
    }

    #[test]
    fn test_skips_commented_lines() {
        let content = r#"[dependencies]
# dashcore = { path = "../x" }
    #grovedb = "1.0"
serde = "1" # grovedb = "2.0"
dashcore = { path = "../y" }
"#;
        let blocks = scanner().scan(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(content), r#"dashcore = { path = "../y" }"#);
    }

    #[test]
    fn test_hash_inside_string_is_not_a_comment() {
        let content = "x = { a = \"#\", dashcore = \"1\" }\n";
        let blocks = scanner().scan(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(content), "dashcore = \"1\"");
    }

    #[test]
    fn test_no_substring_matches() {
        let content = r#"grovedb-storage = { path = "../s" }
my-grovedb = "1"
dashcore_hashes = "1"
grovedbx = "1"
"#;
        assert!(scanner().scan(content).is_empty());
    }

    #[test]
    fn test_multiline_inline_table() {
        let content = "dashcore = {\n    path = \"../x\",\n    features = [\"std\"],\n}\nother = 1\n";
        let blocks = scanner().scan(content);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].text(content).ends_with('}'));
        assert_eq!(blocks[0].end, content.find("}\n").unwrap() + 1);
    }

    #[test]
    fn test_crlf_content() {
        let content = "[dependencies]\r\ngrovedb = \"1.0\"\r\n# grovedb = \"0.9\"\r\n";
        let blocks = scanner().scan(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text(content), "grovedb = \"1.0\"");
    }

    #[test]
    fn test_empty_name_set() {
        let scanner = BlockScanner::new(std::iter::empty()).unwrap();
        assert!(scanner.scan("grovedb = \"1\"").is_empty());
    }
}
