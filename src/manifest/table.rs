//! Inline table parsing and serialization.
//!
//! Operates on the inner text of a TOML inline table (`{` and `}` stripped).
//! Values are kept as raw source text, including their quoting, so a pair
//! that is not modified is written back exactly as it was read.
//!
//! Splitting only happens on top-level commas: commas inside arrays
//! (`features = ["a", "b"]`), nested inline tables and quoted strings belong
//! to the value.

/// One `key = value` entry of an inline table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePair {
    pub key: String,
    pub value: String,
}

impl AttributePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parses the inner text of an inline table into ordered pairs.
///
/// Entries without `=` are dropped.
pub fn parse_pairs(inner: &str) -> Vec<AttributePair> {
    split_top_level(inner)
        .into_iter()
        .filter_map(|entry| {
            let Some((key, value)) = entry.split_once('=') else {
                let entry = entry.trim();
                if !entry.is_empty() {
                    log::debug!("Dropping malformed inline table entry: {}", entry);
                }
                return None;
            };
            Some(AttributePair::new(key.trim(), value.trim()))
        })
        .collect()
}

/// Serializes pairs as `prefix{ k = v, k = v }`.
pub fn serialize_pairs(prefix: &str, pairs: &[AttributePair]) -> String {
    if pairs.is_empty() {
        return format!("{prefix}{{}}");
    }

    let body = pairs
        .iter()
        .map(|p| format!("{} = {}", p.key, p.value))
        .collect::<Vec<_>>()
        .join(", ");

    format!("{prefix}{{ {body} }}")
}

/// Quotes `value` as a TOML basic string.
pub fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn split_top_level(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' && quote == '"' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => in_string = Some(c),
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    parts.push(&inner[start..]);
    parts
}
