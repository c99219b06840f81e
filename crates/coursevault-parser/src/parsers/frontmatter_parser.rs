//! Frontmatter extraction: `---\nYAML\n---`
//!
//! The block must open on the very first line of the file with a line that is
//! exactly `---` (trailing whitespace and `\r` tolerated) and close with the
//! next such line. Anything else means the file has no front-matter and the
//! whole text is body.

use coursevault_core::{Document, Error, Frontmatter, Result};
use serde_yaml::Value;
use std::path::Path;

/// Split `content` into `(front-matter source, body)`.
///
/// ```
/// use coursevault_parser::split_frontmatter;
///
/// let (fm, body) = split_frontmatter("---\ntitle: X\n---\nBody");
/// assert_eq!(fm, Some("title: X"));
/// assert_eq!(body, "Body");
///
/// let (fm, body) = split_frontmatter("No block here");
/// assert_eq!(fm, None);
/// assert_eq!(body, "No block here");
/// ```
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some((first, rest_start)) = next_line(text, 0) else {
        return (None, content);
    };
    if !is_delimiter(first) {
        return (None, content);
    }

    let mut cursor = rest_start;
    while let Some((line, next)) = next_line(text, cursor) {
        if is_delimiter(line) {
            let fm = text[rest_start..cursor].trim_end_matches(['\n', '\r']);
            return (Some(fm), &text[next..]);
        }
        cursor = next;
    }

    (None, content)
}

/// Parse front-matter source into key/value metadata.
///
/// Scalars keep their written value, sequences are joined with `", "`, nested
/// mappings are kept as JSON text and `null` values are dropped. An empty
/// block is valid and yields empty metadata.
pub fn parse_frontmatter(source: &str) -> Result<Frontmatter> {
    let value: Value = serde_yaml::from_str(source)
        .map_err(|e| Error::parse_error(format!("invalid front-matter YAML: {}", e)))?;

    let mapping = match value {
        Value::Null => return Ok(Frontmatter::default()),
        Value::Mapping(mapping) => mapping,
        _ => {
            return Err(Error::parse_error(
                "front-matter is not a key/value mapping",
            ));
        }
    };

    let mut frontmatter = Frontmatter::default();
    for (key, value) in mapping {
        let Some(key) = scalar_to_string(&key) else {
            continue;
        };
        if let Some(value) = value_to_string(&value) {
            frontmatter.data.insert(key, value);
        }
    }
    Ok(frontmatter)
}

/// Split and parse strictly: malformed front-matter is an error.
pub fn parse_document(content: &str) -> Result<Document> {
    let (source, body) = split_frontmatter(content);
    let metadata = match source {
        Some(source) => parse_frontmatter(source)?,
        None => Frontmatter::default(),
    };
    Ok(Document {
        metadata,
        body: body.to_string(),
    })
}

/// Split and parse, degrading malformed front-matter to empty metadata.
///
/// The body never includes the block, even when the block fails to parse.
pub fn parse_document_lenient(content: &str, source_file: &Path) -> Document {
    let (source, body) = split_frontmatter(content);
    let metadata = match source.map(parse_frontmatter) {
        Some(Ok(metadata)) => metadata,
        Some(Err(e)) => {
            log::warn!(
                "Ignoring malformed front-matter in {}: {}",
                source_file.display(),
                e
            );
            Frontmatter::default()
        }
        None => Frontmatter::default(),
    };
    Document {
        metadata,
        body: body.to_string(),
    }
}

/// Line starting at `start`, without its terminator, and the offset after it.
fn next_line(text: &str, start: usize) -> Option<(&str, usize)> {
    if start >= text.len() {
        return None;
    }
    match text[start..].find('\n') {
        Some(pos) => Some((&text[start..start + pos], start + pos + 1)),
        None => Some((&text[start..], text.len())),
    }
}

#[inline]
fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(value_to_string)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Mapping(_) => serde_json::to_string(value).ok(),
        Value::Tagged(tagged) => value_to_string(&tagged.value),
        scalar => scalar_to_string(scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_frontmatter() {
        let (fm, rest) = split_frontmatter("---\ntitle: Test\n---\nContent here");
        assert_eq!(fm, Some("title: Test"));
        assert_eq!(rest, "Content here");
    }

    #[test]
    fn test_multiline_frontmatter() {
        let content = "---\ntitle: Test\ntags:\n  - rust\n  - parser\n---\nContent";
        let doc = parse_document(content).unwrap();
        assert_eq!(doc.metadata.get("title"), Some("Test"));
        assert_eq!(doc.metadata.get("tags"), Some("rust, parser"));
        assert_eq!(doc.body, "Content");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "Just content\nNo frontmatter";
        let (fm, rest) = split_frontmatter(content);
        assert_eq!(fm, None);
        assert_eq!(rest, content);
    }

    #[test]
    fn test_frontmatter_with_empty_body() {
        let (fm, rest) = split_frontmatter("---\ntitle: Test\n---\n");
        assert_eq!(fm, Some("title: Test"));
        assert_eq!(rest, "");

        let (fm, rest) = split_frontmatter("---\ntitle: Test\n---");
        assert_eq!(fm, Some("title: Test"));
        assert_eq!(rest, "");
    }

    #[test]
    fn test_malformed_frontmatter_only_opening() {
        let content = "---\ntitle: Test\nNo closing";
        let (fm, rest) = split_frontmatter(content);
        assert_eq!(fm, None);
        assert_eq!(rest, content);
    }

    #[test]
    fn test_delimiter_must_be_first_line() {
        let content = "\n---\ntitle: Test\n---\nBody";
        assert_eq!(split_frontmatter(content).0, None);

        let content = "--- \r\ntitle: Test\r\n---\r\nBody";
        let (fm, body) = split_frontmatter(content);
        assert_eq!(fm, Some("title: Test"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_longer_rule_is_not_delimiter() {
        let content = "----\ntitle: x\n----\nBody";
        assert_eq!(split_frontmatter(content).0, None);
    }

    #[test]
    fn test_empty_block() {
        let doc = parse_document("---\n---\nBody").unwrap();
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_quoted_title_round_trip() {
        let doc = parse_document("---\ntitle: \"X\"\norder: 3\ndraft: false\n---\n# X\n").unwrap();
        assert_eq!(doc.metadata.title(), Some("X"));
        assert_eq!(doc.metadata.get("order"), Some("3"));
        assert_eq!(doc.metadata.get("draft"), Some("false"));
        assert_eq!(doc.body, "# X\n");
        assert!(!doc.body.contains("title"));
    }

    #[test]
    fn test_null_values_dropped() {
        let fm = parse_frontmatter("title:\nauthor: Ann").unwrap();
        assert_eq!(fm.get("title"), None);
        assert_eq!(fm.get("author"), Some("Ann"));
    }

    #[test]
    fn test_non_mapping_is_error() {
        assert!(parse_frontmatter("- a\n- b").is_err());
        assert!(parse_frontmatter("title: [unclosed").is_err());
    }

    #[test]
    fn test_lenient_degrades() {
        let doc = parse_document_lenient("---\ntitle: [unclosed\n---\nBody", Path::new("a.md"));
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "Body");
    }
}
