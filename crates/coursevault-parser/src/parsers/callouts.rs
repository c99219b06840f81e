//! Callout header parser: `[!NOTE]`, `[!TIP]- Folded`, `[!warning+] Title`.
//!
//! Only the first line of a block quote is inspected here; the renderer owns
//! the block structure. Any word is accepted as the type and kept as a
//! lowercase style tag, so custom callouts style the same way built-in ones do.
//!
//! The fold marker may follow the closing bracket (`[!NOTE]-`) or sit inside
//! it (`[!NOTE-]`). `-` means collapsed by default; `+` or nothing means
//! expanded.

use regex::Regex;
use std::sync::LazyLock;

/// `[!TYPE]` with optional fold marker inside or after the bracket, then title
static CALLOUT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[!(\w+(?:-\w+)*)([+-]?)\]([+-]?)(?:\s+(.*?))?\s*$").unwrap()
});

/// Fast pre-filter: skip regex if no callout opener exists.
#[inline]
fn has_callout(line: &str) -> bool {
    line.contains("[!")
}

/// Parsed first line of a callout block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutHeader {
    /// Lowercase type tag, e.g. `note`
    pub kind: String,
    /// Explicit title, or the type with its first letter capitalized
    pub title: String,
    /// Collapsed by default (`-` marker)
    pub collapsed: bool,
    /// Any fold marker present
    pub foldable: bool,
}

/// Parse the first line of a block quote as a callout header.
///
/// ```
/// use coursevault_parser::parse_callout_header;
///
/// let header = parse_callout_header("[!WARNING]- Careful").unwrap();
/// assert_eq!(header.kind, "warning");
/// assert_eq!(header.title, "Careful");
/// assert!(header.collapsed);
///
/// assert_eq!(parse_callout_header("[!tip]").unwrap().title, "Tip");
/// assert!(parse_callout_header("plain quote").is_none());
/// ```
pub fn parse_callout_header(line: &str) -> Option<CalloutHeader> {
    parse_callout_line(line).map(|(header, _)| header)
}

/// Like [`parse_callout_header`], also returning the text after the marker
/// with only leading whitespace removed.
///
/// Used when the title continues past `line` (formatted titles arrive in
/// pieces), so the space before the next piece must survive.
pub fn parse_callout_line(line: &str) -> Option<(CalloutHeader, &str)> {
    if !has_callout(line) {
        return None;
    }

    let caps = CALLOUT_HEADER.captures(line)?;
    let raw_kind = caps.get(1)?.as_str();
    let inner_fold = caps.get(2).map_or("", |m| m.as_str());
    let outer = caps.get(3)?;
    let fold = if inner_fold.is_empty() { outer.as_str() } else { inner_fold };

    let title = caps
        .get(4)
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
        .map_or_else(|| default_title(raw_kind), str::to_string);

    let header = CalloutHeader {
        kind: raw_kind.to_lowercase(),
        title,
        collapsed: fold == "-",
        foldable: !fold.is_empty(),
    };
    Some((header, line[outer.end()..].trim_start()))
}

/// `NOTE` -> `Note`, `tip` -> `Tip`.
pub fn default_title(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_callout() {
        let header = parse_callout_header("[!NOTE]").unwrap();
        assert_eq!(header.kind, "note");
        assert_eq!(header.title, "Note");
        assert!(!header.collapsed);
        assert!(!header.foldable);
    }

    #[test]
    fn test_callout_with_title() {
        let header = parse_callout_header("[!tip] Use the borrow checker").unwrap();
        assert_eq!(header.kind, "tip");
        assert_eq!(header.title, "Use the borrow checker");
    }

    #[test]
    fn test_fold_markers() {
        let collapsed = parse_callout_header("[!NOTE]- Hidden").unwrap();
        assert!(collapsed.collapsed);
        assert!(collapsed.foldable);

        let expanded = parse_callout_header("[!NOTE]+ Shown").unwrap();
        assert!(!expanded.collapsed);
        assert!(expanded.foldable);

        let inside = parse_callout_header("[!NOTE-]").unwrap();
        assert!(inside.collapsed);
        assert_eq!(inside.kind, "note");
        assert_eq!(inside.title, "Note");
    }

    #[test]
    fn test_custom_and_hyphenated_types() {
        assert_eq!(parse_callout_header("[!Exercise]").unwrap().title, "Exercise");
        let header = parse_callout_header("[!my-box] Box").unwrap();
        assert_eq!(header.kind, "my-box");
    }

    #[test]
    fn test_mixed_case_default_title() {
        assert_eq!(default_title("wARNING"), "Warning");
        assert_eq!(default_title(""), "");
    }

    #[test]
    fn test_raw_title_keeps_trailing_space() {
        let (header, rest) = parse_callout_line("[!NOTE]- Use ").unwrap();
        assert_eq!(header.title, "Use");
        assert_eq!(rest, "Use ");

        let (header, rest) = parse_callout_line("[!tip] ").unwrap();
        assert_eq!(header.title, "Tip");
        assert_eq!(rest, "");
    }

    #[test]
    fn test_not_callouts() {
        assert!(parse_callout_header("Just text").is_none());
        assert!(parse_callout_header("[!]").is_none());
        assert!(parse_callout_header("text [!NOTE]").is_none());
        assert!(parse_callout_header("[NOTE]").is_none());
    }
}
