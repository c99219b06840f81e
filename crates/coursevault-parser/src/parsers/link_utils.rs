//! Shared utilities for link classification.
//!
//! Used by the render-time link and image pass to decide which hrefs are
//! rewritten against the course tree and which pass through untouched.

use coursevault_core::utils::extension_of;

/// What a Markdown link or image destination points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// Has a scheme (`https:`, `mailto:`, `data:`) or is protocol-relative
    External,
    /// `#fragment` within the current page
    Anchor,
    /// Starts with `/`: already a site URL
    Absolute,
    /// Path to a Markdown document
    Document,
    /// Path to a non-Markdown file; carries the lowercase extension
    File(String),
    /// Relative path without an extension
    Other,
}

/// Classify a link destination.
///
/// ```
/// use coursevault_parser::{LinkKind, classify_url};
///
/// assert_eq!(classify_url("https://example.com"), LinkKind::External);
/// assert_eq!(classify_url("#section"), LinkKind::Anchor);
/// assert_eq!(classify_url("/api/files/c/a.png"), LinkKind::Absolute);
/// assert_eq!(classify_url("../notes/Intro.md#setup"), LinkKind::Document);
/// assert_eq!(classify_url("attachments/diagram.PNG"), LinkKind::File("png".into()));
/// assert_eq!(classify_url("folder/readme"), LinkKind::Other);
/// ```
pub fn classify_url(url: &str) -> LinkKind {
    if is_external(url) {
        return LinkKind::External;
    }
    if url.starts_with('#') {
        return LinkKind::Anchor;
    }
    if url.starts_with('/') {
        return LinkKind::Absolute;
    }

    let (path, _) = split_anchor(url);
    match extension_of(path) {
        Some(ext) if ext == "md" => LinkKind::Document,
        Some(ext) => LinkKind::File(ext),
        None => LinkKind::Other,
    }
}

/// True for URLs with a scheme and for protocol-relative `//host` URLs.
pub fn is_external(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    // Single letters are Windows drive prefixes, not schemes
    scheme.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Written as `./x` or `../x`: resolve strictly against the current folder.
pub fn is_explicit_relative(reference: &str) -> bool {
    reference.starts_with("./") || reference.starts_with("../")
}

/// Split `path#fragment` (and drop any `?query`) into its parts.
pub fn split_anchor(url: &str) -> (&str, Option<&str>) {
    let (before_fragment, fragment) = match url.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (url, None),
    };
    let path = before_fragment
        .split_once('?')
        .map_or(before_fragment, |(path, _)| path);
    (path, fragment.filter(|f| !f.is_empty()))
}

/// Path carries a `.md` extension (any case).
pub fn has_markdown_extension(path: &str) -> bool {
    extension_of(path).is_some_and(|ext| ext == "md")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external() {
        assert!(is_external("https://example.com"));
        assert!(is_external("http://example.com/path"));
        assert!(is_external("mailto:user@example.com"));
        assert!(is_external("data:image/png;base64,AAAA"));
        assert!(is_external("//cdn.example.com/x.png"));
        assert!(!is_external("notes/file.md"));
        assert!(!is_external("C:/notes/file.md"));
        assert!(!is_external("a b:c"));
    }

    #[test]
    fn test_explicit_relative() {
        assert!(is_explicit_relative("./img.png"));
        assert!(is_explicit_relative("../img.png"));
        assert!(!is_explicit_relative("img.png"));
        assert!(!is_explicit_relative(".hidden/img.png"));
    }

    #[test]
    fn test_split_anchor() {
        assert_eq!(split_anchor("file.md#sec"), ("file.md", Some("sec")));
        assert_eq!(split_anchor("file.md"), ("file.md", None));
        assert_eq!(split_anchor("file.md#"), ("file.md", None));
        assert_eq!(split_anchor("file.pdf?page=2#x"), ("file.pdf", Some("x")));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify_url("Intro.MD"), LinkKind::Document);
        assert_eq!(classify_url("slides.pdf"), LinkKind::File("pdf".into()));
        assert_eq!(classify_url("#top"), LinkKind::Anchor);
        assert_eq!(classify_url("/course/topic"), LinkKind::Absolute);
        assert_eq!(classify_url("ftp://host/file.md"), LinkKind::External);
    }

    #[test]
    fn test_has_markdown_extension() {
        assert!(has_markdown_extension("a/b/c.md"));
        assert!(!has_markdown_extension("a.md/c"));
        assert!(!has_markdown_extension("md"));
    }
}
