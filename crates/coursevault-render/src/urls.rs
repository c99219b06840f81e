//! URLs handed to the browser: the file-serving endpoint and fragments.

use coursevault_core::utils::to_slash;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::path::Path;

/// Bytes escaped inside one path segment; unreserved characters stay as-is.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode each segment of a relative path and join them with `/`.
pub fn encode_path(relative: &Path) -> String {
    to_slash(relative)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// `{endpoint}/{course}/{encoded relative path}`.
///
/// ```
/// use coursevault_render::file_url;
/// use std::path::Path;
///
/// assert_eq!(
///     file_url("/api/files", "rust", Path::new("Week 1/diagram.png")),
///     "/api/files/rust/Week%201/diagram.png"
/// );
/// ```
pub fn file_url(endpoint: &str, course_slug: &str, relative: &Path) -> String {
    format!(
        "{}/{}/{}",
        endpoint.trim_end_matches('/'),
        course_slug,
        encode_path(relative)
    )
}

/// Append `#fragment` when there is one.
pub fn with_fragment(url: String, fragment: Option<&str>) -> String {
    match fragment {
        Some(fragment) if !fragment.is_empty() => format!("{}#{}", url, fragment),
        _ => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path(Path::new("attachments/image.png")), "attachments/image.png");
        assert_eq!(encode_path(Path::new("Week 1/a (1).png")), "Week%201/a%20%281%29.png");
        assert_eq!(encode_path(Path::new("Ünïcode/ß.pdf")), "%C3%9Cn%C3%AFcode/%C3%9F.pdf");
    }

    #[test]
    fn test_file_url_trims_endpoint_slash() {
        assert_eq!(
            file_url("/api/files/", "go", Path::new("a.pdf")),
            "/api/files/go/a.pdf"
        );
    }

    #[test]
    fn test_with_fragment() {
        assert_eq!(with_fragment("/go/a".into(), Some("setup")), "/go/a#setup");
        assert_eq!(with_fragment("/go/a".into(), Some("")), "/go/a");
        assert_eq!(with_fragment("/go/a".into(), None), "/go/a");
    }
}
