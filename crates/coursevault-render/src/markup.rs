//! Escaping and markers for the HTML and Markdown this crate generates itself.

/// Opening tag of a link whose target could not be found.
pub const BROKEN_LINK_OPEN: &str =
    r##"<a href="#" class="broken-link" style="color: red; text-decoration: underline;">"##;

/// Inline marker for a link whose target could not be found.
pub fn broken_link(label: &str) -> String {
    format!("{}{}</a>", BROKEN_LINK_OPEN, escape_html(label))
}

/// Inline marker for an attachment or image that could not be found.
pub fn missing_reference(target: &str) -> String {
    format!(
        r#"<span class="reference-missing">Reference not found: {}</span>"#,
        escape_html(target)
    )
}

/// Escape text for an HTML text node or a quoted attribute value.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape text placed inside Markdown link brackets.
pub fn escape_link_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
