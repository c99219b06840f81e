//! Wikilink parser: `[[Note]]`, `[[folder/Note]]`, `[[Note#Heading]]`,
//! `[[Note|Alias]]` and the embed form `![[image.png]]`.
//!
//! Matching is non-greedy and does not nest: the inner text may not contain
//! `[` or `]`, so `[[a [[b]] c]]` yields only `[[b]]`.

use crate::engine::ExcludedRanges;
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

/// `!?[[inner]]`, inner free of brackets
static WIKILINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\[\]]+?)\]\]").unwrap());

/// Fast pre-filter: skip parsing if no wikilink opener exists.
#[inline]
fn has_wikilink(content: &str) -> bool {
    content.contains("[[")
}

/// One `[[...]]` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    /// Byte range of the whole match, `!` included
    pub range: Range<usize>,
    /// Written as `![[...]]`
    pub is_embed: bool,
    /// Target without anchor, trimmed; empty for same-page `[[#Heading]]`
    pub target: String,
    /// Text after `#`, if any
    pub anchor: Option<String>,
    /// Text after `|`, if any
    pub display_text: Option<String>,
    /// Everything before `|` as written (target plus anchor)
    pub raw: String,
}

impl WikiLink {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let whole = caps.get(0)?;
        let is_embed = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let inner = caps.get(2)?.as_str();

        let (dest, display) = match inner.split_once('|') {
            // `\|` is how a pipe is escaped inside table cells
            Some((dest, display)) => (dest.strip_suffix('\\').unwrap_or(dest), Some(display)),
            None => (inner, None),
        };
        let dest = dest.trim();

        let (target, anchor) = match dest.split_once('#') {
            Some((target, anchor)) => (target.trim(), Some(anchor.trim())),
            None => (dest, None),
        };

        if target.is_empty() && anchor.is_none_or(str::is_empty) {
            return None;
        }

        Some(Self {
            range: whole.range(),
            is_embed,
            target: target.to_string(),
            anchor: anchor.filter(|a| !a.is_empty()).map(str::to_string),
            display_text: display
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            raw: dest.to_string(),
        })
    }

    /// Text shown to the reader: the alias, else the target exactly as written.
    pub fn label(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.raw)
    }

    /// Link to a heading of the current page (`[[#Heading]]`).
    pub fn is_same_page(&self) -> bool {
        self.target.is_empty()
    }
}

/// Parse all wikilinks and embeds outside code spans, in document order.
pub fn parse_wikilinks(content: &str) -> Vec<WikiLink> {
    if !has_wikilink(content) {
        return Vec::new();
    }

    let excluded = ExcludedRanges::scan(content);
    WIKILINK_PATTERN
        .captures_iter(content)
        .filter_map(|caps| WikiLink::from_captures(&caps))
        .filter(|link| !excluded.overlaps(&link.range))
        .collect()
}

/// Replace every wikilink outside code spans with the string `replace` returns.
///
/// Text between matches is copied through untouched.
pub fn replace_wikilinks<F>(content: &str, mut replace: F) -> String
where
    F: FnMut(&WikiLink) -> String,
{
    let links = parse_wikilinks(content);
    if links.is_empty() {
        return content.to_string();
    }

    let mut output = String::with_capacity(content.len() + links.len() * 32);
    let mut last = 0;
    for link in &links {
        output.push_str(&content[last..link.range.start]);
        output.push_str(&replace(link));
        last = link.range.end;
    }
    output.push_str(&content[last..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_wikilink() {
        let links = parse_wikilinks("See [[Note]]");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "Note");
        assert!(!links[0].is_embed);
        assert_eq!(links[0].label(), "Note");
    }

    #[test]
    fn test_wikilink_with_folder() {
        let links = parse_wikilinks("See [[folder/Note]]");
        assert_eq!(links[0].target, "folder/Note");
    }

    #[test]
    fn test_wikilink_with_heading() {
        let links = parse_wikilinks("See [[Note#Some Heading]]");
        assert_eq!(links[0].target, "Note");
        assert_eq!(links[0].anchor.as_deref(), Some("Some Heading"));
        assert_eq!(links[0].label(), "Note#Some Heading");
    }

    #[test]
    fn test_same_page_anchor() {
        let links = parse_wikilinks("Jump to [[#Setup]]");
        assert!(links[0].is_same_page());
        assert_eq!(links[0].anchor.as_deref(), Some("Setup"));
    }

    #[test]
    fn test_wikilink_with_display_text() {
        let links = parse_wikilinks("See [[Note|Display Text]]");
        assert_eq!(links[0].target, "Note");
        assert_eq!(links[0].display_text.as_deref(), Some("Display Text"));
        assert_eq!(links[0].label(), "Display Text");
    }

    #[test]
    fn test_escaped_pipe_in_table() {
        let links = parse_wikilinks("| [[Note\\|Alias]] |");
        assert_eq!(links[0].target, "Note");
        assert_eq!(links[0].label(), "Alias");
    }

    #[test]
    fn test_embed() {
        let links = parse_wikilinks("![[image.png]]");
        assert_eq!(links.len(), 1);
        assert!(links[0].is_embed);
        assert_eq!(links[0].range, 0..14);
    }

    #[test]
    fn test_multiple_wikilinks() {
        let links = parse_wikilinks("[[Note1]] and [[Note2]] and [[Note3]]");
        let targets: Vec<_> = links.iter().map(|l| l.target.as_str()).collect();
        assert_eq!(targets, vec!["Note1", "Note2", "Note3"]);
    }

    #[test]
    fn test_no_nesting() {
        let links = parse_wikilinks("[[a [[b]] c]]");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "b");
    }

    #[test]
    fn test_empty_inner_ignored() {
        assert!(parse_wikilinks("[[ ]] and [[#]]").is_empty());
    }

    #[test]
    fn test_code_spans_skipped() {
        let content = "`[[code]]`\n\n```\n[[fenced]]\n```\n\n[[real]]";
        let links = parse_wikilinks(content);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "real");
    }

    #[test]
    fn test_replace_wikilinks() {
        let out = replace_wikilinks("a [[x]] b `[[y]]` c ![[z.png]]", |link| {
            format!("<{}{}>", if link.is_embed { "!" } else { "" }, link.target)
        });
        assert_eq!(out, "a <x> b `[[y]]` c <!z.png>");
    }

    #[test]
    fn test_replace_without_links_is_identity() {
        let content = "plain [text](url)";
        assert_eq!(replace_wikilinks(content, |_| unreachable!()), content);
    }
}
