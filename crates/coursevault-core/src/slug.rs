//! Slug normalization for course, folder and document names.
//!
//! Names are transliterated to Latin first, so `Основы Rust` and
//! `Основы_Rust` both become `osnovy-rust`. The output only ever contains
//! `[a-z0-9-]` and never starts or ends with `-`, which makes it safe as a
//! single URL path segment.
//!
//! Different names may normalize to the same slug. Collisions are resolved by
//! the index builder, not here.

use std::collections::HashSet;

/// Normalize an arbitrary filesystem name into a URL-safe slug.
///
/// ```
/// use coursevault_core::normalize_slug;
///
/// assert_eq!(normalize_slug("C++ Basics"), "c-plus-plus-basics");
/// assert_eq!(normalize_slug("v1.2 Notes"), "v1-2-notes");
/// assert_eq!(normalize_slug("Привет мир"), "privet-mir");
/// ```
pub fn normalize_slug(name: &str) -> String {
    let latin = deunicode::deunicode(name);
    let expanded = latin.replace('+', "-plus-").replace('.', "-");

    let mut slug = String::with_capacity(expanded.len());
    for ch in expanded.chars() {
        let ch = if ch.is_ascii_alphanumeric() { ch } else { '-' };
        if ch == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(ch.to_ascii_lowercase());
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Slug of a Markdown document: the name without its `.md` extension.
pub fn document_slug(file_name: &str) -> String {
    normalize_slug(strip_markdown_extension(file_name))
}

/// Remove a trailing `.md` (any case) from a file name.
pub fn strip_markdown_extension(file_name: &str) -> &str {
    let len = file_name.len();
    if len > 3 && file_name.is_char_boundary(len - 3) && file_name[len - 3..].eq_ignore_ascii_case(".md")
    {
        &file_name[..len - 3]
    } else {
        file_name
    }
}

/// Whether this slug is the folder's index document.
pub fn is_index_name(file_name: &str) -> bool {
    document_slug(file_name) == "index"
}

/// Kind of sibling a slug is being assigned to; picks the collision suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugKind {
    File,
    Folder,
}

impl SlugKind {
    fn suffix(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

/// Assigns unique slugs within one sibling scope.
///
/// The first claimant of a slug keeps it. A later claimant gets `-file` or
/// `-folder` appended, then a counter if that is taken too.
///
/// ```
/// use coursevault_core::slug::{SlugKind, SlugScope};
///
/// let mut scope = SlugScope::new();
/// assert_eq!(scope.claim("a-b", SlugKind::Folder), "a-b");
/// assert_eq!(scope.claim("a-b", SlugKind::File), "a-b-file");
/// assert_eq!(scope.claim("a-b", SlugKind::File), "a-b-file-2");
/// ```
#[derive(Debug, Default)]
pub struct SlugScope {
    used: HashSet<String>,
}

impl SlugScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a unique slug derived from `base`.
    pub fn claim(&mut self, base: &str, kind: SlugKind) -> String {
        let base = if base.is_empty() { "untitled" } else { base };

        if self.used.insert(base.to_string()) {
            return base.to_string();
        }

        let suffixed = format!("{}-{}", base, kind.suffix());
        if self.used.insert(suffixed.clone()) {
            return suffixed;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", suffixed, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(normalize_slug("Hello World"), "hello-world");
        assert_eq!(normalize_slug("  spaced  out  "), "spaced-out");
        assert_eq!(normalize_slug("A.B"), "a-b");
        assert_eq!(normalize_slug("A B"), "a-b");
        assert_eq!(normalize_slug("--edge--"), "edge");
        assert_eq!(normalize_slug("under_score"), "under-score");
    }

    #[test]
    fn test_plus_expansion() {
        assert_eq!(normalize_slug("C++"), "c-plus-plus");
        assert_eq!(normalize_slug("a+b"), "a-plus-b");
    }

    #[test]
    fn test_transliteration() {
        assert_eq!(normalize_slug("Введение"), "vvedenie");
        assert_eq!(normalize_slug("Café Crème"), "cafe-creme");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(normalize_slug(""), "");
        assert_eq!(normalize_slug("..."), "");
        assert_eq!(normalize_slug("/"), "");
    }

    #[test]
    fn test_idempotent_and_charset() {
        let names = [
            "Lecture 1. Intro",
            "C++ & Rust",
            "Глава 2: Указатели",
            "日本語のノート",
            "a/b\\c",
            "  --x--  ",
            "Ünïcödé.md",
            "tabs\tand\nnewlines",
            "100% done!",
            "ÆØÅ",
            "emoji 🚀 rocket",
        ];

        for name in names {
            let once = normalize_slug(name);
            let twice = normalize_slug(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", name);
            assert!(
                once.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "bad charset in {:?} -> {:?}",
                name,
                once
            );
            assert!(!once.starts_with('-') && !once.ends_with('-'));
            assert!(!once.contains("--"));
        }
    }

    #[test]
    fn test_document_slug_strips_extension() {
        assert_eq!(document_slug("Intro.md"), "intro");
        assert_eq!(document_slug("README.MD"), "readme");
        assert_eq!(document_slug("notes.v2.md"), "notes-v2");
        assert_eq!(document_slug("image.png"), "image-png");
        assert!(is_index_name("index.md"));
        assert!(is_index_name("Index.md"));
        assert!(!is_index_name("index-old.md"));
    }

    #[test]
    fn test_scope_collisions() {
        let mut scope = SlugScope::new();
        assert_eq!(scope.claim("intro", SlugKind::File), "intro");
        assert_eq!(scope.claim("intro", SlugKind::Folder), "intro-folder");
        assert_eq!(scope.claim("intro", SlugKind::Folder), "intro-folder-2");
        assert_eq!(scope.claim("", SlugKind::File), "untitled");
    }
}
