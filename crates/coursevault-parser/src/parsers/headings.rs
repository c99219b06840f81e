//! Heading anchor ids.
//!
//! The same slugger produces the `id` attribute on rendered headings and the
//! fragment of `[[Note#Heading]]` links, so in-page anchors always line up.

use std::collections::HashMap;

/// Generate a URL-friendly anchor from heading text.
///
/// Lowercases, keeps letters, digits, `_` and `-`, turns whitespace into `-`
/// and drops everything else. Non-Latin letters are kept as-is.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '_' {
                Some(c)
            } else if c.is_whitespace() || c == '-' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Assigns unique heading ids within one document.
///
/// Repeated headings get `-1`, `-2`, ... appended, in document order.
#[derive(Debug, Default, Clone)]
pub struct HeadingSlugger {
    seen: HashMap<String, usize>,
}

impl HeadingSlugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unique id for a heading with this text.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let base = if base.is_empty() {
            "section".to_string()
        } else {
            base
        };
        self.claim(base)
    }

    /// Register an id the author set explicitly (`# Title {#id}`).
    ///
    /// Returns the id unchanged; later generated ids will avoid it.
    pub fn reserve(&mut self, id: &str) -> String {
        self.seen.entry(id.to_string()).or_insert(0);
        id.to_string()
    }

    fn claim(&mut self, base: String) -> String {
        let Some(count) = self.seen.get(&base).copied() else {
            self.seen.insert(base.clone(), 0);
            return base;
        };

        let mut n = count + 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(base, n);
                self.seen.insert(candidate.clone(), 0);
                return candidate;
            }
            n += 1;
        }
    }
}
