//! Code-span awareness for the regex layers.
//!
//! pulldown-cmark knows where fenced blocks, indented blocks, inline code,
//! math and raw HTML live. The regex passes ask this module which byte
//! offsets to leave alone so `[[...]]` inside code is never treated as a link.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use std::ops::Range;

/// Byte ranges to exclude from regex-driven syntax recognition.
#[derive(Debug, Default, Clone)]
pub struct ExcludedRanges {
    ranges: Vec<Range<usize>>,
}

impl ExcludedRanges {
    /// Scan `content` once and record every code, math and HTML range.
    pub fn scan(content: &str) -> Self {
        let mut excluded = Self::default();

        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_TABLES);
        opts.insert(Options::ENABLE_MATH);
        opts.insert(Options::ENABLE_STRIKETHROUGH);
        opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        let mut code_block_start: Option<usize> = None;

        for (event, range) in Parser::new_ext(content, opts).into_offset_iter() {
            match event {
                Event::Start(Tag::CodeBlock(_)) => {
                    code_block_start = Some(range.start);
                }
                Event::End(TagEnd::CodeBlock) => {
                    let start = code_block_start.take().unwrap_or(range.start);
                    excluded.add(start..range.end);
                }
                Event::Code(_)
                | Event::InlineMath(_)
                | Event::DisplayMath(_)
                | Event::Html(_) => {
                    excluded.add(range);
                }
                _ => {}
            }
        }

        excluded.optimize();
        excluded
    }

    /// Check if a byte offset falls within any excluded range.
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        if self.ranges.is_empty() {
            return false;
        }

        // First range starting after `offset`; the candidate is the one before it.
        let idx = self.ranges.partition_point(|r| r.start <= offset);
        if idx == 0 {
            return false;
        }

        offset < self.ranges[idx - 1].end
    }

    /// True when any byte of `range` is excluded.
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        if self.contains(range.start) {
            return true;
        }
        let idx = self.ranges.partition_point(|r| r.start < range.start);
        self.ranges
            .get(idx)
            .is_some_and(|next| next.start < range.end)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    fn add(&mut self, range: Range<usize>) {
        if range.start < range.end {
            self.ranges.push(range);
        }
    }

    /// Sort and merge overlapping ranges for binary-search lookup.
    fn optimize(&mut self) {
        if self.ranges.is_empty() {
            return;
        }
        self.ranges.sort_by_key(|r| r.start);

        let mut merged = Vec::with_capacity(self.ranges.len());
        let mut current = self.ranges[0].clone();

        for range in self.ranges.iter().skip(1) {
            if range.start <= current.end {
                current.end = current.end.max(range.end);
            } else {
                merged.push(current);
                current = range.clone();
            }
        }
        merged.push(current);
        self.ranges = merged;
    }
}
