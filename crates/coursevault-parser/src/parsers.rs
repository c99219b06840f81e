//! Regex layers for the Obsidian-style syntax pulldown-cmark does not know.

pub mod callouts;
pub mod frontmatter_parser;
pub mod headings;
pub mod link_utils;
pub mod wikilinks;
