//! # CourseVault Parser
//!
//! Course Markdown syntax on top of `pulldown-cmark`.
//!
//! This crate provides:
//! - Front-matter splitting and YAML parsing into flat key/value metadata
//! - Wikilink and embed recognition (`[[Note|Alias]]`, `![[image.png]]`)
//! - **Code block awareness**: patterns inside code spans, code blocks and
//!   math are never matched
//! - Callout header parsing (`> [!NOTE]- Title`)
//! - Heading anchor ids shared by the renderer and `[[Note#Heading]]` links
//! - Link destination classification
//!
//! ## Architecture
//!
//! pulldown-cmark runs once over the input to find the byte ranges of code
//! and math. The regex layers then scan the raw text, skipping those ranges.
//!
//! ## Quick Start
//!
//! ```
//! use coursevault_parser::{parse_document, parse_wikilinks};
//!
//! let content = "---\ntitle: Ownership\n---\nSee [[Borrowing|borrows]] and `[[not this]]`.";
//!
//! let doc = parse_document(content).unwrap();
//! assert_eq!(doc.metadata.title(), Some("Ownership"));
//!
//! let links = parse_wikilinks(&doc.body);
//! assert_eq!(links.len(), 1);
//! assert_eq!(links[0].target, "Borrowing");
//! assert_eq!(links[0].label(), "borrows");
//! ```

mod engine;
pub mod parsers;

pub use engine::ExcludedRanges;
pub use parsers::callouts::{
    CalloutHeader, default_title, parse_callout_header, parse_callout_line,
};
pub use parsers::frontmatter_parser::{
    parse_document, parse_document_lenient, parse_frontmatter, split_frontmatter,
};
pub use parsers::headings::{HeadingSlugger, slugify};
pub use parsers::link_utils::{
    LinkKind, classify_url, has_markdown_extension, is_explicit_relative, is_external,
    split_anchor,
};
pub use parsers::wikilinks::{WikiLink, parse_wikilinks, replace_wikilinks};

/// Convenient prelude for common imports.
pub mod prelude {
    pub use coursevault_core::{Document, Frontmatter};

    pub use crate::{
        CalloutHeader, HeadingSlugger, LinkKind, WikiLink, classify_url, parse_callout_header,
        parse_document, parse_document_lenient, parse_wikilinks, replace_wikilinks, slugify,
        split_frontmatter,
    };
}
