//! # CourseVault Render
//!
//! Course Markdown to HTML.
//!
//! A document body goes through one pipeline per request:
//!
//! 1. **Wiki-link pre-pass**: `[[Note]]`, `[[Note#Heading|label]]` and
//!    `![[image.png]]` become standard Markdown pointing at page URLs or the
//!    file-serving endpoint. Unresolved targets become inline markers.
//! 2. **Parse** with `pulldown-cmark` (tables, math, strikethrough, task
//!    lists, footnotes, heading attributes).
//! 3. **Callouts**: `> [!TYPE]- Title` block quotes become collapsible
//!    `div.callout` containers.
//! 4. **Headings**: unique ids, an inserted contents list under a
//!    `Contents` heading, and the extracted TOC.
//! 5. **Links and images** written in standard syntax are resolved against
//!    the course tree.
//!
//! ## Example
//!
//! ```no_run
//! use coursevault_index::prelude::*;
//! use coursevault_render::{MarkdownRenderer, RenderContext};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<()> {
//! let config = Arc::new(SiteConfig::builder("/srv/courses").build()?);
//! let index = IndexCache::for_config(Arc::clone(&config)).get()?;
//! let loaded = DocumentLoader::new(Arc::clone(&config))
//!     .load(&index, "rust", Path::new("Week 1/Ownership"))?;
//!
//! let ctx = RenderContext::for_document(&config, &index, "rust", &loaded);
//! let page = MarkdownRenderer::new().render(&loaded.document.body, &ctx);
//! println!("{} headings, {} broken references", page.toc.len(), page.unresolved.len());
//! # Ok(())
//! # }
//! ```

pub mod callouts;
pub mod context;
pub mod links;
pub mod markup;
pub mod renderer;
pub mod rewriter;
pub mod toc;
pub mod urls;

pub use callouts::transform_callouts;
pub use context::RenderContext;
pub use links::rewrite_links;
pub use renderer::MarkdownRenderer;
pub use rewriter::{ReferenceRewriter, Rewritten};
pub use toc::process_headings;
pub use urls::{encode_path, file_url};

pub mod prelude {
    pub use crate::context::RenderContext;
    pub use crate::renderer::MarkdownRenderer;
    pub use crate::rewriter::{ReferenceRewriter, Rewritten};
    pub use coursevault_core::{RenderedDocument, TocItem};
}
