//! The rendering pipeline.

use crate::callouts::transform_callouts;
use crate::context::RenderContext;
use crate::links::rewrite_links;
use crate::rewriter::ReferenceRewriter;
use crate::toc::process_headings;
use coursevault_core::RenderedDocument;
use pulldown_cmark::{Event, Options, Parser, html};
use tracing::instrument;

/// Markdown to HTML for course documents.
///
/// Stages, in order: wiki-link pre-pass, CommonMark parse, callouts,
/// heading ids and table of contents, link and image rewriting, HTML.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_MATH);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        Self { options }
    }

    /// Render a document body (front-matter already removed).
    ///
    /// Never fails: references that do not resolve are rendered as visible
    /// markers and listed in [`RenderedDocument::unresolved`].
    #[instrument(skip_all, fields(course = ctx.course_slug, bytes = body.len()), name = "render_document")]
    pub fn render(&self, body: &str, ctx: &RenderContext<'_>) -> RenderedDocument {
        let rewritten = ReferenceRewriter::new(*ctx).rewrite(body);
        let mut unresolved = rewritten.unresolved;

        let events: Vec<Event> = Parser::new_ext(&rewritten.text, self.options).collect();
        let events = transform_callouts(events);
        let (events, toc) = process_headings(events, |t| ctx.config.is_contents_title(t));
        let events = rewrite_links(events, ctx, &mut unresolved);

        let mut html_output = String::with_capacity(rewritten.text.len() * 3 / 2);
        html::push_html(&mut html_output, events.into_iter());

        if !unresolved.is_empty() {
            log::debug!(
                "{} unresolved references in {} document",
                unresolved.len(),
                ctx.course_slug
            );
        }

        RenderedDocument {
            html: html_output,
            toc,
            unresolved,
        }
    }
}
