//! Wiki-link pre-pass.
//!
//! Turns `[[...]]` and `![[...]]` into standard Markdown links and images
//! (or inline HTML markers) before the document is parsed, so the rest of
//! the pipeline only ever sees CommonMark. Links inside code are untouched.

use crate::context::RenderContext;
use crate::markup::{broken_link, escape_link_text, missing_reference};
use crate::urls::with_fragment;
use coursevault_core::AttachmentKind;
use coursevault_core::utils::extension_of;
use coursevault_parser::{WikiLink, has_markdown_extension, replace_wikilinks, slugify};

/// Output of the pre-pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewritten {
    pub text: String,
    /// Targets that did not resolve, in document order
    pub unresolved: Vec<String>,
}

/// Rewrites wiki-links for one document.
pub struct ReferenceRewriter<'a> {
    ctx: RenderContext<'a>,
}

impl<'a> ReferenceRewriter<'a> {
    pub fn new(ctx: RenderContext<'a>) -> Self {
        Self { ctx }
    }

    /// Rewrite every wiki-link in `markdown`.
    ///
    /// Unresolvable references become inline markers; this never fails.
    pub fn rewrite(&self, markdown: &str) -> Rewritten {
        let mut unresolved = Vec::new();
        let text = replace_wikilinks(markdown, |link| self.rewrite_link(link, &mut unresolved));
        Rewritten { text, unresolved }
    }

    fn rewrite_link(&self, link: &WikiLink, unresolved: &mut Vec<String>) -> String {
        if link.is_same_page() {
            let anchor = link.anchor.as_deref().map(slugify).unwrap_or_default();
            return format!("[{}](#{})", escape_link_text(link.label()), anchor);
        }

        let attachment = extension_of(&link.target)
            .and_then(|ext| self.ctx.config.attachment_kind(&ext));
        match attachment {
            Some(kind) => self.rewrite_attachment(link, kind, unresolved),
            None => self.rewrite_document(link, unresolved),
        }
    }

    /// Attachments are looked up course-wide, never relative to the document.
    fn rewrite_attachment(
        &self,
        link: &WikiLink,
        kind: AttachmentKind,
        unresolved: &mut Vec<String>,
    ) -> String {
        let resolved = self.ctx.resolver().resolve_attachment(&link.target);
        let Some(url) = resolved.path().and_then(|path| self.ctx.file_url(path)) else {
            log::debug!("Attachment {:?} not found in {}", link.target, self.ctx.course_slug);
            unresolved.push(link.raw.clone());
            return missing_reference(&link.raw);
        };

        let label = escape_link_text(link.label());
        match kind {
            AttachmentKind::Image => format!("![{}]({})", label, url),
            AttachmentKind::Document => {
                format!("[{}]({})", label, with_fragment(url, link.anchor.as_deref()))
            }
        }
    }

    fn rewrite_document(&self, link: &WikiLink, unresolved: &mut Vec<String>) -> String {
        let reference = if has_markdown_extension(&link.target) {
            link.target.clone()
        } else {
            format!("{}.md", link.target)
        };

        let resolved = self.ctx.resolver().resolve(&reference, self.ctx.current_dir);
        let Some(url) = resolved.path().and_then(|path| self.ctx.page_url(path)) else {
            log::debug!("Document {:?} not found in {}", reference, self.ctx.course_slug);
            unresolved.push(link.raw.clone());
            return broken_link(link.label());
        };

        let anchor = link.anchor.as_deref().map(slugify);
        format!(
            "[{}]({})",
            escape_link_text(link.label()),
            with_fragment(url, anchor.as_deref())
        )
    }
}
