//! Render-time rewriting of standard Markdown links and images.
//!
//! Images and attachment links go to the file-serving endpoint, links to
//! `.md` files go to page URLs. External, absolute and in-page links pass
//! through untouched, as do relative links to anything else.

use crate::context::RenderContext;
use crate::markup::{BROKEN_LINK_OPEN, missing_reference};
use crate::urls::with_fragment;
use coursevault_parser::{LinkKind, classify_url, is_explicit_relative, split_anchor};
use percent_encoding::percent_decode_str;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};

/// Rewrite link and image destinations against the course tree.
///
/// Targets that do not resolve are appended to `unresolved`.
pub fn rewrite_links<'e>(
    events: Vec<Event<'e>>,
    ctx: &RenderContext<'_>,
    unresolved: &mut Vec<String>,
) -> Vec<Event<'e>> {
    let mut output = Vec::with_capacity(events.len());
    // One entry per open link: was it replaced by a broken-link marker?
    let mut broken: Vec<bool> = Vec::new();
    // Nesting depth inside a missing image whose alt text is dropped
    let mut skipping = 0usize;

    for event in events {
        if skipping > 0 {
            match event {
                Event::Start(Tag::Image { .. }) => skipping += 1,
                Event::End(TagEnd::Image) => skipping -= 1,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => match rewrite_image(&dest_url, ctx) {
                Target::Keep => output.push(Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                })),
                Target::Url(url) => output.push(Event::Start(Tag::Image {
                    link_type,
                    dest_url: CowStr::from(url),
                    title,
                    id,
                })),
                Target::Missing(reference) => {
                    output.push(Event::InlineHtml(CowStr::from(missing_reference(&reference))));
                    unresolved.push(reference);
                    skipping = 1;
                }
            },
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => match rewrite_link(&dest_url, ctx) {
                Target::Keep => {
                    broken.push(false);
                    output.push(Event::Start(Tag::Link {
                        link_type,
                        dest_url,
                        title,
                        id,
                    }));
                }
                Target::Url(url) => {
                    broken.push(false);
                    output.push(Event::Start(Tag::Link {
                        link_type,
                        dest_url: CowStr::from(url),
                        title,
                        id,
                    }));
                }
                Target::Missing(reference) => {
                    broken.push(true);
                    output.push(Event::InlineHtml(CowStr::from(BROKEN_LINK_OPEN)));
                    unresolved.push(reference);
                }
            },
            Event::End(TagEnd::Link) => {
                if broken.pop().unwrap_or(false) {
                    output.push(Event::InlineHtml(CowStr::from("</a>")));
                } else {
                    output.push(Event::End(TagEnd::Link));
                }
            }
            other => output.push(other),
        }
    }

    output
}

enum Target {
    Keep,
    Url(String),
    Missing(String),
}

fn rewrite_image(dest: &str, ctx: &RenderContext<'_>) -> Target {
    match classify_url(dest) {
        LinkKind::External | LinkKind::Absolute | LinkKind::Anchor => Target::Keep,
        _ => {
            let (path, _) = split_anchor(dest);
            let reference = decode(path);
            match resolve(&reference, ctx).and_then(|p| ctx.file_url(&p)) {
                Some(url) => Target::Url(url),
                None => Target::Missing(reference),
            }
        }
    }
}

fn rewrite_link(dest: &str, ctx: &RenderContext<'_>) -> Target {
    let (path, fragment) = split_anchor(dest);
    match classify_url(dest) {
        LinkKind::Document => {
            let reference = decode(path);
            match resolve(&reference, ctx).and_then(|p| ctx.page_url(&p)) {
                Some(url) => Target::Url(with_fragment(url, fragment)),
                None => Target::Missing(reference),
            }
        }
        LinkKind::File(ext) if ctx.config.is_attachment_extension(&ext) => {
            let reference = decode(path);
            match resolve(&reference, ctx).and_then(|p| ctx.file_url(&p)) {
                Some(url) => Target::Url(with_fragment(url, fragment)),
                None => Target::Missing(reference),
            }
        }
        _ => Target::Keep,
    }
}

fn resolve(reference: &str, ctx: &RenderContext<'_>) -> Option<std::path::PathBuf> {
    ctx.resolver()
        .resolve_with(reference, ctx.current_dir, is_explicit_relative(reference))
        .file_path
}

/// Authors write `my%20notes.md` as often as `<my notes.md>`.
fn decode(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}
