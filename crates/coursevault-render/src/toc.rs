//! Heading ids and the table of contents.
//!
//! Every heading gets a unique `id` from [`HeadingSlugger`]; ids written by
//! the author (`# Title {#id}`) are kept and reserved first. The first
//! heading whose text is one of the configured contents titles (`Contents`,
//! `Содержание`, ...) is the contents heading: a nested link list of the
//! headings after it is inserted below it, and it is left out of the
//! returned TOC.

use crate::markup::escape_html;
use coursevault_core::TocItem;
use coursevault_parser::HeadingSlugger;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};

struct HeadingInfo {
    title: String,
    id: String,
    level: u8,
}

/// Assign heading ids, insert the contents list, and extract the TOC.
///
/// The first heading `is_contents` accepts gets the generated list and is
/// left out of the TOC.
pub fn process_headings<F>(
    events: Vec<Event<'_>>,
    is_contents: F,
) -> (Vec<Event<'_>>, Vec<TocItem>)
where
    F: Fn(&str) -> bool,
{
    let headings = collect_headings(&events);
    let contents = headings.iter().position(|h| is_contents(&h.title));

    let toc: Vec<TocItem> = headings
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != contents)
        .map(|(_, h)| TocItem::new(h.title.clone(), h.id.clone(), h.level))
        .collect();

    let contents_list = contents.map(|i| {
        let following: Vec<TocItem> = headings[i + 1..]
            .iter()
            .map(|h| TocItem::new(h.title.clone(), h.id.clone(), h.level))
            .collect();
        render_contents_list(&following)
    });

    let mut output = Vec::with_capacity(events.len() + 1);
    let mut ids = headings.into_iter().map(|h| h.id);
    let mut heading_index = 0usize;

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let assigned = ids.next().map(CowStr::from).or(id);
                output.push(Event::Start(Tag::Heading {
                    level,
                    id: assigned,
                    classes,
                    attrs,
                }));
            }
            Event::End(TagEnd::Heading(level)) => {
                output.push(Event::End(TagEnd::Heading(level)));
                if Some(heading_index) == contents
                    && let Some(list) = &contents_list
                {
                    output.push(Event::Html(CowStr::from(list.clone())));
                }
                heading_index += 1;
            }
            other => output.push(other),
        }
    }

    (output, toc)
}

/// Headings in document order with their final ids.
fn collect_headings(events: &[Event<'_>]) -> Vec<HeadingInfo> {
    let mut slugger = HeadingSlugger::new();
    for event in events {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            slugger.reserve(id);
        }
    }

    let mut headings = Vec::new();
    let mut current: Option<(u8, Option<String>, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current = Some((*level as u8, id.as_ref().map(|s| s.to_string()), String::new()));
            }
            Event::Text(text) | Event::Code(text) | Event::InlineMath(text) => {
                if let Some((_, _, title)) = current.as_mut() {
                    title.push_str(text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, _, title)) = current.as_mut() {
                    title.push(' ');
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, explicit, title)) = current.take() {
                    let title = title.trim().to_string();
                    let id = explicit.unwrap_or_else(|| slugger.slug(&title));
                    headings.push(HeadingInfo { title, id, level });
                }
            }
            _ => {}
        }
    }

    headings
}

/// Nested `<ul>` mirroring heading depth.
fn render_contents_list(items: &[TocItem]) -> String {
    let mut html = String::from("<nav class=\"table-of-contents\">");
    // Heading level of each open <ul>
    let mut open: Vec<u8> = Vec::new();

    for item in items {
        match open.last().copied() {
            None => {
                html.push_str("<ul>");
                open.push(item.level);
            }
            Some(top) if item.level > top => {
                html.push_str("<ul>");
                open.push(item.level);
            }
            Some(_) => {
                html.push_str("</li>");
                while open.len() > 1 && item.level <= open[open.len() - 2] {
                    html.push_str("</ul></li>");
                    open.pop();
                }
                if let Some(top) = open.last_mut() {
                    *top = (*top).min(item.level);
                }
            }
        }
        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            escape_html(&item.id),
            escape_html(&item.title)
        ));
    }

    if !open.is_empty() {
        html.push_str("</li>");
        for _ in 1..open.len() {
            html.push_str("</ul></li>");
        }
        html.push_str("</ul>");
    }
    html.push_str("</nav>\n");
    html
}
