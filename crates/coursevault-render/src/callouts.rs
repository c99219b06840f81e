//! Callout blocks: `> [!TYPE]± optional title` block quotes become
//! collapsible containers.
//!
//! GFM block-quote tags are not enabled on the parser, so the `[!TYPE]`
//! marker reaches this pass as ordinary text.

use crate::markup::escape_html;
use coursevault_parser::{CalloutHeader, parse_callout_line};
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use std::iter::Peekable;

/// Replace callout block quotes with `div.callout` containers.
///
/// The header line is consumed; whatever follows it in the first paragraph,
/// and every later block, becomes the callout body. Inline formatting in the
/// title is kept and still reaches the later passes.
pub fn transform_callouts(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut output = Vec::with_capacity(events.len());
    // One entry per open block quote: was it turned into a callout?
    let mut open: Vec<bool> = Vec::new();
    let mut iter = events.into_iter().peekable();

    while let Some(event) = iter.next() {
        match event {
            Event::Start(Tag::BlockQuote(kind)) => {
                if !matches!(iter.peek(), Some(Event::Start(Tag::Paragraph))) {
                    open.push(false);
                    output.push(Event::Start(Tag::BlockQuote(kind)));
                    continue;
                }

                let paragraph = iter.next();
                let (texts, rest) = first_line(&mut iter);
                let lead: String = texts.iter().map(|t| t.as_ref()).collect();

                match parse_callout_line(&lead) {
                    Some((header, raw_title)) => {
                        open.push(true);
                        output.push(Event::Html(CowStr::from(callout_open(&header))));
                        if rest.is_empty() {
                            output.push(Event::Text(CowStr::from(header.title)));
                        } else {
                            if !raw_title.is_empty() {
                                output.push(Event::Text(CowStr::from(raw_title.to_string())));
                            }
                            output.extend(rest);
                        }
                        output.push(Event::Html(CowStr::from(
                            "</div><div class=\"callout-content\">\n",
                        )));

                        match iter.peek() {
                            Some(Event::End(TagEnd::Paragraph)) => {
                                iter.next();
                            }
                            Some(Event::SoftBreak | Event::HardBreak) => {
                                iter.next();
                                output.extend(paragraph);
                            }
                            _ => output.extend(paragraph),
                        }
                    }
                    None => {
                        open.push(false);
                        output.push(Event::Start(Tag::BlockQuote(kind)));
                        output.extend(paragraph);
                        output.extend(texts.into_iter().map(Event::Text));
                        output.extend(rest);
                    }
                }
            }
            Event::End(TagEnd::BlockQuote(kind)) => {
                if open.pop().unwrap_or(false) {
                    output.push(Event::Html(CowStr::from("</div></div>\n")));
                } else {
                    output.push(Event::End(TagEnd::BlockQuote(kind)));
                }
            }
            other => output.push(other),
        }
    }

    output
}

/// Split the first line of a paragraph into its leading text run and the
/// inline events after it. Stops before the line break or paragraph end,
/// never inside an open inline element.
fn first_line<'a, I>(iter: &mut Peekable<I>) -> (Vec<CowStr<'a>>, Vec<Event<'a>>)
where
    I: Iterator<Item = Event<'a>>,
{
    let mut texts = Vec::new();
    while let Some(Event::Text(_)) = iter.peek() {
        if let Some(Event::Text(text)) = iter.next() {
            texts.push(text);
        }
    }

    let mut rest = Vec::new();
    let mut depth = 0usize;
    while let Some(event) = iter.peek() {
        match event {
            Event::End(TagEnd::Paragraph) if depth == 0 => break,
            Event::SoftBreak | Event::HardBreak if depth == 0 => break,
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        if let Some(event) = iter.next() {
            rest.push(event);
        }
    }

    (texts, rest)
}

fn callout_open(header: &CalloutHeader) -> String {
    format!(
        "<div class=\"callout\" data-callout=\"{}\" data-collapsed=\"{}\">\
         <div class=\"callout-title\">",
        escape_html(&header.kind),
        header.collapsed,
    )
}
