// src/render/markdown.rs
// =============================================================================
// Converts a markdown document to HTML.
//
// We use the `pulldown-cmark` crate, which turns markdown into a stream of
// events (heading starts, text, links, ...) and has an HTML writer for that
// stream. Before handing the events to the writer we rewrite two of them:
//
// - Headings get an `id` attribute made from their text, so every section
//   can be linked to ("## Hello World" -> id="hello-world"). Repeated
//   headings get "-1", "-2", ... appended.
// - Links get target="_blank" so they open in a new tab. Links to a
//   fragment on the same page ("#section") are left alone.
//
// Raw HTML in documents is passed through. Documents only ever come from
// the configured repository.
//
// Rust concepts:
// - Iterators and lifetimes: events borrow from the source text
// - HashSet: to remember which heading ids are taken
// =============================================================================

use std::collections::HashSet;

use pulldown_cmark::escape::{escape_href, escape_html};
use pulldown_cmark::{html, CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag};

pub fn render_markdown(source: &[u8]) -> String {
    let text = String::from_utf8_lossy(source);

    let parser = Parser::new_ext(&text, options());
    let events = rewrite(parser);

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

// A heading whose closing event we have not seen yet
struct OpenHeading<'a> {
    level: HeadingLevel,
    id: Option<&'a str>,
    classes: Vec<&'a str>,
    inner: Vec<Event<'a>>,
}

fn rewrite<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut ids = HeadingIds::default();
    let mut out = Vec::new();
    let mut heading: Option<OpenHeading<'a>> = None;

    for event in events {
        let event = match event {
            Event::Start(Tag::Heading(level, id, classes)) => {
                heading = Some(OpenHeading {
                    level,
                    id,
                    classes,
                    inner: Vec::new(),
                });
                continue;
            }
            Event::End(Tag::Heading(..)) => {
                if let Some(open) = heading.take() {
                    let id = match open.id {
                        Some(explicit) => ids.claim(explicit),
                        None => ids.claim(&slugify(&plain_text(&open.inner))),
                    };
                    out.push(Event::Html(heading_open(open.level, &id, &open.classes).into()));
                    out.extend(open.inner);
                    out.push(Event::Html(format!("</{}>\n", open.level).into()));
                }
                continue;
            }
            Event::Start(Tag::Link(kind, dest, title)) => {
                Event::Html(link_open(kind, &dest, &title).into())
            }
            Event::End(Tag::Link(..)) => Event::Html(CowStr::Borrowed("</a>")),
            other => other,
        };

        match heading.as_mut() {
            Some(open) => open.inner.push(event),
            None => out.push(event),
        }
    }

    out
}

fn plain_text(events: &[Event<'_>]) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Text(text) | Event::Code(text) => Some(&**text),
            _ => None,
        })
        .collect()
}

// Lower-case, and every run of non-alphanumeric characters becomes one '-'
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut gap = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.extend(c.to_lowercase());
        } else {
            gap = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}

#[derive(Default)]
struct HeadingIds {
    taken: HashSet<String>,
}

impl HeadingIds {
    // Returns `base`, or `base-N` with the smallest N not used yet
    fn claim(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 0;
        while self.taken.contains(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

// Writing into a String cannot fail, so the io::Result from the escape
// helpers is dropped below.

fn heading_open(level: HeadingLevel, id: &str, classes: &[&str]) -> String {
    let mut tag = format!("<{level} id=\"");
    let _ = escape_html(&mut tag, id);
    tag.push('"');
    if !classes.is_empty() {
        tag.push_str(" class=\"");
        let _ = escape_html(&mut tag, &classes.join(" "));
        tag.push('"');
    }
    tag.push('>');
    tag
}

fn link_open(kind: LinkType, dest: &str, title: &str) -> String {
    let mut tag = String::from("<a href=\"");
    if matches!(kind, LinkType::Email) {
        tag.push_str("mailto:");
    }
    let _ = escape_href(&mut tag, dest);
    tag.push('"');
    if !title.is_empty() {
        tag.push_str(" title=\"");
        let _ = escape_html(&mut tag, title);
        tag.push('"');
    }
    if !dest.starts_with('#') {
        tag.push_str(" target=\"_blank\" rel=\"noopener\"");
    }
    tag.push('>');
    tag
}
