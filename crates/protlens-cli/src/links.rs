//! Link rendering for annotation text
//!
//! Knowledge-base free text carries literature citations such as
//! `(PubMed:123, PubMed:456)` and occasional inline `[label](url)` links.
//! [`render_links`] turns such text into typed [`Segment`]s, which are then
//! rendered for a specific surface ([`to_html`], [`to_terminal`],
//! [`to_plain`]). Text is never interpreted as markup.
//!
//! The passes run in a fixed order and never overlap:
//!
//! 1. parenthesized PubMed citation runs become links to the literature service
//! 2. remaining `[label](url)` occurrences become links
//! 3. every `". "` left in plain text becomes a sentence break

use crate::api::endpoints::pubmed_url;
use askama::{Html, MarkupDisplay};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Marker appended to every external link
pub const EXTERNAL_LINK_GLYPH: &str = "↗";

#[allow(clippy::expect_used)]
static PUBMED_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*PubMed:\d+(?:\s*,\s*PubMed:\d+)*\s*\)").expect("valid PubMed run pattern")
});

#[allow(clippy::expect_used)]
static PUBMED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PubMed:(\d+)").expect("valid PubMed id pattern"));

#[allow(clippy::expect_used)]
static INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("valid inline link pattern"));

/// An external link; always opens outside the current view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// One piece of rendered annotation text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    Link(Link),
    LineBreak,
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text { text: text.into() }
    }

    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Segment::Link(Link {
            label: label.into(),
            url: url.into(),
        })
    }
}

/// Split annotation text into text, link and line-break segments
pub fn render_links(text: &str) -> Vec<Segment> {
    let segments = pubmed_pass(text);
    let segments = flat_map_text(segments, inline_link_pass);
    let segments = merge_text(segments);
    flat_map_text(segments, sentence_break_pass)
}

fn pubmed_pass(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut last = 0;

    for run in PUBMED_RUN.find_iter(text) {
        push_text(&mut out, &text[last..run.start()]);
        out.push(Segment::text("("));

        for (i, id) in PUBMED_ID.captures_iter(run.as_str()).enumerate() {
            if i > 0 {
                out.push(Segment::text(", "));
            }
            let id = &id[1];
            out.push(Segment::link(id, pubmed_url(id)));
        }

        out.push(Segment::text(")"));
        last = run.end();
    }

    push_text(&mut out, &text[last..]);
    out
}

fn inline_link_pass(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut last = 0;

    for caps in INLINE_LINK.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut out, &text[last..whole.start()]);
        out.push(Segment::link(&caps[1], &caps[2]));
        last = whole.end();
    }

    push_text(&mut out, &text[last..]);
    out
}

fn sentence_break_pass(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut parts = text.split(". ").peekable();

    while let Some(part) = parts.next() {
        if parts.peek().is_some() {
            out.push(Segment::text(format!("{part}.")));
            out.push(Segment::LineBreak);
        } else {
            push_text(&mut out, part);
        }
    }

    out
}

/// Apply `pass` to every text segment, leaving links and breaks untouched
fn flat_map_text(segments: Vec<Segment>, pass: fn(&str) -> Vec<Segment>) -> Vec<Segment> {
    segments
        .into_iter()
        .flat_map(|segment| match segment {
            Segment::Text { text } => pass(&text),
            other => vec![other],
        })
        .collect()
}

fn merge_text(segments: Vec<Segment>) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Text { text } => match out.last_mut() {
                Some(Segment::Text { text: prev }) => prev.push_str(&text),
                _ => out.push(Segment::Text { text }),
            },
            other => out.push(other),
        }
    }
    out
}

fn push_text(out: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        out.push(Segment::text(text));
    }
}

/// HTML-escape a string for element content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    MarkupDisplay::new_unsafe(text, Html).to_string()
}

/// Render segments as an HTML fragment
pub fn to_html(segments: &[Segment]) -> String {
    let mut html = String::new();
    for segment in segments {
        match segment {
            Segment::Text { text } => html.push_str(&escape_html(text)),
            Segment::Link(link) => html.push_str(&format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">{} {}</a>"#,
                escape_html(&link.url),
                escape_html(&link.label),
                EXTERNAL_LINK_GLYPH
            )),
            Segment::LineBreak => html.push_str("<br>"),
        }
    }
    html
}

/// Render segments for a terminal
///
/// With `hyperlinks` set, links are emitted as OSC 8 hyperlinks; otherwise
/// the URL is printed after the label.
pub fn to_terminal(segments: &[Segment], hyperlinks: bool) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text { text } => out.push_str(text),
            Segment::Link(link) if hyperlinks => out.push_str(&format!(
                "\x1b]8;;{}\x1b\\{} {}\x1b]8;;\x1b\\",
                link.url, link.label, EXTERNAL_LINK_GLYPH
            )),
            Segment::Link(link) => out.push_str(&format!(
                "{} {} <{}>",
                link.label, EXTERNAL_LINK_GLYPH, link.url
            )),
            Segment::LineBreak => out.push('\n'),
        }
    }
    out
}

/// Render segments as plain text; links keep only their label
pub fn to_plain(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text { text } => out.push_str(text),
            Segment::Link(link) => out.push_str(&link.label),
            Segment::LineBreak => out.push('\n'),
        }
    }
    out
}

/// Links contained in a segment list, in order
pub fn links(segments: &[Segment]) -> impl Iterator<Item = &Link> {
    segments.iter().filter_map(|segment| match segment {
        Segment::Link(link) => Some(link),
        _ => None,
    })
}
