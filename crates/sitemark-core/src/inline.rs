use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Span, SpanKind, SpanSeq};

static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\[\]]*)\]\(([^()]*)\)").unwrap());

static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]\(([^()]*)\)").unwrap());

/// Turns one block's raw text into an ordered sequence of spans.
///
/// Images are extracted first, then links, then emphasis and code
/// delimiters on the remaining plain text. Unmatched or malformed
/// delimiters degrade to literal text; this never fails.
pub fn tokenize(text: &str) -> SpanSeq {
    let nodes = vec![Span::new(SpanKind::Plain, text)];
    let nodes = split_images(nodes);
    let nodes = split_links(nodes);
    split_delimiters(nodes)
}

fn split_images(nodes: SpanSeq) -> SpanSeq {
    let mut out = Vec::new();
    for node in nodes {
        if node.kind != SpanKind::Plain {
            out.push(node);
            continue;
        }
        let mut last = 0;
        for caps in IMAGE_RE.captures_iter(&node.text) {
            let (Some(whole), Some(alt), Some(url)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if whole.start() > last {
                out.push(Span::new(SpanKind::Plain, &node.text[last..whole.start()]));
            }
            out.push(Span::with_url(SpanKind::Image, alt.as_str(), url.as_str()));
            last = whole.end();
        }
        if last == 0 {
            out.push(node);
        } else if last < node.text.len() {
            out.push(Span::new(SpanKind::Plain, &node.text[last..]));
        }
    }
    out
}

fn split_links(nodes: SpanSeq) -> SpanSeq {
    let mut out = Vec::new();
    for node in nodes {
        if node.kind != SpanKind::Plain {
            out.push(node);
            continue;
        }
        let mut last = 0;
        let mut matched = false;
        for caps in LINK_RE.captures_iter(&node.text) {
            let (Some(whole), Some(text), Some(url)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            // `![..](..)` is an image, not a link. The regex crate has no
            // lookbehind, so the preceding byte is checked here instead.
            if whole.start() > 0 && node.text.as_bytes()[whole.start() - 1] == b'!' {
                continue;
            }
            if whole.start() > last {
                out.push(Span::new(SpanKind::Plain, &node.text[last..whole.start()]));
            }
            out.push(Span::with_url(SpanKind::Link, text.as_str(), url.as_str()));
            last = whole.end();
            matched = true;
        }
        if !matched {
            out.push(node);
        } else if last < node.text.len() {
            out.push(Span::new(SpanKind::Plain, &node.text[last..]));
        }
    }
    out
}

/// Delimiters in priority order, longest first, so `**` is never mistaken
/// for two italic markers.
const DELIMITERS: [(SpanKind, &str); 3] = [
    (SpanKind::Bold, "**"),
    (SpanKind::Italic, "*"),
    (SpanKind::Code, "`"),
];

fn split_delimiters(nodes: SpanSeq) -> SpanSeq {
    let mut out = Vec::new();
    for node in nodes {
        if matches!(node.kind, SpanKind::Link | SpanKind::Image) {
            out.push(node);
            continue;
        }

        let text = &node.text;
        let mut i = 0;
        let mut pairs_found = false;

        while i < text.len() {
            // Leftmost valid pair wins; ties go to the earlier (longer)
            // delimiter in the list.
            let mut best: Option<(SpanKind, &str, usize, usize)> = None;
            for (kind, delim) in DELIMITERS {
                let Some(rel) = text[i..].find(delim) else {
                    continue;
                };
                let open = i + rel;
                let Some(close) = find_closing(text, delim, open) else {
                    continue;
                };
                if best.is_none_or(|(_, _, prev_open, _)| open < prev_open) {
                    best = Some((kind, delim, open, close));
                    pairs_found = true;
                }
            }

            let Some((kind, delim, open, close)) = best else {
                break;
            };
            if open > i {
                out.push(Span::new(node.kind, &text[i..open]));
            }
            // Nested content is re-tokenized under the matched kind, so
            // plain stretches inside inherit it (italic-inside-bold etc.).
            let inner = &text[open + delim.len()..close];
            out.extend(split_delimiters(vec![Span::new(kind, inner)]));
            i = close + delim.len();
        }

        if !pairs_found {
            out.push(node);
        } else if i < text.len() {
            let trailing = &text[i..];
            if out.last().map(|span| span.text.as_str()) != Some(trailing) {
                out.push(Span::new(node.kind, trailing));
            }
        }
    }
    out
}

/// Finds the closing occurrence of `delim` after `open`, skipping closes
/// that are part of a longer identical-character run (a lone `*` search
/// must step over `**`). Byte scanning is safe here: delimiters are ASCII
/// and ASCII bytes never occur inside multi-byte UTF-8 sequences.
fn find_closing(text: &str, delim: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let delim = delim.as_bytes();
    let mut pos = open + delim.len();
    while pos < bytes.len() {
        if delim == b"*" && bytes[pos..].starts_with(b"**") {
            pos += 2;
            continue;
        }
        if bytes[pos..].starts_with(delim) {
            return Some(pos);
        }
        pos += 1;
    }
    None
}
