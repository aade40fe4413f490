use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{BlockType, BuildOptions, HtmlNode, Span, SpanKind};
use crate::block::{FENCE, classify, segment};
use crate::error::ParseError;
use crate::inline::tokenize;

static ORDERED_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+").unwrap());

/// Builds the HTML node tree for a markdown document. The root is always a
/// `div` container holding one child per block, in document order.
pub fn build(markdown: &str) -> Result<HtmlNode, ParseError> {
    build_with_options(markdown, &BuildOptions::default())
}

pub fn build_with_options(
    markdown: &str,
    options: &BuildOptions,
) -> Result<HtmlNode, ParseError> {
    let blocks = segment(markdown)?;
    let mut children = Vec::new();

    for block in &blocks {
        match classify(block) {
            BlockType::Code => children.push(build_code_block(block)?),
            BlockType::Heading => children.extend(build_heading(block, options)),
            BlockType::Quote => children.push(build_quote(block, options)),
            BlockType::UnorderedList => children.push(build_list(block, false, options)),
            BlockType::OrderedList => children.push(build_list(block, true, options)),
            BlockType::Paragraph => children.push(build_paragraph(block, options)),
        }
    }

    Ok(HtmlNode::container("div", children))
}

/// Extracts the document title: the first `# ` heading line, trimmed.
pub fn extract_title(markdown: &str) -> Result<String, ParseError> {
    for line in markdown.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("# ") {
            return Ok(rest.trim().to_string());
        }
    }
    Err(ParseError::NoTitle)
}

/// `pre > code > raw text`, with the fence lines (including any language
/// tag on the opener) stripped.
fn build_code_block(block: &str) -> Result<HtmlNode, ParseError> {
    let lines: Vec<&str> = block.split('\n').collect();
    if lines.len() < 3 {
        return Err(ParseError::InvalidCodeBlock);
    }
    let mut lines = &lines[..];
    if lines
        .first()
        .is_some_and(|line| line.trim_start().starts_with(FENCE))
    {
        lines = &lines[1..];
    }
    if lines.last().is_some_and(|line| line.trim() == FENCE) {
        lines = &lines[..lines.len() - 1];
    }
    let code = HtmlNode::container("code", vec![HtmlNode::leaf(None, lines.join("\n"))]);
    Ok(HtmlNode::container("pre", vec![code]))
}

/// `h1`..`h6` from the first line; any lines after the heading's own line
/// become a sibling paragraph.
fn build_heading(block: &str, options: &BuildOptions) -> Vec<HtmlNode> {
    let count = block.chars().take_while(|&c| c == '#').count();
    let (first, rest) = match block.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (block, None),
    };

    let tag = format!("h{count}");
    let title = first.trim_start_matches('#').trim();
    let mut nodes = vec![HtmlNode::container(&tag, spans_to_nodes(tokenize(title), options))];

    if let Some(rest) = rest {
        nodes.push(HtmlNode::container(
            "p",
            spans_to_nodes(tokenize(rest), options),
        ));
    }
    nodes
}

/// `blockquote > p`, with `>` markers stripped and the lines joined on
/// single spaces (runs of whitespace collapse).
fn build_quote(block: &str, options: &BuildOptions) -> HtmlNode {
    let joined = block
        .lines()
        .map(|line| line.trim_start_matches('>').trim())
        .collect::<Vec<_>>()
        .join(" ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    let paragraph = HtmlNode::container("p", spans_to_nodes(tokenize(&collapsed), options));
    HtmlNode::container("blockquote", vec![paragraph])
}

fn build_list(block: &str, ordered: bool, options: &BuildOptions) -> HtmlNode {
    let items = split_list_items(block, ordered);
    let children = items
        .iter()
        .map(|item| HtmlNode::container("li", spans_to_nodes(tokenize(item), options)))
        .collect();
    let tag = if ordered { "ol" } else { "ul" };
    HtmlNode::container(tag, children)
}

fn build_paragraph(block: &str, options: &BuildOptions) -> HtmlNode {
    HtmlNode::container("p", spans_to_nodes(tokenize(block), options))
}

/// Splits a list block into item texts. A new item starts at each marker
/// line; blank or continuation lines append to the current item.
fn split_list_items(block: &str, ordered: bool) -> Vec<String> {
    let mut items = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for raw in block.split('\n') {
        let mut line = raw.to_string();
        let mut is_new_item = false;

        if !ordered && (line.starts_with("* ") || line.starts_with("- ")) {
            is_new_item = true;
            line = line[2..].to_string();
        } else if ordered && ORDERED_PREFIX_RE.is_match(&line) {
            is_new_item = true;
            line = ORDERED_PREFIX_RE.replace(&line, "").into_owned();
        }

        if is_new_item {
            if !current.is_empty() {
                items.push(current.join("\n"));
            }
            current = vec![line];
        } else if line.trim().is_empty() {
            if !current.is_empty() {
                current.push(line);
            }
        } else if !current.is_empty() {
            current.push(line.trim().to_string());
        }
    }

    if !current.is_empty() {
        items.push(current.join("\n"));
    }
    items
}

fn spans_to_nodes(spans: Vec<Span>, options: &BuildOptions) -> Vec<HtmlNode> {
    spans
        .iter()
        .map(|span| span_to_node(span, options))
        .collect()
}

fn span_to_node(span: &Span, options: &BuildOptions) -> HtmlNode {
    let profile = options.tag_profile;
    match span.kind {
        SpanKind::Plain => HtmlNode::leaf(None, &span.text),
        SpanKind::Bold => HtmlNode::leaf(Some(profile.bold_tag()), &span.text),
        SpanKind::Italic => HtmlNode::leaf(Some(profile.italic_tag()), &span.text),
        SpanKind::Code => HtmlNode::leaf(Some("code"), &span.text),
        SpanKind::Link => HtmlNode::leaf_with_attrs(
            "a",
            &span.text,
            vec![("href".to_string(), span.url.clone().unwrap_or_default())],
        ),
        // The image's "text" is its alt attribute; the element body stays
        // empty and is exempt from the empty-value check.
        SpanKind::Image => HtmlNode::leaf_with_attrs(
            "img",
            "",
            vec![
                ("src".to_string(), span.url.clone().unwrap_or_default()),
                ("alt".to_string(), span.text.clone()),
            ],
        ),
    }
}
