use std::collections::{HashMap, HashSet};

use ammonia::Builder;

use crate::ast::HtmlNode;
use crate::error::RenderError;

impl HtmlNode {
    /// Renders this node and its subtree to an HTML string.
    ///
    /// A leaf with no tag renders its raw text verbatim (input is trusted
    /// markdown, not escaped); a tagged leaf renders `<tag attrs>text</tag>`.
    /// Containers render their open tag, each child in order, and the close
    /// tag. Attributes render in insertion order as ` key="value"`.
    pub fn to_html(&self) -> Result<String, RenderError> {
        match self {
            HtmlNode::Leaf { tag, text, attrs } => {
                let Some(tag) = tag else {
                    return Ok(text.clone());
                };
                // An image's text is its alt attribute, so an empty body is
                // fine there; everywhere else it is a builder defect.
                if text.is_empty() && tag != "img" {
                    return Err(RenderError::MissingValue(tag.clone()));
                }
                Ok(format!("<{tag}{}>{text}</{tag}>", render_attrs(attrs)))
            }
            HtmlNode::Container {
                tag,
                children,
                attrs,
            } => {
                if tag.is_empty() {
                    return Err(RenderError::MissingTag);
                }
                if children.is_empty() {
                    return Err(RenderError::NoChildren(tag.clone()));
                }
                let mut out = format!("<{tag}{}>", render_attrs(attrs));
                for child in children {
                    out.push_str(&child.to_html()?);
                }
                out.push_str(&format!("</{tag}>"));
                Ok(out)
            }
        }
    }

    /// Renders to HTML and then cleans the result against an allow-list of
    /// exactly the tags and attributes the tree builder can produce.
    pub fn to_html_sanitized(&self) -> Result<String, RenderError> {
        let raw = self.to_html()?;
        Ok(sanitize(&raw))
    }
}

fn render_attrs(attrs: &[(String, String)]) -> String {
    let mut out = String::new();
    for (key, value) in attrs {
        out.push_str(&format!(" {key}=\"{value}\""));
    }
    out
}

fn sanitize(html: &str) -> String {
    let tags: HashSet<&'static str> = [
        "a",
        "b",
        "blockquote",
        "code",
        "div",
        "em",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "i",
        "img",
        "li",
        "ol",
        "p",
        "pre",
        "strong",
        "ul",
    ]
    .iter()
    .copied()
    .collect();

    let mut tag_attributes = HashMap::new();
    tag_attributes.insert("a", ["href"].iter().copied().collect());
    tag_attributes.insert("img", ["alt", "src"].iter().copied().collect());

    Builder::new()
        .tags(tags)
        .tag_attributes(tag_attributes)
        .clean(html)
        .to_string()
}

#[cfg(test)]
mod tests {
    use crate::ast::HtmlNode;
    use crate::error::RenderError;

    #[test]
    fn untagged_leaf_renders_raw_text() {
        let node = HtmlNode::leaf(None, "just text");
        assert_eq!(node.to_html().unwrap(), "just text");
    }

    #[test]
    fn tagged_leaf_wraps_its_text() {
        let node = HtmlNode::leaf(Some("p"), "hello");
        assert_eq!(node.to_html().unwrap(), "<p>hello</p>");
    }

    #[test]
    fn attributes_render_in_insertion_order() {
        let node = HtmlNode::leaf_with_attrs(
            "a",
            "link",
            vec![
                ("href".to_string(), "https://example.com".to_string()),
                ("target".to_string(), "_blank".to_string()),
            ],
        );
        assert_eq!(
            node.to_html().unwrap(),
            "<a href=\"https://example.com\" target=\"_blank\">link</a>"
        );
    }

    #[test]
    fn empty_text_on_a_tagged_leaf_is_an_error() {
        let node = HtmlNode::leaf(Some("p"), "");
        assert_eq!(
            node.to_html().unwrap_err(),
            RenderError::MissingValue("p".to_string())
        );
    }

    #[test]
    fn empty_text_is_allowed_on_an_image_leaf() {
        let node = HtmlNode::leaf_with_attrs(
            "img",
            "",
            vec![
                ("src".to_string(), "x.png".to_string()),
                ("alt".to_string(), "x".to_string()),
            ],
        );
        assert_eq!(
            node.to_html().unwrap(),
            "<img src=\"x.png\" alt=\"x\"></img>"
        );
    }

    #[test]
    fn container_without_children_is_an_error() {
        let node = HtmlNode::container("div", Vec::new());
        assert_eq!(
            node.to_html().unwrap_err(),
            RenderError::NoChildren("div".to_string())
        );
    }

    #[test]
    fn container_without_tag_is_an_error() {
        let node = HtmlNode::container("", vec![HtmlNode::leaf(None, "x")]);
        assert_eq!(node.to_html().unwrap_err(), RenderError::MissingTag);
    }

    #[test]
    fn nested_containers_render_depth_first() {
        let inner = HtmlNode::container("p", vec![HtmlNode::leaf(Some("strong"), "bold")]);
        let outer = HtmlNode::container("div", vec![inner]);
        assert_eq!(
            outer.to_html().unwrap(),
            "<div><p><strong>bold</strong></p></div>"
        );
    }

    #[test]
    fn sanitized_output_drops_unknown_tags() {
        let node = HtmlNode::container(
            "div",
            vec![HtmlNode::leaf(None, "<script>alert(1)</script>safe")],
        );
        let html = node.to_html_sanitized().unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("safe"));
    }
}
