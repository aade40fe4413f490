pub type SpanSeq = Vec<Span>;

/// Inline formatting kinds produced by the tokenizer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SpanKind {
    Plain,
    Bold,
    Italic,
    Code,
    Link,
    Image,
}

/// One inline-formatted fragment of a block's text. `url` is set only for
/// `Link` and `Image` spans.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
    pub url: Option<String>,
}

impl Span {
    pub fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            url: None,
        }
    }

    pub fn with_url(kind: SpanKind, text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            url: Some(url.into()),
        }
    }
}

/// Structural type of one markdown block, recomputed from the block's text
/// rather than stored alongside it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlockType {
    Code,
    Heading,
    Quote,
    UnorderedList,
    OrderedList,
    Paragraph,
}

/// A minimal DOM-like tree. Leaves carry rendered text (a `None` tag means
/// raw text with no wrapping element); containers carry children and never
/// direct text. Attributes render in insertion order.
#[derive(Clone, Debug, PartialEq)]
pub enum HtmlNode {
    Leaf {
        tag: Option<String>,
        text: String,
        attrs: Vec<(String, String)>,
    },
    Container {
        tag: String,
        children: Vec<HtmlNode>,
        attrs: Vec<(String, String)>,
    },
}

impl HtmlNode {
    pub fn leaf(tag: Option<&str>, text: impl Into<String>) -> Self {
        HtmlNode::Leaf {
            tag: tag.map(str::to_string),
            text: text.into(),
            attrs: Vec::new(),
        }
    }

    pub fn leaf_with_attrs(
        tag: &str,
        text: impl Into<String>,
        attrs: Vec<(String, String)>,
    ) -> Self {
        HtmlNode::Leaf {
            tag: Some(tag.to_string()),
            text: text.into(),
            attrs,
        }
    }

    pub fn container(tag: &str, children: Vec<HtmlNode>) -> Self {
        HtmlNode::Container {
            tag: tag.to_string(),
            children,
            attrs: Vec::new(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Leaf { tag, .. } => tag.as_deref(),
            HtmlNode::Container { tag, .. } => Some(tag),
        }
    }
}

/// Which tags bold and italic spans map to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TagProfile {
    /// `<strong>` / `<em>`.
    #[default]
    Semantic,
    /// `<b>` / `<i>`.
    Literal,
}

impl TagProfile {
    pub fn bold_tag(self) -> &'static str {
        match self {
            TagProfile::Semantic => "strong",
            TagProfile::Literal => "b",
        }
    }

    pub fn italic_tag(self) -> &'static str {
        match self {
            TagProfile::Semantic => "em",
            TagProfile::Literal => "i",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BuildOptions {
    pub tag_profile: TagProfile,
}
