use thiserror::Error;

/// Failures while segmenting or building markdown. Malformed inline
/// delimiters never reach here; they degrade to literal text instead.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("unclosed code fence in markdown starting with: {0}")]
    UnclosedBlock(String),
    #[error("fenced code block has fewer than three lines")]
    InvalidCodeBlock,
    #[error("no top-level heading to use as a title")]
    NoTitle,
}

/// Structural invariant violations in the node tree. Only reachable through
/// a builder defect, never from malformed markdown.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RenderError {
    #[error("container node is missing a tag")]
    MissingTag,
    #[error("container node <{0}> has no children")]
    NoChildren(String),
    #[error("leaf node <{0}> has no text")]
    MissingValue(String),
}
