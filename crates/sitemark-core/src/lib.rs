mod ast;
mod block;
mod builder;
mod emit;
mod error;
mod inline;

pub use ast::{BlockType, BuildOptions, HtmlNode, Span, SpanKind, SpanSeq, TagProfile};
pub use block::{classify, segment};
pub use builder::{build, build_with_options, extract_title};
pub use error::{ParseError, RenderError};
pub use inline::tokenize;
