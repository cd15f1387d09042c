//! Content module - post model, front-matter and body formatting

mod formatter;
mod frontmatter;
mod post;

pub use formatter::{format, ContentBlock, InlineText, ListKind, Span};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use post::{Post, PostId};
