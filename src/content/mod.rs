//! Content module - post files, front-matter, excerpts and markdown

pub mod excerpt;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod source;

pub use frontmatter::{FieldValue, FrontMatter};
pub use loader::{LoadError, PostLoader};
pub use markdown::MarkdownRenderer;
pub use post::{derive_id, parse_date_string, Post};
pub use source::{DirSource, FetchError, HttpSource, PostSource};
