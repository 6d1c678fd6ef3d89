//! Markdown content analysis.

pub mod frontmatter;
pub mod markdown;
pub mod title;

pub use markdown::MarkdownAnalyzer;
