//! Derived analysis metadata recomputed on every content write.

use serde::{Deserialize, Serialize};

/// One entry of a document's heading outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Heading text without the leading hashes.
    pub text: String,
    /// 1-based line number within the body.
    pub line: usize,
}

/// Result of analysing a document's raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// First level-1 heading, or a title derived from the filename.
    pub title: String,
    /// Number of lines in the raw content.
    pub line_count: usize,
    /// Heading outline in document order.
    pub heading_tree: Vec<HeadingEntry>,
    /// Number of fenced code blocks.
    pub code_block_count: usize,
    /// Distinct fenced-code languages in first-seen order.
    pub code_languages: Vec<String>,
    /// Number of tables.
    pub table_count: usize,
    /// Number of inline images.
    pub image_count: usize,
    /// Whether a non-empty front-matter block is present.
    pub has_frontmatter: bool,
}

impl DocumentAnalysis {
    /// Number of headings in the outline.
    pub fn heading_count(&self) -> usize {
        self.heading_tree.len()
    }
}
