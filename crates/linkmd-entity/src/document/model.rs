//! Document entity model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use linkmd_core::types::{DocumentId, FolderId, ProjectId};

use super::analysis::{DocumentAnalysis, HeadingEntry};
use crate::tag::Tag;

/// A text document archived in a project.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// The owning project.
    pub project_id: ProjectId,
    /// Containing folder (`None` for the project root).
    pub folder_id: Option<FolderId>,
    /// Filename including extension, unique within its folder.
    pub filename: String,
    /// Derived title.
    pub title: String,
    /// Full text.
    pub content: String,
    /// Content size in bytes.
    pub file_size: i64,
    /// Number of lines.
    pub line_count: i64,
    /// Number of headings.
    pub heading_count: i64,
    /// Number of fenced code blocks.
    pub code_block_count: i64,
    /// Number of tables.
    pub table_count: i64,
    /// Number of images.
    pub image_count: i64,
    /// Detected fenced-code languages.
    pub code_languages: Json<Vec<String>>,
    /// Heading outline.
    pub heading_tree: Json<Vec<HeadingEntry>>,
    /// Whether the document carries front matter.
    pub has_frontmatter: bool,
    /// Mirror-relative path recorded at the last write. May be stale.
    pub original_path: Option<String>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// The filename without its final extension.
    pub fn stem(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.filename)
    }
}

/// Data required to insert a new document row.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// The owning project.
    pub project_id: ProjectId,
    /// Containing folder.
    pub folder_id: Option<FolderId>,
    /// Filename.
    pub filename: String,
    /// Full text.
    pub content: String,
    /// Analysis of `content`.
    pub analysis: DocumentAnalysis,
    /// Mirror-relative path.
    pub original_path: String,
}

/// Lightweight result of archiving one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    /// New document ID.
    pub id: DocumentId,
    /// Stored filename.
    pub filename: String,
    /// Derived title.
    pub title: String,
    /// Size in bytes.
    pub file_size: i64,
    /// Number of headings.
    pub heading_count: i64,
    /// Number of code blocks.
    pub code_block_count: i64,
    /// Number of tables.
    pub table_count: i64,
    /// Number of lines.
    pub line_count: i64,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            title: doc.title.clone(),
            file_size: doc.file_size,
            heading_count: doc.heading_count,
            code_block_count: doc.code_block_count,
            table_count: doc.table_count,
            line_count: doc.line_count,
        }
    }
}

/// A document together with its tag list, as returned by mutating calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentWithTags {
    /// The document record.
    #[serde(flatten)]
    pub document: Document,
    /// Tags attached to the document.
    pub tags: Vec<Tag>,
}

/// Folder filter for document listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderScope {
    /// Documents in any folder of the project.
    Any,
    /// Documents directly at the project root.
    Root,
    /// Documents directly inside the given folder.
    Folder(FolderId),
}

impl FolderScope {
    /// Build a scope for an optional folder reference (`None` = project root).
    pub fn exact(folder_id: Option<FolderId>) -> Self {
        match folder_id {
            Some(id) => Self::Folder(id),
            None => Self::Root,
        }
    }
}

/// Heading histogram used to plan a split.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingStats {
    /// Document ID.
    pub doc_id: DocumentId,
    /// Document title.
    pub title: String,
    /// Heading level to number of headings at that level. Zero counts are omitted.
    pub stats: BTreeMap<u8, usize>,
}

/// Result of splitting a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitOutcome {
    /// The source document.
    pub original_id: DocumentId,
    /// Whether the source document was retained.
    pub kept: bool,
    /// Documents created from the chunks, in chunk order.
    pub created: Vec<DocumentSummary>,
}
