//! Project tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use linkmd_core::types::{DocumentId, FolderId};

/// A node in a project tree: either a folder with children or a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    /// A folder and its nested content.
    Folder(FolderNode),
    /// A document leaf.
    File(DocumentLeaf),
}

impl TreeNode {
    /// The display name used for ordering.
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.name,
            Self::File(d) => &d.filename,
        }
    }

    /// Whether this node is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

/// A folder node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID.
    pub parent_id: Option<FolderId>,
    /// Position among siblings.
    pub sort_order: i64,
    /// Child folders first, then documents.
    pub children: Vec<TreeNode>,
}

/// A document leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentLeaf {
    /// Document ID.
    pub id: DocumentId,
    /// Document filename.
    pub filename: String,
    /// Document title.
    pub title: String,
    /// Containing folder, if any.
    pub folder_id: Option<FolderId>,
    /// Content size in bytes.
    pub file_size: i64,
    /// Number of headings.
    pub heading_count: i64,
    /// Number of fenced code blocks.
    pub code_block_count: i64,
}
