//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use linkmd_core::types::{FolderId, ProjectId};

/// A folder in a project's hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The owning project.
    pub project_id: ProjectId,
    /// Parent folder ID (`None` for folders at the project root).
    pub parent_id: Option<FolderId>,
    /// Folder name, unique among its siblings.
    pub name: String,
    /// Position among siblings.
    pub sort_order: i64,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this folder sits directly under the project root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The owning project.
    pub project_id: ProjectId,
    /// Parent folder (`None` for the project root).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
}
