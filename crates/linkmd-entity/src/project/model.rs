//! Project entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use linkmd_core::types::ProjectId;

/// Default accent color for new projects.
pub const DEFAULT_PROJECT_COLOR: &str = "#6366F1";

/// Default icon for new projects.
pub const DEFAULT_PROJECT_ICON: &str = "📁";

/// A project: the top-level container owning a folder tree and a mirror root.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Project name (unique, trimmed, non-empty).
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Display color.
    pub color: String,
    /// Display icon.
    pub icon: String,
    /// Cached number of documents in the project.
    pub doc_count: i64,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional color (defaults to [`DEFAULT_PROJECT_COLOR`]).
    pub color: Option<String>,
    /// Optional icon (defaults to [`DEFAULT_PROJECT_ICON`]).
    pub icon: Option<String>,
}

/// Partial update of a project; `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New color.
    pub color: Option<String>,
    /// New icon.
    pub icon: Option<String>,
}
