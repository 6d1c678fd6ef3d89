//! Project repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;

use linkmd_core::error::{AppError, ErrorKind};
use linkmd_core::result::AppResult;
use linkmd_core::types::ProjectId;
use linkmd_entity::project::model::{
    CreateProject, DEFAULT_PROJECT_COLOR, DEFAULT_PROJECT_ICON, Project, UpdateProject,
};

/// Repository for project CRUD and the document-count cache.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: SqlitePool,
}

impl ProjectRepository {
    /// Create a new project repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a project by ID.
    pub async fn find_by_id(&self, id: ProjectId) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find project", e))
    }

    /// Find a project by its exact name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find project by name", e)
            })
    }

    /// List all projects, most recently updated first.
    pub async fn find_all(&self) -> AppResult<Vec<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY updated_at DESC, name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list projects", e))
    }

    /// Insert a new project. `data.name` must already be trimmed.
    pub async fn create(&self, data: &CreateProject) -> AppResult<Project> {
        let now = Utc::now();
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (id, name, description, color, icon, doc_count, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, 0, ?, ?) RETURNING *",
        )
        .bind(ProjectId::new())
        .bind(&data.name)
        .bind(data.description.as_deref().unwrap_or(""))
        .bind(data.color.as_deref().unwrap_or(DEFAULT_PROJECT_COLOR))
        .bind(data.icon.as_deref().unwrap_or(DEFAULT_PROJECT_ICON))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Project '{}' already exists", data.name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create project", e),
        })
    }

    /// Apply a partial update; absent fields keep their current value.
    pub async fn update(&self, id: ProjectId, data: &UpdateProject) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET \
                name = COALESCE(?, name), \
                description = COALESCE(?, description), \
                color = COALESCE(?, color), \
                icon = COALESCE(?, icon), \
                updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(data.name.as_deref())
        .bind(data.description.as_deref())
        .bind(data.color.as_deref())
        .bind(data.icon.as_deref())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict("Another project already uses that name")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update project", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))
    }

    /// Delete a project. Folders, documents and tag links cascade.
    pub async fn delete(&self, id: ProjectId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete project", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Recount the project's documents and store the result in `doc_count`.
    pub async fn refresh_doc_count(&self, id: ProjectId) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "UPDATE projects SET \
                doc_count = (SELECT COUNT(*) FROM documents WHERE project_id = ?), \
                updated_at = ? \
             WHERE id = ? RETURNING doc_count",
        )
        .bind(id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to refresh document count", e)
        })?
        .unwrap_or(0);
        Ok(count)
    }
}
