//! Folder repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;

use linkmd_core::error::{AppError, ErrorKind};
use linkmd_core::result::AppResult;
use linkmd_core::types::{FolderId, ProjectId};
use linkmd_entity::folder::model::{CreateFolder, Folder};

/// Repository for folder CRUD and sibling lookups.
///
/// Tree walks (ancestors, descendants, subtree depth) are not done in SQL;
/// callers load a project's folders with [`FolderRepository::find_by_project`]
/// and traverse them in memory.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// List every folder of a project, ordered by sort order then name.
    pub async fn find_by_project(&self, project_id: ProjectId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE project_id = ? ORDER BY sort_order ASC, name ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Find a sibling folder with the given name in the `(project, parent)` group.
    ///
    /// `parent_id = None` is the project-root group. `exclude` skips one folder,
    /// used when a folder is checked against its own siblings on rename.
    pub async fn find_sibling_by_name(
        &self,
        project_id: ProjectId,
        parent_id: Option<FolderId>,
        name: &str,
        exclude: Option<FolderId>,
    ) -> AppResult<Option<Folder>> {
        let query = match parent_id {
            Some(parent) => sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders WHERE project_id = ? AND parent_id = ? AND name = ? \
                 AND (? IS NULL OR id != ?) LIMIT 1",
            )
            .bind(project_id)
            .bind(parent),
            None => sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders WHERE project_id = ? AND parent_id IS NULL AND name = ? \
                 AND (? IS NULL OR id != ?) LIMIT 1",
            )
            .bind(project_id),
        };

        query
            .bind(name)
            .bind(exclude)
            .bind(exclude)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check sibling names", e)
            })
    }

    /// The next free sort position in the `(project, parent)` group.
    pub async fn next_sort_order(
        &self,
        project_id: ProjectId,
        parent_id: Option<FolderId>,
    ) -> AppResult<i64> {
        let query = match parent_id {
            Some(parent) => sqlx::query_scalar::<_, i64>(
                "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM folders \
                 WHERE project_id = ? AND parent_id = ?",
            )
            .bind(project_id)
            .bind(parent),
            None => sqlx::query_scalar::<_, i64>(
                "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM folders \
                 WHERE project_id = ? AND parent_id IS NULL",
            )
            .bind(project_id),
        };

        query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute sort order", e)
        })
    }

    /// Insert a new folder at the end of its sibling group.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let sort_order = self.next_sort_order(data.project_id, data.parent_id).await?;
        let now = Utc::now();

        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, project_id, parent_id, name, sort_order, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(FolderId::new())
        .bind(data.project_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(sort_order)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Folder '{}' already exists here", data.name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })
    }

    /// Rename a folder.
    pub async fn rename(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(name)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Folder '{name}' already exists here"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to rename folder", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Reparent a folder (`None` moves it to the project root).
    pub async fn set_parent(&self, id: FolderId, parent_id: Option<FolderId>) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(parent_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict("A folder with the same name already exists at the destination")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to move folder", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Delete a set of folders in the given order (descendants first).
    pub async fn delete_many(&self, ids: &[FolderId]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut deleted = 0;
        for id in ids {
            let result = sqlx::query("DELETE FROM folders WHERE id = ?")
                .bind(*id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
                })?;
            deleted += result.rows_affected();
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder deletion", e)
        })?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::DatabasePool;
    use crate::migration::run_migrations;
    use crate::repositories::project::ProjectRepository;
    use linkmd_core::config::DatabaseConfig;
    use linkmd_entity::project::model::CreateProject;

    async fn setup() -> (tempfile::TempDir, FolderRepository, ProjectId) {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("test.db").display()),
            ..DatabaseConfig::default()
        };
        let db = DatabasePool::connect(&config).await.unwrap();
        run_migrations(db.pool()).await.unwrap();

        let project = ProjectRepository::new(db.pool().clone())
            .create(&CreateProject {
                name: "P".into(),
                ..CreateProject::default()
            })
            .await
            .unwrap();
        (dir, FolderRepository::new(db.into_pool()), project.id)
    }

    fn folder(project_id: ProjectId, parent_id: Option<FolderId>, name: &str) -> CreateFolder {
        CreateFolder {
            project_id,
            parent_id,
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn test_sibling_lookup_groups_root_folders() {
        let (_dir, repo, project_id) = setup().await;
        let docs = repo.create(&folder(project_id, None, "Docs")).await.unwrap();
        repo.create(&folder(project_id, Some(docs.id), "Inner"))
            .await
            .unwrap();

        let hit = repo
            .find_sibling_by_name(project_id, None, "Docs", None)
            .await
            .unwrap();
        assert_eq!(hit.map(|f| f.id), Some(docs.id));

        let excluded = repo
            .find_sibling_by_name(project_id, None, "Docs", Some(docs.id))
            .await
            .unwrap();
        assert!(excluded.is_none());

        let nested = repo
            .find_sibling_by_name(project_id, None, "Inner", None)
            .await
            .unwrap();
        assert!(nested.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_root_name_rejected_by_store() {
        let (_dir, repo, project_id) = setup().await;
        repo.create(&folder(project_id, None, "Docs")).await.unwrap();
        let err = repo
            .create(&folder(project_id, None, "Docs"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_sort_order_increments_per_group() {
        let (_dir, repo, project_id) = setup().await;
        let a = repo.create(&folder(project_id, None, "A")).await.unwrap();
        let b = repo.create(&folder(project_id, None, "B")).await.unwrap();
        let child = repo
            .create(&folder(project_id, Some(a.id), "C"))
            .await
            .unwrap();
        assert_eq!(a.sort_order, 0);
        assert_eq!(b.sort_order, 1);
        assert_eq!(child.sort_order, 0);
    }
}
