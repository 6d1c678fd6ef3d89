//! Document repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;

use linkmd_core::error::{AppError, ErrorKind};
use linkmd_core::result::AppResult;
use linkmd_core::types::{DocumentId, FolderId, ProjectId};
use linkmd_entity::document::analysis::DocumentAnalysis;
use linkmd_entity::document::model::{Document, FolderScope, NewDocument};

/// Repository for document rows.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a document by ID.
    pub async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    /// List a project's documents within a folder scope, ordered by filename.
    pub async fn find_by_project(
        &self,
        project_id: ProjectId,
        scope: FolderScope,
    ) -> AppResult<Vec<Document>> {
        let query = match scope {
            FolderScope::Any => sqlx::query_as::<_, Document>(
                "SELECT * FROM documents WHERE project_id = ? ORDER BY filename ASC",
            )
            .bind(project_id),
            FolderScope::Root => sqlx::query_as::<_, Document>(
                "SELECT * FROM documents WHERE project_id = ? AND folder_id IS NULL \
                 ORDER BY filename ASC",
            )
            .bind(project_id),
            FolderScope::Folder(folder_id) => sqlx::query_as::<_, Document>(
                "SELECT * FROM documents WHERE project_id = ? AND folder_id = ? \
                 ORDER BY filename ASC",
            )
            .bind(project_id)
            .bind(folder_id),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list documents", e))
    }

    /// List the documents directly inside any of the given folders.
    pub async fn find_in_folders(&self, folder_ids: &[FolderId]) -> AppResult<Vec<Document>> {
        let mut documents = Vec::new();
        for folder_id in folder_ids {
            let batch = sqlx::query_as::<_, Document>(
                "SELECT * FROM documents WHERE folder_id = ? ORDER BY filename ASC",
            )
            .bind(*folder_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list folder documents", e)
            })?;
            documents.extend(batch);
        }
        Ok(documents)
    }

    /// Find a document with the given filename in the `(project, folder)` group.
    ///
    /// `folder_id = None` is the project root. `exclude` skips one document.
    pub async fn find_by_filename(
        &self,
        project_id: ProjectId,
        folder_id: Option<FolderId>,
        filename: &str,
        exclude: Option<DocumentId>,
    ) -> AppResult<Option<Document>> {
        let query = match folder_id {
            Some(folder) => sqlx::query_as::<_, Document>(
                "SELECT * FROM documents WHERE project_id = ? AND folder_id = ? AND filename = ? \
                 AND (? IS NULL OR id != ?) LIMIT 1",
            )
            .bind(project_id)
            .bind(folder),
            None => sqlx::query_as::<_, Document>(
                "SELECT * FROM documents WHERE project_id = ? AND folder_id IS NULL AND filename = ? \
                 AND (? IS NULL OR id != ?) LIMIT 1",
            )
            .bind(project_id),
        };

        query
            .bind(filename)
            .bind(exclude)
            .bind(exclude)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check filenames", e)
            })
    }

    /// Insert a new document row.
    pub async fn create(&self, data: &NewDocument) -> AppResult<Document> {
        let now = Utc::now();
        let a = &data.analysis;

        sqlx::query_as::<_, Document>(
            "INSERT INTO documents (id, project_id, folder_id, filename, title, content, file_size, \
                line_count, heading_count, code_block_count, table_count, image_count, \
                code_languages, heading_tree, has_frontmatter, original_path, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(DocumentId::new())
        .bind(data.project_id)
        .bind(data.folder_id)
        .bind(&data.filename)
        .bind(&a.title)
        .bind(&data.content)
        .bind(data.content.len() as i64)
        .bind(a.line_count as i64)
        .bind(a.heading_count() as i64)
        .bind(a.code_block_count as i64)
        .bind(a.table_count as i64)
        .bind(a.image_count as i64)
        .bind(Json(&a.code_languages))
        .bind(Json(&a.heading_tree))
        .bind(a.has_frontmatter)
        .bind(&data.original_path)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Document '{}' already exists here", data.filename))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create document", e),
        })
    }

    /// Replace a document's content and every derived analysis column.
    pub async fn update_content(
        &self,
        id: DocumentId,
        content: &str,
        analysis: &DocumentAnalysis,
    ) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "UPDATE documents SET title = ?, content = ?, file_size = ?, line_count = ?, \
                heading_count = ?, code_block_count = ?, table_count = ?, image_count = ?, \
                code_languages = ?, heading_tree = ?, has_frontmatter = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(&analysis.title)
        .bind(content)
        .bind(content.len() as i64)
        .bind(analysis.line_count as i64)
        .bind(analysis.heading_count() as i64)
        .bind(analysis.code_block_count as i64)
        .bind(analysis.table_count as i64)
        .bind(analysis.image_count as i64)
        .bind(Json(&analysis.code_languages))
        .bind(Json(&analysis.heading_tree))
        .bind(analysis.has_frontmatter)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update document content", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
    }

    /// Override a document's title. The next content write re-derives it.
    pub async fn update_title(&self, id: DocumentId, title: &str) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "UPDATE documents SET title = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(title)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update title", e))?
        .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
    }

    /// Change a document's location and filename together with its recorded path.
    pub async fn update_location(
        &self,
        id: DocumentId,
        project_id: ProjectId,
        folder_id: Option<FolderId>,
        filename: &str,
        original_path: &str,
    ) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "UPDATE documents SET project_id = ?, folder_id = ?, filename = ?, original_path = ?, \
                updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(project_id)
        .bind(folder_id)
        .bind(filename)
        .bind(original_path)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Document '{filename}' already exists at the destination"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update document location", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
    }

    /// Record the mirror path a document was last written to.
    pub async fn set_original_path(&self, id: DocumentId, original_path: &str) -> AppResult<()> {
        sqlx::query("UPDATE documents SET original_path = ? WHERE id = ?")
            .bind(original_path)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update document path", e)
            })?;
        Ok(())
    }

    /// Delete a document row. Tag links cascade.
    pub async fn delete(&self, id: DocumentId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete document", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Count the documents of a project.
    pub async fn count_by_project(&self, project_id: ProjectId) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count documents", e))
    }
}
