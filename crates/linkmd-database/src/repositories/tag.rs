//! Tag repository implementation.

use sqlx::SqlitePool;

use linkmd_core::error::{AppError, ErrorKind};
use linkmd_core::result::AppResult;
use linkmd_core::types::DocumentId;
use linkmd_entity::tag::model::Tag;

/// Default color for tags created without one.
pub const DEFAULT_TAG_COLOR: &str = "#6B7280";

/// Repository for tags and document-tag links.
#[derive(Debug, Clone)]
pub struct TagRepository {
    pool: SqlitePool,
}

impl TagRepository {
    /// Create a new tag repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a tag by name, creating it when absent.
    pub async fn ensure(&self, name: &str, color: Option<&str>) -> AppResult<Tag> {
        sqlx::query("INSERT OR IGNORE INTO tags (name, color) VALUES (?, ?)")
            .bind(name)
            .bind(color.unwrap_or(DEFAULT_TAG_COLOR))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create tag", e))?;

        sqlx::query_as::<_, Tag>("SELECT id, name, color FROM tags WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load tag", e))
    }

    /// List the tags attached to a document, ordered by name.
    pub async fn find_for_document(&self, document_id: DocumentId) -> AppResult<Vec<Tag>> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.color FROM tags t \
             INNER JOIN document_tags dt ON dt.tag_id = t.id \
             WHERE dt.document_id = ? ORDER BY t.name ASC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list document tags", e))
    }

    /// Link a tag to a document. Returns `false` if the link already existed.
    pub async fn attach(&self, document_id: DocumentId, tag_id: i64) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO document_tags (document_id, tag_id) VALUES (?, ?)",
        )
        .bind(document_id)
        .bind(tag_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to attach tag", e))?
        .rows_affected()
            > 0;

        if inserted {
            sqlx::query("UPDATE tags SET usage_count = usage_count + 1 WHERE id = ?")
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update tag usage", e)
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to attach tag", e))?;
        Ok(inserted)
    }

    /// Unlink a tag from a document. Returns `false` if no link existed.
    pub async fn detach(&self, document_id: DocumentId, tag_id: i64) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let removed = sqlx::query("DELETE FROM document_tags WHERE document_id = ? AND tag_id = ?")
            .bind(document_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to detach tag", e))?
            .rows_affected()
            > 0;

        if removed {
            sqlx::query("UPDATE tags SET usage_count = MAX(usage_count - 1, 0) WHERE id = ?")
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update tag usage", e)
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to detach tag", e))?;
        Ok(removed)
    }

    /// Current usage count of a tag.
    pub async fn usage_count(&self, tag_id: i64) -> AppResult<i64> {
        sqlx::query_scalar("SELECT usage_count FROM tags WHERE id = ?")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read tag usage", e))?
            .ok_or_else(|| AppError::not_found(format!("Tag {tag_id} not found")))
    }
}
