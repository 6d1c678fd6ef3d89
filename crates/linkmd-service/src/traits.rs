//! Collaborator interfaces consumed by the synchronizer.

use async_trait::async_trait;

use linkmd_core::result::AppResult;
use linkmd_core::types::DocumentId;
use linkmd_database::repositories::TagRepository;
use linkmd_entity::document::DocumentAnalysis;
use linkmd_entity::tag::Tag;

/// Derives analysis metadata from a document's raw text.
pub trait ContentAnalyzer: Send + Sync + std::fmt::Debug + 'static {
    /// Analyse `content`; `filename` is used when no title heading exists.
    fn analyze(&self, filename: &str, content: &str) -> DocumentAnalysis;
}

/// Tag associations per document.
#[async_trait]
pub trait TagStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find or create a tag by name.
    async fn ensure_tag(&self, name: &str, color: Option<&str>) -> AppResult<Tag>;

    /// Tags attached to a document.
    async fn list_for_document(&self, document_id: DocumentId) -> AppResult<Vec<Tag>>;

    /// Attach a tag. Returns `false` if it was already attached.
    async fn add_to_document(&self, document_id: DocumentId, tag_id: i64) -> AppResult<bool>;

    /// Detach a tag. Returns `false` if it was not attached.
    async fn remove_from_document(&self, document_id: DocumentId, tag_id: i64)
    -> AppResult<bool>;
}

#[async_trait]
impl TagStore for TagRepository {
    async fn ensure_tag(&self, name: &str, color: Option<&str>) -> AppResult<Tag> {
        self.ensure(name, color).await
    }

    async fn list_for_document(&self, document_id: DocumentId) -> AppResult<Vec<Tag>> {
        self.find_for_document(document_id).await
    }

    async fn add_to_document(&self, document_id: DocumentId, tag_id: i64) -> AppResult<bool> {
        self.attach(document_id, tag_id).await
    }

    async fn remove_from_document(
        &self,
        document_id: DocumentId,
        tag_id: i64,
    ) -> AppResult<bool> {
        self.detach(document_id, tag_id).await
    }
}
