//! Document mutations with mirror synchronization.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use linkmd_core::config::ArchiveConfig;
use linkmd_core::error::AppError;
use linkmd_core::result::AppResult;
use linkmd_core::traits::MirrorProvider;
use linkmd_core::types::{DocumentId, FolderId, ProjectId};
use linkmd_database::repositories::{DocumentRepository, FolderRepository, ProjectRepository};
use linkmd_entity::document::{Document, DocumentWithTags, FolderScope, NewDocument};

use crate::mirror::best_effort;
use crate::naming;
use crate::paths::{FolderArena, PathResolver};
use crate::traits::{ContentAnalyzer, TagStore};

/// Manages documents and keeps the mirror in step.
#[derive(Debug, Clone)]
pub struct DocumentService {
    /// Project repository.
    pub(super) project_repo: Arc<ProjectRepository>,
    /// Folder repository.
    pub(super) folder_repo: Arc<FolderRepository>,
    /// Document repository.
    pub(super) document_repo: Arc<DocumentRepository>,
    /// Path resolver.
    pub(super) resolver: PathResolver,
    /// Physical mirror.
    pub(super) mirror: Arc<dyn MirrorProvider>,
    /// Content analysis collaborator.
    pub(super) analyzer: Arc<dyn ContentAnalyzer>,
    /// Tag collaborator.
    pub(super) tags: Arc<dyn TagStore>,
    /// Import limits and naming settings.
    pub(super) config: ArchiveConfig,
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        project_repo: Arc<ProjectRepository>,
        folder_repo: Arc<FolderRepository>,
        document_repo: Arc<DocumentRepository>,
        mirror: Arc<dyn MirrorProvider>,
        analyzer: Arc<dyn ContentAnalyzer>,
        tags: Arc<dyn TagStore>,
        config: ArchiveConfig,
    ) -> Self {
        Self {
            resolver: PathResolver::new(Arc::clone(&folder_repo)),
            project_repo,
            folder_repo,
            document_repo,
            mirror,
            analyzer,
            tags,
            config,
        }
    }

    /// Document extension without the leading dot.
    pub(super) fn extension(&self) -> &str {
        self.config.bare_extension()
    }

    // ── Lookups ──

    pub(super) async fn require_project(&self, project_id: ProjectId) -> AppResult<()> {
        self.project_repo
            .find_by_id(project_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))
    }

    pub(super) async fn find(&self, id: DocumentId) -> AppResult<Document> {
        self.document_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
    }

    pub(super) async fn with_tags(&self, document: Document) -> AppResult<DocumentWithTags> {
        let tags = self.tags.list_for_document(document.id).await?;
        Ok(DocumentWithTags { document, tags })
    }

    /// Resolve a destination: an explicit folder decides the project; otherwise
    /// the explicit project or `default_project`, at its root.
    pub(super) async fn resolve_target(
        &self,
        folder_id: Option<FolderId>,
        project_id: Option<ProjectId>,
        default_project: ProjectId,
    ) -> AppResult<FolderArena> {
        let project_id = match folder_id {
            Some(folder_id) => {
                let folder = self
                    .folder_repo
                    .find_by_id(folder_id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))?;
                if project_id.is_some_and(|p| p != folder.project_id) {
                    return Err(AppError::validation(format!(
                        "Folder {folder_id} does not belong to the target project"
                    )));
                }
                folder.project_id
            }
            None => project_id.unwrap_or(default_project),
        };
        self.require_project(project_id).await?;
        self.resolver.load(project_id).await
    }

    pub(super) async fn ensure_unique_filename(
        &self,
        project_id: ProjectId,
        folder_id: Option<FolderId>,
        filename: &str,
        exclude: Option<DocumentId>,
    ) -> AppResult<()> {
        if self
            .document_repo
            .find_by_filename(project_id, folder_id, filename, exclude)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A document named '{filename}' already exists here"
            )));
        }
        Ok(())
    }

    /// First free filename in `(project, folder)`: `filename` itself, then
    /// `stem (1).ext`, `stem (2).ext`, ...
    pub(super) async fn unique_filename(
        &self,
        project_id: ProjectId,
        folder_id: Option<FolderId>,
        filename: String,
        stem: &str,
    ) -> AppResult<String> {
        let repo = &self.document_repo;
        naming::first_free(filename, stem, self.extension(), |candidate| async move {
            Ok::<bool, AppError>(
                repo.find_by_filename(project_id, folder_id, &candidate, None)
                    .await?
                    .is_some(),
            )
        })
        .await
    }

    pub(super) async fn replicate_tags(&self, from: DocumentId, to: DocumentId) -> AppResult<()> {
        for tag in self.tags.list_for_document(from).await? {
            self.tags.add_to_document(to, tag.id).await?;
        }
        Ok(())
    }

    // ── Core write path ──

    /// Insert a new document, then write its mirror file.
    pub(super) async fn store_new(
        &self,
        arena: &FolderArena,
        folder_id: Option<FolderId>,
        filename: String,
        content: String,
    ) -> AppResult<Document> {
        if content.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Document '{filename}' has no content"
            )));
        }

        let path = arena.document_path(folder_id, &filename)?;
        let analysis = self.analyzer.analyze(&filename, &content);
        let document = self
            .document_repo
            .create(&NewDocument {
                project_id: arena.project_id(),
                folder_id,
                filename,
                content,
                analysis,
                original_path: path.clone(),
            })
            .await?;

        let data = Bytes::from(document.content.clone());
        best_effort("write", &path, self.mirror.write(&path, data)).await;

        info!(
            document_id = %document.id,
            project_id = %document.project_id,
            path = %path,
            bytes = document.file_size,
            "Document archived"
        );
        Ok(document)
    }

    // ── Queries ──

    /// Gets a document with its tags.
    pub async fn get_document(&self, id: DocumentId) -> AppResult<DocumentWithTags> {
        let document = self.find(id).await?;
        self.with_tags(document).await
    }

    /// Lists a project's documents within a folder scope.
    pub async fn list_documents(
        &self,
        project_id: ProjectId,
        scope: FolderScope,
    ) -> AppResult<Vec<Document>> {
        self.require_project(project_id).await?;
        self.document_repo.find_by_project(project_id, scope).await
    }

    // ── Mutations ──

    /// Creates a document. Without content it starts as a single heading
    /// derived from the filename.
    pub async fn create_document(
        &self,
        project_id: ProjectId,
        filename: &str,
        folder_id: Option<FolderId>,
        content: Option<String>,
    ) -> AppResult<DocumentWithTags> {
        let filename = naming::document_filename(filename, self.extension())?;
        let arena = self
            .resolve_target(folder_id, Some(project_id), project_id)
            .await?;
        self.ensure_unique_filename(project_id, folder_id, &filename, None)
            .await?;

        let content = content
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| format!("# {}\n", naming::stem(&filename, self.extension())));

        let document = self.store_new(&arena, folder_id, filename, content).await?;
        self.project_repo.refresh_doc_count(project_id).await?;
        self.with_tags(document).await
    }

    /// Replaces a document's content and re-derives its metadata.
    pub async fn update_document_content(
        &self,
        id: DocumentId,
        content: &str,
    ) -> AppResult<DocumentWithTags> {
        let existing = self.find(id).await?;
        let analysis = self.analyzer.analyze(&existing.filename, content);
        let mut document = self
            .document_repo
            .update_content(id, content, &analysis)
            .await?;

        let path = self
            .resolver
            .document_path(document.project_id, document.folder_id, &document.filename)
            .await?;
        let data = Bytes::from(content.to_string());
        if best_effort("write", &path, self.mirror.write(&path, data)).await
            && document.original_path.as_deref() != Some(path.as_str())
        {
            self.document_repo.set_original_path(id, &path).await?;
            document.original_path = Some(path.clone());
        }

        info!(document_id = %id, path = %path, "Document content updated");
        self.with_tags(document).await
    }

    /// Updates the title and/or content of a document.
    pub async fn update_document(
        &self,
        id: DocumentId,
        title: Option<&str>,
        content: Option<&str>,
    ) -> AppResult<DocumentWithTags> {
        self.find(id).await?;
        if let Some(title) = title {
            let title = title.trim();
            if title.is_empty() {
                return Err(AppError::validation("Title cannot be empty"));
            }
            self.document_repo.update_title(id, title).await?;
        }
        match content {
            Some(content) => self.update_document_content(id, content).await,
            None => self.get_document(id).await,
        }
    }

    /// Renames a document within its folder.
    pub async fn rename_document(
        &self,
        id: DocumentId,
        new_filename: &str,
    ) -> AppResult<DocumentWithTags> {
        let filename = naming::document_filename(new_filename, self.extension())?;
        let doc = self.find(id).await?;
        self.ensure_unique_filename(doc.project_id, doc.folder_id, &filename, Some(id))
            .await?;

        let arena = self.resolver.load(doc.project_id).await?;
        let old_path = arena.document_path(doc.folder_id, &doc.filename)?;
        let new_path = arena.document_path(doc.folder_id, &filename)?;

        let document = self
            .document_repo
            .update_location(id, doc.project_id, doc.folder_id, &filename, &new_path)
            .await?;
        self.relocate_file(&doc, &old_path, &new_path).await;

        info!(document_id = %id, from = %old_path, to = %new_path, "Document renamed");
        self.with_tags(document).await
    }

    /// Moves a document to another folder and/or project.
    pub async fn move_document(
        &self,
        id: DocumentId,
        target_folder_id: Option<FolderId>,
        target_project_id: Option<ProjectId>,
    ) -> AppResult<DocumentWithTags> {
        let doc = self.find(id).await?;
        let target = self
            .resolve_target(target_folder_id, target_project_id, doc.project_id)
            .await?;
        let target_project = target.project_id();
        self.ensure_unique_filename(target_project, target_folder_id, &doc.filename, Some(id))
            .await?;

        let old_path = self
            .resolver
            .document_path(doc.project_id, doc.folder_id, &doc.filename)
            .await?;
        let new_path = target.document_path(target_folder_id, &doc.filename)?;

        let document = self
            .document_repo
            .update_location(id, target_project, target_folder_id, &doc.filename, &new_path)
            .await?;
        self.relocate_file(&doc, &old_path, &new_path).await;

        self.project_repo.refresh_doc_count(doc.project_id).await?;
        if target_project != doc.project_id {
            self.project_repo.refresh_doc_count(target_project).await?;
        }

        info!(document_id = %id, from = %old_path, to = %new_path, "Document moved");
        self.with_tags(document).await
    }

    /// Copies a document, resolving the destination filename with ` (n)`.
    pub async fn copy_document(
        &self,
        id: DocumentId,
        target_folder_id: Option<FolderId>,
        target_project_id: Option<ProjectId>,
    ) -> AppResult<DocumentWithTags> {
        let doc = self.find(id).await?;
        let target = self
            .resolve_target(target_folder_id, target_project_id, doc.project_id)
            .await?;
        let target_project = target.project_id();

        let stem = naming::stem(&doc.filename, self.extension()).to_string();
        let filename = self
            .unique_filename(target_project, target_folder_id, doc.filename.clone(), &stem)
            .await?;

        let copy = self
            .store_new(&target, target_folder_id, filename, doc.content.clone())
            .await?;
        self.replicate_tags(id, copy.id).await?;
        self.project_repo.refresh_doc_count(target_project).await?;

        info!(source_id = %id, document_id = %copy.id, filename = %copy.filename, "Document copied");
        self.with_tags(copy).await
    }

    /// Deletes a document and its mirror file.
    pub async fn delete_document(&self, id: DocumentId) -> AppResult<()> {
        let doc = self.find(id).await?;
        let path = self
            .resolver
            .document_path(doc.project_id, doc.folder_id, &doc.filename)
            .await?;

        self.document_repo.delete(id).await?;

        best_effort("delete", &path, self.mirror.delete(&path)).await;
        if let Some(recorded) = doc.original_path.as_deref().filter(|p| *p != path) {
            best_effort("delete", recorded, self.mirror.delete(recorded)).await;
        }
        self.project_repo.refresh_doc_count(doc.project_id).await?;

        info!(document_id = %id, path = %path, "Document deleted");
        Ok(())
    }

    /// Moves a mirror file. When neither the derived nor the recorded old
    /// file exists, the content is rewritten from the store instead.
    async fn relocate_file(&self, doc: &Document, old_path: &str, new_path: &str) {
        if old_path == new_path {
            return;
        }
        let recorded = doc
            .original_path
            .as_deref()
            .filter(|p| *p != old_path && *p != new_path);

        for from in std::iter::once(old_path).chain(recorded) {
            if matches!(self.mirror.exists(from).await, Ok(true))
                && best_effort("rename", from, self.mirror.rename(from, new_path)).await
            {
                return;
            }
        }

        let data = Bytes::from(doc.content.clone());
        best_effort("write", new_path, self.mirror.write(new_path, data)).await;
    }
}
