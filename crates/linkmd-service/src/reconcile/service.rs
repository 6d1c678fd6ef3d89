//! Rebuilds mirror artifacts at the paths derived from the tree store.
//!
//! Unlike ordinary mutations, reconciliation is an explicit repair, so a
//! failed mirror write is returned to the caller. Removing a stale file is
//! still best effort.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use linkmd_core::error::AppError;
use linkmd_core::result::AppResult;
use linkmd_core::traits::MirrorProvider;
use linkmd_core::types::{DocumentId, FolderId, ProjectId};
use linkmd_database::repositories::{DocumentRepository, FolderRepository, ProjectRepository};
use linkmd_entity::document::{Document, FolderScope};

use crate::mirror::best_effort;
use crate::paths::{FolderArena, PathResolver, project_root};

/// Counts of mirror artifacts rewritten by a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Directories ensured.
    pub directories: usize,
    /// Document files rewritten.
    pub documents: usize,
    /// Documents whose recorded path was stale.
    pub relocated: usize,
}

/// Repairs the physical mirror from the tree store.
#[derive(Debug, Clone)]
pub struct ReconcileService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Document repository.
    document_repo: Arc<DocumentRepository>,
    /// Project repository.
    project_repo: Arc<ProjectRepository>,
    /// Path resolver.
    resolver: PathResolver,
    /// Physical mirror.
    mirror: Arc<dyn MirrorProvider>,
}

impl ReconcileService {
    /// Creates a new reconcile service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        document_repo: Arc<DocumentRepository>,
        project_repo: Arc<ProjectRepository>,
        mirror: Arc<dyn MirrorProvider>,
    ) -> Self {
        Self {
            resolver: PathResolver::new(Arc::clone(&folder_repo)),
            folder_repo,
            document_repo,
            project_repo,
            mirror,
        }
    }

    /// Rewrites one document at its derived path, removing a stale copy.
    pub async fn reconcile_document(&self, id: DocumentId) -> AppResult<Document> {
        let doc = self
            .document_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;
        let arena = self.resolver.load(doc.project_id).await?;
        let mut report = ReconcileReport::default();
        let doc = self.rewrite(&arena, doc, &mut report).await?;

        info!(document_id = %id, relocated = report.relocated, "Document reconciled");
        Ok(doc)
    }

    /// Ensures every directory in a folder's subtree and rewrites its documents.
    pub async fn reconcile_folder(&self, id: FolderId) -> AppResult<ReconcileReport> {
        let folder = self
            .folder_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        let arena = self.resolver.load(folder.project_id).await?;

        let mut report = ReconcileReport::default();
        self.reconcile_subtree(&arena, id, &mut report).await?;

        info!(
            folder_id = %id,
            directories = report.directories,
            documents = report.documents,
            relocated = report.relocated,
            "Folder reconciled"
        );
        Ok(report)
    }

    /// Reconciles the project root, its root documents, and every folder.
    pub async fn reconcile_project(&self, id: ProjectId) -> AppResult<ReconcileReport> {
        self.project_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))?;
        let arena = self.resolver.load(id).await?;
        let mut report = ReconcileReport::default();

        let root = project_root(id);
        self.mirror.create_dir(&root).await?;
        report.directories += 1;

        for doc in self
            .document_repo
            .find_by_project(id, FolderScope::Root)
            .await?
        {
            self.rewrite(&arena, doc, &mut report).await?;
        }
        for folder_id in arena.children(None).to_vec() {
            self.reconcile_subtree(&arena, folder_id, &mut report).await?;
        }

        info!(
            project_id = %id,
            directories = report.directories,
            documents = report.documents,
            relocated = report.relocated,
            "Project reconciled"
        );
        Ok(report)
    }

    async fn reconcile_subtree(
        &self,
        arena: &FolderArena,
        id: FolderId,
        report: &mut ReconcileReport,
    ) -> AppResult<()> {
        for folder_id in arena.subtree(id) {
            let dir = arena.folder_dir(folder_id)?;
            self.mirror.create_dir(&dir).await?;
            report.directories += 1;

            for doc in self
                .document_repo
                .find_by_project(arena.project_id(), FolderScope::Folder(folder_id))
                .await?
            {
                self.rewrite(arena, doc, report).await?;
            }
        }
        Ok(())
    }

    async fn rewrite(
        &self,
        arena: &FolderArena,
        mut doc: Document,
        report: &mut ReconcileReport,
    ) -> AppResult<Document> {
        let path = arena.document_path(doc.folder_id, &doc.filename)?;

        if let Some(stale) = doc.original_path.as_deref().filter(|p| *p != path) {
            best_effort("delete", stale, self.mirror.delete(stale)).await;
        }
        self.mirror
            .write(&path, Bytes::from(doc.content.clone()))
            .await?;
        report.documents += 1;

        if doc.original_path.as_deref() != Some(path.as_str()) {
            self.document_repo.set_original_path(doc.id, &path).await?;
            doc.original_path = Some(path);
            report.relocated += 1;
        }
        Ok(doc)
    }
}
