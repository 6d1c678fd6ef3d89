//! Folder create, rename, move, and delete with mirror synchronization.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use linkmd_core::error::AppError;
use linkmd_core::result::AppResult;
use linkmd_core::traits::MirrorProvider;
use linkmd_core::types::{FolderId, ProjectId};
use linkmd_database::repositories::{DocumentRepository, FolderRepository, ProjectRepository};
use linkmd_entity::document::FolderScope;
use linkmd_entity::folder::{CreateFolder, Folder};

use crate::mirror::best_effort;
use crate::naming;
use crate::paths::{FolderArena, PathResolver, join};

/// Folders may not sit at depth 10 or below; depths run 0..=9.
pub const MAX_FOLDER_DEPTH: usize = 10;

/// What a folder deletion removed from the tree store.
#[derive(Debug, Clone, Serialize)]
pub struct FolderDeletion {
    /// The deleted folder followed by its descendants in pre-order.
    pub folder_ids: Vec<FolderId>,
    /// Number of documents removed with them.
    pub document_count: usize,
}

/// Manages folder mutations and keeps the mirror in step.
#[derive(Debug, Clone)]
pub struct FolderService {
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

impl FolderService {
    /// Creates a new folder service.
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

    async fn require_project(&self, project_id: ProjectId) -> AppResult<()> {
        self.project_repo
            .find_by_id(project_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))
    }

    async fn ensure_unique_name(
        &self,
        project_id: ProjectId,
        parent_id: Option<FolderId>,
        name: &str,
        exclude: Option<FolderId>,
    ) -> AppResult<()> {
        if self
            .folder_repo
            .find_sibling_by_name(project_id, parent_id, name, exclude)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "A folder named '{name}' already exists here"
            )));
        }
        Ok(())
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, id: FolderId) -> AppResult<Folder> {
        self.folder_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Lists every folder of a project, ordered by sort order then name.
    pub async fn list_folders(&self, project_id: ProjectId) -> AppResult<Vec<Folder>> {
        self.require_project(project_id).await?;
        self.folder_repo.find_by_project(project_id).await
    }

    /// Creates a folder under `parent_id` (`None` = project root).
    pub async fn create_folder(
        &self,
        project_id: ProjectId,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> AppResult<Folder> {
        let name = naming::folder_name(name)?;
        self.require_project(project_id).await?;

        let arena = self.resolver.load(project_id).await?;
        if let Some(parent) = parent_id {
            if arena.depth(parent)? + 1 >= MAX_FOLDER_DEPTH {
                return Err(AppError::depth_limit(format!(
                    "Folders cannot be nested more than {MAX_FOLDER_DEPTH} levels deep"
                )));
            }
        }
        self.ensure_unique_name(project_id, parent_id, &name, None)
            .await?;

        let folder = self
            .folder_repo
            .create(&CreateFolder {
                project_id,
                parent_id,
                name,
            })
            .await?;

        let dir = join(&arena.dir_of(parent_id)?, &folder.name);
        best_effort("create_dir", &dir, self.mirror.create_dir(&dir)).await;

        info!(
            folder_id = %folder.id,
            project_id = %project_id,
            path = %dir,
            "Folder created"
        );
        Ok(folder)
    }

    /// Renames a folder and re-derives the paths of every contained document.
    pub async fn rename_folder(&self, id: FolderId, new_name: &str) -> AppResult<Folder> {
        let name = naming::folder_name(new_name)?;
        let folder = self.get_folder(id).await?;
        self.ensure_unique_name(folder.project_id, folder.parent_id, &name, Some(id))
            .await?;

        let arena = self.resolver.load(folder.project_id).await?;
        let old_dir = arena.folder_dir(id)?;

        let renamed = self.folder_repo.rename(id, &name).await?;
        let new_dir = join(&arena.dir_of(folder.parent_id)?, &name);

        self.relocate_dir(&old_dir, &new_dir).await;
        let updated = self.cascade_document_paths(folder.project_id, id).await?;

        info!(
            folder_id = %id,
            from = %old_dir,
            to = %new_dir,
            documents = updated,
            "Folder renamed"
        );
        Ok(renamed)
    }

    /// Moves a folder under `new_parent_id` (`None` = project root).
    pub async fn move_folder(
        &self,
        id: FolderId,
        new_parent_id: Option<FolderId>,
    ) -> AppResult<Folder> {
        let folder = self.get_folder(id).await?;
        let arena = self.resolver.load(folder.project_id).await?;

        if let Some(parent) = new_parent_id {
            arena.get(parent)?;
            if parent == id || arena.is_descendant(parent, id)? {
                return Err(AppError::circular_reference(format!(
                    "Cannot move folder '{}' into itself or one of its descendants",
                    folder.name
                )));
            }
            if arena.depth(parent)? + 1 + arena.max_subtree_depth(id) >= MAX_FOLDER_DEPTH {
                return Err(AppError::depth_limit(format!(
                    "Moving '{}' would nest folders more than {MAX_FOLDER_DEPTH} levels deep",
                    folder.name
                )));
            }
        }

        if new_parent_id == folder.parent_id {
            return Ok(folder);
        }

        self.ensure_unique_name(folder.project_id, new_parent_id, &folder.name, Some(id))
            .await?;

        let old_dir = arena.folder_dir(id)?;
        let moved = self.folder_repo.set_parent(id, new_parent_id).await?;
        let new_dir = join(&arena.dir_of(new_parent_id)?, &folder.name);

        self.relocate_dir(&old_dir, &new_dir).await;
        let updated = self.cascade_document_paths(folder.project_id, id).await?;

        info!(
            folder_id = %id,
            from = %old_dir,
            to = %new_dir,
            documents = updated,
            "Folder moved"
        );
        Ok(moved)
    }

    /// Deletes a folder, its descendants, and all their documents.
    pub async fn delete_folder(&self, id: FolderId) -> AppResult<FolderDeletion> {
        let folder = self.get_folder(id).await?;
        let arena = self.resolver.load(folder.project_id).await?;
        let folder_ids = arena.subtree(id);
        let dir = arena.folder_dir(id)?;

        let documents = self.document_repo.find_in_folders(&folder_ids).await?;
        for doc in &documents {
            let path = arena.document_path(doc.folder_id, &doc.filename)?;
            best_effort("delete", &path, self.mirror.delete(&path)).await;
            if let Some(recorded) = doc.original_path.as_deref().filter(|p| *p != path) {
                best_effort("delete", recorded, self.mirror.delete(recorded)).await;
            }
            self.document_repo.delete(doc.id).await?;
        }

        best_effort("delete_dir", &dir, self.mirror.delete_dir(&dir)).await;

        let ordered: Vec<FolderId> = folder_ids.iter().rev().copied().collect();
        self.folder_repo.delete_many(&ordered).await?;
        self.project_repo
            .refresh_doc_count(folder.project_id)
            .await?;

        info!(
            folder_id = %id,
            folders = folder_ids.len(),
            documents = documents.len(),
            path = %dir,
            "Folder deleted"
        );
        Ok(FolderDeletion {
            folder_ids,
            document_count: documents.len(),
        })
    }

    /// Moves a mirror directory, or creates the destination when the source
    /// is missing.
    async fn relocate_dir(&self, old_dir: &str, new_dir: &str) {
        if old_dir == new_dir {
            return;
        }
        match self.mirror.exists(old_dir).await {
            Ok(true) => {
                best_effort("rename", old_dir, self.mirror.rename(old_dir, new_dir)).await;
            }
            Ok(false) => {
                best_effort("create_dir", new_dir, self.mirror.create_dir(new_dir)).await;
            }
            Err(e) => {
                warn!(path = old_dir, error = %e, "Physical mirror lookup failed; mirror left stale");
            }
        }
    }

    /// Recompute and persist the mirror path of every document in the
    /// subtree of `id`, folder before children. Returns how many changed.
    async fn cascade_document_paths(&self, project_id: ProjectId, id: FolderId) -> AppResult<usize> {
        let arena: FolderArena = self.resolver.load(project_id).await?;
        let mut updated = 0;
        for folder_id in arena.subtree(id) {
            let dir = arena.folder_dir(folder_id)?;
            let documents = self
                .document_repo
                .find_by_project(project_id, FolderScope::Folder(folder_id))
                .await?;
            for doc in documents {
                let path = join(&dir, &doc.filename);
                if doc.original_path.as_deref() != Some(path.as_str()) {
                    self.document_repo.set_original_path(doc.id, &path).await?;
                    updated += 1;
                }
            }
        }
        Ok(updated)
    }
}
