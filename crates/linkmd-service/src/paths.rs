//! Path resolver: ancestor chains, depth, and mirror paths of folders.
//!
//! A project's folders are loaded once into a [`FolderArena`] and every
//! walk is an explicit loop over the id lookup. Mirror paths are relative
//! to the mirror root: `{project_id}/{ancestor names...}/{filename}`.

use std::collections::HashMap;
use std::sync::Arc;

use linkmd_core::error::AppError;
use linkmd_core::result::AppResult;
use linkmd_core::types::{FolderId, ProjectId};
use linkmd_database::repositories::FolderRepository;
use linkmd_entity::folder::Folder;

/// Mirror directory owned by a project.
pub fn project_root(project_id: ProjectId) -> String {
    project_id.to_string()
}

/// Join a mirror directory and a child name.
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// In-memory view of one project's folder tree.
#[derive(Debug, Clone)]
pub struct FolderArena {
    project_id: ProjectId,
    folders: HashMap<FolderId, Folder>,
    children: HashMap<Option<FolderId>, Vec<FolderId>>,
}

impl FolderArena {
    /// Build an arena from the folders of `project_id`.
    ///
    /// Children keep the input order; callers pass folders sorted by
    /// sort order then name.
    pub fn new(project_id: ProjectId, folders: Vec<Folder>) -> Self {
        let mut children: HashMap<Option<FolderId>, Vec<FolderId>> = HashMap::new();
        for folder in &folders {
            children.entry(folder.parent_id).or_default().push(folder.id);
        }
        Self {
            project_id,
            folders: folders.into_iter().map(|f| (f.id, f)).collect(),
            children,
        }
    }

    /// The project this arena describes.
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Look up a folder.
    pub fn get(&self, id: FolderId) -> AppResult<&Folder> {
        self.folders.get(&id).ok_or_else(|| {
            AppError::not_found(format!(
                "Folder {id} not found in project {}",
                self.project_id
            ))
        })
    }

    /// Number of folders in the project.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Whether the project has no folders.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Direct children of `parent` (`None` = project root).
    pub fn children(&self, parent: Option<FolderId>) -> &[FolderId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Folders from the root-most ancestor down to `id`, inclusive.
    pub fn ancestor_chain(&self, id: FolderId) -> AppResult<Vec<&Folder>> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(folder_id) = current {
            if chain.len() > self.folders.len() {
                return Err(AppError::internal(format!(
                    "Folder {id} has a cyclic ancestor chain"
                )));
            }
            let folder = self.get(folder_id)?;
            chain.push(folder);
            current = folder.parent_id;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Number of ancestors above `id`. Folders at the project root have depth 0.
    pub fn depth(&self, id: FolderId) -> AppResult<usize> {
        Ok(self.ancestor_chain(id)?.len() - 1)
    }

    /// Whether `candidate` lies in the subtree of `of`. A folder counts as
    /// its own descendant.
    pub fn is_descendant(&self, candidate: FolderId, of: FolderId) -> AppResult<bool> {
        Ok(self.ancestor_chain(candidate)?.iter().any(|f| f.id == of))
    }

    /// Folders below `id` in pre-order: each folder before its children,
    /// siblings in sort order. `id` itself is excluded.
    pub fn descendants(&self, id: FolderId) -> Vec<FolderId> {
        let mut out = Vec::new();
        let mut stack: Vec<FolderId> = self.children(Some(id)).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            if out.len() > self.folders.len() {
                break;
            }
            out.push(next);
            stack.extend(self.children(Some(next)).iter().rev().copied());
        }
        out
    }

    /// `id` followed by its descendants in pre-order.
    pub fn subtree(&self, id: FolderId) -> Vec<FolderId> {
        let mut out = vec![id];
        out.extend(self.descendants(id));
        out
    }

    /// Edges from `id` to its deepest descendant (0 for a leaf).
    pub fn max_subtree_depth(&self, id: FolderId) -> usize {
        let mut max = 0;
        let mut stack = vec![(id, 0usize)];
        let mut visited = 0;
        while let Some((folder_id, depth)) = stack.pop() {
            visited += 1;
            if visited > self.folders.len() + 1 {
                break;
            }
            max = max.max(depth);
            for child in self.children(Some(folder_id)) {
                stack.push((*child, depth + 1));
            }
        }
        max
    }

    /// Mirror directory of a folder, recomputed from the ancestor chain.
    pub fn folder_dir(&self, id: FolderId) -> AppResult<String> {
        let mut dir = project_root(self.project_id);
        for folder in self.ancestor_chain(id)? {
            dir = join(&dir, &folder.name);
        }
        Ok(dir)
    }

    /// Mirror directory for an optional folder (`None` = project root).
    pub fn dir_of(&self, folder_id: Option<FolderId>) -> AppResult<String> {
        match folder_id {
            Some(id) => self.folder_dir(id),
            None => Ok(project_root(self.project_id)),
        }
    }

    /// Mirror path of a document.
    pub fn document_path(&self, folder_id: Option<FolderId>, filename: &str) -> AppResult<String> {
        Ok(join(&self.dir_of(folder_id)?, filename))
    }
}

/// Loads folder arenas from the tree store.
#[derive(Debug, Clone)]
pub struct PathResolver {
    folder_repo: Arc<FolderRepository>,
}

impl PathResolver {
    /// Create a new path resolver.
    pub fn new(folder_repo: Arc<FolderRepository>) -> Self {
        Self { folder_repo }
    }

    /// Load the current folder tree of a project.
    pub async fn load(&self, project_id: ProjectId) -> AppResult<FolderArena> {
        let folders = self.folder_repo.find_by_project(project_id).await?;
        Ok(FolderArena::new(project_id, folders))
    }

    /// Mirror path of a document in a folder of `project_id`.
    pub async fn document_path(
        &self,
        project_id: ProjectId,
        folder_id: Option<FolderId>,
        filename: &str,
    ) -> AppResult<String> {
        match folder_id {
            Some(_) => self.load(project_id).await?.document_path(folder_id, filename),
            None => Ok(join(&project_root(project_id), filename)),
        }
    }
}
