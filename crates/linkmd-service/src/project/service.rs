//! Project CRUD and the document-count cache.

use std::sync::Arc;

use tracing::info;

use linkmd_core::error::AppError;
use linkmd_core::result::AppResult;
use linkmd_core::traits::MirrorProvider;
use linkmd_core::types::ProjectId;
use linkmd_database::repositories::ProjectRepository;
use linkmd_entity::project::{CreateProject, Project, UpdateProject};

use crate::mirror::best_effort;
use crate::paths::project_root;

/// Manages projects and their mirror root directories.
#[derive(Debug, Clone)]
pub struct ProjectService {
    /// Project repository.
    project_repo: Arc<ProjectRepository>,
    /// Physical mirror.
    mirror: Arc<dyn MirrorProvider>,
}

impl ProjectService {
    /// Creates a new project service.
    pub fn new(project_repo: Arc<ProjectRepository>, mirror: Arc<dyn MirrorProvider>) -> Self {
        Self {
            project_repo,
            mirror,
        }
    }

    fn clean_name(raw: &str) -> AppResult<String> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(AppError::validation("Project name cannot be empty"));
        }
        Ok(name.to_string())
    }

    /// Creates a project and its mirror root.
    pub async fn create_project(&self, mut data: CreateProject) -> AppResult<Project> {
        data.name = Self::clean_name(&data.name)?;

        if self.project_repo.find_by_name(&data.name).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Project '{}' already exists",
                data.name
            )));
        }

        let project = self.project_repo.create(&data).await?;
        let root = project_root(project.id);
        best_effort("create_dir", &root, self.mirror.create_dir(&root)).await;

        info!(project_id = %project.id, name = %project.name, "Project created");
        Ok(project)
    }

    /// Lists projects, most recently updated first.
    pub async fn list_projects(&self) -> AppResult<Vec<Project>> {
        self.project_repo.find_all().await
    }

    /// Gets a project by ID.
    pub async fn get_project(&self, id: ProjectId) -> AppResult<Project> {
        self.project_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))
    }

    /// Applies a partial update.
    pub async fn update_project(&self, id: ProjectId, mut data: UpdateProject) -> AppResult<Project> {
        self.get_project(id).await?;

        if let Some(name) = data.name.as_deref() {
            let name = Self::clean_name(name)?;
            if let Some(other) = self.project_repo.find_by_name(&name).await? {
                if other.id != id {
                    return Err(AppError::conflict(format!("Project '{name}' already exists")));
                }
            }
            data.name = Some(name);
        }

        let project = self.project_repo.update(id, &data).await?;
        info!(project_id = %id, "Project updated");
        Ok(project)
    }

    /// Deletes a project, its folders and documents, and its mirror subtree.
    pub async fn delete_project(&self, id: ProjectId) -> AppResult<()> {
        self.get_project(id).await?;
        self.project_repo.delete(id).await?;

        let root = project_root(id);
        best_effort("delete_dir", &root, self.mirror.delete_dir(&root)).await;

        info!(project_id = %id, "Project deleted");
        Ok(())
    }

    /// Recounts the project's documents.
    pub async fn refresh_document_count(&self, id: ProjectId) -> AppResult<i64> {
        self.project_repo.refresh_doc_count(id).await
    }
}
