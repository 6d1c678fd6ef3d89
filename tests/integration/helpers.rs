//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use linkmd_core::config::{ArchiveConfig, DatabaseConfig};
use linkmd_core::types::{FolderId, ProjectId};
use linkmd_database::DatabasePool;
use linkmd_database::migration::run_migrations;
use linkmd_database::repositories::{DocumentRepository, TagRepository};
use linkmd_entity::document::DocumentWithTags;
use linkmd_entity::folder::Folder;
use linkmd_entity::project::{CreateProject, Project};
use linkmd_service::ArchiveServices;
use linkmd_storage::LocalMirror;

/// Test application context backed by a temporary SQLite file and mirror root
pub struct TestApp {
    /// Wired services under test
    pub services: ArchiveServices,
    /// Document repository for direct queries
    pub documents: DocumentRepository,
    /// Tag repository for direct queries
    pub tags: TagRepository,
    /// Database pool
    pub db: DatabasePool,
    /// Root directory of the physical mirror
    pub mirror_root: PathBuf,
    /// Keeps the temporary directory alive
    _dir: TempDir,
}

impl TestApp {
    /// Create a new test application with default archive settings
    pub async fn new() -> Self {
        Self::with_config(ArchiveConfig::default()).await
    }

    /// Create a new test application with custom archive settings
    pub async fn with_config(archive: ArchiveConfig) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("linkmd.db").display()),
            ..DatabaseConfig::default()
        };

        let db = DatabasePool::connect(&db_config)
            .await
            .expect("Failed to open test database");
        run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let mirror_root = dir.path().join("mirror");
        let mirror = Arc::new(
            LocalMirror::new(&mirror_root)
                .await
                .expect("Failed to init mirror"),
        );

        let services = ArchiveServices::new(db.pool().clone(), mirror, archive)
            .expect("Failed to wire services");

        Self {
            services,
            documents: DocumentRepository::new(db.pool().clone()),
            tags: TagRepository::new(db.pool().clone()),
            db,
            mirror_root,
            _dir: dir,
        }
    }

    /// Create a project
    pub async fn project(&self, name: &str) -> Project {
        self.services
            .projects
            .create_project(CreateProject {
                name: name.to_string(),
                ..CreateProject::default()
            })
            .await
            .expect("Failed to create project")
    }

    /// Create a folder
    pub async fn folder(&self, project: ProjectId, name: &str, parent: Option<FolderId>) -> Folder {
        self.services
            .folders
            .create_folder(project, name, parent)
            .await
            .expect("Failed to create folder")
    }

    /// Create a document with explicit content
    pub async fn document(
        &self,
        project: ProjectId,
        folder: Option<FolderId>,
        filename: &str,
        content: &str,
    ) -> DocumentWithTags {
        self.services
            .documents
            .create_document(project, filename, folder, Some(content.to_string()))
            .await
            .expect("Failed to create document")
    }

    /// Absolute path of a mirror-relative path
    pub fn mirror_path(&self, relative: &str) -> PathBuf {
        self.mirror_root.join(relative)
    }

    /// Read a mirror file, `None` when it does not exist
    pub fn read_mirror(&self, relative: &str) -> Option<String> {
        std::fs::read_to_string(self.mirror_path(relative)).ok()
    }

    /// Whether a mirror file or directory exists
    pub fn mirror_exists(&self, relative: &str) -> bool {
        self.mirror_path(relative).exists()
    }

    /// Number of documents stored for a project
    pub async fn document_count(&self, project: ProjectId) -> i64 {
        self.documents
            .count_by_project(project)
            .await
            .expect("Failed to count documents")
    }
}
