//! Wiring of a complete service set.

use std::sync::Arc;

use sqlx::SqlitePool;

use linkmd_core::config::ArchiveConfig;
use linkmd_core::result::AppResult;
use linkmd_core::traits::MirrorProvider;
use linkmd_database::repositories::{
    DocumentRepository, FolderRepository, ProjectRepository, TagRepository,
};

use crate::analysis::MarkdownAnalyzer;
use crate::document::DocumentService;
use crate::folder::{FolderService, TreeService};
use crate::project::ProjectService;
use crate::reconcile::ReconcileService;
use crate::traits::TagStore;

/// Every archive service, sharing one pool and one mirror.
#[derive(Debug, Clone)]
pub struct ArchiveServices {
    /// Project lifecycle.
    pub projects: ProjectService,
    /// Folder lifecycle.
    pub folders: FolderService,
    /// Project tree views.
    pub trees: TreeService,
    /// Document lifecycle.
    pub documents: DocumentService,
    /// Mirror repair.
    pub reconcile: ReconcileService,
    /// Tag associations.
    pub tags: Arc<dyn TagStore>,
}

impl ArchiveServices {
    /// Builds the services over a migrated pool and a mirror provider.
    pub fn new(
        pool: SqlitePool,
        mirror: Arc<dyn MirrorProvider>,
        config: ArchiveConfig,
    ) -> AppResult<Self> {
        let project_repo = Arc::new(ProjectRepository::new(pool.clone()));
        let folder_repo = Arc::new(FolderRepository::new(pool.clone()));
        let document_repo = Arc::new(DocumentRepository::new(pool.clone()));
        let tags: Arc<dyn TagStore> = Arc::new(TagRepository::new(pool));
        let analyzer = Arc::new(MarkdownAnalyzer::new()?);

        Ok(Self {
            projects: ProjectService::new(Arc::clone(&project_repo), Arc::clone(&mirror)),
            folders: FolderService::new(
                Arc::clone(&folder_repo),
                Arc::clone(&document_repo),
                Arc::clone(&project_repo),
                Arc::clone(&mirror),
            ),
            trees: TreeService::new(
                Arc::clone(&folder_repo),
                Arc::clone(&document_repo),
                Arc::clone(&project_repo),
            ),
            documents: DocumentService::new(
                Arc::clone(&project_repo),
                Arc::clone(&folder_repo),
                Arc::clone(&document_repo),
                Arc::clone(&mirror),
                analyzer,
                Arc::clone(&tags),
                config,
            ),
            reconcile: ReconcileService::new(folder_repo, document_repo, project_repo, mirror),
            tags,
        })
    }
}
