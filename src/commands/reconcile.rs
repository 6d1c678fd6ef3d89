//! Mirror reconciliation CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use linkmd_core::result::AppResult;
use linkmd_core::types::{DocumentId, FolderId, ProjectId};
use linkmd_service::ArchiveServices;
use linkmd_service::reconcile::ReconcileReport;

use crate::output::{self, OutputFormat};

/// Arguments for reconcile commands
#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Reconcile subcommand
    #[command(subcommand)]
    pub command: ReconcileCommand,
}

/// Reconcile subcommands
#[derive(Debug, Subcommand)]
pub enum ReconcileCommand {
    /// Rewrite every directory and document file of a project and recount its documents
    Project {
        /// Project ID
        id: String,
    },
    /// Rewrite a folder subtree
    Folder {
        /// Folder ID
        id: String,
    },
    /// Rewrite one document file
    Doc {
        /// Document ID
        id: String,
    },
}

/// Reconciliation summary row
#[derive(Debug, Serialize, Tabled)]
struct ReportRow {
    /// Directories ensured
    directories: usize,
    /// Document files written
    documents: usize,
    /// Files found at a stale path
    relocated: usize,
    /// Document count after the pass (projects only)
    doc_count: String,
}

impl From<&ReconcileReport> for ReportRow {
    fn from(r: &ReconcileReport) -> Self {
        Self {
            directories: r.directories,
            documents: r.documents,
            relocated: r.relocated,
            doc_count: "-".to_string(),
        }
    }
}

/// Execute reconcile commands
pub async fn execute(
    args: &ReconcileArgs,
    services: &ArchiveServices,
    format: OutputFormat,
) -> AppResult<()> {
    let reconcile = &services.reconcile;

    match &args.command {
        ReconcileCommand::Project { id } => {
            let id: ProjectId = super::parse_id(id, "project")?;
            let report = reconcile.reconcile_project(id).await?;
            let count = services.projects.refresh_document_count(id).await?;
            let row = ReportRow {
                doc_count: count.to_string(),
                ..ReportRow::from(&report)
            };
            output::print_item(&row, format);
        }
        ReconcileCommand::Folder { id } => {
            let id: FolderId = super::parse_id(id, "folder")?;
            let report = reconcile.reconcile_folder(id).await?;
            output::print_item(&ReportRow::from(&report), format);
        }
        ReconcileCommand::Doc { id } => {
            let id: DocumentId = super::parse_id(id, "document")?;
            let doc = reconcile.reconcile_document(id).await?;
            output::print_success(&format!(
                "Rewrote {}",
                doc.original_path.as_deref().unwrap_or(doc.filename.as_str())
            ));
        }
    }

    Ok(())
}
