//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use linkmd_core::result::AppResult;
use linkmd_core::types::{FolderId, ProjectId};
use linkmd_entity::folder::Folder;
use linkmd_service::ArchiveServices;

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a folder
    Create {
        /// Project ID
        project: String,
        /// Folder name
        name: String,
        /// Parent folder ID (omit for the project root)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Rename a folder; documents below it are relocated on disk
    Rename {
        /// Folder ID
        id: String,
        /// New name
        name: String,
    },
    /// Move a folder under a new parent
    Move {
        /// Folder ID
        id: String,
        /// New parent folder ID (omit for the project root)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Delete a folder with its whole subtree
    Delete {
        /// Folder ID
        id: String,
    },
    /// Show a folder
    Show {
        /// Folder ID
        id: String,
    },
    /// List all folders of a project
    List {
        /// Project ID
        project: String,
    },
    /// Print the folder and document tree of a project
    Tree {
        /// Project ID
        project: String,
    },
}

/// Folder display row for table output
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Parent folder
    parent: String,
    /// Sort order
    order: i64,
    /// Last update
    updated_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            parent: f
                .parent_id
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            order: f.sort_order,
            updated_at: super::short_time(&f.updated_at),
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    services: &ArchiveServices,
    format: OutputFormat,
) -> AppResult<()> {
    let folders = &services.folders;

    match &args.command {
        FolderCommand::Create {
            project,
            name,
            parent,
        } => {
            let project: ProjectId = super::parse_id(project, "project")?;
            let parent: Option<FolderId> = super::parse_opt_id(parent.as_ref(), "folder")?;
            let folder = folders.create_folder(project, name, parent).await?;
            output::print_item(&FolderRow::from(&folder), format);
        }
        FolderCommand::Rename { id, name } => {
            let id: FolderId = super::parse_id(id, "folder")?;
            let folder = folders.rename_folder(id, name).await?;
            output::print_item(&FolderRow::from(&folder), format);
        }
        FolderCommand::Move { id, parent } => {
            let id: FolderId = super::parse_id(id, "folder")?;
            let parent: Option<FolderId> = super::parse_opt_id(parent.as_ref(), "folder")?;
            let folder = folders.move_folder(id, parent).await?;
            output::print_item(&FolderRow::from(&folder), format);
        }
        FolderCommand::Delete { id } => {
            let id: FolderId = super::parse_id(id, "folder")?;
            let deletion = folders.delete_folder(id).await?;
            output::print_success(&format!(
                "Deleted {} folder(s) and {} document(s)",
                deletion.folder_ids.len(),
                deletion.document_count
            ));
        }
        FolderCommand::Show { id } => {
            let id: FolderId = super::parse_id(id, "folder")?;
            let folder = folders.get_folder(id).await?;
            output::print_item(&FolderRow::from(&folder), format);
        }
        FolderCommand::List { project } => {
            let project: ProjectId = super::parse_id(project, "project")?;
            let rows: Vec<FolderRow> = folders
                .list_folders(project)
                .await?
                .iter()
                .map(FolderRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Tree { project } => {
            let project: ProjectId = super::parse_id(project, "project")?;
            let tree = services.trees.get_project_tree(project).await?;
            output::print_tree(&tree, format);
        }
    }

    Ok(())
}
