//! Project management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use linkmd_core::result::AppResult;
use linkmd_core::types::ProjectId;
use linkmd_entity::project::{CreateProject, Project, UpdateProject};
use linkmd_service::ArchiveServices;

use crate::output::{self, OutputFormat};

/// Arguments for project commands
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Project subcommand
    #[command(subcommand)]
    pub command: ProjectCommand,
}

/// Project subcommands
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create a project
    Create {
        /// Project name (unique)
        name: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Display color
        #[arg(long)]
        color: Option<String>,
        /// Display icon
        #[arg(long)]
        icon: Option<String>,
    },
    /// List all projects
    List,
    /// Show a project
    Show {
        /// Project ID
        id: String,
    },
    /// Update project metadata
    Update {
        /// Project ID
        id: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New color
        #[arg(long)]
        color: Option<String>,
        /// New icon
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a project with all its folders and documents
    Delete {
        /// Project ID
        id: String,
    },
}

/// Project display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ProjectRow {
    /// Project ID
    id: String,
    /// Name
    name: String,
    /// Description
    description: String,
    /// Documents
    docs: i64,
    /// Last update
    updated_at: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            description: p.description.clone(),
            docs: p.doc_count,
            updated_at: super::short_time(&p.updated_at),
        }
    }
}

/// Execute project commands
pub async fn execute(
    args: &ProjectArgs,
    services: &ArchiveServices,
    format: OutputFormat,
) -> AppResult<()> {
    let projects = &services.projects;

    match &args.command {
        ProjectCommand::Create {
            name,
            description,
            color,
            icon,
        } => {
            let project = projects
                .create_project(CreateProject {
                    name: name.clone(),
                    description: description.clone(),
                    color: color.clone(),
                    icon: icon.clone(),
                })
                .await?;
            output::print_item(&ProjectRow::from(&project), format);
        }
        ProjectCommand::List => {
            let rows: Vec<ProjectRow> = projects
                .list_projects()
                .await?
                .iter()
                .map(ProjectRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        ProjectCommand::Show { id } => {
            let id: ProjectId = super::parse_id(id, "project")?;
            let project = projects.get_project(id).await?;
            output::print_item(&ProjectRow::from(&project), format);
        }
        ProjectCommand::Update {
            id,
            name,
            description,
            color,
            icon,
        } => {
            let id: ProjectId = super::parse_id(id, "project")?;
            let project = projects
                .update_project(
                    id,
                    UpdateProject {
                        name: name.clone(),
                        description: description.clone(),
                        color: color.clone(),
                        icon: icon.clone(),
                    },
                )
                .await?;
            output::print_item(&ProjectRow::from(&project), format);
        }
        ProjectCommand::Delete { id } => {
            let id: ProjectId = super::parse_id(id, "project")?;
            projects.delete_project(id).await?;
            output::print_success(&format!("Project {id} deleted"));
        }
    }

    Ok(())
}
