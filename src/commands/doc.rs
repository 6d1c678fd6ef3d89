//! Document management CLI commands.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use linkmd_core::error::{AppError, ErrorKind};
use linkmd_core::result::AppResult;
use linkmd_core::types::{DocumentId, FolderId, ProjectId};
use linkmd_entity::document::{Document, DocumentSummary, DocumentWithTags, FolderScope};
use linkmd_service::{ArchiveServices, UploadFile};

use crate::output::{self, OutputFormat};

/// Arguments for document commands
#[derive(Debug, Args)]
pub struct DocArgs {
    /// Document subcommand
    #[command(subcommand)]
    pub command: DocCommand,
}

/// Document subcommands
#[derive(Debug, Subcommand)]
pub enum DocCommand {
    /// Create a document
    Create {
        /// Project ID
        project: String,
        /// Filename; the archive extension is appended when missing
        filename: String,
        /// Target folder ID (omit for the project root)
        #[arg(long)]
        folder: Option<String>,
        /// Read initial content from this file
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Import markdown files and zip packages from disk
    Import {
        /// Project ID
        project: String,
        /// Files to import
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Target folder ID (omit for the project root)
        #[arg(long)]
        folder: Option<String>,
    },
    /// List documents of a project
    List {
        /// Project ID
        project: String,
        /// Only documents directly inside this folder
        #[arg(long, conflicts_with = "root")]
        folder: Option<String>,
        /// Only documents at the project root
        #[arg(long)]
        root: bool,
    },
    /// Show a document
    Show {
        /// Document ID
        id: String,
        /// Print the raw content instead of metadata
        #[arg(long)]
        content: bool,
    },
    /// Update title and/or content
    Update {
        /// Document ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// Replace content with this file
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Rename a document
    Rename {
        /// Document ID
        id: String,
        /// New filename
        filename: String,
    },
    /// Move a document to another folder or project
    Move {
        /// Document ID
        id: String,
        /// Target folder ID
        #[arg(long)]
        folder: Option<String>,
        /// Target project ID (root of that project when no folder is given)
        #[arg(long)]
        project: Option<String>,
    },
    /// Copy a document; the copy gets a free " (n)" filename
    Copy {
        /// Document ID
        id: String,
        /// Target folder ID
        #[arg(long)]
        folder: Option<String>,
        /// Target project ID (root of that project when no folder is given)
        #[arg(long)]
        project: Option<String>,
    },
    /// Delete a document
    Delete {
        /// Document ID
        id: String,
    },
    /// Count headings per level
    Headings {
        /// Document ID
        id: String,
    },
    /// Split a document into one document per section
    Split {
        /// Document ID
        id: String,
        /// Heading level to split at (1-6)
        #[arg(short, long, default_value_t = 2)]
        level: u8,
        /// Keep the source document
        #[arg(long)]
        keep: bool,
    },
    /// Attach a tag, creating it if needed
    Tag {
        /// Document ID
        id: String,
        /// Tag name
        name: String,
        /// Color for a newly created tag
        #[arg(long)]
        color: Option<String>,
    },
    /// Detach a tag
    Untag {
        /// Document ID
        id: String,
        /// Tag name
        name: String,
    },
}

/// Document display row for table output
#[derive(Debug, Serialize, Tabled)]
struct DocumentRow {
    /// Document ID
    id: String,
    /// Filename
    filename: String,
    /// Title
    title: String,
    /// Size in bytes
    size: i64,
    /// Headings
    headings: i64,
    /// Code blocks
    code: i64,
    /// Lines
    lines: i64,
}

impl From<&DocumentSummary> for DocumentRow {
    fn from(d: &DocumentSummary) -> Self {
        Self {
            id: d.id.to_string(),
            filename: d.filename.clone(),
            title: d.title.clone(),
            size: d.file_size,
            headings: d.heading_count,
            code: d.code_block_count,
            lines: d.line_count,
        }
    }
}

impl From<&Document> for DocumentRow {
    fn from(d: &Document) -> Self {
        Self::from(&DocumentSummary::from(d))
    }
}

/// Detail row including location and tags
#[derive(Debug, Serialize, Tabled)]
struct DocumentDetailRow {
    /// Document ID
    id: String,
    /// Filename
    filename: String,
    /// Title
    title: String,
    /// Folder
    folder: String,
    /// Mirror path last written
    path: String,
    /// Tags
    tags: String,
    /// Last update
    updated_at: String,
}

impl From<&DocumentWithTags> for DocumentDetailRow {
    fn from(d: &DocumentWithTags) -> Self {
        let doc = &d.document;
        Self {
            id: doc.id.to_string(),
            filename: doc.filename.clone(),
            title: doc.title.clone(),
            folder: doc
                .folder_id
                .map(|f| f.to_string())
                .unwrap_or_else(|| "-".to_string()),
            path: doc.original_path.clone().unwrap_or_default(),
            tags: d
                .tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            updated_at: super::short_time(&doc.updated_at),
        }
    }
}

/// Heading count row
#[derive(Debug, Serialize, Tabled)]
struct HeadingRow {
    /// Heading level
    level: String,
    /// Number of headings
    count: usize,
}

async fn read_text(path: &Path) -> AppResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Validation,
            format!("Cannot read '{}': {e}", path.display()),
            e,
        )
    })
}

async fn read_upload(path: &Path) -> AppResult<UploadFile> {
    let data = tokio::fs::read(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Validation,
            format!("Cannot read '{}': {e}", path.display()),
            e,
        )
    })?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::validation(format!("Not a file: {}", path.display())))?;
    Ok(UploadFile::new(filename, Bytes::from(data)))
}

fn print_document(doc: &DocumentWithTags, format: OutputFormat) {
    output::print_item(&DocumentDetailRow::from(doc), format);
}

/// Execute document commands
pub async fn execute(args: &DocArgs, services: &ArchiveServices, format: OutputFormat) -> AppResult<()> {
    let documents = &services.documents;

    match &args.command {
        DocCommand::Create {
            project,
            filename,
            folder,
            from,
        } => {
            let project: ProjectId = super::parse_id(project, "project")?;
            let folder: Option<FolderId> = super::parse_opt_id(folder.as_ref(), "folder")?;
            let content = match from {
                Some(path) => Some(read_text(path).await?),
                None => None,
            };
            let doc = documents
                .create_document(project, filename, folder, content)
                .await?;
            print_document(&doc, format);
        }
        DocCommand::Import {
            project,
            files,
            folder,
        } => {
            let project: ProjectId = super::parse_id(project, "project")?;
            let folder: Option<FolderId> = super::parse_opt_id(folder.as_ref(), "folder")?;
            let mut uploads = Vec::with_capacity(files.len());
            for path in files {
                uploads.push(read_upload(path).await?);
            }
            let archived = documents.archive_documents(project, uploads, folder).await?;
            let rows: Vec<DocumentRow> = archived.iter().map(DocumentRow::from).collect();
            output::print_list(&rows, format);
        }
        DocCommand::List {
            project,
            folder,
            root,
        } => {
            let project: ProjectId = super::parse_id(project, "project")?;
            let scope = match super::parse_opt_id::<FolderId>(folder.as_ref(), "folder")? {
                Some(id) => FolderScope::Folder(id),
                None if *root => FolderScope::Root,
                None => FolderScope::Any,
            };
            let rows: Vec<DocumentRow> = documents
                .list_documents(project, scope)
                .await?
                .iter()
                .map(DocumentRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        DocCommand::Show { id, content } => {
            let id: DocumentId = super::parse_id(id, "document")?;
            let doc = documents.get_document(id).await?;
            if *content {
                print!("{}", doc.document.content);
            } else if format == OutputFormat::Json {
                output::print_value(&doc);
            } else {
                print_document(&doc, format);
            }
        }
        DocCommand::Update { id, title, from } => {
            let id: DocumentId = super::parse_id(id, "document")?;
            let content = match from {
                Some(path) => Some(read_text(path).await?),
                None => None,
            };
            let doc = documents
                .update_document(id, title.as_deref(), content.as_deref())
                .await?;
            print_document(&doc, format);
        }
        DocCommand::Rename { id, filename } => {
            let id: DocumentId = super::parse_id(id, "document")?;
            let doc = documents.rename_document(id, filename).await?;
            print_document(&doc, format);
        }
        DocCommand::Move {
            id,
            folder,
            project,
        } => {
            let id: DocumentId = super::parse_id(id, "document")?;
            let folder: Option<FolderId> = super::parse_opt_id(folder.as_ref(), "folder")?;
            let project: Option<ProjectId> = super::parse_opt_id(project.as_ref(), "project")?;
            let doc = documents.move_document(id, folder, project).await?;
            print_document(&doc, format);
        }
        DocCommand::Copy {
            id,
            folder,
            project,
        } => {
            let id: DocumentId = super::parse_id(id, "document")?;
            let folder: Option<FolderId> = super::parse_opt_id(folder.as_ref(), "folder")?;
            let project: Option<ProjectId> = super::parse_opt_id(project.as_ref(), "project")?;
            let doc = documents.copy_document(id, folder, project).await?;
            print_document(&doc, format);
        }
        DocCommand::Delete { id } => {
            let id: DocumentId = super::parse_id(id, "document")?;
            documents.delete_document(id).await?;
            output::print_success(&format!("Document {id} deleted"));
        }
        DocCommand::Headings { id } => {
            let id: DocumentId = super::parse_id(id, "document")?;
            let stats = documents.heading_stats(id).await?;
            if format == OutputFormat::Json {
                output::print_value(&stats);
            } else {
                let rows: Vec<HeadingRow> = stats
                    .stats
                    .iter()
                    .map(|(level, count)| HeadingRow {
                        level: format!("h{level}"),
                        count: *count,
                    })
                    .collect();
                println!("{}", stats.title);
                output::print_list(&rows, format);
            }
        }
        DocCommand::Split { id, level, keep } => {
            let id: DocumentId = super::parse_id(id, "document")?;
            let outcome = documents.split_document(id, *level, *keep).await?;
            if format == OutputFormat::Json {
                output::print_value(&outcome);
            } else {
                let rows: Vec<DocumentRow> =
                    outcome.created.iter().map(DocumentRow::from).collect();
                output::print_list(&rows, format);
                output::print_success(&format!(
                    "Split into {} document(s); original {}",
                    outcome.created.len(),
                    if outcome.kept { "kept" } else { "deleted" }
                ));
            }
        }
        DocCommand::Tag { id, name, color } => {
            let id: DocumentId = super::parse_id(id, "document")?;
            documents.get_document(id).await?;
            let tag = services.tags.ensure_tag(name, color.as_deref()).await?;
            if services.tags.add_to_document(id, tag.id).await? {
                output::print_success(&format!("Tagged {id} with '{}'", tag.name));
            } else {
                output::print_success(&format!("Document {id} already tagged '{}'", tag.name));
            }
        }
        DocCommand::Untag { id, name } => {
            let id: DocumentId = super::parse_id(id, "document")?;
            let doc = documents.get_document(id).await?;
            let tag = doc
                .tags
                .iter()
                .find(|t| t.name == *name)
                .ok_or_else(|| AppError::not_found(format!("Document {id} has no tag '{name}'")))?;
            services.tags.remove_from_document(id, tag.id).await?;
            output::print_success(&format!("Removed tag '{name}' from {id}"));
        }
    }

    Ok(())
}
