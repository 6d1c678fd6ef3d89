//! CLI command definitions and dispatch.

pub mod doc;
pub mod folder;
pub mod migrate;
pub mod project;
pub mod reconcile;
pub mod status;

use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use linkmd_core::config::AppConfig;
use linkmd_core::error::AppError;
use linkmd_core::result::AppResult;
use linkmd_database::DatabasePool;
use linkmd_database::migration::run_migrations;
use linkmd_service::ArchiveServices;
use linkmd_storage::LocalMirror;

use crate::output::OutputFormat;

/// LinkMD: a markdown archive with a mirrored folder tree on disk
#[derive(Debug, Parser)]
#[command(name = "linkmd", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and <env>.toml
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Configuration environment overlay
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Project management
    Project(project::ProjectArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Document management
    Doc(doc::DocArgs),
    /// Rebuild mirror files from the tree store
    Reconcile(reconcile::ReconcileArgs),
    /// Apply database migrations
    Migrate,
    /// Check the tree store and the mirror root
    Status,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        match self.command {
            Commands::Migrate => return migrate::execute(&config).await,
            Commands::Status => return status::execute(&config, self.format).await,
            _ => {}
        }

        let (db, services) = open_services(&config).await?;
        let result = match &self.command {
            Commands::Project(args) => project::execute(args, &services, self.format).await,
            Commands::Folder(args) => folder::execute(args, &services, self.format).await,
            Commands::Doc(args) => doc::execute(args, &services, self.format).await,
            Commands::Reconcile(args) => reconcile::execute(args, &services, self.format).await,
            Commands::Migrate | Commands::Status => Ok(()),
        };
        db.close().await;
        result
    }
}

/// Helper: connect, migrate, and wire the archive services
pub async fn open_services(config: &AppConfig) -> AppResult<(DatabasePool, ArchiveServices)> {
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;
    let mirror = Arc::new(LocalMirror::new(&config.storage.root_path).await?);
    let services = ArchiveServices::new(db.pool().clone(), mirror, config.archive.clone())?;
    Ok((db, services))
}

/// Helper: parse a typed ID argument
pub fn parse_id<T>(raw: &str, what: &str) -> AppResult<T>
where
    T: FromStr<Err = uuid::Error>,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::validation(format!("Invalid {what} ID '{raw}': {e}")))
}

/// Helper: parse an optional typed ID argument
pub fn parse_opt_id<T>(raw: Option<&String>, what: &str) -> AppResult<Option<T>>
where
    T: FromStr<Err = uuid::Error>,
{
    raw.map(|r| parse_id(r, what)).transpose()
}

/// Helper: format a timestamp for table output
pub fn short_time(t: &chrono::DateTime<chrono::Utc>) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}
