//! Tree store and mirror health check.

use serde::Serialize;
use tabled::Tabled;

use linkmd_core::config::AppConfig;
use linkmd_core::result::AppResult;
use linkmd_core::traits::MirrorProvider;
use linkmd_database::DatabasePool;
use linkmd_storage::LocalMirror;

use crate::output::{self, OutputFormat};

/// Health display row
#[derive(Debug, Serialize, Tabled)]
struct StatusRow {
    /// Component
    component: String,
    /// Location
    location: String,
    /// Status
    status: String,
}

fn status_label(healthy: bool) -> String {
    if healthy { "ok" } else { "unavailable" }.to_string()
}

/// Execute the status command
pub async fn execute(config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let db = DatabasePool::connect(&config.database).await?;
    let db_ok = db.health_check().await.unwrap_or(false);
    db.close().await;

    let mirror = LocalMirror::new(&config.storage.root_path).await?;
    let mirror_ok = mirror.health_check().await?;

    let rows = vec![
        StatusRow {
            component: "tree store".to_string(),
            location: config.database.url.clone(),
            status: status_label(db_ok),
        },
        StatusRow {
            component: format!("mirror ({})", mirror.provider_type()),
            location: mirror.root().display().to_string(),
            status: status_label(mirror_ok),
        },
    ];
    output::print_list(&rows, format);
    Ok(())
}
