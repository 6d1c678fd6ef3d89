//! Database migration command.

use linkmd_core::config::AppConfig;
use linkmd_core::result::AppResult;
use linkmd_database::DatabasePool;
use linkmd_database::migration::run_migrations;

use crate::output;

/// Execute the migrate command
pub async fn execute(config: &AppConfig) -> AppResult<()> {
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;
    db.close().await;
    output::print_success(&format!("Migrations applied to {}", config.database.url));
    Ok(())
}
