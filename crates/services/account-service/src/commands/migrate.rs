//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::AccountServiceConfig;
use crate::infra::Database;
use common::{AppError, AppResult};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: AccountServiceConfig) -> AppResult<()> {
    if config.uses_memory_store() {
        return Err(AppError::config(
            "Migrations need a database; DATABASE_URL selects the in-memory store",
        ));
    }

    // Connect without auto-running migrations for manual control
    let db = Database::connect_without_migrations(&config.database).await?;

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            db.run_migrations().await?;
            tracing::info!("Migrations completed successfully");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back last migration...");
            db.rollback_migration().await?;
            tracing::info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let status_str = if applied { "applied" } else { "pending" };
                println!("{}: {}", name, status_str);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Resetting database and running all migrations...");
            db.fresh_migrations().await?;
            tracing::info!("Fresh migrations completed successfully");
        }
    }

    Ok(())
}
