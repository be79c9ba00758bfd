//! Database migration CLI commands.

use clap::{Args, Subcommand};

use tramita_core::error::AppError;
use tramita_core::result::AppResult;
use tramita_core::config::store::StoreBackend;
use tramita_store::{DatabasePool, migration};

use crate::output;

/// Arguments for migration commands
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Check database connectivity
    Status,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config_path: &str) -> AppResult<()> {
    let config = super::load_config(config_path).await?;
    if config.store.backend != StoreBackend::Postgres {
        return Err(AppError::configuration(
            "Migrations only apply to the postgres store backend",
        ));
    }

    let pool = DatabasePool::connect(&config.store.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            migration::run_migrations(pool.pool()).await?;
            output::print_success("Migrations applied");
        }
        MigrateCommand::Status => {
            if pool.health_check().await? {
                output::print_success("Database reachable");
            } else {
                output::print_warning("Database health check returned an unexpected value");
            }
        }
    }

    pool.close().await;
    Ok(())
}
