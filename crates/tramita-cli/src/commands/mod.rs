//! CLI command definitions and dispatch.

pub mod cases;
pub mod dashboard;
pub mod documents;
pub mod migrate;
pub mod reminders;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};

use tramita_core::config::AppConfig;
use tramita_core::config::store::StoreBackend;
use tramita_core::error::AppError;
use tramita_core::result::AppResult;
use tramita_service::{SharedCaseStore, SharedFileStore, SharedReminderStore};
use tramita_storage::LocalFileStore;
use tramita_store::flatfile::{FlatFileCaseStore, FlatFileReminderStore};
use tramita_store::postgres::{PgCaseStore, PgReminderStore};
use tramita_store::DatabasePool;

use crate::output::OutputFormat;

/// Tramita — immigration case deadline & document tracking
#[derive(Debug, Parser)]
#[command(name = "tramita", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

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
    /// Case management
    Cases(cases::CasesArgs),
    /// Document checklist operations
    Documents(documents::DocumentsArgs),
    /// Standalone reminders
    Reminders(reminders::RemindersArgs),
    /// Urgent view and readiness buckets
    Dashboard(dashboard::DashboardArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> AppResult<()> {
        match &self.command {
            Commands::Cases(args) => cases::execute(args, &self.config, self.format).await,
            Commands::Documents(args) => documents::execute(args, &self.config, self.format).await,
            Commands::Reminders(args) => reminders::execute(args, &self.config, self.format).await,
            Commands::Dashboard(args) => dashboard::execute(args, &self.config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
        }
    }
}

/// Helper: load configuration from file
pub async fn load_config(config_path: &str) -> AppResult<AppConfig> {
    AppConfig::load(config_path)
}

/// Helper: build the record stores selected by configuration.
pub async fn build_stores(config: &AppConfig) -> AppResult<(SharedCaseStore, SharedReminderStore)> {
    match config.store.backend {
        StoreBackend::Flatfile => {
            let data_dir = &config.store.flatfile.data_dir;
            let cases: SharedCaseStore = Arc::new(FlatFileCaseStore::open(data_dir).await?);
            let reminders: SharedReminderStore =
                Arc::new(FlatFileReminderStore::open(data_dir).await?);
            Ok((cases, reminders))
        }
        StoreBackend::Postgres => {
            let pool = DatabasePool::connect(&config.store.database)
                .await?
                .into_pool();
            let cases: SharedCaseStore = Arc::new(PgCaseStore::new(pool.clone()));
            let reminders: SharedReminderStore = Arc::new(PgReminderStore::new(pool));
            Ok((cases, reminders))
        }
    }
}

/// Helper: build the local file store.
pub async fn build_file_store(config: &AppConfig) -> AppResult<SharedFileStore> {
    Ok(Arc::new(LocalFileStore::new(&config.storage).await?))
}

/// Parse a `YYYY-MM-DD` date into a UTC midnight timestamp.
pub fn parse_date(value: &str) -> AppResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::validation(format!("Invalid date '{value}' (expected YYYY-MM-DD): {e}")))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Ask for confirmation on a destructive command unless `--yes` was given.
pub fn confirm(prompt: &str, assume_yes: bool) -> AppResult<bool> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Confirmation prompt failed: {e}")))
}
