//! Urgent view and readiness bucket CLI commands.

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tramita_core::result::AppResult;
use tramita_entity::case::Case;
use tramita_service::DashboardService;
use tramita_service::deadline::{UrgentEntry, UrgentSubject, UrgentTrigger};

use crate::output::{self, OutputFormat};

/// Arguments for dashboard commands
#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Dashboard subcommand
    #[command(subcommand)]
    pub command: DashboardCommand,
}

/// Dashboard subcommands
#[derive(Debug, Subcommand)]
pub enum DashboardCommand {
    /// Everything due within the urgency window, earliest first
    Urgent,
    /// Cases bucketed by submission readiness
    Buckets,
}

/// Urgent display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UrgentRow {
    /// Subject kind
    kind: String,
    /// Subject id
    id: String,
    /// Client name
    client: String,
    /// Due date
    due: String,
    /// Trigger
    trigger: String,
}

impl From<&UrgentEntry> for UrgentRow {
    fn from(entry: &UrgentEntry) -> Self {
        let (kind, id) = match entry.subject {
            UrgentSubject::Case(id) => ("case", id.to_string()),
            UrgentSubject::Reminder(id) => ("reminder", id.to_string()),
        };
        let trigger = match entry.trigger {
            UrgentTrigger::PaymentReminder => "payment reminder",
            UrgentTrigger::RequestedDocuments => "requested documents",
            UrgentTrigger::AdministrativeSilence => "administrative silence",
            UrgentTrigger::StandaloneReminder => "reminder",
        };
        Self {
            kind: kind.to_string(),
            id,
            client: entry.display_name.clone(),
            due: entry.due_date.format("%Y-%m-%d").to_string(),
            trigger: trigger.to_string(),
        }
    }
}

/// Readiness display row for table output
#[derive(Debug, Serialize, Tabled)]
struct BucketRow {
    /// Case ID
    id: String,
    /// Client name
    client: String,
    /// Checklist progress
    checklist: String,
}

impl From<&Case> for BucketRow {
    fn from(case: &Case) -> Self {
        let total = case.required_documents.len();
        let done = case.required_documents.iter().filter(|d| d.submitted).count();
        Self {
            id: case.id.to_string(),
            client: case.full_name(),
            checklist: format!("{done}/{total}"),
        }
    }
}

/// Execute dashboard commands
pub async fn execute(
    args: &DashboardArgs,
    config_path: &str,
    format: OutputFormat,
) -> AppResult<()> {
    let config = super::load_config(config_path).await?;
    let (case_store, reminder_store) = super::build_stores(&config).await?;
    let service = DashboardService::new(case_store, reminder_store);

    match &args.command {
        DashboardCommand::Urgent => {
            let entries = service.urgent(Utc::now()).await?;
            let rows: Vec<UrgentRow> = entries.iter().map(UrgentRow::from).collect();
            output::print_list(&rows, format);
        }
        DashboardCommand::Buckets => {
            let buckets = service.readiness_buckets().await?;

            println!("Ready to submit");
            let ready: Vec<BucketRow> = buckets.ready_to_submit.iter().map(BucketRow::from).collect();
            output::print_list(&ready, format);

            println!("Awaiting submission");
            let awaiting: Vec<BucketRow> = buckets
                .awaiting_submission
                .iter()
                .map(BucketRow::from)
                .collect();
            output::print_list(&awaiting, format);
        }
    }

    Ok(())
}
