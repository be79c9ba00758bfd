//! Standalone reminder CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tramita_core::result::AppResult;
use tramita_core::types::{CaseId, ReminderId};
use tramita_entity::reminder::{NewReminder, Reminder, ReminderCategory};
use tramita_service::ReminderService;

use crate::output::{self, OutputFormat};

/// Arguments for reminder commands
#[derive(Debug, Args)]
pub struct RemindersArgs {
    /// Reminder subcommand
    #[command(subcommand)]
    pub command: ReminderCommand,
}

/// Reminder subcommands
#[derive(Debug, Subcommand)]
pub enum ReminderCommand {
    /// List all reminders, grouped by category
    List,
    /// Add a reminder
    Add {
        /// Client first name
        client_name: String,
        /// Client surname
        client_surname: String,
        /// Due date (YYYY-MM-DD)
        date: String,
        /// Contact phone
        #[arg(long)]
        phone: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Category tag (legacy SCREAMING_SNAKE form, e.g. PAGOS)
        #[arg(long)]
        category: Option<String>,
        /// Linked case id
        #[arg(long)]
        case_id: Option<CaseId>,
    },
    /// Delete a reminder
    Delete {
        /// Reminder id
        id: ReminderId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Reminder display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ReminderRow {
    /// Reminder ID
    id: String,
    /// Client name
    client: String,
    /// Due date
    due: String,
    /// Category
    category: String,
    /// Linked case
    case: String,
}

impl From<&Reminder> for ReminderRow {
    fn from(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id.to_string(),
            client: reminder.full_name(),
            due: reminder.reminder_date.format("%Y-%m-%d").to_string(),
            category: reminder.category.to_string(),
            case: reminder
                .case_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Execute reminder commands
pub async fn execute(
    args: &RemindersArgs,
    config_path: &str,
    format: OutputFormat,
) -> AppResult<()> {
    let config = super::load_config(config_path).await?;
    let (case_store, reminder_store) = super::build_stores(&config).await?;
    let service = ReminderService::new(reminder_store, case_store);

    match &args.command {
        ReminderCommand::List => {
            for (category, bucket) in service.partitioned().await? {
                if bucket.is_empty() {
                    continue;
                }
                println!("{category}");
                let rows: Vec<ReminderRow> = bucket.iter().map(ReminderRow::from).collect();
                output::print_list(&rows, format);
            }
        }
        ReminderCommand::Add {
            client_name,
            client_surname,
            date,
            phone,
            notes,
            category,
            case_id,
        } => {
            let reminder = service
                .create(NewReminder {
                    case_id: *case_id,
                    client_name: client_name.clone(),
                    client_surname: client_surname.clone(),
                    phone: phone.clone(),
                    reminder_date: super::parse_date(date)?,
                    notes: notes.clone(),
                    category: ReminderCategory::from_tag(category.as_deref()),
                })
                .await?;
            output::print_success(&format!("Created reminder {}", reminder.id));
        }
        ReminderCommand::Delete { id, yes } => {
            if !super::confirm(&format!("Delete reminder {id}?"), *yes)? {
                output::print_warning("Aborted");
                return Ok(());
            }
            if service.delete(*id).await? {
                output::print_success(&format!("Deleted reminder {id}"));
            } else {
                output::print_warning(&format!("Reminder {id} not found"));
            }
        }
    }

    Ok(())
}
