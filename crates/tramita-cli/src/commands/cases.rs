//! Case management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tramita_core::error::AppError;
use tramita_core::result::AppResult;
use tramita_core::types::CaseId;
use tramita_entity::case::{Case, CaseTemplate, NewCase};
use tramita_service::CaseService;

use crate::output::{self, OutputFormat};

/// Arguments for case commands
#[derive(Debug, Args)]
pub struct CasesArgs {
    /// Case subcommand
    #[command(subcommand)]
    pub command: CaseCommand,
}

/// Case subcommands
#[derive(Debug, Subcommand)]
pub enum CaseCommand {
    /// List all cases, newest first
    List,
    /// Show one case in full
    Show {
        /// Case id
        id: CaseId,
    },
    /// Create a case
    Create {
        /// Client first name
        first_name: String,
        /// Client surname
        last_name: String,
        /// Contact e-mail
        #[arg(long)]
        email: Option<String>,
        /// Contact phone
        #[arg(long)]
        phone: Option<String>,
        /// Agreed total fee in euro-cents
        #[arg(long)]
        total_fee: Option<i64>,
        /// Path to a JSON case template to copy the checklist from
        #[arg(long)]
        template: Option<String>,
    },
    /// Mark a case as filed with immigration
    Submit {
        /// Case id
        id: CaseId,
    },
    /// Delete a case and every file it references
    Delete {
        /// Case id
        id: CaseId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Case display row for table output
#[derive(Debug, Serialize, Tabled)]
struct CaseRow {
    /// Case ID
    id: String,
    /// Client name
    client: String,
    /// Checklist progress
    checklist: String,
    /// Filed with immigration
    submitted: bool,
    /// Outstanding fee in euro-cents
    outstanding: i64,
    /// Created at
    created_at: String,
}

impl From<&Case> for CaseRow {
    fn from(case: &Case) -> Self {
        let total = case.required_documents.len();
        let done = case.required_documents.iter().filter(|d| d.submitted).count();
        Self {
            id: case.id.to_string(),
            client: case.full_name(),
            checklist: format!("{done}/{total}"),
            submitted: case.submitted_to_immigration,
            outstanding: case.payment.outstanding(),
            created_at: case.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

async fn load_template(path: &str) -> AppResult<CaseTemplate> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::validation(format!("Cannot read template '{path}': {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::validation(format!("Invalid template '{path}': {e}")))
}

/// Execute case commands
pub async fn execute(args: &CasesArgs, config_path: &str, format: OutputFormat) -> AppResult<()> {
    let config = super::load_config(config_path).await?;
    let (case_store, _) = super::build_stores(&config).await?;
    let files = super::build_file_store(&config).await?;
    let service = CaseService::new(case_store, files);

    match &args.command {
        CaseCommand::List => {
            let cases = service.list().await?;
            let rows: Vec<CaseRow> = cases.iter().map(CaseRow::from).collect();
            output::print_list(&rows, format);
        }
        CaseCommand::Show { id } => {
            let case = service.get(*id).await?;
            output::print_item(&case, format);
        }
        CaseCommand::Create {
            first_name,
            last_name,
            email,
            phone,
            total_fee,
            template,
        } => {
            let template = match template {
                Some(path) => Some(load_template(path).await?),
                None => None,
            };
            let draft = NewCase {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                total_fee: *total_fee,
                administrative_silence_days: 90,
                reminder_interval_days: 7,
                requested_documents_reminder_duration_days: 10,
            };
            let case = service.create(draft, template.as_ref()).await?;
            output::print_success(&format!("Created case {}", case.id));
            output::print_kv("client", &case.full_name());
            output::print_kv("checklist slots", &case.required_documents.len().to_string());
        }
        CaseCommand::Submit { id } => {
            let case = service.submit_to_immigration(*id).await?;
            output::print_success(&format!(
                "Case {} submitted; silence period of {} days started",
                case.id, case.administrative_silence_days
            ));
        }
        CaseCommand::Delete { id, yes } => {
            if !super::confirm(&format!("Delete case {id} and all its files?"), *yes)? {
                output::print_warning("Aborted");
                return Ok(());
            }
            if service.delete(*id).await? {
                output::print_success(&format!("Deleted case {id}"));
            } else {
                output::print_warning(&format!("Case {id} not found"));
            }
        }
    }

    Ok(())
}
