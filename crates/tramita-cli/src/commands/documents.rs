//! Document checklist CLI commands.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use tramita_core::error::AppError;
use tramita_core::result::AppResult;
use tramita_core::traits::file_store::StoredFile;
use tramita_core::types::CaseId;
use tramita_service::DocumentService;

use crate::output::{self, OutputFormat};

/// Arguments for document commands
#[derive(Debug, Args)]
pub struct DocumentsArgs {
    /// Document subcommand
    #[command(subcommand)]
    pub command: DocumentCommand,
}

/// Document subcommands
#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// Submit a file into a required checklist slot
    Submit {
        /// Case id
        case_id: CaseId,
        /// Checklist slot code
        code: String,
        /// Path to the file to upload
        file: PathBuf,
    },
    /// Reset a required slot to not-submitted
    Reset {
        /// Case id
        case_id: CaseId,
        /// Checklist slot code
        code: String,
    },
    /// Move a checklist slot to a new position
    Reorder {
        /// Case id
        case_id: CaseId,
        /// Current index
        from: usize,
        /// Target index
        to: usize,
    },
    /// Mark every checklist slot optional
    MakeAllOptional {
        /// Case id
        case_id: CaseId,
    },
}

async fn read_upload(path: &Path) -> AppResult<StoredFile> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::validation(format!("Cannot read '{}': {e}", path.display())))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::validation(format!("Not a file path: {}", path.display())))?;
    Ok(StoredFile::new(bytes, file_name))
}

/// Execute document commands
pub async fn execute(
    args: &DocumentsArgs,
    config_path: &str,
    format: OutputFormat,
) -> AppResult<()> {
    let config = super::load_config(config_path).await?;
    let (case_store, _) = super::build_stores(&config).await?;
    let files = super::build_file_store(&config).await?;
    let service = DocumentService::new(case_store, files);

    match &args.command {
        DocumentCommand::Submit { case_id, code, file } => {
            let upload = read_upload(file).await?;
            let case = service.submit_required(*case_id, code, upload).await?;
            output::print_success(&format!("Submitted '{code}' on case {case_id}"));
            if format == OutputFormat::Json {
                output::print_item(&case.required_documents, format);
            }
        }
        DocumentCommand::Reset { case_id, code } => {
            service.reset_required(*case_id, code).await?;
            output::print_success(&format!("Reset '{code}' on case {case_id}"));
        }
        DocumentCommand::Reorder { case_id, from, to } => {
            let case = service.reorder_required(*case_id, *from, *to).await?;
            let order: Vec<&str> = case
                .required_documents
                .iter()
                .map(|d| d.code.as_str())
                .collect();
            output::print_success(&format!("New order: {}", order.join(", ")));
        }
        DocumentCommand::MakeAllOptional { case_id } => {
            service.make_all_optional(*case_id).await?;
            output::print_success(&format!("All checklist slots optional on case {case_id}"));
        }
    }

    Ok(())
}
