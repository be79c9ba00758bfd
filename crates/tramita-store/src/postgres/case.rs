//! PostgreSQL case store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use tramita_core::error::{AppError, ErrorKind};
use tramita_core::result::AppResult;
use tramita_core::traits::RecordStore;
use tramita_core::types::{CaseId, TemplateId};
use tramita_entity::case::{
    Case, CasePatch, NewCase, PaymentLedger, RequestedDocument, RequiredDocument,
    SupplementaryDocument,
};

/// PostgreSQL-backed case store.
#[derive(Debug, Clone)]
pub struct PgCaseStore {
    pool: PgPool,
}

impl PgCaseStore {
    /// Create a new case store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row mapping between the `cases` table and the [`Case`] entity.
#[derive(Debug, sqlx::FromRow)]
struct CaseRow {
    id: CaseId,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    case_template_id: Option<TemplateId>,
    required_documents: Json<Vec<RequiredDocument>>,
    additional_documents: Json<Vec<SupplementaryDocument>>,
    aportar_documentacion: Json<Vec<SupplementaryDocument>>,
    requerimiento: Json<Vec<SupplementaryDocument>>,
    resolucion: Json<Vec<SupplementaryDocument>>,
    justificante_presentacion: Json<Vec<SupplementaryDocument>>,
    requested_documents: Json<Vec<RequestedDocument>>,
    payment: Json<PaymentLedger>,
    submitted_to_immigration: bool,
    application_date: Option<DateTime<Utc>>,
    administrative_silence_days: i64,
    reminder_interval_days: i64,
    requested_documents_reminder_interval_days: i64,
    requested_documents_last_reminder_date: Option<DateTime<Utc>>,
    requested_documents_reminder_duration_days: i64,
    custom_reminder_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CaseRow> for Case {
    fn from(row: CaseRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            case_template_id: row.case_template_id,
            required_documents: row.required_documents.0,
            additional_documents: row.additional_documents.0,
            aportar_documentacion: row.aportar_documentacion.0,
            requerimiento: row.requerimiento.0,
            resolucion: row.resolucion.0,
            justificante_presentacion: row.justificante_presentacion.0,
            requested_documents: row.requested_documents.0,
            payment: row.payment.0,
            submitted_to_immigration: row.submitted_to_immigration,
            application_date: row.application_date,
            administrative_silence_days: row.administrative_silence_days,
            reminder_interval_days: row.reminder_interval_days,
            requested_documents_reminder_interval_days: row
                .requested_documents_reminder_interval_days,
            requested_documents_last_reminder_date: row.requested_documents_last_reminder_date,
            requested_documents_reminder_duration_days: row
                .requested_documents_reminder_duration_days,
            custom_reminder_date: row.custom_reminder_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const INSERT_SQL: &str = "INSERT INTO cases (\
        id, first_name, last_name, email, phone, case_template_id, \
        required_documents, additional_documents, aportar_documentacion, \
        requerimiento, resolucion, justificante_presentacion, \
        requested_documents, payment, submitted_to_immigration, \
        application_date, administrative_silence_days, reminder_interval_days, \
        requested_documents_reminder_interval_days, \
        requested_documents_last_reminder_date, \
        requested_documents_reminder_duration_days, custom_reminder_date, \
        created_at, updated_at) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
             $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)";

const UPDATE_SQL: &str = "UPDATE cases SET \
        first_name = $2, last_name = $3, email = $4, phone = $5, \
        case_template_id = $6, required_documents = $7, \
        additional_documents = $8, aportar_documentacion = $9, \
        requerimiento = $10, resolucion = $11, \
        justificante_presentacion = $12, requested_documents = $13, \
        payment = $14, submitted_to_immigration = $15, application_date = $16, \
        administrative_silence_days = $17, reminder_interval_days = $18, \
        requested_documents_reminder_interval_days = $19, \
        requested_documents_last_reminder_date = $20, \
        requested_documents_reminder_duration_days = $21, \
        custom_reminder_date = $22, updated_at = $23 \
     WHERE id = $1";

type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

/// Bind every non-key column of a case after the `id` placeholder.
fn bind_case<'q>(query: PgQuery<'q>, case: &'q Case) -> PgQuery<'q> {
    query
        .bind(&case.first_name)
        .bind(&case.last_name)
        .bind(&case.email)
        .bind(&case.phone)
        .bind(case.case_template_id)
        .bind(Json(&case.required_documents))
        .bind(Json(&case.additional_documents))
        .bind(Json(&case.aportar_documentacion))
        .bind(Json(&case.requerimiento))
        .bind(Json(&case.resolucion))
        .bind(Json(&case.justificante_presentacion))
        .bind(Json(&case.requested_documents))
        .bind(Json(&case.payment))
        .bind(case.submitted_to_immigration)
        .bind(case.application_date)
        .bind(case.administrative_silence_days)
        .bind(case.reminder_interval_days)
        .bind(case.requested_documents_reminder_interval_days)
        .bind(case.requested_documents_last_reminder_date)
        .bind(case.requested_documents_reminder_duration_days)
        .bind(case.custom_reminder_date)
}

#[async_trait]
impl RecordStore<CaseId, NewCase, CasePatch, Case> for PgCaseStore {
    async fn create(&self, draft: NewCase) -> AppResult<Case> {
        let case = Case::from_draft(draft);

        bind_case(sqlx::query(INSERT_SQL).bind(case.id), &case)
            .bind(case.created_at)
            .bind(case.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create case", e))?;

        Ok(case)
    }

    async fn get(&self, id: CaseId) -> AppResult<Option<Case>> {
        let row = sqlx::query_as::<_, CaseRow>("SELECT * FROM cases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to get case", e))?;
        Ok(row.map(Case::from))
    }

    async fn list(&self) -> AppResult<Vec<Case>> {
        let rows = sqlx::query_as::<_, CaseRow>("SELECT * FROM cases ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list cases", e))?;
        Ok(rows.into_iter().map(Case::from).collect())
    }

    async fn update(&self, id: CaseId, patch: CasePatch) -> AppResult<Case> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let row = sqlx::query_as::<_, CaseRow>("SELECT * FROM cases WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load case for update", e)
            })?;

        let mut case: Case = row
            .ok_or_else(|| AppError::not_found(format!("Case not found: {id}")))?
            .into();
        patch.apply(&mut case);
        case.updated_at = Utc::now();

        bind_case(sqlx::query(UPDATE_SQL).bind(case.id), &case)
            .bind(case.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update case", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit case update", e)
        })?;

        Ok(case)
    }

    async fn delete(&self, id: CaseId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM cases WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete case", e))?;
        Ok(result.rows_affected() > 0)
    }
}
