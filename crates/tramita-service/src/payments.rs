//! Payment ledger service.

use chrono::{DateTime, Utc};
use tracing::info;

use tramita_core::error::AppError;
use tramita_core::result::AppResult;
use tramita_core::types::CaseId;
use tramita_entity::case::{Case, CasePatch, PaymentEntry};

use crate::SharedCaseStore;

/// Service for the per-case payment ledger and payment reminder.
#[derive(Clone)]
pub struct PaymentService {
    cases: SharedCaseStore,
}

impl PaymentService {
    /// Create a new payment service.
    pub fn new(cases: SharedCaseStore) -> Self {
        Self { cases }
    }

    async fn load(&self, id: CaseId) -> AppResult<Case> {
        self.cases
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Case not found: {id}")))
    }

    /// Set the agreed total fee, in euro-cents.
    pub async fn set_total_fee(&self, case_id: CaseId, total_fee: i64) -> AppResult<Case> {
        if total_fee < 0 {
            return Err(AppError::validation("Total fee cannot be negative"));
        }
        let case = self.load(case_id).await?;
        let mut ledger = case.payment;
        ledger.total_fee = total_fee;

        let patch = CasePatch {
            payment: Some(ledger),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }

    /// Record a payment. The ledger recomputes the paid amount; the
    /// amount must be positive.
    pub async fn record_payment(
        &self,
        case_id: CaseId,
        amount: i64,
        method: impl Into<String>,
        note: Option<String>,
        date: DateTime<Utc>,
    ) -> AppResult<Case> {
        if amount <= 0 {
            return Err(AppError::validation("Payment amount must be positive"));
        }
        let case = self.load(case_id).await?;
        let mut ledger = case.payment;
        ledger.record(PaymentEntry {
            amount,
            method: method.into(),
            note,
            date,
        });
        info!(case_id = %case_id, amount, outstanding = ledger.outstanding(), "Recorded payment");

        let patch = CasePatch {
            payment: Some(ledger),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }

    /// Set or clear the payment reminder date consumed by the urgency
    /// aggregation.
    pub async fn set_payment_reminder(
        &self,
        case_id: CaseId,
        reminder_date: Option<DateTime<Utc>>,
    ) -> AppResult<Case> {
        let patch = CasePatch {
            custom_reminder_date: Some(reminder_date),
            ..Default::default()
        };
        self.cases.update(case_id, patch).await
    }
}
