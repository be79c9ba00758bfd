//! Dashboard projections over the stores.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tramita_core::result::AppResult;
use tramita_entity::case::Case;

use crate::deadline::{Readiness, UrgentEntry, readiness, urgent_entries};
use crate::{SharedCaseStore, SharedReminderStore};

/// Cases bucketed by submission readiness.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReadinessBuckets {
    /// Every non-optional required document submitted.
    pub ready_to_submit: Vec<Case>,
    /// At least one non-optional required document missing.
    pub awaiting_submission: Vec<Case>,
}

/// Read-only dashboard views composed from the pure calculator.
#[derive(Clone)]
pub struct DashboardService {
    cases: SharedCaseStore,
    reminders: SharedReminderStore,
}

impl DashboardService {
    /// Create a new dashboard service.
    pub fn new(cases: SharedCaseStore, reminders: SharedReminderStore) -> Self {
        Self { cases, reminders }
    }

    /// The urgent view: every case or reminder whose next deadline falls
    /// within the forward window, deduplicated, earliest first.
    pub async fn urgent(&self, now: DateTime<Utc>) -> AppResult<Vec<UrgentEntry>> {
        let cases = self.cases.list().await?;
        let reminders = self.reminders.list().await?;
        Ok(urgent_entries(&cases, &reminders, now))
    }

    /// Readiness buckets over all unsubmitted cases with a live checklist.
    pub async fn readiness_buckets(&self) -> AppResult<ReadinessBuckets> {
        let mut buckets = ReadinessBuckets::default();
        for case in self.cases.list().await? {
            match readiness(&case) {
                Some(Readiness::ReadyToSubmit) => buckets.ready_to_submit.push(case),
                Some(Readiness::AwaitingSubmission) => buckets.awaiting_submission.push(case),
                None => {}
            }
        }
        Ok(buckets)
    }
}
