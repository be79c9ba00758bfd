//! The "Urgentes" aggregation.
//!
//! A single pass over cases and reminders collects everything whose next
//! relevant deadline falls within the forward window. The four triggers
//! are a union; a case contributes at most one entry, its earliest due
//! date winning. Entries already past due stay urgent: the window is a
//! forward cutoff, not a band.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tramita_core::types::{CaseId, ReminderId};
use tramita_entity::case::Case;
use tramita_entity::reminder::Reminder;

use super::{administrative_silence, days_between, requested_deadline};

/// Forward window, in days, for a deadline to count as urgent.
pub const URGENCY_WINDOW_DAYS: i64 = 3;

/// What an urgent entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgentSubject {
    Case(CaseId),
    Reminder(ReminderId),
}

/// Which deadline put the subject into the urgent set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgentTrigger {
    /// The payment reminder (`custom_reminder_date`) falls due.
    PaymentReminder,
    /// A pending requested-document deadline falls due.
    RequestedDocuments,
    /// The administrative-silence period ends.
    AdministrativeSilence,
    /// A standalone reminder falls due.
    StandaloneReminder,
}

/// One row of the urgent view.
#[derive(Debug, Clone, Serialize)]
pub struct UrgentEntry {
    /// The case or reminder this entry points at.
    pub subject: UrgentSubject,
    /// Client name for display.
    pub display_name: String,
    /// The deadline that triggered inclusion.
    pub due_date: DateTime<Utc>,
    /// Which trigger fired.
    pub trigger: UrgentTrigger,
}

fn within_window(now: DateTime<Utc>, due: DateTime<Utc>) -> bool {
    days_between(now, due) <= URGENCY_WINDOW_DAYS
}

/// Aggregate the urgent set over all cases and reminders. One pass over
/// each input; O(n) per dashboard load.
pub fn urgent_entries(
    cases: &[Case],
    reminders: &[Reminder],
    now: DateTime<Utc>,
) -> Vec<UrgentEntry> {
    let mut entries = Vec::new();

    for case in cases {
        let mut candidates: Vec<(DateTime<Utc>, UrgentTrigger)> = Vec::new();

        if let Some(due) = case.custom_reminder_date {
            candidates.push((due, UrgentTrigger::PaymentReminder));
        }
        if case.has_pending_requested() {
            if let Some(due) = requested_deadline(case) {
                candidates.push((due, UrgentTrigger::RequestedDocuments));
            }
        }
        if let Some(status) = administrative_silence(case, now) {
            candidates.push((status.end_date, UrgentTrigger::AdministrativeSilence));
        }

        // One entry per case: the earliest in-window deadline.
        let hit = candidates
            .into_iter()
            .filter(|(due, _)| within_window(now, *due))
            .min_by_key(|(due, _)| *due);
        if let Some((due_date, trigger)) = hit {
            entries.push(UrgentEntry {
                subject: UrgentSubject::Case(case.id),
                display_name: case.full_name(),
                due_date,
                trigger,
            });
        }
    }

    for reminder in reminders {
        if within_window(now, reminder.reminder_date) {
            entries.push(UrgentEntry {
                subject: UrgentSubject::Reminder(reminder.id),
                display_name: reminder.full_name(),
                due_date: reminder.reminder_date,
                trigger: UrgentTrigger::StandaloneReminder,
            });
        }
    }

    entries.sort_by_key(|e| e.due_date);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::testutil::{case_at_day0, day, day0};
    use tramita_entity::case::RequestedDocument;
    use tramita_entity::reminder::{NewReminder, ReminderCategory};

    fn reminder_at(due: DateTime<Utc>) -> Reminder {
        Reminder::from_draft(NewReminder {
            case_id: None,
            client_name: "Omar".into(),
            client_surname: "Haddad".into(),
            phone: None,
            reminder_date: due,
            notes: None,
            category: ReminderCategory::Uncategorized,
        })
    }

    #[test]
    fn test_window_cutoff_on_standalone_reminders() {
        // Due in 2 days: urgent. Due in 4 days: not yet.
        let close = reminder_at(day(2));
        let far = reminder_at(day(4));

        let entries = urgent_entries(&[], &[close.clone(), far], day0());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subject, UrgentSubject::Reminder(close.id));
        assert_eq!(entries[0].trigger, UrgentTrigger::StandaloneReminder);
    }

    #[test]
    fn test_overdue_stays_urgent() {
        let missed = reminder_at(day(-5));
        let entries = urgent_entries(&[], &[missed], day0());
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_case_triggers_union_and_dedupe() {
        let mut case = case_at_day0();
        // Payment reminder due in 1 day, silence ending in 3.
        case.custom_reminder_date = Some(day(1));
        case.submitted_to_immigration = true;
        case.application_date = Some(day0());
        case.administrative_silence_days = 3;

        let entries = urgent_entries(&[case.clone()], &[], day0());
        // One entry despite two live triggers; the earliest wins.
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].trigger, UrgentTrigger::PaymentReminder);
        assert_eq!(entries[0].due_date, day(1));
    }

    #[test]
    fn test_requested_documents_trigger() {
        let mut case = case_at_day0();
        case.submitted_to_immigration = true;
        case.application_date = Some(day0());
        case.administrative_silence_days = 365;
        case.requested_documents_reminder_duration_days = 2;
        case.requested_documents = vec![RequestedDocument {
            code: "nomina".into(),
            name: "Nómina".into(),
            description: None,
            submitted: false,
            file_url: None,
            uploaded_at: None,
            requested_at: Some(day0()),
        }];

        let entries = urgent_entries(&[case], &[], day0());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].trigger, UrgentTrigger::RequestedDocuments);
    }

    #[test]
    fn test_quiet_case_is_absent() {
        let case = case_at_day0();
        assert!(urgent_entries(&[case], &[], day0()).is_empty());
    }

    #[test]
    fn test_sorted_by_due_date() {
        let later = reminder_at(day(2));
        let sooner = reminder_at(day(1));
        let entries = urgent_entries(&[], &[later.clone(), sooner.clone()], day0());
        assert_eq!(entries[0].subject, UrgentSubject::Reminder(sooner.id));
        assert_eq!(entries[1].subject, UrgentSubject::Reminder(later.id));
    }
}
