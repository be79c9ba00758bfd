//! Pre-submission checklist reminder.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use tramita_entity::case::Case;

use super::days_between;

/// Classification of the checklist reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistState {
    /// The reminder date has passed.
    Overdue,
    /// The reminder falls due today.
    DueToday,
    /// One or two days away.
    DueSoon,
    /// Further out.
    Scheduled,
}

/// Derived checklist reminder for an unsubmitted case.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistReminder {
    /// When the next nudge falls due.
    pub next_due: DateTime<Utc>,
    /// Whole days until the due date; negative once passed.
    pub days_until: i64,
    /// Reminder classification.
    pub state: ChecklistState,
    /// True when no required document has been uploaded yet, so the
    /// anchor fell back to the case's creation date.
    pub has_no_uploads: bool,
}

/// Compute the checklist reminder.
///
/// Applicable only while the case is unsubmitted and at least one
/// non-optional required document is missing; returns `None` otherwise.
/// The anchor is the most recent upload among submitted required
/// documents, falling back to the case's creation date.
pub fn checklist_reminder(case: &Case, now: DateTime<Utc>) -> Option<ChecklistReminder> {
    if case.submitted_to_immigration || !case.has_pending_mandatory() {
        return None;
    }

    let latest_upload = case
        .required_documents
        .iter()
        .filter(|d| d.submitted)
        .filter_map(|d| d.uploaded_at)
        .max();
    let (anchor, has_no_uploads) = match latest_upload {
        Some(uploaded_at) => (uploaded_at, false),
        None => (case.created_at, true),
    };

    let next_due = anchor + Duration::days(case.reminder_interval_days);
    let days_until = days_between(now, next_due);
    let state = match days_until {
        d if d < 0 => ChecklistState::Overdue,
        0 => ChecklistState::DueToday,
        1..=2 => ChecklistState::DueSoon,
        _ => ChecklistState::Scheduled,
    };

    Some(ChecklistReminder {
        next_due,
        days_until,
        state,
        has_no_uploads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::testutil::{case_at_day0, day};
    use tramita_entity::case::RequiredDocument;

    fn case_with_checklist(interval: i64) -> Case {
        let mut case = case_at_day0();
        case.reminder_interval_days = interval;
        case.required_documents = vec![
            RequiredDocument::new("passport", "Passport"),
            RequiredDocument::new("padron", "Padrón"),
        ];
        case
    }

    #[test]
    fn test_no_uploads_anchors_on_creation() {
        // Created day 0, interval 10, nothing submitted.
        let case = case_with_checklist(10);

        let at_10 = checklist_reminder(&case, day(10)).unwrap();
        assert_eq!(at_10.state, ChecklistState::DueToday);
        assert!(at_10.has_no_uploads);

        let at_11 = checklist_reminder(&case, day(11)).unwrap();
        assert_eq!(at_11.state, ChecklistState::Overdue);
        assert_eq!(at_11.days_until, -1);
        assert!(at_11.has_no_uploads);
    }

    #[test]
    fn test_latest_upload_moves_the_anchor() {
        let mut case = case_with_checklist(10);
        case.required_documents[0].submitted = true;
        case.required_documents[0].file_url = Some("/files/a".into());
        case.required_documents[0].uploaded_at = Some(day(4));

        let reminder = checklist_reminder(&case, day(10)).unwrap();
        assert!(!reminder.has_no_uploads);
        assert_eq!(reminder.days_until, 4);
        assert_eq!(reminder.state, ChecklistState::Scheduled);
    }

    #[test]
    fn test_due_soon_band() {
        let case = case_with_checklist(10);
        assert_eq!(
            checklist_reminder(&case, day(8)).unwrap().state,
            ChecklistState::DueSoon
        );
        assert_eq!(
            checklist_reminder(&case, day(9)).unwrap().state,
            ChecklistState::DueSoon
        );
        assert_eq!(
            checklist_reminder(&case, day(7)).unwrap().state,
            ChecklistState::Scheduled
        );
    }

    #[test]
    fn test_not_applicable_once_complete_or_submitted() {
        let mut case = case_with_checklist(10);
        for doc in &mut case.required_documents {
            doc.is_optional = true;
        }
        assert!(checklist_reminder(&case, day(0)).is_none());

        let mut submitted = case_with_checklist(10);
        submitted.submitted_to_immigration = true;
        assert!(checklist_reminder(&submitted, day(0)).is_none());
    }
}
