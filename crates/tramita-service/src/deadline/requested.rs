//! Requested-document reminder cadence and deadline.

use chrono::{DateTime, Duration, Utc};

use tramita_entity::case::Case;

use super::days_between;

/// Whether the shared requested-documents reminder is due.
///
/// Relevant only while at least one requested document is pending. Due
/// when the reminder has never been acted on, or when the configured
/// interval has elapsed since the last time it was.
pub fn requested_reminder_due(case: &Case, now: DateTime<Utc>) -> bool {
    if !case.has_pending_requested() {
        return false;
    }
    match case.requested_documents_last_reminder_date {
        None => true,
        Some(last) => days_between(last, now) >= case.requested_documents_reminder_interval_days,
    }
}

/// Deadline by which the client must answer the outstanding request.
///
/// Anchored on the first pending document's `requested_at`, falling back
/// to the application date for legacy records; `None` when nothing is
/// pending or no anchor date exists.
pub fn requested_deadline(case: &Case) -> Option<DateTime<Utc>> {
    let first_pending = case.requested_documents.iter().find(|d| !d.submitted)?;
    let anchor = first_pending.requested_at.or(case.application_date)?;
    Some(anchor + Duration::days(case.requested_documents_reminder_duration_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::testutil::{case_at_day0, day, day0};
    use tramita_entity::case::RequestedDocument;

    fn requested(code: &str, submitted: bool, requested_at: Option<DateTime<Utc>>) -> RequestedDocument {
        RequestedDocument {
            code: code.into(),
            name: code.to_uppercase(),
            description: None,
            submitted,
            file_url: None,
            uploaded_at: None,
            requested_at,
        }
    }

    #[test]
    fn test_cadence_default_three_days() {
        let mut case = case_at_day0();
        case.requested_documents = vec![requested("nomina", false, Some(day0()))];

        // Never reminded: due immediately.
        assert!(requested_reminder_due(&case, day0()));

        case.requested_documents_last_reminder_date = Some(day0());
        assert!(!requested_reminder_due(&case, day(2)));
        assert!(requested_reminder_due(&case, day(3)));
    }

    #[test]
    fn test_nothing_pending_never_due() {
        let mut case = case_at_day0();
        case.requested_documents = vec![requested("nomina", true, Some(day0()))];
        assert!(!requested_reminder_due(&case, day(30)));
        assert!(requested_deadline(&case).is_none());
    }

    #[test]
    fn test_deadline_from_first_pending() {
        let mut case = case_at_day0();
        case.requested_documents_reminder_duration_days = 10;
        case.requested_documents = vec![
            requested("a", true, Some(day0())),
            requested("b", false, Some(day(2))),
            requested("c", false, Some(day(5))),
        ];
        assert_eq!(requested_deadline(&case), Some(day(12)));
    }

    #[test]
    fn test_legacy_record_falls_back_to_application_date() {
        let mut case = case_at_day0();
        case.application_date = Some(day(1));
        case.requested_documents_reminder_duration_days = 10;
        case.requested_documents = vec![requested("a", false, None)];
        assert_eq!(requested_deadline(&case), Some(day(11)));

        case.application_date = None;
        assert!(requested_deadline(&case).is_none());
    }
}
