//! Submission readiness classification.

use serde::Serialize;

use tramita_entity::case::Case;

/// Dashboard bucket for an unsubmitted case with a live checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// Every non-optional required document is submitted.
    ReadyToSubmit,
    /// At least one non-optional required document is missing.
    AwaitingSubmission,
}

/// Classify a case's readiness.
///
/// Submitted cases and cases with no non-optional checklist slots are
/// excluded (`None`); the two buckets are disjoint by construction.
pub fn readiness(case: &Case) -> Option<Readiness> {
    if case.submitted_to_immigration || case.mandatory_document_count() == 0 {
        return None;
    }
    if case.has_pending_mandatory() {
        Some(Readiness::AwaitingSubmission)
    } else {
        Some(Readiness::ReadyToSubmit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::testutil::case_at_day0;
    use chrono::Utc;
    use tramita_entity::case::RequiredDocument;

    fn slot(code: &str, submitted: bool, optional: bool) -> RequiredDocument {
        let mut doc = RequiredDocument::new(code, code.to_uppercase());
        doc.is_optional = optional;
        if submitted {
            doc.submitted = true;
            doc.file_url = Some(format!("/files/{code}"));
            doc.uploaded_at = Some(Utc::now());
        }
        doc
    }

    #[test]
    fn test_all_mandatory_submitted_is_ready() {
        let mut case = case_at_day0();
        case.required_documents = vec![slot("a", true, false), slot("b", false, true)];
        assert_eq!(readiness(&case), Some(Readiness::ReadyToSubmit));
    }

    #[test]
    fn test_pending_mandatory_is_awaiting() {
        let mut case = case_at_day0();
        case.required_documents = vec![slot("a", true, false), slot("b", false, false)];
        assert_eq!(readiness(&case), Some(Readiness::AwaitingSubmission));
    }

    #[test]
    fn test_excluded_cases() {
        // No checklist at all.
        let empty = case_at_day0();
        assert_eq!(readiness(&empty), None);

        // Only optional slots.
        let mut optional_only = case_at_day0();
        optional_only.required_documents = vec![slot("a", false, true)];
        assert_eq!(readiness(&optional_only), None);

        // Already submitted.
        let mut submitted = case_at_day0();
        submitted.required_documents = vec![slot("a", true, false)];
        submitted.submitted_to_immigration = true;
        assert_eq!(readiness(&submitted), None);
    }
}
