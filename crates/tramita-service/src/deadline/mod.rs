//! Deadline & urgency calculator.
//!
//! Every function here is pure and synchronous: state in, classification
//! out, `now` always an explicit parameter. Date comparisons are
//! day-granular, truncating both sides to midnight, so a deadline "today"
//! means the calendar day regardless of the hour.

pub mod checklist;
pub mod readiness;
pub mod requested;
pub mod silence;
pub mod urgency;

pub use checklist::{ChecklistReminder, ChecklistState, checklist_reminder};
pub use readiness::{Readiness, readiness};
pub use requested::{requested_deadline, requested_reminder_due};
pub use silence::{SilenceState, SilenceStatus, administrative_silence};
pub use urgency::{
    URGENCY_WINDOW_DAYS, UrgentEntry, UrgentSubject, UrgentTrigger, urgent_entries,
};

use chrono::{DateTime, Utc};

/// Whole days from `from` to `to`, truncating both to midnight. Negative
/// when `to` is in the past.
pub(crate) fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to.date_naive() - from.date_naive()).num_days()
}

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use tramita_entity::case::{Case, NewCase};

    /// Fixed reference instant used as "day 0" across calculator tests.
    pub fn day0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 30, 0).unwrap()
    }

    /// `day0` shifted by whole days.
    pub fn day(n: i64) -> DateTime<Utc> {
        day0() + Duration::days(n)
    }

    /// A bare case created at `day0`, not submitted, empty checklist.
    pub fn case_at_day0() -> Case {
        let mut case = Case::from_draft(NewCase {
            first_name: "Amina".into(),
            last_name: "Diallo".into(),
            email: None,
            phone: None,
            total_fee: None,
            administrative_silence_days: 90,
            reminder_interval_days: 7,
            requested_documents_reminder_duration_days: 10,
        });
        case.created_at = day0();
        case.updated_at = day0();
        case
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use testutil::{day, day0};

    #[test]
    fn test_days_between_truncates_to_midnight() {
        // 23 hours apart but on consecutive calendar days is one day.
        let late = day0() + Duration::hours(10);
        let early_next = day(1) - Duration::hours(8);
        assert_eq!(days_between(late, early_next), 1);
        assert_eq!(days_between(day0(), day0()), 0);
        assert_eq!(days_between(day(5), day(2)), -3);
    }
}
