//! Administrative-silence countdown.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use tramita_entity::case::Case;

use super::days_between;

/// Classification of the silence countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SilenceState {
    /// The period is running with more than a week left (or ends today).
    Active,
    /// Between one and seven days remain.
    ExpiringSoon,
    /// The period has elapsed; silence can be invoked.
    Expired,
}

/// Derived silence countdown for a submitted case.
#[derive(Debug, Clone, Serialize)]
pub struct SilenceStatus {
    /// When the statutory period ends.
    pub end_date: DateTime<Utc>,
    /// Whole days until the end date; negative once elapsed.
    pub days_remaining: i64,
    /// Countdown classification.
    pub state: SilenceState,
}

/// Compute the administrative-silence countdown.
///
/// Only defined once the case has been filed and carries an application
/// date; returns `None` otherwise.
pub fn administrative_silence(case: &Case, now: DateTime<Utc>) -> Option<SilenceStatus> {
    if !case.submitted_to_immigration {
        return None;
    }
    let application_date = case.application_date?;

    let end_date = application_date + Duration::days(case.administrative_silence_days);
    let days_remaining = days_between(now, end_date);
    let state = if days_remaining < 0 {
        SilenceState::Expired
    } else if days_remaining > 0 && days_remaining <= 7 {
        SilenceState::ExpiringSoon
    } else {
        SilenceState::Active
    };

    Some(SilenceStatus {
        end_date,
        days_remaining,
        state,
    })
}
