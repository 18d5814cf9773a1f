//! Per-member, per-day time ledger.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{Event, TeamMemberId, TimeLogEntry};
use crate::error::WorkflowError;

/// Default ceiling for one member's hours on one day.
pub const DEFAULT_MAX_DAILY_HOURS: f64 = 24.0;

/// Accumulates hours into one entry per `(member, day)`.
///
/// The ledger is additive only: hours must be positive, and there is no
/// reversal. Totals are informational and never gate a stage transition.
#[derive(Debug, Clone, Copy)]
pub struct TimeLedger {
    max_daily_hours: f64,
}

impl TimeLedger {
    /// Creates a ledger with the given daily ceiling.
    #[must_use]
    pub const fn new(max_daily_hours: f64) -> Self {
        Self { max_daily_hours }
    }

    /// Daily ceiling in hours.
    #[must_use]
    pub const fn max_daily_hours(&self) -> f64 {
        self.max_daily_hours
    }

    /// Logs `hours` for `member` on `today`, merging into an existing
    /// entry for that day. Returns the day's total after the update.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidDuration`] if `hours` is not a
    /// positive finite number, or if the day's total would pass the
    /// ceiling.
    pub fn log_time(
        &self,
        event: &mut Event,
        member: &TeamMemberId,
        hours: f64,
        today: NaiveDate,
    ) -> Result<f64, WorkflowError> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(WorkflowError::InvalidDuration {
                hours,
                reason: "hours must be a positive number",
            });
        }

        let existing = event
            .time_entries
            .iter_mut()
            .find(|e| &e.team_member_id == member && e.date == today);
        let day_total = existing.as_ref().map_or(0.0, |e| e.hours_logged) + hours;
        if day_total > self.max_daily_hours {
            return Err(WorkflowError::InvalidDuration {
                hours,
                reason: "daily total would exceed the configured maximum",
            });
        }

        match existing {
            Some(entry) => entry.hours_logged = day_total,
            None => event.time_entries.push(TimeLogEntry {
                team_member_id: member.clone(),
                date: today,
                hours_logged: day_total,
            }),
        }
        Ok(day_total)
    }

    /// Total hours logged by `member` across all days.
    #[must_use]
    pub fn total_hours(event: &Event, member: &TeamMemberId) -> f64 {
        event
            .time_entries
            .iter()
            .filter(|e| &e.team_member_id == member)
            .map(|e| e.hours_logged)
            .sum()
    }

    /// Total hours per member.
    #[must_use]
    pub fn hours_by_member(event: &Event) -> BTreeMap<TeamMemberId, f64> {
        let mut totals = BTreeMap::new();
        for entry in &event.time_entries {
            *totals.entry(entry.team_member_id.clone()).or_insert(0.0) += entry.hours_logged;
        }
        totals
    }
}

impl Default for TimeLedger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DAILY_HOURS)
    }
}
