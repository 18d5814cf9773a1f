//! Hours logged against an event.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::TeamMemberId;

/// Hours worked by one member on one event on one day.
///
/// An event holds at most one entry per `(team_member_id, date)`; repeated
/// logging on the same day accumulates into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeLogEntry {
    /// Member who did the work.
    pub team_member_id: TeamMemberId,
    /// Calendar day (UTC) the hours belong to.
    pub date: NaiveDate,
    /// Accumulated hours for that day.
    pub hours_logged: f64,
}
