//! The `Event` aggregate: one scheduled production job.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Assignment, AssignmentStatus, Deliverable, DeliverableId, DeliverableStatus, EventId, Role,
    Stage, TeamMemberId, TimeLogEntry,
};

/// Descriptive fields supplied when an event is booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    /// Display name of the job (e.g. `"Rahman wedding"`).
    pub name: String,
    /// Day of the shoot.
    pub date: NaiveDate,
    /// Venue or address.
    pub location: String,
    /// Client contact name.
    pub client_name: String,
    /// Client phone number.
    #[serde(default)]
    pub client_phone: String,
    /// Client email address.
    #[serde(default)]
    pub client_email: String,
}

/// Crew size fixed when the event is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewRequirement {
    /// Number of photographers needed.
    pub photographers: u32,
    /// Number of videographers needed.
    pub videographers: u32,
}

impl CrewRequirement {
    /// Creates a crew requirement.
    #[must_use]
    pub const fn new(photographers: u32, videographers: u32) -> Self {
        Self {
            photographers,
            videographers,
        }
    }
}

/// Aggregate root tracked by the workflow engine.
///
/// Every engine operation reads one `Event`, validates, and returns a
/// mutated copy. `version` is owned by the store and used for optimistic
/// concurrency; the engine never changes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier (immutable after creation).
    pub id: EventId,
    /// Store revision this aggregate was loaded at.
    #[serde(default)]
    pub version: u64,
    /// Display name.
    pub name: String,
    /// Day of the shoot.
    pub date: NaiveDate,
    /// Venue or address.
    pub location: String,
    /// Client contact name.
    pub client_name: String,
    /// Client phone number.
    #[serde(default)]
    pub client_phone: String,
    /// Client email address.
    #[serde(default)]
    pub client_email: String,
    /// Current production stage.
    pub stage: Stage,
    /// Photographers needed (fixed at creation).
    pub required_photographers: u32,
    /// Videographers needed (fixed at creation).
    pub required_videographers: u32,
    /// Crew assignments in the order they were made.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// Post-production deliverables.
    #[serde(default)]
    pub deliverables: Vec<Deliverable>,
    /// Time ledger entries.
    #[serde(default)]
    pub time_entries: Vec<TimeLogEntry>,
    /// Internal staff notes.
    #[serde(default)]
    pub notes: String,
    /// Client brief.
    #[serde(default)]
    pub client_requirements: String,
    /// Creation timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last accepted command.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event in pre-production.
    #[must_use]
    pub fn new(details: EventDetails, crew: CrewRequirement) -> Self {
        let now = Utc::now();
        Self {
            id: EventId::new(),
            version: 0,
            name: details.name,
            date: details.date,
            location: details.location,
            client_name: details.client_name,
            client_phone: details.client_phone,
            client_email: details.client_email,
            stage: Stage::PreProduction,
            required_photographers: crew.photographers,
            required_videographers: crew.videographers,
            assignments: Vec::new(),
            deliverables: Vec::new(),
            time_entries: Vec::new(),
            notes: String::new(),
            client_requirements: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Required head count for `role`.
    #[must_use]
    pub const fn required(&self, role: Role) -> u32 {
        match role {
            Role::Photographer => self.required_photographers,
            Role::Videographer => self.required_videographers,
        }
    }

    /// Number of assignments for `role` currently in `status`.
    #[must_use]
    pub fn count_assignments(&self, role: Role, status: AssignmentStatus) -> u32 {
        let n = self
            .assignments
            .iter()
            .filter(|a| a.role == role && a.status == status)
            .count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    /// Returns the live (pending or accepted) assignment for a member.
    #[must_use]
    pub fn live_assignment(&self, member: &TeamMemberId) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.is_live() && &a.team_member_id == member)
    }

    pub(crate) fn live_assignment_mut(
        &mut self,
        member: &TeamMemberId,
    ) -> Option<&mut Assignment> {
        self.assignments
            .iter_mut()
            .find(|a| a.is_live() && &a.team_member_id == member)
    }

    /// Looks up a deliverable by id.
    #[must_use]
    pub fn deliverable(&self, id: DeliverableId) -> Option<&Deliverable> {
        self.deliverables.iter().find(|d| d.id == id)
    }

    pub(crate) fn deliverable_mut(&mut self, id: DeliverableId) -> Option<&mut Deliverable> {
        self.deliverables.iter_mut().find(|d| d.id == id)
    }

    /// Sum of all hours logged on this event.
    #[must_use]
    pub fn logged_hours(&self) -> f64 {
        self.time_entries.iter().map(|e| e.hours_logged).sum()
    }
}

/// Lightweight summary of an event for list views and reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    /// Event identifier.
    pub id: EventId,
    /// Display name.
    pub name: String,
    /// Day of the shoot.
    pub date: NaiveDate,
    /// Current stage.
    pub stage: Stage,
    /// Confirmed photographers out of required.
    pub photographers: (u32, u32),
    /// Confirmed videographers out of required.
    pub videographers: (u32, u32),
    /// Completed deliverables.
    pub deliverables_completed: usize,
    /// Total deliverables.
    pub deliverables_total: usize,
    /// Hours logged across the crew.
    pub total_hours: f64,
    /// Store revision.
    pub version: u64,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            name: event.name.clone(),
            date: event.date,
            stage: event.stage,
            photographers: (
                event.count_assignments(Role::Photographer, AssignmentStatus::Accepted),
                event.required_photographers,
            ),
            videographers: (
                event.count_assignments(Role::Videographer, AssignmentStatus::Accepted),
                event.required_videographers,
            ),
            deliverables_completed: event
                .deliverables
                .iter()
                .filter(|d| d.status == DeliverableStatus::Completed)
                .count(),
            deliverables_total: event.deliverables.len(),
            total_hours: event.logged_hours(),
            version: event.version,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_starts_in_pre_production() {
        let event = fixtures::event(2, 1);
        assert_eq!(event.stage, Stage::PreProduction);
        assert_eq!(event.version, 0);
        assert_eq!(event.required(Role::Photographer), 2);
        assert_eq!(event.required(Role::Videographer), 1);
        assert!(event.assignments.is_empty());
    }

    #[test]
    fn summary_reflects_progress() {
        let mut event = fixtures::event(1, 0);
        let mut a =
            Assignment::pending(TeamMemberId::from("p1"), Role::Photographer, Utc::now());
        a.status = AssignmentStatus::Accepted;
        event.assignments.push(a);
        event
            .deliverables
            .push(Deliverable::new(crate::domain::DeliverableKind::Photos));

        let summary = EventSummary::from(&event);
        assert_eq!(summary.photographers, (1, 1));
        assert_eq!(summary.videographers, (0, 0));
        assert_eq!(summary.deliverables_completed, 0);
        assert_eq!(summary.deliverables_total, 1);
    }
}
