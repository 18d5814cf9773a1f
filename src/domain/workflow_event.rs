//! Notifications emitted after accepted workflow commands.
//!
//! Every state change produces one or more [`WorkflowEvent`]s which the
//! service publishes on the [`super::EventBus`]. Delivery channels (email,
//! messaging, dashboards) subscribe there; the engine never talks to them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    AssignmentStatus, DeliverableId, DeliverableKind, DeliverableStatus, EventId, Role, Stage,
    TeamMemberId,
};

/// Domain notification describing a single state change on an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// A new event was booked.
    EventCreated {
        /// Event identifier.
        event_id: EventId,
        /// Display name.
        name: String,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A member was offered a crew slot.
    MemberAssigned {
        /// Event identifier.
        event_id: EventId,
        /// Member offered the slot.
        team_member_id: TeamMemberId,
        /// Crew role.
        role: Role,
        /// Timestamp of the offer.
        timestamp: DateTime<Utc>,
    },

    /// A member accepted or declined.
    AssignmentResponded {
        /// Event identifier.
        event_id: EventId,
        /// Responding member.
        team_member_id: TeamMemberId,
        /// Crew role.
        role: Role,
        /// Status after the response.
        status: AssignmentStatus,
        /// Response timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A crew slot moved from one member to another.
    MemberReassigned {
        /// Event identifier.
        event_id: EventId,
        /// Member giving up the slot.
        from: TeamMemberId,
        /// Member receiving the (pending) slot.
        to: TeamMemberId,
        /// Crew role.
        role: Role,
        /// Timestamp of the reassignment.
        timestamp: DateTime<Utc>,
    },

    /// A deliverable was added to the event.
    DeliverableAdded {
        /// Event identifier.
        event_id: EventId,
        /// New deliverable.
        deliverable_id: DeliverableId,
        /// Kind of output.
        kind: DeliverableKind,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A deliverable got an assignee or delivery date.
    DeliverableAssigned {
        /// Event identifier.
        event_id: EventId,
        /// Deliverable updated.
        deliverable_id: DeliverableId,
        /// Responsible member.
        team_member_id: TeamMemberId,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A deliverable moved along its status machine.
    DeliverableStatusChanged {
        /// Event identifier.
        event_id: EventId,
        /// Deliverable updated.
        deliverable_id: DeliverableId,
        /// Status before.
        from: DeliverableStatus,
        /// Status after.
        to: DeliverableStatus,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The client asked for changes on a delivered item.
    RevisionRequested {
        /// Event identifier.
        event_id: EventId,
        /// Deliverable under revision.
        deliverable_id: DeliverableId,
        /// Notes supplied with this round.
        notes: String,
        /// Revision round number (1-based).
        round: u32,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Hours were logged for a member.
    TimeLogged {
        /// Event identifier.
        event_id: EventId,
        /// Member the hours belong to.
        team_member_id: TeamMemberId,
        /// Hours added by this command.
        hours: f64,
        /// Hours on that day after accumulation.
        day_total: f64,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Staff notes or client brief were edited.
    NotesUpdated {
        /// Event identifier.
        event_id: EventId,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The event moved to the next stage.
    StageAdvanced {
        /// Event identifier.
        event_id: EventId,
        /// Stage before.
        from: Stage,
        /// Stage after.
        to: Stage,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A mutation satisfied the precondition for the next stage.
    StageReady {
        /// Event identifier.
        event_id: EventId,
        /// Stage the event may now advance to.
        next: Stage,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl WorkflowEvent {
    /// Returns the event ID associated with this notification.
    #[must_use]
    pub fn event_id(&self) -> EventId {
        match self {
            Self::EventCreated { event_id, .. }
            | Self::MemberAssigned { event_id, .. }
            | Self::AssignmentResponded { event_id, .. }
            | Self::MemberReassigned { event_id, .. }
            | Self::DeliverableAdded { event_id, .. }
            | Self::DeliverableAssigned { event_id, .. }
            | Self::DeliverableStatusChanged { event_id, .. }
            | Self::RevisionRequested { event_id, .. }
            | Self::TimeLogged { event_id, .. }
            | Self::NotesUpdated { event_id, .. }
            | Self::StageAdvanced { event_id, .. }
            | Self::StageReady { event_id, .. } => *event_id,
        }
    }

    /// Returns the notification type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::EventCreated { .. } => "event_created",
            Self::MemberAssigned { .. } => "member_assigned",
            Self::AssignmentResponded { .. } => "assignment_responded",
            Self::MemberReassigned { .. } => "member_reassigned",
            Self::DeliverableAdded { .. } => "deliverable_added",
            Self::DeliverableAssigned { .. } => "deliverable_assigned",
            Self::DeliverableStatusChanged { .. } => "deliverable_status_changed",
            Self::RevisionRequested { .. } => "revision_requested",
            Self::TimeLogged { .. } => "time_logged",
            Self::NotesUpdated { .. } => "notes_updated",
            Self::StageAdvanced { .. } => "stage_advanced",
            Self::StageReady { .. } => "stage_ready",
        }
    }
}
