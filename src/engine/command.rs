//! Commands a caller can issue against an event.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    AssignmentResponse, DeliverableId, DeliverableKind, DeliverableStatus, Role, TeamMemberId,
};

/// One intent against a single event aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Offer a crew slot to a member.
    Assign {
        /// Member to offer the slot to.
        team_member_id: TeamMemberId,
        /// Crew role.
        role: Role,
    },
    /// Record a member's accept/decline.
    UpdateAssignmentStatus {
        /// Responding member.
        team_member_id: TeamMemberId,
        /// Their answer.
        response: AssignmentResponse,
    },
    /// Hand a live slot to another member.
    Reassign {
        /// Member giving up the slot.
        from: TeamMemberId,
        /// Member receiving it.
        to: TeamMemberId,
    },
    /// Add a deliverable (post-production only).
    AddDeliverable {
        /// Kind of output.
        kind: DeliverableKind,
    },
    /// Set a deliverable's assignee and optional delivery date.
    AssignDeliverable {
        /// Deliverable to update.
        deliverable_id: DeliverableId,
        /// Responsible member.
        team_member_id: TeamMemberId,
        /// Promised delivery date.
        #[serde(default)]
        delivery_date: Option<NaiveDate>,
    },
    /// Move a deliverable along its status machine.
    UpdateDeliverableStatus {
        /// Deliverable to update.
        deliverable_id: DeliverableId,
        /// Requested status.
        status: DeliverableStatus,
    },
    /// Send a delivered item back with notes.
    RequestRevision {
        /// Deliverable to revise.
        deliverable_id: DeliverableId,
        /// Client notes for this round.
        notes: String,
    },
    /// Add hours for a member on the current day.
    LogTime {
        /// Member who worked.
        team_member_id: TeamMemberId,
        /// Hours to add.
        hours: f64,
    },
    /// Replace the staff notes and/or client brief.
    UpdateNotes {
        /// New staff notes, if changing.
        #[serde(default)]
        notes: Option<String>,
        /// New client brief, if changing.
        #[serde(default)]
        client_requirements: Option<String>,
    },
    /// Move the event to its next stage.
    AdvanceStage,
}

impl Command {
    /// Returns the command name as a static string slice.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "assign",
            Self::UpdateAssignmentStatus { .. } => "update_assignment_status",
            Self::Reassign { .. } => "reassign",
            Self::AddDeliverable { .. } => "add_deliverable",
            Self::AssignDeliverable { .. } => "assign_deliverable",
            Self::UpdateDeliverableStatus { .. } => "update_deliverable_status",
            Self::RequestRevision { .. } => "request_revision",
            Self::LogTime { .. } => "log_time",
            Self::UpdateNotes { .. } => "update_notes",
            Self::AdvanceStage => "advance_stage",
        }
    }
}
