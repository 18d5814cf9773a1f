//! Crew assignments binding team members to an event in a role.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TeamMemberId;

/// Crew role a team member fills on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Stills coverage.
    Photographer,
    /// Motion coverage.
    Videographer,
}

impl Role {
    /// All roles, in reporting order.
    pub const ALL: [Self; 2] = [Self::Photographer, Self::Videographer];

    /// Returns the role as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Photographer => "photographer",
            Self::Videographer => "videographer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an [`Assignment`].
///
/// `pending` and `accepted` are live; `declined` and `reassigned` are
/// terminal and no longer hold a crew slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    /// Offered, awaiting the member's response.
    Pending,
    /// Member confirmed.
    Accepted,
    /// Member turned the job down.
    Declined,
    /// Slot was handed to another member.
    Reassigned,
}

impl AssignmentStatus {
    /// Returns `true` for `declined` and `reassigned`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Declined | Self::Reassigned)
    }

    /// Returns the status as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Reassigned => "reassigned",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member's answer to an assignment offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentResponse {
    /// Confirm the assignment.
    Accept,
    /// Turn it down, freeing the slot.
    Decline,
}

impl AssignmentResponse {
    /// Status the assignment ends up in after this response.
    #[must_use]
    pub const fn resulting_status(self) -> AssignmentStatus {
        match self {
            Self::Accept => AssignmentStatus::Accepted,
            Self::Decline => AssignmentStatus::Declined,
        }
    }
}

/// One team member's claim on a crew role for an event.
///
/// Assignments are never removed from an event; a declined or reassigned
/// record stays as audit history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Roster identifier of the member.
    pub team_member_id: TeamMemberId,
    /// Role the member fills.
    pub role: Role,
    /// Current lifecycle status.
    pub status: AssignmentStatus,
    /// When the assignment was offered.
    pub assigned_at: DateTime<Utc>,
    /// When the member last responded, if at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
}

impl Assignment {
    /// Creates a pending assignment.
    #[must_use]
    pub fn pending(team_member_id: TeamMemberId, role: Role, assigned_at: DateTime<Utc>) -> Self {
        Self {
            team_member_id,
            role,
            status: AssignmentStatus::Pending,
            assigned_at,
            responded_at: None,
        }
    }

    /// Returns `true` while the assignment still holds a crew slot.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_release_the_slot() {
        let mut a = Assignment::pending(TeamMemberId::from("p1"), Role::Photographer, Utc::now());
        assert!(a.is_live());
        a.status = AssignmentStatus::Accepted;
        assert!(a.is_live());
        a.status = AssignmentStatus::Declined;
        assert!(!a.is_live());
        a.status = AssignmentStatus::Reassigned;
        assert!(!a.is_live());
    }

    #[test]
    fn response_maps_to_status() {
        assert_eq!(
            AssignmentResponse::Accept.resulting_status(),
            AssignmentStatus::Accepted
        );
        assert_eq!(
            AssignmentResponse::Decline.resulting_status(),
            AssignmentStatus::Declined
        );
    }
}
