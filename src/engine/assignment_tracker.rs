//! Crew assignment lifecycle and capacity rules.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    Assignment, AssignmentResponse, AssignmentStatus, Event, Role, TeamMemberId,
};
use crate::error::{TransitionSubject, WorkflowError};

/// Accepted and pending head counts per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrewCounts {
    /// Photographers who accepted.
    pub accepted_photographers: u32,
    /// Videographers who accepted.
    pub accepted_videographers: u32,
    /// Photographers yet to respond.
    pub pending_photographers: u32,
    /// Videographers yet to respond.
    pub pending_videographers: u32,
}

impl CrewCounts {
    /// Accepted count for `role`.
    #[must_use]
    pub const fn accepted(&self, role: Role) -> u32 {
        match role {
            Role::Photographer => self.accepted_photographers,
            Role::Videographer => self.accepted_videographers,
        }
    }

    /// Pending count for `role`.
    #[must_use]
    pub const fn pending(&self, role: Role) -> u32 {
        match role {
            Role::Photographer => self.pending_photographers,
            Role::Videographer => self.pending_videographers,
        }
    }

    /// Slots held (pending plus accepted) for `role`.
    #[must_use]
    pub const fn occupied(&self, role: Role) -> u32 {
        self.accepted(role).saturating_add(self.pending(role))
    }
}

/// Manages which team members hold crew slots on an event.
///
/// Only live assignments (`pending`, `accepted`) occupy a slot, so a
/// decline or reassignment frees capacity for a new offer. Records are
/// never removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentTracker;

impl AssignmentTracker {
    /// Offers `role` on `event` to `member`.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::AlreadyAssigned`] if the member already holds a
    ///   live assignment on the event.
    /// - [`WorkflowError::CapacityExceeded`] if every slot for the role is
    ///   taken.
    pub fn assign(
        event: &mut Event,
        member: &TeamMemberId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<Assignment, WorkflowError> {
        if let Some(existing) = event.live_assignment(member) {
            return Err(WorkflowError::AlreadyAssigned {
                team_member_id: member.clone(),
                status: existing.status,
            });
        }

        let required = event.required(role);
        let occupied = Self::counts(event).occupied(role);
        if occupied >= required {
            return Err(WorkflowError::CapacityExceeded {
                role,
                required,
                occupied,
            });
        }

        let assignment = Assignment::pending(member.clone(), role, now);
        event.assignments.push(assignment.clone());
        Ok(assignment)
    }

    /// Records a member's response to their live assignment.
    ///
    /// A pending assignment may be accepted or declined; an accepted one
    /// may still be declined.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::AssignmentNotFound`] if the member has no live
    ///   assignment.
    /// - [`WorkflowError::IllegalTransition`] when accepting twice.
    pub fn update_status(
        event: &mut Event,
        member: &TeamMemberId,
        response: AssignmentResponse,
        now: DateTime<Utc>,
    ) -> Result<Assignment, WorkflowError> {
        let assignment =
            event
                .live_assignment_mut(member)
                .ok_or_else(|| WorkflowError::AssignmentNotFound {
                    team_member_id: member.clone(),
                })?;

        let target = response.resulting_status();
        if assignment.status == target {
            return Err(WorkflowError::IllegalTransition {
                subject: TransitionSubject::Assignment,
                from: assignment.status.to_string(),
                to: target.to_string(),
            });
        }

        assignment.status = target;
        assignment.responded_at = Some(now);
        Ok(assignment.clone())
    }

    /// Hands `from`'s slot to `to`, keeping the role.
    ///
    /// The old record becomes `reassigned` and a new pending record is
    /// appended for `to`. Capacity is unchanged.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::AssignmentNotFound`] if `from` has no live
    ///   assignment.
    /// - [`WorkflowError::AlreadyAssigned`] if `to` already holds one.
    pub fn reassign(
        event: &mut Event,
        from: &TeamMemberId,
        to: &TeamMemberId,
        now: DateTime<Utc>,
    ) -> Result<Assignment, WorkflowError> {
        if let Some(existing) = event.live_assignment(to) {
            return Err(WorkflowError::AlreadyAssigned {
                team_member_id: to.clone(),
                status: existing.status,
            });
        }

        let previous =
            event
                .live_assignment_mut(from)
                .ok_or_else(|| WorkflowError::AssignmentNotFound {
                    team_member_id: from.clone(),
                })?;
        previous.status = AssignmentStatus::Reassigned;
        previous.responded_at = Some(now);
        let role = previous.role;

        let assignment = Assignment::pending(to.clone(), role, now);
        event.assignments.push(assignment.clone());
        Ok(assignment)
    }

    /// Accepted and pending counts per role.
    #[must_use]
    pub fn counts(event: &Event) -> CrewCounts {
        CrewCounts {
            accepted_photographers: event
                .count_assignments(Role::Photographer, AssignmentStatus::Accepted),
            accepted_videographers: event
                .count_assignments(Role::Videographer, AssignmentStatus::Accepted),
            pending_photographers: event
                .count_assignments(Role::Photographer, AssignmentStatus::Pending),
            pending_videographers: event
                .count_assignments(Role::Videographer, AssignmentStatus::Pending),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::fixtures;

    fn member(id: &str) -> TeamMemberId {
        TeamMemberId::from(id)
    }

    #[test]
    fn assign_creates_pending_record() {
        let mut event = fixtures::event(1, 0);
        let now = Utc::now();
        let Ok(a) = AssignmentTracker::assign(&mut event, &member("p1"), Role::Photographer, now)
        else {
            panic!("assign failed");
        };
        assert_eq!(a.status, AssignmentStatus::Pending);
        assert_eq!(event.assignments.len(), 1);
        assert_eq!(AssignmentTracker::counts(&event).pending_photographers, 1);
    }

    #[test]
    fn double_assignment_is_rejected() {
        let mut event = fixtures::event(2, 1);
        let now = Utc::now();
        let _ = AssignmentTracker::assign(&mut event, &member("p1"), Role::Photographer, now);
        let result = AssignmentTracker::assign(&mut event, &member("p1"), Role::Videographer, now);
        assert!(matches!(
            result,
            Err(WorkflowError::AlreadyAssigned {
                status: AssignmentStatus::Pending,
                ..
            })
        ));
        assert_eq!(event.assignments.len(), 1);
    }

    #[test]
    fn capacity_counts_pending_and_accepted() {
        let mut event = fixtures::event(1, 0);
        let now = Utc::now();
        let _ = AssignmentTracker::assign(&mut event, &member("p1"), Role::Photographer, now);
        let result = AssignmentTracker::assign(&mut event, &member("p2"), Role::Photographer, now);
        assert!(matches!(
            result,
            Err(WorkflowError::CapacityExceeded {
                role: Role::Photographer,
                required: 1,
                occupied: 1,
            })
        ));

        let result = AssignmentTracker::assign(&mut event, &member("v1"), Role::Videographer, now);
        assert!(matches!(
            result,
            Err(WorkflowError::CapacityExceeded { required: 0, .. })
        ));
    }

    #[test]
    fn decline_frees_capacity_and_allows_reassignment_of_same_member() {
        let mut event = fixtures::event(1, 0);
        let now = Utc::now();
        let _ = AssignmentTracker::assign(&mut event, &member("p1"), Role::Photographer, now);
        let declined = AssignmentTracker::update_status(
            &mut event,
            &member("p1"),
            AssignmentResponse::Decline,
            now,
        );
        assert!(declined.is_ok());

        let reassigned =
            AssignmentTracker::assign(&mut event, &member("p2"), Role::Photographer, now);
        assert!(reassigned.is_ok());
        assert_eq!(event.assignments.len(), 2);
        assert_eq!(
            event.assignments.first().map(|a| a.status),
            Some(AssignmentStatus::Declined)
        );
    }

    #[test]
    fn accept_twice_is_illegal() {
        let mut event = fixtures::event(1, 0);
        let now = Utc::now();
        let _ = AssignmentTracker::assign(&mut event, &member("p1"), Role::Photographer, now);
        let _ = AssignmentTracker::update_status(
            &mut event,
            &member("p1"),
            AssignmentResponse::Accept,
            now,
        );
        let again = AssignmentTracker::update_status(
            &mut event,
            &member("p1"),
            AssignmentResponse::Accept,
            now,
        );
        assert!(matches!(again, Err(WorkflowError::IllegalTransition { .. })));
    }

    #[test]
    fn accepted_member_can_back_out() {
        let mut event = fixtures::event(1, 0);
        let now = Utc::now();
        let _ = AssignmentTracker::assign(&mut event, &member("p1"), Role::Photographer, now);
        let _ = AssignmentTracker::update_status(
            &mut event,
            &member("p1"),
            AssignmentResponse::Accept,
            now,
        );
        let Ok(a) = AssignmentTracker::update_status(
            &mut event,
            &member("p1"),
            AssignmentResponse::Decline,
            now,
        ) else {
            panic!("decline after accept failed");
        };
        assert_eq!(a.status, AssignmentStatus::Declined);
        assert_eq!(AssignmentTracker::counts(&event), CrewCounts::default());
    }

    #[test]
    fn response_without_live_assignment_is_not_found() {
        let mut event = fixtures::event(1, 0);
        let result = AssignmentTracker::update_status(
            &mut event,
            &member("ghost"),
            AssignmentResponse::Accept,
            Utc::now(),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::AssignmentNotFound { .. })
        ));
    }

    #[test]
    fn reassign_moves_the_slot() {
        let mut event = fixtures::event(1, 0);
        let now = Utc::now();
        let _ = AssignmentTracker::assign(&mut event, &member("p1"), Role::Photographer, now);
        let Ok(a) = AssignmentTracker::reassign(&mut event, &member("p1"), &member("p2"), now)
        else {
            panic!("reassign failed");
        };
        assert_eq!(a.role, Role::Photographer);
        assert_eq!(a.status, AssignmentStatus::Pending);
        assert_eq!(
            event.assignments.first().map(|a| a.status),
            Some(AssignmentStatus::Reassigned)
        );
        assert_eq!(AssignmentTracker::counts(&event).occupied(Role::Photographer), 1);
    }

    #[test]
    fn reassign_to_busy_member_is_rejected() {
        let mut event = fixtures::event(2, 0);
        let now = Utc::now();
        let _ = AssignmentTracker::assign(&mut event, &member("p1"), Role::Photographer, now);
        let _ = AssignmentTracker::assign(&mut event, &member("p2"), Role::Photographer, now);
        let result = AssignmentTracker::reassign(&mut event, &member("p1"), &member("p2"), now);
        assert!(matches!(result, Err(WorkflowError::AlreadyAssigned { .. })));
        assert_eq!(
            event.assignments.first().map(|a| a.status),
            Some(AssignmentStatus::Pending)
        );
    }
}
