//! Workflow error types.
//!
//! [`WorkflowError`] is the single error type returned by every engine,
//! store and service operation. All variants are recoverable: a rejected
//! command leaves the aggregate untouched and carries enough context to
//! render a message for the user.

use std::fmt;

use crate::domain::{AssignmentStatus, DeliverableId, EventId, Role, Stage, TeamMemberId};

/// What kind of record an illegal transition was attempted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionSubject {
    /// A crew assignment.
    Assignment,
    /// A deliverable.
    Deliverable,
    /// The event stage.
    Stage,
}

impl fmt::Display for TransitionSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Assignment => "assignment",
            Self::Deliverable => "deliverable",
            Self::Stage => "stage",
        })
    }
}

/// The specific rule that blocked a stage transition or stage-gated command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnmetCondition {
    /// Accepted crew for a role does not match the required count.
    #[error("{role} crew not confirmed: {accepted} of {required} accepted")]
    CrewNotConfirmed {
        /// Role that is short.
        role: Role,
        /// Accepted assignments for the role.
        accepted: u32,
        /// Required head count.
        required: u32,
    },

    /// Some deliverables have not been approved yet.
    #[error("{outstanding} of {total} deliverables not completed")]
    DeliverablesOutstanding {
        /// Deliverables not in `completed`.
        outstanding: usize,
        /// All deliverables on the event.
        total: usize,
    },

    /// Completion requires at least one deliverable.
    #[error("no deliverables recorded")]
    NoDeliverables,

    /// The command is only accepted in a particular stage.
    #[error("event must be in {required} (currently {current})")]
    StageRequired {
        /// Stage the command needs.
        required: Stage,
        /// Stage the event is in.
        current: Stage,
    },
}

/// Engine error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category                      |
/// |-----------|-------------------------------|
/// | 1000–1999 | Validation                    |
/// | 2000–2099 | Not found                     |
/// | 2100–2199 | Workflow rule violation       |
/// | 2200–2299 | Store conflict                |
/// | 3000–3999 | Infrastructure                |
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    /// The member already holds a pending or accepted assignment.
    #[error("{team_member_id} is already assigned ({status})")]
    AlreadyAssigned {
        /// Member in question.
        team_member_id: TeamMemberId,
        /// Status of the existing live assignment.
        status: AssignmentStatus,
    },

    /// Every slot for the role is taken by pending or accepted assignments.
    #[error("{role} capacity exceeded: {occupied} of {required} slots taken")]
    CapacityExceeded {
        /// Role requested.
        role: Role,
        /// Required head count for the role.
        required: u32,
        /// Live assignments already holding a slot.
        occupied: u32,
    },

    /// No live assignment exists for the member.
    #[error("no active assignment for {team_member_id}")]
    AssignmentNotFound {
        /// Member in question.
        team_member_id: TeamMemberId,
    },

    /// The requested edge does not exist in the status machine.
    #[error("illegal {subject} transition: {from} -> {to}")]
    IllegalTransition {
        /// Record the transition was attempted on.
        subject: TransitionSubject,
        /// Current state.
        from: String,
        /// Requested state or action.
        to: String,
    },

    /// Logged hours were not positive, not finite, or over the daily ceiling.
    #[error("invalid duration {hours}h: {reason}")]
    InvalidDuration {
        /// Hours supplied by the caller.
        hours: f64,
        /// Which rule was broken.
        reason: &'static str,
    },

    /// A stage gate is not satisfied.
    #[error("cannot move {from} -> {to}: {unmet}")]
    PreconditionNotMet {
        /// Current stage.
        from: Stage,
        /// Target stage (or the stage the command needs).
        to: Stage,
        /// Rule that failed.
        unmet: UnmetCondition,
    },

    /// The stored aggregate changed since it was loaded.
    #[error("event {event_id} was modified concurrently (expected version {expected}, found {actual})")]
    ConcurrentModification {
        /// Event identifier.
        event_id: EventId,
        /// Version the caller loaded.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// Event with the given ID was not found.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// Deliverable with the given ID is not on the event.
    #[error("deliverable not found: {0}")]
    DeliverableNotFound(DeliverableId),

    /// An event with this ID is already stored.
    #[error("event already exists: {0}")]
    DuplicateEvent(EventId),

    /// Store failure (encoding, decoding, backend).
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WorkflowError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidDuration { .. } => 1001,
            Self::InvalidConfig(_) => 1002,
            Self::EventNotFound(_) => 2001,
            Self::DeliverableNotFound(_) => 2002,
            Self::AssignmentNotFound { .. } => 2003,
            Self::AlreadyAssigned { .. } => 2101,
            Self::CapacityExceeded { .. } => 2102,
            Self::IllegalTransition { .. } => 2103,
            Self::PreconditionNotMet { .. } => 2104,
            Self::ConcurrentModification { .. } => 2201,
            Self::DuplicateEvent(_) => 2202,
            Self::Persistence(_) => 3001,
        }
    }

    /// Returns `true` if reloading the aggregate and retrying may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }
}

impl From<serde_json::Error> for WorkflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_message_names_the_rule() {
        let err = WorkflowError::PreconditionNotMet {
            from: Stage::PreProduction,
            to: Stage::Production,
            unmet: UnmetCondition::CrewNotConfirmed {
                role: Role::Videographer,
                accepted: 0,
                required: 1,
            },
        };
        assert_eq!(
            err.to_string(),
            "cannot move pre-production -> production: videographer crew not confirmed: 0 of 1 accepted"
        );
        assert_eq!(err.error_code(), 2104);
        assert!(!err.is_retryable());
    }

    #[test]
    fn only_conflicts_are_retryable() {
        let err = WorkflowError::ConcurrentModification {
            event_id: EventId::new(),
            expected: 3,
            actual: 4,
        };
        assert!(err.is_retryable());
        assert!(!WorkflowError::EventNotFound(EventId::new()).is_retryable());
    }

    #[test]
    fn json_errors_become_persistence_errors() {
        let Err(json_err) = serde_json::from_str::<u32>("not json") else {
            return;
        };
        let err = WorkflowError::from(json_err);
        assert_eq!(err.error_code(), 3001);
    }
}
