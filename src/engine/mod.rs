//! Synchronous workflow core.
//!
//! The trackers validate and mutate a single [`Event`] aggregate.
//! [`WorkflowEngine::execute`] applies one [`Command`] to a copy of the
//! aggregate so that a rejected command never leaves a partial mutation
//! behind, and returns the notifications the change produced.

pub mod assignment_tracker;
pub mod command;
pub mod deliverable_tracker;
pub mod stage_manager;
pub mod time_ledger;

pub use assignment_tracker::{AssignmentTracker, CrewCounts};
pub use command::Command;
pub use deliverable_tracker::DeliverableTracker;
pub use stage_manager::StageTransitionManager;
pub use time_ledger::TimeLedger;

use chrono::{DateTime, Utc};

use crate::domain::{Event, Stage, WorkflowEvent};
use crate::error::WorkflowError;

/// Tunable workflow rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkflowPolicy {
    /// Completion needs at least one deliverable.
    pub require_deliverables: bool,
    /// Ceiling for one member's hours on one day.
    pub max_daily_hours: f64,
}

impl Default for WorkflowPolicy {
    fn default() -> Self {
        Self {
            require_deliverables: true,
            max_daily_hours: time_ledger::DEFAULT_MAX_DAILY_HOURS,
        }
    }
}

/// Result of an accepted command.
#[derive(Debug, Clone)]
pub struct Applied {
    /// The mutated aggregate, to be persisted by the caller.
    pub event: Event,
    /// Notifications describing the change, in order.
    pub notifications: Vec<WorkflowEvent>,
}

/// Dispatches commands to the trackers.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowEngine {
    ledger: TimeLedger,
    stages: StageTransitionManager,
}

impl WorkflowEngine {
    /// Creates an engine enforcing `policy`.
    #[must_use]
    pub const fn new(policy: WorkflowPolicy) -> Self {
        Self {
            ledger: TimeLedger::new(policy.max_daily_hours),
            stages: StageTransitionManager::new(policy.require_deliverables),
        }
    }

    /// The stage manager this engine consults.
    #[must_use]
    pub const fn stages(&self) -> &StageTransitionManager {
        &self.stages
    }

    /// Applies `command` to a copy of `event`.
    ///
    /// On success the copy carries `updated_at = now`. When a command other
    /// than [`Command::AdvanceStage`] makes the next stage reachable, a
    /// [`WorkflowEvent::StageReady`] is appended; the stage itself only
    /// moves on an explicit advance.
    ///
    /// # Errors
    ///
    /// Returns exactly one [`WorkflowError`] describing the violated rule.
    /// `event` is never modified.
    pub fn execute(
        &self,
        event: &Event,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<Applied, WorkflowError> {
        let advancing = matches!(command, Command::AdvanceStage);
        let mut next = event.clone();
        let mut notifications = self.apply(&mut next, command, now)?;
        next.updated_at = now;

        if !advancing
            && self.stages.check(event).is_err()
            && let Ok(stage) = self.stages.check(&next)
        {
            notifications.push(WorkflowEvent::StageReady {
                event_id: next.id,
                next: stage,
                timestamp: now,
            });
        }

        Ok(Applied {
            event: next,
            notifications,
        })
    }

    fn apply(
        &self,
        event: &mut Event,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<Vec<WorkflowEvent>, WorkflowError> {
        let event_id = event.id;
        let notification = match command {
            Command::Assign {
                team_member_id,
                role,
            } => {
                AssignmentTracker::assign(event, &team_member_id, role, now)?;
                WorkflowEvent::MemberAssigned {
                    event_id,
                    team_member_id,
                    role,
                    timestamp: now,
                }
            }
            Command::UpdateAssignmentStatus {
                team_member_id,
                response,
            } => {
                let assignment =
                    AssignmentTracker::update_status(event, &team_member_id, response, now)?;
                WorkflowEvent::AssignmentResponded {
                    event_id,
                    team_member_id,
                    role: assignment.role,
                    status: assignment.status,
                    timestamp: now,
                }
            }
            Command::Reassign { from, to } => {
                let assignment = AssignmentTracker::reassign(event, &from, &to, now)?;
                WorkflowEvent::MemberReassigned {
                    event_id,
                    from,
                    to,
                    role: assignment.role,
                    timestamp: now,
                }
            }
            Command::AddDeliverable { kind } => {
                StageTransitionManager::require_stage(event, Stage::PostProduction)?;
                let deliverable = DeliverableTracker::add(event, kind);
                WorkflowEvent::DeliverableAdded {
                    event_id,
                    deliverable_id: deliverable.id,
                    kind,
                    timestamp: now,
                }
            }
            Command::AssignDeliverable {
                deliverable_id,
                team_member_id,
                delivery_date,
            } => {
                DeliverableTracker::assign(event, deliverable_id, &team_member_id, delivery_date)?;
                WorkflowEvent::DeliverableAssigned {
                    event_id,
                    deliverable_id,
                    team_member_id,
                    timestamp: now,
                }
            }
            Command::UpdateDeliverableStatus {
                deliverable_id,
                status,
            } => {
                let from = DeliverableTracker::update_status(event, deliverable_id, status, now)?;
                WorkflowEvent::DeliverableStatusChanged {
                    event_id,
                    deliverable_id,
                    from,
                    to: status,
                    timestamp: now,
                }
            }
            Command::RequestRevision {
                deliverable_id,
                notes,
            } => {
                let round = DeliverableTracker::request_revision(event, deliverable_id, &notes)?;
                WorkflowEvent::RevisionRequested {
                    event_id,
                    deliverable_id,
                    notes,
                    round,
                    timestamp: now,
                }
            }
            Command::LogTime {
                team_member_id,
                hours,
            } => {
                let day_total =
                    self.ledger
                        .log_time(event, &team_member_id, hours, now.date_naive())?;
                WorkflowEvent::TimeLogged {
                    event_id,
                    team_member_id,
                    hours,
                    day_total,
                    timestamp: now,
                }
            }
            Command::UpdateNotes {
                notes,
                client_requirements,
            } => {
                if let Some(notes) = notes {
                    event.notes = notes;
                }
                if let Some(requirements) = client_requirements {
                    event.client_requirements = requirements;
                }
                WorkflowEvent::NotesUpdated {
                    event_id,
                    timestamp: now,
                }
            }
            Command::AdvanceStage => {
                let from = self.stages.advance(event)?;
                WorkflowEvent::StageAdvanced {
                    event_id,
                    from,
                    to: event.stage,
                    timestamp: now,
                }
            }
        };
        Ok(vec![notification])
    }
}
