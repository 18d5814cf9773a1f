//! Stage transitions and the preconditions that gate them.
//!
//! | From            | To              | Precondition                              |
//! |-----------------|-----------------|-------------------------------------------|
//! | pre-production  | production      | accepted crew equals required, both roles |
//! | production      | post-production | none (explicit staff action)              |
//! | post-production | completed       | every deliverable completed               |

use crate::domain::{DeliverableStatus, Event, Role, Stage};
use crate::error::{TransitionSubject, UnmetCondition, WorkflowError};

use super::AssignmentTracker;

/// Enforces the linear stage order and each transition's gate.
#[derive(Debug, Clone, Copy)]
pub struct StageTransitionManager {
    require_deliverables: bool,
}

impl StageTransitionManager {
    /// Creates a manager. With `require_deliverables`, an event cannot be
    /// completed while it has no deliverables at all.
    #[must_use]
    pub const fn new(require_deliverables: bool) -> Self {
        Self {
            require_deliverables,
        }
    }

    /// Returns the stage `event` may move to next.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::IllegalTransition`] if the event is completed.
    /// - [`WorkflowError::PreconditionNotMet`] naming the failing rule.
    pub fn check(&self, event: &Event) -> Result<Stage, WorkflowError> {
        let from = event.stage;
        let Some(to) = from.next() else {
            return Err(WorkflowError::IllegalTransition {
                subject: TransitionSubject::Stage,
                from: from.to_string(),
                to: "next stage".to_string(),
            });
        };

        if let Some(unmet) = self.unmet(event, from) {
            return Err(WorkflowError::PreconditionNotMet { from, to, unmet });
        }
        Ok(to)
    }

    /// Moves `event` to its next stage. Returns the stage it left.
    ///
    /// # Errors
    ///
    /// Same as [`Self::check`]; the event is left untouched on error.
    pub fn advance(&self, event: &mut Event) -> Result<Stage, WorkflowError> {
        let to = self.check(event)?;
        let from = event.stage;
        event.stage = to;
        Ok(from)
    }

    /// Fails unless `event` is currently in `required`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::PreconditionNotMet`] with
    /// [`UnmetCondition::StageRequired`].
    pub fn require_stage(event: &Event, required: Stage) -> Result<(), WorkflowError> {
        if event.stage == required {
            return Ok(());
        }
        Err(WorkflowError::PreconditionNotMet {
            from: event.stage,
            to: required,
            unmet: UnmetCondition::StageRequired {
                required,
                current: event.stage,
            },
        })
    }

    fn unmet(&self, event: &Event, from: Stage) -> Option<UnmetCondition> {
        match from {
            Stage::PreProduction => {
                let counts = AssignmentTracker::counts(event);
                Role::ALL.into_iter().find_map(|role| {
                    let accepted = counts.accepted(role);
                    let required = event.required(role);
                    (accepted != required).then_some(UnmetCondition::CrewNotConfirmed {
                        role,
                        accepted,
                        required,
                    })
                })
            }
            Stage::Production | Stage::Completed => None,
            Stage::PostProduction => {
                let total = event.deliverables.len();
                let outstanding = event
                    .deliverables
                    .iter()
                    .filter(|d| d.status != DeliverableStatus::Completed)
                    .count();
                if total == 0 && self.require_deliverables {
                    Some(UnmetCondition::NoDeliverables)
                } else if outstanding > 0 {
                    Some(UnmetCondition::DeliverablesOutstanding { outstanding, total })
                } else {
                    None
                }
            }
        }
    }
}

impl Default for StageTransitionManager {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::fixtures;
    use crate::domain::{AssignmentResponse, DeliverableKind, TeamMemberId};
    use crate::engine::DeliverableTracker;
    use chrono::Utc;

    fn confirm(event: &mut Event, id: &str, role: Role) {
        let member = TeamMemberId::from(id);
        let now = Utc::now();
        if AssignmentTracker::assign(event, &member, role, now).is_err()
            || AssignmentTracker::update_status(event, &member, AssignmentResponse::Accept, now)
                .is_err()
        {
            panic!("could not confirm {id}");
        }
    }

    #[test]
    fn production_needs_full_accepted_crew() {
        let manager = StageTransitionManager::default();
        let mut event = fixtures::event(1, 1);
        confirm(&mut event, "p1", Role::Photographer);

        let result = manager.advance(&mut event);
        assert!(matches!(
            result,
            Err(WorkflowError::PreconditionNotMet {
                unmet: UnmetCondition::CrewNotConfirmed {
                    role: Role::Videographer,
                    accepted: 0,
                    required: 1,
                },
                ..
            })
        ));
        assert_eq!(event.stage, Stage::PreProduction);

        confirm(&mut event, "v1", Role::Videographer);
        assert_eq!(manager.advance(&mut event), Ok(Stage::PreProduction));
        assert_eq!(event.stage, Stage::Production);
    }

    #[test]
    fn pending_crew_does_not_count() {
        let manager = StageTransitionManager::default();
        let mut event = fixtures::event(1, 0);
        let _ = AssignmentTracker::assign(
            &mut event,
            &TeamMemberId::from("p1"),
            Role::Photographer,
            Utc::now(),
        );
        assert!(manager.check(&event).is_err());
    }

    #[test]
    fn zero_crew_event_advances_immediately() {
        let manager = StageTransitionManager::default();
        let event = fixtures::event(0, 0);
        assert_eq!(manager.check(&event), Ok(Stage::Production));
    }

    #[test]
    fn completion_requires_all_deliverables_completed() {
        let manager = StageTransitionManager::default();
        let mut event = fixtures::event(0, 0);
        event.stage = Stage::PostProduction;

        assert!(matches!(
            manager.check(&event),
            Err(WorkflowError::PreconditionNotMet {
                unmet: UnmetCondition::NoDeliverables,
                ..
            })
        ));

        let id = DeliverableTracker::add(&mut event, DeliverableKind::Album).id;
        assert!(matches!(
            manager.check(&event),
            Err(WorkflowError::PreconditionNotMet {
                unmet: UnmetCondition::DeliverablesOutstanding {
                    outstanding: 1,
                    total: 1
                },
                ..
            })
        ));

        if let Some(d) = event.deliverable_mut(id) {
            d.status = DeliverableStatus::Completed;
            d.completed_date = Some(Utc::now());
        }
        assert_eq!(manager.check(&event), Ok(Stage::Completed));
    }

    #[test]
    fn empty_deliverables_pass_when_not_required() {
        let manager = StageTransitionManager::new(false);
        let mut event = fixtures::event(0, 0);
        event.stage = Stage::PostProduction;
        assert_eq!(manager.check(&event), Ok(Stage::Completed));
    }

    #[test]
    fn completed_is_terminal() {
        let manager = StageTransitionManager::default();
        let mut event = fixtures::event(0, 0);
        event.stage = Stage::Completed;
        assert!(matches!(
            manager.advance(&mut event),
            Err(WorkflowError::IllegalTransition {
                subject: TransitionSubject::Stage,
                ..
            })
        ));
    }

    #[test]
    fn require_stage_reports_current() {
        let event = fixtures::event(0, 0);
        assert!(matches!(
            StageTransitionManager::require_stage(&event, Stage::PostProduction),
            Err(WorkflowError::PreconditionNotMet {
                unmet: UnmetCondition::StageRequired {
                    required: Stage::PostProduction,
                    current: Stage::PreProduction,
                },
                ..
            })
        ));
    }
}
