//! Deliverable status machine, including revision cycles.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    Deliverable, DeliverableId, DeliverableKind, DeliverableStatus, Event, TeamMemberId,
};
use crate::error::{TransitionSubject, WorkflowError};

/// Drives deliverables through
/// `pending → in-progress → delivered → completed`, with the
/// `delivered → revision-requested → in-progress` loop.
///
/// Work can only start once the deliverable has an assignee, and only a
/// delivered item can be approved or sent back for revision.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliverableTracker;

impl DeliverableTracker {
    /// Appends a new pending deliverable of `kind`.
    pub fn add(event: &mut Event, kind: DeliverableKind) -> Deliverable {
        let deliverable = Deliverable::new(kind);
        event.deliverables.push(deliverable.clone());
        deliverable
    }

    /// Sets the assignee and delivery date. Does not change the status.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::DeliverableNotFound`] for an unknown id.
    /// - [`WorkflowError::IllegalTransition`] once the deliverable is
    ///   completed.
    pub fn assign(
        event: &mut Event,
        id: DeliverableId,
        member: &TeamMemberId,
        delivery_date: Option<NaiveDate>,
    ) -> Result<Deliverable, WorkflowError> {
        let deliverable = Self::find_mut(event, id)?;
        if deliverable.status.is_terminal() {
            return Err(WorkflowError::IllegalTransition {
                subject: TransitionSubject::Deliverable,
                from: deliverable.status.to_string(),
                to: "assigned".to_string(),
            });
        }

        deliverable.assigned_to = Some(member.clone());
        if delivery_date.is_some() {
            deliverable.delivery_date = delivery_date;
        }
        Ok(deliverable.clone())
    }

    /// Moves a deliverable to `next`.
    ///
    /// Approving (`completed`) stamps `completed_date`. Moving to
    /// `revision-requested` here records a round without notes; use
    /// [`Self::request_revision`] to attach them.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::DeliverableNotFound`] for an unknown id.
    /// - [`WorkflowError::IllegalTransition`] for an edge outside the
    ///   status machine, or when starting work without an assignee.
    pub fn update_status(
        event: &mut Event,
        id: DeliverableId,
        next: DeliverableStatus,
        now: DateTime<Utc>,
    ) -> Result<DeliverableStatus, WorkflowError> {
        let deliverable = Self::find_mut(event, id)?;
        let previous = deliverable.status;
        Self::ensure_transition(deliverable, next)?;

        deliverable.status = next;
        match next {
            DeliverableStatus::Completed => deliverable.completed_date = Some(now),
            DeliverableStatus::RevisionRequested => {
                deliverable.revision_rounds = deliverable.revision_rounds.saturating_add(1);
            }
            _ => {}
        }
        Ok(previous)
    }

    /// Sends a delivered item back for changes, appending `notes` to the
    /// revision history. Returns the revision round number.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::DeliverableNotFound`] for an unknown id.
    /// - [`WorkflowError::IllegalTransition`] unless the deliverable is
    ///   `delivered`.
    pub fn request_revision(
        event: &mut Event,
        id: DeliverableId,
        notes: &str,
    ) -> Result<u32, WorkflowError> {
        let deliverable = Self::find_mut(event, id)?;
        Self::ensure_transition(deliverable, DeliverableStatus::RevisionRequested)?;

        deliverable.status = DeliverableStatus::RevisionRequested;
        deliverable.revision_rounds = deliverable.revision_rounds.saturating_add(1);
        deliverable.append_revision_notes(notes);
        Ok(deliverable.revision_rounds)
    }

    /// Deliverable ids grouped by status, in insertion order within each
    /// group. Statuses with no deliverables are omitted.
    #[must_use]
    pub fn by_status(event: &Event) -> BTreeMap<DeliverableStatus, Vec<DeliverableId>> {
        let mut groups: BTreeMap<DeliverableStatus, Vec<DeliverableId>> = BTreeMap::new();
        for deliverable in &event.deliverables {
            groups
                .entry(deliverable.status)
                .or_default()
                .push(deliverable.id);
        }
        groups
    }

    fn ensure_transition(
        deliverable: &Deliverable,
        next: DeliverableStatus,
    ) -> Result<(), WorkflowError> {
        let from = deliverable.status;
        let unassigned_start = from == DeliverableStatus::Pending
            && next == DeliverableStatus::InProgress
            && deliverable.assigned_to.is_none();

        if !from.can_transition_to(next) || unassigned_start {
            return Err(WorkflowError::IllegalTransition {
                subject: TransitionSubject::Deliverable,
                from: from.to_string(),
                to: next.to_string(),
            });
        }
        Ok(())
    }

    fn find_mut(event: &mut Event, id: DeliverableId) -> Result<&mut Deliverable, WorkflowError> {
        event
            .deliverable_mut(id)
            .ok_or(WorkflowError::DeliverableNotFound(id))
    }
}
