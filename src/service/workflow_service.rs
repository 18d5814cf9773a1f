//! Workflow service: load, apply, compare-and-swap save, publish.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::{
    AssignmentResponse, CrewRequirement, DeliverableId, DeliverableKind, DeliverableStatus, Event,
    EventBus, EventDetails, EventId, EventSummary, Role, TeamMemberId, WorkflowEvent,
};
use crate::engine::{
    AssignmentTracker, Command, CrewCounts, DeliverableTracker, TimeLedger, WorkflowEngine,
};
use crate::error::WorkflowError;
use crate::persistence::EventStore;

/// Orchestration layer for all workflow commands.
///
/// Every mutation follows the same pattern: load the aggregate → run the
/// command through [`WorkflowEngine`] → save with the loaded version →
/// publish notifications → return the updated aggregate. A stale save
/// surfaces as [`WorkflowError::ConcurrentModification`]; the caller
/// decides whether to retry.
#[derive(Debug)]
pub struct WorkflowService<S> {
    store: Arc<S>,
    engine: WorkflowEngine,
    event_bus: EventBus,
}

impl<S> Clone for WorkflowService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            engine: self.engine,
            event_bus: self.event_bus.clone(),
        }
    }
}

impl<S: EventStore> WorkflowService<S> {
    /// Creates a new `WorkflowService`.
    #[must_use]
    pub fn new(store: Arc<S>, engine: WorkflowEngine, event_bus: EventBus) -> Self {
        Self {
            store,
            engine,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Books a new event in pre-production.
    ///
    /// # Errors
    ///
    /// Returns a [`WorkflowError`] if the store rejects the insert.
    pub async fn create_event(
        &self,
        details: EventDetails,
        crew: CrewRequirement,
    ) -> Result<EventId, WorkflowError> {
        let event = Event::new(details, crew);
        let event_id = event.id;
        let name = event.name.clone();
        self.store.insert(event).await?;

        let _ = self.event_bus.publish(WorkflowEvent::EventCreated {
            event_id,
            name,
            timestamp: Utc::now(),
        });

        tracing::info!(%event_id, "event created");
        Ok(event_id)
    }

    /// Loads an event.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EventNotFound`] for an unknown id.
    pub async fn get_event(&self, event_id: EventId) -> Result<Event, WorkflowError> {
        self.store.load(event_id).await
    }

    /// Returns summaries of all events.
    ///
    /// # Errors
    ///
    /// Returns a [`WorkflowError`] if the store cannot be read.
    pub async fn list_events(&self) -> Result<Vec<EventSummary>, WorkflowError> {
        self.store.list().await
    }

    /// Applies one command to the event and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the engine's rule violation, or
    /// [`WorkflowError::ConcurrentModification`] if the event changed
    /// between load and save. Nothing is written in either case.
    pub async fn execute(
        &self,
        event_id: EventId,
        command: Command,
    ) -> Result<Event, WorkflowError> {
        let command_name = command.name();
        let current = self.store.load(event_id).await?;
        let expected = current.version;

        let applied = match self.engine.execute(&current, command, Utc::now()) {
            Ok(applied) => applied,
            Err(err) => {
                tracing::debug!(
                    %event_id,
                    command = command_name,
                    code = err.error_code(),
                    %err,
                    "command rejected"
                );
                return Err(err);
            }
        };

        let mut event = applied.event;
        event.version = match self.store.save(&event, expected).await {
            Ok(version) => version,
            Err(err) => {
                if err.is_retryable() {
                    tracing::warn!(
                        %event_id,
                        command = command_name,
                        expected,
                        "concurrent modification"
                    );
                }
                return Err(err);
            }
        };

        for notification in applied.notifications {
            let _ = self.event_bus.publish(notification);
        }

        tracing::info!(
            %event_id,
            command = command_name,
            stage = %event.stage,
            version = event.version,
            "command applied"
        );
        Ok(event)
    }

    /// Offers `role` to `member`.
    ///
    /// # Errors
    ///
    /// See [`AssignmentTracker::assign`] and [`Self::execute`].
    pub async fn assign_member(
        &self,
        event_id: EventId,
        member: TeamMemberId,
        role: Role,
    ) -> Result<Event, WorkflowError> {
        self.execute(
            event_id,
            Command::Assign {
                team_member_id: member,
                role,
            },
        )
        .await
    }

    /// Records a member's accept/decline.
    ///
    /// # Errors
    ///
    /// See [`AssignmentTracker::update_status`] and [`Self::execute`].
    pub async fn respond_to_assignment(
        &self,
        event_id: EventId,
        member: TeamMemberId,
        response: AssignmentResponse,
    ) -> Result<Event, WorkflowError> {
        self.execute(
            event_id,
            Command::UpdateAssignmentStatus {
                team_member_id: member,
                response,
            },
        )
        .await
    }

    /// Hands `from`'s slot to `to`.
    ///
    /// # Errors
    ///
    /// See [`AssignmentTracker::reassign`] and [`Self::execute`].
    pub async fn reassign_member(
        &self,
        event_id: EventId,
        from: TeamMemberId,
        to: TeamMemberId,
    ) -> Result<Event, WorkflowError> {
        self.execute(event_id, Command::Reassign { from, to }).await
    }

    /// Adds a deliverable. Returns the updated event and the new id.
    ///
    /// # Errors
    ///
    /// Fails with [`WorkflowError::PreconditionNotMet`] outside
    /// post-production; see also [`Self::execute`].
    pub async fn add_deliverable(
        &self,
        event_id: EventId,
        kind: DeliverableKind,
    ) -> Result<(Event, DeliverableId), WorkflowError> {
        let event = self
            .execute(event_id, Command::AddDeliverable { kind })
            .await?;
        let id = event
            .deliverables
            .last()
            .map(|d| d.id)
            .ok_or_else(|| WorkflowError::Persistence("deliverable not stored".to_string()))?;
        Ok((event, id))
    }

    /// Sets a deliverable's assignee and optional delivery date.
    ///
    /// # Errors
    ///
    /// See [`DeliverableTracker::assign`] and [`Self::execute`].
    pub async fn assign_deliverable(
        &self,
        event_id: EventId,
        deliverable_id: DeliverableId,
        member: TeamMemberId,
        delivery_date: Option<NaiveDate>,
    ) -> Result<Event, WorkflowError> {
        self.execute(
            event_id,
            Command::AssignDeliverable {
                deliverable_id,
                team_member_id: member,
                delivery_date,
            },
        )
        .await
    }

    /// Moves a deliverable to `status`.
    ///
    /// # Errors
    ///
    /// See [`DeliverableTracker::update_status`] and [`Self::execute`].
    pub async fn update_deliverable_status(
        &self,
        event_id: EventId,
        deliverable_id: DeliverableId,
        status: DeliverableStatus,
    ) -> Result<Event, WorkflowError> {
        self.execute(
            event_id,
            Command::UpdateDeliverableStatus {
                deliverable_id,
                status,
            },
        )
        .await
    }

    /// Sends a delivered item back with notes.
    ///
    /// # Errors
    ///
    /// See [`DeliverableTracker::request_revision`] and [`Self::execute`].
    pub async fn request_revision(
        &self,
        event_id: EventId,
        deliverable_id: DeliverableId,
        notes: impl Into<String>,
    ) -> Result<Event, WorkflowError> {
        self.execute(
            event_id,
            Command::RequestRevision {
                deliverable_id,
                notes: notes.into(),
            },
        )
        .await
    }

    /// Logs hours for `member` today.
    ///
    /// # Errors
    ///
    /// See [`TimeLedger::log_time`] and [`Self::execute`].
    pub async fn log_time(
        &self,
        event_id: EventId,
        member: TeamMemberId,
        hours: f64,
    ) -> Result<Event, WorkflowError> {
        self.execute(
            event_id,
            Command::LogTime {
                team_member_id: member,
                hours,
            },
        )
        .await
    }

    /// Replaces staff notes and/or client brief.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn update_notes(
        &self,
        event_id: EventId,
        notes: Option<String>,
        client_requirements: Option<String>,
    ) -> Result<Event, WorkflowError> {
        self.execute(
            event_id,
            Command::UpdateNotes {
                notes,
                client_requirements,
            },
        )
        .await
    }

    /// Moves the event to its next stage.
    ///
    /// # Errors
    ///
    /// See [`crate::engine::StageTransitionManager::advance`] and
    /// [`Self::execute`].
    pub async fn advance_stage(&self, event_id: EventId) -> Result<Event, WorkflowError> {
        self.execute(event_id, Command::AdvanceStage).await
    }

    /// Crew counts for an event.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EventNotFound`] for an unknown id.
    pub async fn counts(&self, event_id: EventId) -> Result<CrewCounts, WorkflowError> {
        let event = self.store.load(event_id).await?;
        Ok(AssignmentTracker::counts(&event))
    }

    /// Hours logged by `member` on an event.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EventNotFound`] for an unknown id.
    pub async fn total_hours(
        &self,
        event_id: EventId,
        member: &TeamMemberId,
    ) -> Result<f64, WorkflowError> {
        let event = self.store.load(event_id).await?;
        Ok(TimeLedger::total_hours(&event, member))
    }

    /// Deliverable ids grouped by status.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EventNotFound`] for an unknown id.
    pub async fn deliverables_by_status(
        &self,
        event_id: EventId,
    ) -> Result<BTreeMap<DeliverableStatus, Vec<DeliverableId>>, WorkflowError> {
        let event = self.store.load(event_id).await?;
        Ok(DeliverableTracker::by_status(&event))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Stage;
    use crate::persistence::InMemoryEventStore;

    fn details() -> EventDetails {
        let Some(date) = NaiveDate::from_ymd_opt(2026, 11, 14) else {
            panic!("valid date");
        };
        EventDetails {
            name: "Okafor engagement".to_string(),
            date,
            location: "Botanic Gardens".to_string(),
            client_name: "Chidi Okafor".to_string(),
            client_phone: String::new(),
            client_email: "chidi@example.com".to_string(),
        }
    }

    fn make_service() -> WorkflowService<InMemoryEventStore> {
        WorkflowService::new(
            Arc::new(InMemoryEventStore::new()),
            WorkflowEngine::default(),
            EventBus::new(64),
        )
    }

    #[tokio::test]
    async fn create_event_emits_notification() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let result = service
            .create_event(details(), CrewRequirement::new(1, 0))
            .await;
        assert!(result.is_ok());

        let Ok(event) = rx.recv().await else {
            panic!("expected notification");
        };
        assert_eq!(event.event_type_str(), "event_created");
    }

    #[tokio::test]
    async fn execute_persists_and_bumps_version() {
        let service = make_service();
        let Ok(id) = service
            .create_event(details(), CrewRequirement::new(1, 0))
            .await
        else {
            panic!("create failed");
        };

        let Ok(event) = service
            .assign_member(id, TeamMemberId::from("p1"), Role::Photographer)
            .await
        else {
            panic!("assign failed");
        };
        assert_eq!(event.version, 1);

        let Ok(stored) = service.get_event(id).await else {
            panic!("load failed");
        };
        assert_eq!(stored, event);
    }

    #[tokio::test]
    async fn rejected_command_is_not_persisted() {
        let service = make_service();
        let Ok(id) = service
            .create_event(details(), CrewRequirement::new(1, 0))
            .await
        else {
            panic!("create failed");
        };
        let mut rx = service.event_bus().subscribe();

        let result = service.advance_stage(id).await;
        assert!(matches!(result, Err(WorkflowError::PreconditionNotMet { .. })));

        let Ok(stored) = service.get_event(id).await else {
            panic!("load failed");
        };
        assert_eq!(stored.version, 0);
        assert_eq!(stored.stage, Stage::PreProduction);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn stale_writer_gets_conflict() {
        let service = make_service();
        let Ok(id) = service
            .create_event(details(), CrewRequirement::new(2, 0))
            .await
        else {
            panic!("create failed");
        };

        let Ok(stale) = service.get_event(id).await else {
            panic!("load failed");
        };
        let _ = service
            .assign_member(id, TeamMemberId::from("p1"), Role::Photographer)
            .await;

        let result = service.store().save(&stale, stale.version).await;
        assert!(matches!(
            result,
            Err(WorkflowError::ConcurrentModification {
                expected: 0,
                actual: 1,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn read_views_reflect_state() {
        let service = make_service();
        let Ok(id) = service
            .create_event(details(), CrewRequirement::new(1, 0))
            .await
        else {
            panic!("create failed");
        };
        let p1 = TeamMemberId::from("p1");
        let _ = service.assign_member(id, p1.clone(), Role::Photographer).await;
        let _ = service.log_time(id, p1.clone(), 2.5).await;

        let Ok(counts) = service.counts(id).await else {
            panic!("counts failed");
        };
        assert_eq!(counts.pending_photographers, 1);
        assert_eq!(service.total_hours(id, &p1).await, Ok(2.5));
        assert_eq!(service.deliverables_by_status(id).await, Ok(BTreeMap::new()));
    }
}
