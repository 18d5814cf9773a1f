//! Domain layer: identifiers, the `Event` aggregate and notifications.
//!
//! This module holds the data model the engine operates on: events and
//! their stage, crew assignments, deliverables, time entries, plus the
//! notification type and the bus it is broadcast on.

pub mod assignment;
pub mod deliverable;
pub mod event;
pub mod event_bus;
pub mod ids;
pub mod stage;
pub mod time_entry;
pub mod workflow_event;

pub use assignment::{Assignment, AssignmentResponse, AssignmentStatus, Role};
pub use deliverable::{Deliverable, DeliverableKind, DeliverableStatus};
pub use event::{CrewRequirement, Event, EventDetails, EventSummary};
pub use event_bus::EventBus;
pub use ids::{DeliverableId, EventId, TeamMemberId};
pub use stage::Stage;
pub use time_entry::TimeLogEntry;
pub use workflow_event::WorkflowEvent;
