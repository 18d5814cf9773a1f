//! Service layer: command orchestration.
//!
//! [`WorkflowService`] loads aggregates from an
//! [`crate::persistence::EventStore`], runs commands through the engine,
//! saves with optimistic concurrency and emits notifications through the
//! [`crate::domain::EventBus`].

pub mod workflow_service;

pub use workflow_service::WorkflowService;
