//! Persistence seam: the `EventStore` trait and its record format.
//!
//! The engine never talks to a database. Callers load an [`Event`] from an
//! [`EventStore`], apply a command, and save it back with the version they
//! loaded. A store must reject a save whose expected version is stale with
//! [`WorkflowError::ConcurrentModification`]; it never merges.

pub mod memory;
pub mod models;

pub use memory::InMemoryEventStore;
pub use models::EventRecord;

use std::future::Future;

use crate::domain::{Event, EventId, EventSummary};
use crate::error::WorkflowError;

/// Durable keyed storage for event aggregates with optimistic concurrency.
pub trait EventStore: Send + Sync {
    /// Stores a new event at its current version.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::DuplicateEvent`] if the id is taken.
    fn insert(&self, event: Event) -> impl Future<Output = Result<EventId, WorkflowError>> + Send;

    /// Loads an event; the returned aggregate carries the stored version.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EventNotFound`] for an unknown id.
    fn load(&self, id: EventId) -> impl Future<Output = Result<Event, WorkflowError>> + Send;

    /// Compare-and-swap write. Succeeds only if the stored version equals
    /// `expected_version`, and returns the new version.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ConcurrentModification`] on a stale
    /// version, or [`WorkflowError::EventNotFound`] for an unknown id.
    fn save(
        &self,
        event: &Event,
        expected_version: u64,
    ) -> impl Future<Output = Result<u64, WorkflowError>> + Send;

    /// Summaries of all stored events.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Persistence`] if a record cannot be decoded.
    fn list(&self) -> impl Future<Output = Result<Vec<EventSummary>, WorkflowError>> + Send;
}
