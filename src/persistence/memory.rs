//! In-memory event store with per-event fine-grained locking.
//!
//! [`InMemoryEventStore`] keeps every event as an encoded [`EventRecord`]
//! in a `HashMap` where each entry is individually protected by a
//! [`tokio::sync::RwLock`]. Reads of the same event run concurrently,
//! writes to different events run concurrently, and writes to the same
//! event are serialized and version-checked.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::EventStore;
use super::models::EventRecord;
use crate::domain::{Event, EventId, EventSummary};
use crate::error::WorkflowError;

/// Store backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    records: RwLock<HashMap<EventId, Arc<RwLock<EventRecord>>>>,
}

impl InMemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored events.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns `true` if the store holds no events.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Returns a copy of the raw record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EventNotFound`] if no such event exists.
    pub async fn record(&self, id: EventId) -> Result<EventRecord, WorkflowError> {
        let entry = self.entry(id).await?;
        let record = entry.read().await;
        Ok(record.clone())
    }

    async fn entry(&self, id: EventId) -> Result<Arc<RwLock<EventRecord>>, WorkflowError> {
        let map = self.records.read().await;
        map.get(&id).cloned().ok_or(WorkflowError::EventNotFound(id))
    }
}

impl EventStore for InMemoryEventStore {
    async fn insert(&self, event: Event) -> Result<EventId, WorkflowError> {
        let id = event.id;
        let record = EventRecord::encode(&event, event.version)?;
        let mut map = self.records.write().await;
        if map.contains_key(&id) {
            return Err(WorkflowError::DuplicateEvent(id));
        }
        map.insert(id, Arc::new(RwLock::new(record)));
        Ok(id)
    }

    async fn load(&self, id: EventId) -> Result<Event, WorkflowError> {
        let entry = self.entry(id).await?;
        let record = entry.read().await;
        record.decode()
    }

    async fn save(&self, event: &Event, expected_version: u64) -> Result<u64, WorkflowError> {
        let entry = self.entry(event.id).await?;
        let mut record = entry.write().await;
        if record.version != expected_version {
            return Err(WorkflowError::ConcurrentModification {
                event_id: event.id,
                expected: expected_version,
                actual: record.version,
            });
        }

        let next_version = expected_version.saturating_add(1);
        *record = EventRecord::encode(event, next_version)?;
        Ok(next_version)
    }

    async fn list(&self) -> Result<Vec<EventSummary>, WorkflowError> {
        let map = self.records.read().await;
        let mut summaries = Vec::with_capacity(map.len());
        for entry in map.values() {
            let event = entry.read().await.decode()?;
            summaries.push(EventSummary::from(&event));
        }
        summaries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        Ok(summaries)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::fixtures;
    use crate::domain::Stage;

    #[tokio::test]
    async fn insert_and_load() {
        let store = InMemoryEventStore::new();
        let event = fixtures::event(1, 1);
        let id = event.id;

        assert_eq!(store.insert(event.clone()).await, Ok(id));
        let Ok(loaded) = store.load(id).await else {
            panic!("load failed");
        };
        assert_eq!(loaded, event);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryEventStore::new();
        let event = fixtures::event(1, 1);
        let _ = store.insert(event.clone()).await;
        assert_eq!(
            store.insert(event.clone()).await,
            Err(WorkflowError::DuplicateEvent(event.id))
        );
    }

    #[tokio::test]
    async fn load_nonexistent_returns_error() {
        let store = InMemoryEventStore::new();
        let id = EventId::new();
        assert_eq!(store.load(id).await, Err(WorkflowError::EventNotFound(id)));
    }

    #[tokio::test]
    async fn save_bumps_version() {
        let store = InMemoryEventStore::new();
        let mut event = fixtures::event(0, 0);
        let _ = store.insert(event.clone()).await;

        event.stage = Stage::Production;
        assert_eq!(store.save(&event, 0).await, Ok(1));

        let Ok(loaded) = store.load(event.id).await else {
            panic!("load failed");
        };
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.stage, Stage::Production);
    }

    #[tokio::test]
    async fn stale_save_is_a_conflict() {
        let store = InMemoryEventStore::new();
        let event = fixtures::event(0, 0);
        let _ = store.insert(event.clone()).await;

        assert_eq!(store.save(&event, 0).await, Ok(1));
        let result = store.save(&event, 0).await;
        assert_eq!(
            result,
            Err(WorkflowError::ConcurrentModification {
                event_id: event.id,
                expected: 0,
                actual: 1,
            })
        );

        let Ok(record) = store.record(event.id).await else {
            panic!("record missing");
        };
        assert_eq!(record.version, 1);
    }

    #[tokio::test]
    async fn list_is_ordered_by_date() {
        let store = InMemoryEventStore::new();
        let mut late = fixtures::event(0, 0);
        late.date = late.date.succ_opt().unwrap_or(late.date);
        late.name = "Late".to_string();
        let early = fixtures::event(0, 0);
        let _ = store.insert(late).await;
        let _ = store.insert(early).await;

        let Ok(list) = store.list().await else {
            panic!("list failed");
        };
        let names: Vec<&str> = list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rahman wedding", "Late"]);
    }
}
