//! Store record format for event aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Event, EventId, Stage};
use crate::error::WorkflowError;

/// Current layout of [`EventRecord::payload`].
pub const SCHEMA_VERSION: u32 = 1;

/// A stored event row.
///
/// `stage` and `updated_at` are duplicated out of the payload so a backend
/// can index them without decoding it. `version` is the optimistic
/// concurrency token and is authoritative over the payload's copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Payload layout version.
    pub schema_version: u32,
    /// Event identifier.
    pub event_id: EventId,
    /// Revision counter, bumped on every successful save.
    pub version: u64,
    /// Stage at the time of the write.
    pub stage: Stage,
    /// Full aggregate as JSON.
    pub payload: serde_json::Value,
    /// Timestamp of the write.
    pub updated_at: DateTime<Utc>,
}

impl EventRecord {
    /// Encodes `event` as a record at `version`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Persistence`] if serialization fails.
    pub fn encode(event: &Event, version: u64) -> Result<Self, WorkflowError> {
        let mut payload = serde_json::to_value(event)?;
        if let Some(object) = payload.as_object_mut() {
            object.insert("version".to_string(), serde_json::Value::from(version));
        }
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            event_id: event.id,
            version,
            stage: event.stage,
            payload,
            updated_at: event.updated_at,
        })
    }

    /// Decodes the aggregate, stamping it with this record's version.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Persistence`] for an unknown schema
    /// version, a malformed payload, or a payload whose id does not match
    /// the record.
    pub fn decode(&self) -> Result<Event, WorkflowError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(WorkflowError::Persistence(format!(
                "unsupported schema version {} for event {}",
                self.schema_version, self.event_id
            )));
        }
        let mut event: Event = serde_json::from_value(self.payload.clone())?;
        if event.id != self.event_id {
            return Err(WorkflowError::Persistence(format!(
                "record {} holds payload for event {}",
                self.event_id, event.id
            )));
        }
        event.version = self.version;
        Ok(event)
    }

    /// Serializes the record to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Persistence`] if serialization fails.
    pub fn to_json(&self) -> Result<String, WorkflowError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a record from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Persistence`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, WorkflowError> {
        Ok(serde_json::from_str(json)?)
    }
}
