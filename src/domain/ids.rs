//! Type-safe identifiers for events, deliverables and team members.
//!
//! [`EventId`] and [`DeliverableId`] are newtype wrappers around
//! [`uuid::Uuid`] (v4) so that the two cannot be confused with each other.
//! [`TeamMemberId`] is an opaque string owned by the roster service; the
//! engine only compares it for equality.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a scheduled production event.
///
/// Generated once at event creation and immutable thereafter. Used as the
/// key in [`crate::persistence::EventStore`] implementations and as the
/// discriminator on every [`super::WorkflowEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(uuid::Uuid);

impl EventId {
    /// Creates a new random `EventId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates an `EventId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for EventId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

/// Unique identifier for a deliverable within an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliverableId(uuid::Uuid);

impl DeliverableId {
    /// Creates a new random `DeliverableId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `DeliverableId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for DeliverableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeliverableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roster reference for a photographer or videographer.
///
/// The roster itself lives outside the engine, so this is kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamMemberId(String);

impl TeamMemberId {
    /// Wraps a roster identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamMemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamMemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        assert_ne!(EventId::new(), EventId::new());
        assert_ne!(DeliverableId::new(), DeliverableId::new());
    }

    #[test]
    fn display_is_uuid_format() {
        let s = format!("{}", EventId::new());
        assert_eq!(s.len(), 36);
        assert!(s.contains('-'));
    }

    #[test]
    fn event_id_serde_round_trip() {
        let id = EventId::new();
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        let Ok(back) = serde_json::from_str::<EventId>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(id, back);
    }

    #[test]
    fn from_uuid_round_trip() {
        let uuid = uuid::Uuid::new_v4();
        assert_eq!(*EventId::from_uuid(uuid).as_uuid(), uuid);
    }

    #[test]
    fn team_member_id_is_transparent_string() {
        let id = TeamMemberId::from("p-17");
        assert_eq!(serde_json::to_string(&id).unwrap_or_default(), "\"p-17\"");
        assert_eq!(id.as_str(), "p-17");
    }
}
