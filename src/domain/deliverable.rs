//! Post-production deliverables and their status machine.
//!
//! ```text
//! pending ──start──▶ in-progress ──deliver──▶ delivered ──approve──▶ completed
//!                        ▲                        │
//!                        └──resume── revision-requested ◀──request-revision
//! ```
//!
//! Starting work additionally requires an assignee; that check lives in
//! [`crate::engine::DeliverableTracker`] because it depends on more than
//! the two statuses.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{DeliverableId, TeamMemberId};

/// Kind of output owed to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliverableKind {
    /// Edited photo set.
    Photos,
    /// Edited video set.
    Videos,
    /// Printed or digital album.
    Album,
}

impl fmt::Display for DeliverableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Photos => "photos",
            Self::Videos => "videos",
            Self::Album => "album",
        })
    }
}

/// Status of a single deliverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliverableStatus {
    /// Not started yet.
    Pending,
    /// Being worked on.
    InProgress,
    /// Handed to the client for review.
    Delivered,
    /// Client asked for changes.
    RevisionRequested,
    /// Approved by the client. Terminal.
    Completed,
}

impl DeliverableStatus {
    /// All statuses in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::InProgress,
        Self::Delivered,
        Self::RevisionRequested,
        Self::Completed,
    ];

    /// Returns `true` if `self → next` is an edge of the status machine.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::InProgress, Self::Delivered)
                | (Self::Delivered, Self::Completed)
                | (Self::Delivered, Self::RevisionRequested)
                | (Self::RevisionRequested, Self::InProgress)
        )
    }

    /// Returns `true` once approved.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns the status as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Delivered => "delivered",
            Self::RevisionRequested => "revision-requested",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for DeliverableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of post-production output.
///
/// `completed_date` is set exactly when `status` is `completed`.
/// `revision_notes` accumulates every revision round and is never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    /// Deliverable identifier.
    pub id: DeliverableId,
    /// What is being delivered.
    #[serde(rename = "type")]
    pub kind: DeliverableKind,
    /// Current status.
    pub status: DeliverableStatus,
    /// Member responsible for the work.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<TeamMemberId>,
    /// Promised delivery date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    /// Newline-separated history of client revision notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_notes: Option<String>,
    /// Number of times a revision was requested.
    #[serde(default)]
    pub revision_rounds: u32,
    /// Approval timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
}

impl Deliverable {
    /// Creates an unassigned, pending deliverable.
    #[must_use]
    pub fn new(kind: DeliverableKind) -> Self {
        Self {
            id: DeliverableId::new(),
            kind,
            status: DeliverableStatus::Pending,
            assigned_to: None,
            delivery_date: None,
            revision_notes: None,
            revision_rounds: 0,
            completed_date: None,
        }
    }

    /// Appends a round of revision notes to the history.
    pub(crate) fn append_revision_notes(&mut self, notes: &str) {
        let notes = notes.trim();
        if notes.is_empty() {
            return;
        }
        match self.revision_notes.as_mut() {
            Some(history) => {
                history.push('\n');
                history.push_str(notes);
            }
            None => self.revision_notes = Some(notes.to_string()),
        }
    }
}
