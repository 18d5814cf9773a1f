//! Production stages an event moves through.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered production stage of an event.
///
/// Stages are strictly linear: `pre-production → production →
/// post-production → completed`. The derived `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Crew is being assembled and confirmed.
    PreProduction,
    /// The shoot is under way.
    Production,
    /// Editing and delivery of the deliverables.
    PostProduction,
    /// Every deliverable has been approved. Terminal.
    Completed,
}

impl Stage {
    /// All stages in workflow order.
    pub const ALL: [Self; 4] = [
        Self::PreProduction,
        Self::Production,
        Self::PostProduction,
        Self::Completed,
    ];

    /// Returns the stage that follows this one, or `None` when completed.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PreProduction => Some(Self::Production),
            Self::Production => Some(Self::PostProduction),
            Self::PostProduction => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Returns `true` if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns the stage as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreProduction => "pre-production",
            Self::Production => "production",
            Self::PostProduction => "post-production",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_walks_the_linear_order() {
        let mut stage = Stage::PreProduction;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen, Stage::ALL.to_vec());
        assert!(stage.is_terminal());
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&Stage::PostProduction).unwrap_or_default();
        assert_eq!(json, "\"post-production\"");
        assert_eq!(Stage::PostProduction.to_string(), "post-production");
    }
}
