//! Workflow configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`), each with a default:
//!
//! | Variable                         | Default |
//! |----------------------------------|---------|
//! | `WORKFLOW_REQUIRE_DELIVERABLES`  | `true`  |
//! | `WORKFLOW_MAX_DAILY_HOURS`       | `24`    |
//! | `WORKFLOW_EVENT_BUS_CAPACITY`    | `1024`  |

use crate::engine::WorkflowPolicy;
use crate::engine::time_ledger::DEFAULT_MAX_DAILY_HOURS;
use crate::error::WorkflowError;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowConfig {
    /// Whether completing an event needs at least one deliverable.
    pub require_deliverables: bool,

    /// Ceiling for one member's logged hours on one day.
    pub max_daily_hours: f64,

    /// Capacity of the notification broadcast channel.
    pub event_bus_capacity: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            require_deliverables: true,
            max_daily_hours: DEFAULT_MAX_DAILY_HOURS,
            event_bus_capacity: 1024,
        }
    }
}

impl WorkflowConfig {
    /// Loads configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidConfig`] if a parsed value is out of
    /// range (see [`Self::validate`]).
    pub fn from_env() -> Result<Self, WorkflowError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            require_deliverables: parse_env_bool(
                "WORKFLOW_REQUIRE_DELIVERABLES",
                defaults.require_deliverables,
            ),
            max_daily_hours: parse_env("WORKFLOW_MAX_DAILY_HOURS", defaults.max_daily_hours),
            event_bus_capacity: parse_env(
                "WORKFLOW_EVENT_BUS_CAPACITY",
                defaults.event_bus_capacity,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidConfig`] for a non-positive or
    /// non-finite daily ceiling, or a zero bus capacity.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if !self.max_daily_hours.is_finite() || self.max_daily_hours <= 0.0 {
            return Err(WorkflowError::InvalidConfig(format!(
                "WORKFLOW_MAX_DAILY_HOURS must be positive, got {}",
                self.max_daily_hours
            )));
        }
        if self.event_bus_capacity == 0 {
            return Err(WorkflowError::InvalidConfig(
                "WORKFLOW_EVENT_BUS_CAPACITY must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Engine rules derived from this configuration.
    #[must_use]
    pub const fn policy(&self) -> WorkflowPolicy {
        WorkflowPolicy {
            require_deliverables: self.require_deliverables,
            max_daily_hours: self.max_daily_hours,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key)
        .ok()
        .map(|v| v.to_ascii_lowercase())
        .as_deref()
    {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
