//! # studio-workflow
//!
//! Production workflow engine for creative studio events.
//!
//! An event (a scheduled shoot) moves through `pre-production →
//! production → post-production → completed`. This crate tracks crew
//! assignment and acceptance, per-deliverable completion and revision
//! cycles, and hours logged against the job, and enforces the gate on each
//! stage transition. Persistence, identity, notification delivery and UI
//! are left to collaborators.
//!
//! ## Architecture
//!
//! ```text
//! Caller (API / UI layer)
//!     │
//!     ├── WorkflowService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── WorkflowEngine (engine/)
//!     │     ├── AssignmentTracker
//!     │     ├── DeliverableTracker
//!     │     ├── TimeLedger
//!     │     └── StageTransitionManager
//!     │
//!     └── EventStore (persistence/)
//! ```

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod service;
