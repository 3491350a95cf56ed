//! sowtrack core data models.
//!
//! This crate defines the work items, contractual phases and derived
//! view structures shared by the tracking client, the progress pipeline
//! and the narrative summary.

#![warn(missing_docs)]

// Core identities
mod id;

// Source data
mod work_item;

// Phases and derived views
mod phase;
mod project;

// Re-exports
pub use id::{PhaseId, WorkItemId};

pub use work_item::{Comment, ItemState, WorkItem, WorkItemKind, UNASSIGNED, UNKNOWN_AUTHOR};

pub use phase::{Phase, PhaseCatalog, PhaseMetrics, PhaseMetricsMap, PhaseStatus};
pub use project::{
    ActivityEntry, ActivityKind, Feature, FeatureStatus, Milestone, ProjectSnapshot, ProjectSummary,
    ProjectView,
};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
