//! Progress Tracking
//!
//! Phase classification, phase metrics, schedule projection and view
//! assembly. Everything in this crate is synchronous and pure over an
//! already-fetched snapshot.

#![warn(missing_docs)]

pub mod classifier;
pub mod tracker;
pub mod estimator;
pub mod assembler;
pub mod filter;

pub use classifier::{classify, classify_item, is_phase_label};
pub use tracker::{overall_progress, percentage, PhaseTracker};
pub use estimator::{stage_label, CompletionEstimator, ScheduleProjection, DEFAULT_TOTAL_WEEKS};
pub use assembler::{recent_activity, summarize_body, ProjectProfile, ViewAssembler};
pub use filter::{DashboardStats, FeatureFilter, FilterOptions};
