//! Tracking API boundary.
//!
//! Fetches a GitHub Projects (v2) board over GraphQL and normalizes its
//! issues and pull requests into [`sowtrack_core::WorkItem`]s.

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod normalize;
pub mod query;
pub mod raw;

pub use client::{parse_response, GitHubClient, GitHubConfig, ProjectSource, SnapshotFile, GITHUB_GRAPHQL_URL};
pub use error::{NormalizeError, Result, TrackerError};
pub use normalize::{collapse_state, normalize_item, normalize_project};
pub use query::{request_body, PAGE_SIZE, PROJECT_QUERY};
