//! Narrative summaries and the dashboard session.
//!
//! Wraps the tracking source and the completion service behind a single
//! [`Dashboard`] that keeps the last good view and the state of each call.

#![warn(missing_docs)]

pub mod dashboard;
pub mod prompt;
pub mod summary;

pub use dashboard::{Dashboard, FailureKind, LoadState, SummaryState};
pub use prompt::{build_user_prompt, SECTIONS, SOW_DOCUMENT, SYSTEM_PROMPT};
pub use summary::{extract_content, AzureOpenAiClient, AzureOpenAiConfig, NarrativeGenerator, SummaryError};
