//! Project view model - everything the rendering layer consumes.

use serde::Serialize;
use crate::id::{PhaseId, WorkItemId};
use crate::phase::{PhaseMetricsMap, PhaseStatus};
use crate::work_item::{Comment, WorkItem};
use crate::Time;

/// The assembled dashboard for one fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectView {
    /// Project metadata
    pub project: ProjectSummary,

    /// Timeline milestones, in order
    pub milestones: Vec<Milestone>,

    /// One feature per work item, in source order
    pub features: Vec<Feature>,

    /// Most recently updated items
    pub recent_activity: Vec<ActivityEntry>,

    /// Metrics for every catalog phase
    pub phase_metrics: PhaseMetricsMap,
}

/// Project-level metadata and headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    /// Title
    pub title: String,

    /// Description
    pub description: String,

    /// Project start
    pub start_date: Time,

    /// Projected completion
    pub target_date: Time,

    /// Qualitative stage label
    pub current_phase: String,

    /// Closed items over all items, 0-100
    pub overall_progress: u8,

    /// Contributors
    pub team_size: u32,

    /// Contracted hours
    pub total_hours: u32,

    /// Hours burned so far
    pub hours_spent: u32,
}

/// A timeline milestone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    /// Position in the timeline, starting at 1
    pub id: u32,

    /// Name
    pub name: String,

    /// Target date
    pub target_date: Time,

    /// Status
    pub status: PhaseStatus,

    /// Progress 0-100
    pub progress: u8,

    /// Description
    pub description: String,
}

/// Feature status as shown in the feature list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureStatus {
    /// Closed
    Completed,
    /// Still open
    InProgress,
}

impl FeatureStatus {
    /// Kebab-case form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureStatus::Completed => "completed",
            FeatureStatus::InProgress => "in-progress",
        }
    }
}

impl std::str::FromStr for FeatureStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(FeatureStatus::Completed),
            "in-progress" => Ok(FeatureStatus::InProgress),
            other => Err(format!("unknown feature status: {}", other)),
        }
    }
}

/// A work item as presented in the feature list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    /// Source item id
    pub id: WorkItemId,

    /// Issue or pull request number
    pub number: u64,

    /// Title
    pub title: String,

    /// Shortened body for list views
    pub description: String,

    /// Completed when the item is closed
    pub status: FeatureStatus,

    /// Primary assignee
    pub assignee: String,

    /// Close timestamp
    pub completed_date: Option<Time>,

    /// Source reference, `GitHub Issue #<number>`
    pub business_value: String,

    /// Full body
    pub body: String,

    /// Discussion, oldest first
    pub comments: Vec<Comment>,

    /// Classified phase, if any
    pub phase: Option<PhaseId>,

    /// Link to the item
    pub url: Option<String>,
}

/// Activity feed entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// The item was closed
    Completion,
    /// The item was updated but is still open
    Progress,
}

/// One entry in the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    /// Last update of the item
    pub date: Time,

    /// Completion or progress
    pub kind: ActivityKind,

    /// Human-readable line
    pub message: String,

    /// Classified phase, if any
    pub phase: Option<PhaseId>,
}

/// A fetched project and its normalized items, the input to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSnapshot {
    /// Project title as the tracker reports it
    pub title: Option<String>,

    /// Short description
    pub description: Option<String>,

    /// Project creation, used as the schedule start
    pub created_at: Time,

    /// Link to the project board
    pub url: Option<String>,

    /// Normalized items in source order
    pub items: Vec<WorkItem>,
}
