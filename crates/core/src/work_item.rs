//! Work item model - a normalized issue or pull request.

use serde::{Deserialize, Serialize};
use crate::id::WorkItemId;
use crate::Time;

/// Assignee recorded when the source item has nobody assigned.
pub const UNASSIGNED: &str = "Unassigned";

/// Comment author recorded when the source comment has no author.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// A tracked issue or pull request, normalized into one shape.
///
/// Created once per fetch and never mutated afterwards. `closed_at` is
/// `Some` exactly when `state` is [`ItemState::Closed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier
    pub id: WorkItemId,

    /// Source sequence number (issue/PR number)
    pub number: u64,

    /// What kind of source record this came from
    pub kind: WorkItemKind,

    /// Title
    pub title: String,

    /// Body text, empty when the source had none
    pub body: String,

    /// Open or closed
    pub state: ItemState,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,

    /// When closed or merged
    pub closed_at: Option<Time>,

    /// Primary assignee, [`UNASSIGNED`] when nobody is
    pub assignee: String,

    /// Labels in source order
    pub labels: Vec<String>,

    /// Link to the item
    pub url: Option<String>,

    /// Discussion, oldest first
    pub comments: Vec<Comment>,
}

impl WorkItem {
    /// Whether the item counts as done.
    pub fn is_closed(&self) -> bool {
        self.state == ItemState::Closed
    }
}

/// Source record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkItemKind {
    /// GitHub issue
    Issue,
    /// GitHub pull request
    PullRequest,
}

/// Collapsed item state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    /// Still being worked on
    Open,
    /// Closed or merged
    Closed,
}

impl ItemState {
    /// String form used in the view model.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Open => "open",
            ItemState::Closed => "closed",
        }
    }
}

/// A comment on a work item. Owned by its parent item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: String,

    /// Body text
    pub body: String,

    /// Author login, [`UNKNOWN_AUTHOR`] when missing
    pub author: String,

    /// When posted
    pub created_at: Time,
}
