//! Raw tracker records to [`WorkItem`]s.

use chrono::{DateTime, Utc};
use sowtrack_core::{
    Comment, ItemState, ProjectSnapshot, Time, WorkItem, WorkItemId, WorkItemKind, UNASSIGNED,
    UNKNOWN_AUTHOR,
};
use tracing::{debug, warn};

use crate::error::{NormalizeError, TrackerError};
use crate::raw::{RawComment, RawContent, RawProject};

/// Turn a fetched board into a snapshot.
///
/// Entries that are neither issues nor pull requests are dropped first.
/// Items missing required fields are logged and skipped; they never
/// abort the batch.
pub fn normalize_project(project: RawProject) -> crate::Result<ProjectSnapshot> {
    let created_at = match project.created_at.as_deref() {
        Some(raw) => parse_time("createdAt", raw)
            .map_err(|e| TrackerError::MalformedProject(e.to_string()))?,
        None => return Err(TrackerError::MalformedProject("missing field `createdAt`".into())),
    };

    let mut items = Vec::new();
    let mut dropped = 0usize;
    for entry in project.items.into_nodes() {
        let Some(content) = entry.content else {
            dropped += 1;
            continue;
        };
        let Some(kind) = kind_of(&content.typename) else {
            debug!("Dropping {} entry {:?}", content.typename, entry.id);
            dropped += 1;
            continue;
        };
        match normalize_item(kind, &content) {
            Ok(item) => items.push(item),
            Err(e) => warn!("Skipping item {:?}: {}", content.id, e),
        }
    }

    debug!("Normalized {} items ({} non-issue entries dropped)", items.len(), dropped);

    Ok(ProjectSnapshot {
        title: project.title,
        description: project.short_description,
        created_at,
        url: project.url,
        items,
    })
}

fn kind_of(typename: &str) -> Option<WorkItemKind> {
    match typename {
        "Issue" => Some(WorkItemKind::Issue),
        "PullRequest" => Some(WorkItemKind::PullRequest),
        _ => None,
    }
}

/// Normalize one issue or pull request.
///
/// State collapses to open/closed (a merged pull request is closed).
/// The closed timestamp comes from `closedAt`, then `mergedAt`, and is
/// present exactly when the item is closed. The updated timestamp is the
/// first of `updatedAt`, `closedAt`, `mergedAt`, `createdAt`.
pub fn normalize_item(
    kind: WorkItemKind,
    raw: &RawContent,
) -> std::result::Result<WorkItem, NormalizeError> {
    let id = raw.id.clone().ok_or(NormalizeError::MissingField("id"))?;
    let number = raw.number.ok_or(NormalizeError::MissingField("number"))?;
    let title = raw.title.clone().ok_or(NormalizeError::MissingField("title"))?;
    let created_at = raw
        .created_at
        .as_deref()
        .ok_or(NormalizeError::MissingField("createdAt"))
        .and_then(|s| parse_time("createdAt", s))?;

    let closed = parse_optional("closedAt", raw.closed_at.as_deref())?;
    let merged = parse_optional("mergedAt", raw.merged_at.as_deref())?;
    let updated = parse_optional("updatedAt", raw.updated_at.as_deref())?;

    let state = collapse_state(raw.state.as_deref());
    let updated_at = updated.or(closed).or(merged).unwrap_or(created_at);
    let closed_at = match state {
        ItemState::Closed => Some(closed.or(merged).unwrap_or(updated_at)),
        ItemState::Open => None,
    };

    let assignee = raw
        .assignees
        .first()
        .and_then(|u| u.login.as_deref())
        .filter(|l| !l.is_empty())
        .unwrap_or(UNASSIGNED)
        .to_string();

    let labels = raw
        .labels
        .iter()
        .filter_map(|l| l.name.clone())
        .collect();

    let comments = raw.comments.iter().filter_map(normalize_comment).collect();

    Ok(WorkItem {
        id: WorkItemId::new(id),
        number,
        kind,
        title,
        body: raw.body.clone().unwrap_or_default(),
        state,
        created_at,
        updated_at,
        closed_at,
        assignee,
        labels,
        url: raw.url.clone(),
        comments,
    })
}

/// `closed` or `merged` (any case) is closed; everything else is open.
pub fn collapse_state(state: Option<&str>) -> ItemState {
    match state.map(str::to_lowercase).as_deref() {
        Some("closed") | Some("merged") => ItemState::Closed,
        _ => ItemState::Open,
    }
}

fn normalize_comment(raw: &RawComment) -> Option<Comment> {
    let id = raw.id.clone()?;
    let created_at = match raw.created_at.as_deref().map(|s| parse_time("createdAt", s)) {
        Some(Ok(t)) => t,
        _ => {
            debug!("Skipping comment {} without a usable timestamp", id);
            return None;
        }
    };
    let author = raw
        .author
        .as_ref()
        .and_then(|a| a.login.clone())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    Some(Comment {
        id,
        body: raw.body.clone().unwrap_or_default(),
        author,
        created_at,
    })
}

fn parse_time(field: &'static str, raw: &str) -> std::result::Result<Time, NormalizeError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| NormalizeError::InvalidTimestamp {
            field,
            value: raw.to_string(),
        })
}

fn parse_optional(
    field: &'static str,
    raw: Option<&str>,
) -> std::result::Result<Option<Time>, NormalizeError> {
    raw.map(|s| parse_time(field, s)).transpose()
}
