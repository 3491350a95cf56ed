//! Project sources: the GitHub GraphQL API and saved response files.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use sowtrack_core::ProjectSnapshot;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::normalize::normalize_project;
use crate::query::request_body;
use crate::raw::{GraphQlResponse, OwnerData};

/// Default GraphQL endpoint.
pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Something that can produce a project snapshot.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// Fetch the board and normalize it.
    async fn fetch_project(&self) -> Result<ProjectSnapshot>;
}

/// Tracking API configuration.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Bearer token
    pub token: String,

    /// User or organization login that owns the board
    pub owner: String,

    /// Board number
    pub project_number: u32,

    /// GraphQL endpoint
    pub graphql_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GitHubConfig {
    /// Configuration for the default endpoint.
    pub fn new(token: impl Into<String>, owner: impl Into<String>, project_number: u32) -> Self {
        Self {
            token: token.into(),
            owner: owner.into(),
            project_number,
            graphql_url: GITHUB_GRAPHQL_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// GitHub Projects (v2) client.
#[derive(Clone)]
pub struct GitHubClient {
    /// HTTP client
    client: Client,

    config: GitHubConfig,
}

impl GitHubClient {
    /// Create a new client.
    pub fn new(config: GitHubConfig) -> Self {
        Self {
            client: ClientBuilder::new()
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .user_agent(concat!("sowtrack/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    /// Run the project query and return the raw response body.
    pub async fn fetch_raw(&self) -> Result<String> {
        info!(
            "Fetching project {} #{}",
            self.config.owner, self.config.project_number
        );

        let response = self
            .client
            .post(&self.config.graphql_url)
            .bearer_auth(&self.config.token)
            .json(&request_body(&self.config.owner, self.config.project_number))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        debug!("Received {} bytes", body.len());
        Ok(body)
    }
}

#[async_trait]
impl ProjectSource for GitHubClient {
    async fn fetch_project(&self) -> Result<ProjectSnapshot> {
        let body = self.fetch_raw().await?;
        let snapshot = parse_response(&body, &self.config.owner, self.config.project_number)?;
        info!("Fetched {} items", snapshot.items.len());
        Ok(snapshot)
    }
}

/// A saved GraphQL response body on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
    owner: String,
    project_number: u32,
}

impl SnapshotFile {
    /// Source reading `path`. Owner and number are only used in errors.
    pub fn new(path: impl Into<PathBuf>, owner: impl Into<String>, project_number: u32) -> Self {
        Self {
            path: path.into(),
            owner: owner.into(),
            project_number,
        }
    }
}

#[async_trait]
impl ProjectSource for SnapshotFile {
    async fn fetch_project(&self) -> Result<ProjectSnapshot> {
        debug!("Reading snapshot {}", self.path.display());
        let body = tokio::fs::read_to_string(&self.path).await?;
        parse_response(&body, &self.owner, self.project_number)
    }
}

/// Decode a GraphQL response body into a snapshot.
///
/// An error list fails the whole query. A missing owner or board is
/// [`TrackerError::ProjectNotFound`].
pub fn parse_response(body: &str, owner: &str, project_number: u32) -> Result<ProjectSnapshot> {
    let response: GraphQlResponse<OwnerData> = serde_json::from_str(body)?;

    if !response.errors.is_empty() {
        let message = response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(TrackerError::Query(message));
    }

    let project = response
        .data
        .and_then(|d| d.owner)
        .and_then(|o| o.project)
        .ok_or_else(|| TrackerError::ProjectNotFound {
            owner: owner.to_string(),
            number: project_number,
        })?;

    normalize_project(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> String {
        value.to_string()
    }

    #[test]
    fn test_parse_response_errors_are_joined() {
        let raw = body(json!({
            "data": null,
            "errors": [{ "message": "Bad credentials" }, { "message": "rate limited" }]
        }));
        match parse_response(&raw, "acme", 3) {
            Err(TrackerError::Query(msg)) => assert_eq!(msg, "Bad credentials; rate limited"),
            other => panic!("unexpected: {:?}", other.map(|s| s.items.len())),
        }
    }

    #[test]
    fn test_parse_response_missing_project() {
        let raw = body(json!({ "data": { "owner": { "__typename": "User", "projectV2": null } } }));
        let err = parse_response(&raw, "acme", 9).unwrap_err();
        assert!(matches!(err, TrackerError::ProjectNotFound { number: 9, .. }));
        assert_eq!(err.to_string(), "Project not found: acme #9");
        assert!(!err.is_connection_error());
    }

    #[test]
    fn test_parse_response_missing_owner() {
        let raw = body(json!({ "data": { "owner": null } }));
        assert!(matches!(
            parse_response(&raw, "ghost", 1),
            Err(TrackerError::ProjectNotFound { .. })
        ));
    }

    #[test]
    fn test_parse_response_success() {
        let raw = body(json!({ "data": { "owner": {
            "__typename": "Organization",
            "projectV2": {
                "id": "PVT_1",
                "number": 3,
                "title": "EQ",
                "shortDescription": "Deal platform",
                "createdAt": "2025-01-01T00:00:00Z",
                "updatedAt": "2025-02-01T00:00:00Z",
                "url": "https://github.com/orgs/acme/projects/3",
                "items": { "nodes": [
                    { "id": "PVTI_1", "content": {
                        "__typename": "Issue",
                        "id": "I_1",
                        "number": 1,
                        "title": "Bootstrap",
                        "state": "CLOSED",
                        "createdAt": "2025-01-02T00:00:00Z",
                        "closedAt": "2025-01-03T00:00:00Z",
                        "updatedAt": "2025-01-03T00:00:00Z",
                        "labels": { "nodes": [{ "name": "1a" }] }
                    } }
                ] }
            }
        } } }));

        let snapshot = parse_response(&raw, "acme", 3).unwrap();
        assert_eq!(snapshot.description.as_deref(), Some("Deal platform"));
        assert_eq!(snapshot.items.len(), 1);
        assert!(snapshot.items[0].is_closed());
    }

    #[test]
    fn test_parse_response_tolerates_null_connections() {
        let raw = body(json!({ "data": { "owner": {
            "__typename": "User",
            "projectV2": {
                "title": "EQ",
                "createdAt": "2025-01-01T00:00:00Z",
                "items": { "nodes": [
                    { "id": "PVTI_1", "content": {
                        "__typename": "Issue",
                        "id": "I_1",
                        "number": 1,
                        "title": "Bootstrap",
                        "state": "OPEN",
                        "createdAt": "2025-01-02T00:00:00Z",
                        "labels": { "nodes": [{ "name": "1a" }] }
                    } },
                    { "id": "PVTI_2", "content": {
                        "__typename": "Issue",
                        "id": "I_2",
                        "number": 2,
                        "title": "Uploads",
                        "state": "OPEN",
                        "createdAt": "2025-01-02T00:00:00Z",
                        "labels": null,
                        "assignees": null,
                        "comments": { "nodes": null }
                    } }
                ] }
            }
        } } }));

        let snapshot = parse_response(&raw, "acme", 3).unwrap();
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.items[0].labels, vec!["1a".to_string()]);
        assert!(snapshot.items[1].labels.is_empty());
        assert_eq!(snapshot.items[1].assignee, "Unassigned");
    }

    #[test]
    fn test_parse_response_null_item_list() {
        let raw = body(json!({ "data": { "owner": {
            "__typename": "User",
            "projectV2": { "title": "EQ", "createdAt": "2025-01-01T00:00:00Z", "items": null }
        } } }));
        assert!(parse_response(&raw, "acme", 3).unwrap().items.is_empty());
    }

    #[test]
    fn test_parse_response_invalid_json() {
        assert!(matches!(
            parse_response("<html>", "acme", 3),
            Err(TrackerError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_file_missing() {
        let source = SnapshotFile::new("/nonexistent/sowtrack-snapshot.json", "acme", 3);
        let err = source.fetch_project().await.unwrap_err();
        assert!(err.is_connection_error());
    }
}
