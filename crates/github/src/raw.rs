//! Raw GraphQL response shapes.
//!
//! Everything the normalizer may need to reject is optional here, so one
//! bad item never fails decoding of the whole response.

use serde::{Deserialize, Deserializer};

/// Decode `null` the same way as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    /// Payload, absent when the query failed outright
    pub data: Option<T>,

    /// Query-level errors
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// One GraphQL error.
#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    /// Message
    pub message: String,
}

/// `data` of the project query.
#[derive(Debug, Deserialize)]
pub struct OwnerData {
    /// The user or organization, absent when the login is unknown
    pub owner: Option<RawOwner>,
}

/// A repository owner.
#[derive(Debug, Deserialize)]
pub struct RawOwner {
    /// `User` or `Organization`
    #[serde(rename = "__typename")]
    pub typename: Option<String>,

    /// The board, absent when the number does not exist
    #[serde(rename = "projectV2")]
    pub project: Option<RawProject>,
}

/// A GraphQL connection. The node list and each node may be null.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    nodes: Vec<Option<T>>,
}

impl<T> Connection<T> {
    /// Non-null nodes in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter().flatten()
    }

    /// The first node, even when it is null.
    pub fn first(&self) -> Option<&T> {
        self.nodes.first().and_then(Option::as_ref)
    }

    /// Consume into non-null nodes.
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.nodes.into_iter().flatten()
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

/// A Projects (v2) board.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    /// Node id
    pub id: Option<String>,
    /// Board number
    pub number: Option<u32>,
    /// Board title
    pub title: Option<String>,
    /// Short description
    pub short_description: Option<String>,
    /// Creation timestamp, the schedule start
    pub created_at: Option<String>,
    /// Last update timestamp
    pub updated_at: Option<String>,
    /// Board URL
    pub url: Option<String>,
    /// Board entries
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Connection<RawProjectItem>,
}

/// A board entry wrapping its content.
#[derive(Debug, Deserialize)]
pub struct RawProjectItem {
    /// Board entry id
    pub id: Option<String>,
    /// Wrapped content, null when redacted
    pub content: Option<RawContent>,
}

/// Issue, pull request, or something else (draft issue, redacted item).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    /// `Issue`, `PullRequest`, `DraftIssue`, ...
    #[serde(rename = "__typename")]
    pub typename: String,
    /// Node id
    pub id: Option<String>,
    /// Issue or pull request number
    pub number: Option<u64>,
    /// Title
    pub title: Option<String>,
    /// Markdown body
    pub body: Option<String>,
    /// `OPEN`, `CLOSED` or `MERGED`
    pub state: Option<String>,
    /// Creation timestamp
    pub created_at: Option<String>,
    /// Close timestamp
    pub closed_at: Option<String>,
    /// Pull requests only
    pub merged_at: Option<String>,
    /// Last update timestamp
    pub updated_at: Option<String>,
    /// Web URL
    pub url: Option<String>,
    /// Assigned users, first one wins
    #[serde(default, deserialize_with = "null_as_default")]
    pub assignees: Connection<RawUser>,
    /// Labels
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Connection<RawLabel>,
    /// Comments
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Connection<RawComment>,
}

/// A user reference.
#[derive(Debug, Deserialize)]
pub struct RawUser {
    /// Login name
    pub login: Option<String>,
}

/// A label reference.
#[derive(Debug, Deserialize)]
pub struct RawLabel {
    /// Label name
    pub name: Option<String>,
}

/// A comment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    /// Node id
    pub id: Option<String>,
    /// Markdown body
    pub body: Option<String>,
    /// Author, null for deleted accounts
    pub author: Option<RawUser>,
    /// Creation timestamp
    pub created_at: Option<String>,
}
