//! GraphQL query for a Projects (v2) board.

/// Items fetched per request. Larger boards are truncated.
pub const PAGE_SIZE: u32 = 50;

/// Fetches one project board with up to 50 items, each an issue or pull
/// request carrying up to 5 assignees, 10 labels and 50 comments.
///
/// The owner may be a user or an organization; both branches select the
/// same fields.
pub const PROJECT_QUERY: &str = r#"
query($login: String!, $number: Int!) {
  owner: repositoryOwner(login: $login) {
    __typename
    ... on User {
      projectV2(number: $number) { ...ProjectFields }
    }
    ... on Organization {
      projectV2(number: $number) { ...ProjectFields }
    }
  }
}

fragment ProjectFields on ProjectV2 {
  id
  number
  title
  shortDescription
  createdAt
  updatedAt
  url
  items(first: 50) {
    nodes {
      id
      content {
        __typename
        ... on Issue {
          id
          number
          title
          body
          state
          createdAt
          closedAt
          updatedAt
          url
          assignees(first: 5) { nodes { login } }
          labels(first: 10) { nodes { name } }
          comments(first: 50) { nodes { ...CommentFields } }
        }
        ... on PullRequest {
          id
          number
          title
          body
          state
          createdAt
          closedAt
          mergedAt
          updatedAt
          url
          assignees(first: 5) { nodes { login } }
          labels(first: 10) { nodes { name } }
          comments(first: 50) { nodes { ...CommentFields } }
        }
      }
    }
  }
}

fragment CommentFields on IssueComment {
  id
  body
  author { login }
  createdAt
}
"#;

/// Request body for [`PROJECT_QUERY`].
pub fn request_body(login: &str, number: u32) -> serde_json::Value {
    serde_json::json!({
        "query": PROJECT_QUERY,
        "variables": {
            "login": login,
            "number": number,
        },
    })
}
