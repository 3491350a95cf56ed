//! Tracking API error types.

/// Error type for tracking API operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that can occur while fetching a project.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The API answered with an error list
    #[error("{0}")]
    Query(String),

    /// No board under that owner and number
    #[error("Project not found: {owner} #{number}")]
    ProjectNotFound {
        /// Owner login
        owner: String,
        /// Board number
        number: u32,
    },

    /// The board itself lacks required fields
    #[error("Malformed project: {0}")]
    MalformedProject(String),

    /// Response body was not valid JSON of the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a saved snapshot failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Whether the failure happened before the API gave a usable answer.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, TrackerError::Http(_) | TrackerError::Status { .. } | TrackerError::Io(_))
    }
}

/// Why a single item was skipped during normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// A required field is absent
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A timestamp did not parse as RFC 3339
    #[error("invalid timestamp in `{field}`: {value}")]
    InvalidTimestamp {
        /// Field name
        field: &'static str,
        /// Raw value
        value: String,
    },
}
