//! Narrative summary generation through Azure OpenAI chat completions.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::json;
use sowtrack_core::ProjectView;
use tracing::debug;

use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};

/// Errors from a summary request. Every variant can be retried.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    /// Endpoint, deployment, version or key missing
    #[error("Failed to generate AI summary: completion service is not configured")]
    NotConfigured,

    /// Nothing to summarize yet
    #[error("Failed to generate AI summary: no project data loaded")]
    NoProjectData,

    /// Transport failure
    #[error("Failed to generate AI summary: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Failed to generate AI summary: HTTP {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The service answered without any text
    #[error("Failed to generate AI summary: empty response")]
    EmptyResponse,

    /// Request or response JSON failure
    #[error("Failed to generate AI summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Produces a markdown narrative for a project view.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Summarize `view` against the contract text `sow`.
    async fn generate(&self, view: &ProjectView, sow: &str) -> Result<String, SummaryError>;
}

/// Azure OpenAI deployment settings.
#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://acme.openai.azure.com/`
    pub endpoint: String,

    /// Deployment name, also sent as the model
    pub deployment: String,

    /// `api-version` query parameter
    pub api_version: String,

    /// `api-key` header
    pub api_key: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion token cap
    pub max_tokens: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AzureOpenAiConfig {
    /// Build from optional parts; `None` if any is missing or blank.
    pub fn from_parts(
        endpoint: Option<String>,
        deployment: Option<String>,
        api_version: Option<String>,
        api_key: Option<String>,
    ) -> Option<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Some(Self {
            endpoint: present(endpoint)?,
            deployment: present(deployment)?,
            api_version: present(api_version)?,
            api_key: present(api_key)?,
            temperature: 0.9,
            max_tokens: 2500,
            timeout_secs: 120,
        })
    }

    /// Chat completions URL for the deployment.
    pub fn completions_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            base, self.deployment, self.api_version
        )
    }
}

/// Azure OpenAI chat completions client.
#[derive(Clone)]
pub struct AzureOpenAiClient {
    /// HTTP client
    client: Client,

    config: AzureOpenAiConfig,
}

impl AzureOpenAiClient {
    /// Create a new client.
    pub fn new(config: AzureOpenAiConfig) -> Self {
        Self {
            client: ClientBuilder::new()
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    fn payload(&self, user_prompt: &str) -> serde_json::Value {
        json!({
            "model": self.config.deployment,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        })
    }
}

#[async_trait]
impl NarrativeGenerator for AzureOpenAiClient {
    async fn generate(&self, view: &ProjectView, sow: &str) -> Result<String, SummaryError> {
        let user_prompt = build_user_prompt(sow, view)?;
        debug!("Requesting summary ({} prompt chars)", user_prompt.len());

        let response = self
            .client
            .post(self.config.completions_url())
            .header("api-key", &self.config.api_key)
            .json(&self.payload(&user_prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let text = extract_content(&body)?;
        debug!("Received summary ({} chars)", text.len());
        Ok(text)
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Pull the first choice's text out of a chat completions response.
pub fn extract_content(body: &str) -> Result<String, SummaryError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(SummaryError::EmptyResponse)
}
