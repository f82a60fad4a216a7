use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AnthropicConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Sampling parameters and system instruction for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub system: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation API key is not configured")]
    MissingCredential,
    #[error("failed to reach text generation API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("text generation API returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("text generation API returned no text content")]
    EmptyResponse,
}

impl GenerationError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GenerationError::Status { status, .. } => Some(status.as_u16()),
            GenerationError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::MissingCredential => "missing_credential",
            GenerationError::Transport(_) => "transport",
            GenerationError::Status { .. } => "status",
            GenerationError::EmptyResponse => "empty_response",
        }
    }
}

/// The single capability the pipelines need from a language model:
/// turn a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;

    /// Model identifier, reported by the health endpoint.
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [MessageParam<'a>; 1],
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Anthropic Messages API.
pub struct AnthropicClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(config: &AnthropicConfig) -> Result<Self, GenerationError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            system: &options.system,
            messages: [MessageParam {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!("Sending request to {} with model={}", url, self.model);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Status { status, body });
        }

        let parsed: MessagesResponse = response.json().await?;
        tracing::debug!("Received {} content block(s)", parsed.content.len());

        first_text(parsed).ok_or(GenerationError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Only the first block counts; a non-text first block yields nothing.
fn first_text(response: MessagesResponse) -> Option<String> {
    let block = response.content.into_iter().next()?;
    if block.kind != "text" {
        return None;
    }
    block.text
}
