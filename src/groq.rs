//! Groq completion model using the OpenAI-compatible chat completions API.
//!
//! This module is only available when the `groq` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

use crate::completion::{CompletionModel, CompletionRequest};
use crate::error::{DocQaError, Result};

/// The default Groq chat completions endpoint (OpenAI-compatible).
const GROQ_CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default per-request timeout, so a stalled call surfaces as a completion
/// failure instead of hanging a query.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A [`CompletionModel`] backed by the Groq chat completions API.
///
/// The wire format is OpenAI-compatible, so [`with_base_url`](Self::with_base_url)
/// also points this client at any OpenAI-compatible endpoint. Structured
/// output requests set `response_format` to `json_object`.
///
/// # Configuration
///
/// - `model` – taken from each [`CompletionRequest`], so both synthesis
///   stages share the configured model.
/// - `api_key` – from the constructor or the `GROQ_API_KEY` environment variable.
pub struct GroqCompletionModel {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GroqCompletionModel {
    /// Create a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`DocQaError::Config`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(DocQaError::Config("Groq API key must not be empty".to_string()));
        }

        let client = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build().map_err(|e| {
            DocQaError::Completion {
                provider: "Groq".into(),
                message: format!("failed to build HTTP client: {e}"),
            }
        })?;

        Ok(Self { client, api_key, base_url: GROQ_CHAT_COMPLETIONS_URL.into() })
    }

    /// Create a new client using the `GROQ_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`DocQaError::Config`] if the variable is not set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| {
            DocQaError::Config("GROQ_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

// ── Chat completions request/response types ────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

// ── CompletionModel implementation ─────────────────────────────────

#[async_trait]
impl CompletionModel for GroqCompletionModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!(
            provider = "Groq",
            model = %request.model,
            prompt_len = request.prompt.len(),
            json_output = request.json_output,
            "completion request"
        );

        let request_body = ChatRequest {
            model: &request.model,
            messages: vec![ChatMessage { role: "user", content: &request.prompt }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_output.then(|| json!({ "type": "json_object" })),
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Groq", error = %e, "request failed");
                DocQaError::Completion {
                    provider: "Groq".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            error!(provider = "Groq", %status, "API error");
            return Err(DocQaError::Completion {
                provider: "Groq".into(),
                message: format!("API returned {status}: {body}"),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "Groq", error = %e, "failed to parse response");
            DocQaError::Completion {
                provider: "Groq".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        chat_response.choices.into_iter().next().map(|c| c.message.content).ok_or_else(|| {
            DocQaError::Completion {
                provider: "Groq".into(),
                message: "API returned no choices".into(),
            }
        })
    }
}
