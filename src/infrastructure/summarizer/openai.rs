//! OpenAI-backed README summarizer

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::DomainError;
use crate::domain::summary::{ReadmeSummarizer, ReadmeSummary};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const TEMPERATURE: f64 = 0.7;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes GitHub repositories \
based on their README content. Provide a concise summary and list some interesting facts about \
the project.";

fn human_prompt(readme: &str) -> String {
    format!(
        "Summarize this GitHub repository from this README file content:\n\n{}\n\n\
         Please provide your response in the following JSON format:\n\
         {{\n  \"summary\": \"A concise summary of the repository\",\n  \
         \"cool_facts\": [\"fact 1\", \"fact 2\", \"fact 3\"]\n}}",
        readme
    )
}

/// Remove a surrounding markdown code fence, if any
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);

    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Parse model output into a summary, falling back to the raw text
fn parse_summary(content: &str) -> ReadmeSummary {
    match serde_json::from_str::<ReadmeSummary>(strip_code_fence(content)) {
        Ok(summary) => summary,
        Err(e) => {
            debug!(error = %e, "Model output is not structured, using raw text");
            ReadmeSummary::from_raw(content)
        }
    }
}

/// Summarizer using the OpenAI chat completions API
pub struct OpenAiReadmeSummarizer {
    client: reqwest::Client,
    auth_header: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for OpenAiReadmeSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiReadmeSummarizer")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[hidden]")
            .finish()
    }
}

impl OpenAiReadmeSummarizer {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, readme: &str) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: human_prompt(readme),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }
}

#[async_trait]
impl ReadmeSummarizer for OpenAiReadmeSummarizer {
    async fn summarize(&self, readme: &str) -> Result<ReadmeSummary, DomainError> {
        let response = self
            .client
            .post(self.chat_completions_url())
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .json(&self.build_request(readme))
            .send()
            .await
            .map_err(|e| DomainError::provider("openai", format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                "openai",
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            DomainError::provider("openai", format!("Failed to parse response: {}", e))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DomainError::provider("openai", "No choices in response"))?;

        Ok(parse_summary(&content))
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
