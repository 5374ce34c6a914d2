//! Claude API summarizer.
//!
//! Calls the Claude messages endpoint directly over HTTP; no CLI
//! dependency.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use stint_core::config::LlmConfig;
use stint_core::summarize::Summarizer;
use stint_core::{Result, StintError};

const BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// `Summarizer` backed by the Claude HTTP API.
pub struct ClaudeSummaryAgent {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeSummaryAgent {
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl Summarizer for ClaudeSummaryAgent {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(StintError::config(
                "no Anthropic API key configured; run 'stint --setup'",
            ));
        }

        let body = CreateMessageRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: vec![ContentBlock::Text {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.model, "claude summarize request");
        let response = self
            .client
            .post(BASE_URL)
            .timeout(REQUEST_TIMEOUT)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                StintError::collaborator("claude", format!("request failed: {}", err))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        let parsed: CreateMessageResponse = response.json().await.map_err(|err| {
            StintError::collaborator("claude", format!("unexpected response: {}", err))
        })?;

        extract_text(parsed)
    }
}

fn map_http_error(status: StatusCode, body: &str) -> StintError {
    let message = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            "authentication failed; check the Anthropic API key".to_string()
        }
        StatusCode::TOO_MANY_REQUESTS => "rate limited; try again shortly".to_string(),
        s if s.is_server_error() => format!("service unavailable (HTTP {})", s),
        s => format!("HTTP {}: {}", s, body),
    };
    StintError::collaborator("claude", message)
}

fn extract_text(response: CreateMessageResponse) -> Result<String> {
    let text = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ResponseContentBlock::Text { text } => Some(text),
            ResponseContentBlock::Other => None,
        })
        .collect::<Vec<_>>()
        .join("");

    if text.is_empty() {
        Err(StintError::collaborator(
            "claude",
            "response contained no text content",
        ))
    } else {
        Ok(text)
    }
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<ContentBlock>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Text { text: String },
}

#[derive(Deserialize)]
struct CreateMessageResponse {
    content: Vec<ResponseContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ResponseContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}
