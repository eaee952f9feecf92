// src/core/report/provider.rs

use crate::config::ProviderConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to the summarization API failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("summarization API rejected the credentials ({status})")]
    Unauthorized { status: u16 },

    #[error("summarization API rate limit exceeded")]
    RateLimited,

    #[error("summarization API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("summarization API returned no message content")]
    EmptyResponse,
}

/// Turns an analyst prompt into free-text markdown.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String, SummaryError>;

    fn model_name(&self) -> &str;
}

// --- Chat completion wire types ---

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

/// Summarizer backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl OpenAiSummarizer {
    pub fn new(config: ProviderConfig) -> Result<Self, SummaryError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(SummaryError::ClientBuild)?;
        Ok(Self { client, config })
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, SummaryError> {
        let url = self.config.completions_url();
        info!(url = %url, model = %self.config.model, prompt_chars = prompt.len(), "Sending chat completion request.");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Summarization API returned an error.");
            return Err(classify_failure(status, body));
        }

        let parsed: ChatResponse = response.json().await?;
        if let Some(usage) = &parsed.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Chat completion finished."
            );
        }
        extract_content(parsed)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn classify_failure(status: StatusCode, body: String) -> SummaryError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SummaryError::Unauthorized { status: status.as_u16() },
        StatusCode::TOO_MANY_REQUESTS => SummaryError::RateLimited,
        _ => SummaryError::Api { status: status.as_u16(), body },
    }
}

fn extract_content(response: ChatResponse) -> Result<String, SummaryError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(SummaryError::EmptyResponse)?;
    debug!(chars = content.len(), "Received summary.");
    Ok(content)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed body, or fails, and remembers what it was asked.
    pub struct MockSummarizer {
        body: String,
        should_fail: bool,
        call_count: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl MockSummarizer {
        pub fn with_body(body: &str) -> Self {
            Self {
                body: body.to_string(),
                should_fail: false,
                call_count: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        pub fn failing() -> Self {
            let mut mock = Self::with_body("");
            mock.should_fail = true;
            mock
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.last_prompt.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Summarizer for MockSummarizer {
        async fn summarize(&self, prompt: &str) -> Result<String, SummaryError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            if self.should_fail {
                return Err(SummaryError::RateLimited);
            }
            Ok(self.body.clone())
        }

        fn model_name(&self) -> &str {
            "mock"
        }
    }
}
