//! Chat completion abstraction and the OpenAI-compatible implementation.
//!
//! Defines the [`Completer`] trait and one production implementation:
//! - **[`OpenAiCompleter`]**: posts to `<base_url>/chat/completions` on any
//!   OpenAI-compatible endpoint, authenticated with a bearer token from the
//!   `OPENAI_API_KEY` environment variable.
//!
//! Retrieval and synthesis depend on the trait, never on the HTTP client,
//! so the whole question-answering path runs against scripted fakes in
//! tests. A single complete response is awaited per call; no streaming, no
//! retries.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Message author role accepted by the chat API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged message in a chat request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Capability interface for one-shot chat completions.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Send the messages to the given model and await the completion.
    ///
    /// `Ok(None)` means the service answered successfully but the response
    /// carried no message content; callers decide what that means for them.
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<Option<String>>;
}

/// Production completer for OpenAI-compatible chat endpoints.
#[derive(Debug)]
pub struct OpenAiCompleter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiCompleter {
    /// Create a completer for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not set, so a missing key
    /// fails at startup instead of mid-question.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let api_key = match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => bail!("OPENAI_API_KEY environment variable not set"),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl Completer for OpenAiCompleter {
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<Option<String>> {
        let body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Chat API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        let content = json["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(String::from);

        Ok(content)
    }
}
