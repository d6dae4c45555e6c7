//! LLM backend trait and the two concrete providers.
//!
//! Backends:
//!   OpenAiBackend  — remote OpenAI-compatible chat completions (primary)
//!   OllamaBackend  — local Ollama /api/chat, non-streaming (secondary)
//!
//! Every `complete` call issues exactly one HTTP request. Retrying is left to
//! the router, which makes at most one fallback hop.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::message::Conversation;

/// Sampling temperature sent to the primary provider.
pub const PRIMARY_TEMPERATURE: f64 = 0.7;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("API error [{status}]: {message}")]
    ApiError { status: u16, message: String },
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl LlmError {
    /// Upstream HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest hides the interesting part (refused, dns, timeout) in the
        // source chain, so flatten it into the message.
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        if err.is_timeout() && !message.contains("timed out") {
            message.push_str(": operation timed out");
        }
        match err.status() {
            Some(status) => LlmError::ApiError { status: status.as_u16(), message },
            None => LlmError::Transport(message),
        }
    }
}

// ── Response ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, conversation: &Conversation) -> Result<LlmResponse, LlmError>;
    fn name(&self) -> &str;
    fn model_id(&self) -> &str;
    fn is_local(&self) -> bool;
}

/// Build the HTTP client shared by both backends.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

async fn read_body(resp: reqwest::Response) -> Result<(u16, String), LlmError> {
    let status = resp.status().as_u16();
    let text = resp.text().await?;
    Ok((status, text))
}

fn parse_json(text: &str) -> Result<serde_json::Value, LlmError> {
    serde_json::from_str(text).map_err(|e| LlmError::Decode(e.to_string()))
}

// ── 1. OpenAI (primary) ───────────────────────────────────────────────────────

pub struct OpenAiBackend {
    pub model: String,
    pub base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn error_message(body: &str) -> String {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        parsed
            .as_ref()
            .and_then(|json| {
                json["error"]["message"]
                    .as_str()
                    .or_else(|| json["message"].as_str())
                    .or_else(|| json["error"].as_str())
            })
            .map(str::to_string)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "unknown API error".to_string()
                } else {
                    body.to_string()
                }
            })
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn complete(&self, conversation: &Conversation) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model":       &self.model,
            "messages":    conversation,
            "temperature": PRIMARY_TEMPERATURE,
        });
        debug!(url = %url, model = %self.model, messages = conversation.len(), "Sending primary completion");

        let resp = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let (status, text) = read_body(resp).await?;
        if status >= 400 {
            return Err(LlmError::ApiError { status, message: Self::error_message(&text) });
        }

        let json = parse_json(&text)?;
        Ok(LlmResponse {
            content: json["choices"][0]["message"]["content"]
                .as_str()
                .unwrap_or("")
                .to_string(),
            model: json["model"].as_str().unwrap_or(&self.model).to_string(),
        })
    }

    fn name(&self) -> &str { "openai" }
    fn model_id(&self) -> &str { &self.model }
    fn is_local(&self) -> bool { false }
}

// ── 2. Ollama (secondary) ─────────────────────────────────────────────────────

pub struct OllamaBackend {
    pub base_url: String,
    pub model: String,
    client: reqwest::Client,
}

impl OllamaBackend {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    async fn complete(&self, conversation: &Conversation) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = serde_json::json!({
            "model":    &self.model,
            "messages": conversation,
            "stream":   false,
        });
        debug!(url = %url, model = %self.model, messages = conversation.len(), "Sending secondary completion");

        let resp = self.client.post(&url).json(&body).send().await?;
        let (status, text) = read_body(resp).await?;
        if status >= 400 {
            return Err(LlmError::ApiError { status, message: text });
        }

        let json = parse_json(&text)?;
        Ok(LlmResponse {
            content: json["message"]["content"].as_str().unwrap_or("").to_string(),
            model: json["model"].as_str().unwrap_or(&self.model).to_string(),
        })
    }

    fn name(&self) -> &str { "ollama" }
    fn model_id(&self) -> &str { &self.model }
    fn is_local(&self) -> bool { true }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
