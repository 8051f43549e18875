//! Reqwest-based LLM client for OpenAI-compatible Chat Completions.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            model: cfg.get("DEFAULT_MODEL").unwrap_or_else(|| "gpt-4o".into()),
            temperature: 0.6,
            max_tokens: 1024,
        }
    }
}

/// Seam between the pipeline and the hosted completion endpoint.
///
/// One synchronous attempt per call, no retry. Transport failures,
/// non-2xx statuses, and malformed bodies all surface as `Err`; the
/// pipeline converts them into user-visible text at its boundary.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], opts: &ChatOptions) -> Result<String>;
}

#[derive(Debug)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let timeout = cfg
            .get("REQUEST_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        let api_base_url = cfg.get("API_BASE_URL").unwrap_or_else(|| "default".into());
        let mut base_url = if api_base_url == "default" {
            "https://api.openai.com/v1".to_string()
        } else {
            api_base_url
        };
        let trimmed = base_url.trim_end_matches('/');
        if !trimmed.ends_with("/v1") && !trimmed.contains("/v1/") {
            base_url = format!("{}/v1", trimmed);
        } else {
            base_url = trimmed.to_string();
        }
        let api_key = cfg.get("OPENAI_API_KEY");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self { http, base_url, api_key })
    }
}

#[async_trait]
impl CompletionClient for LlmClient {
    async fn complete(&self, messages: &[ChatMessage], opts: &ChatOptions) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let hv = HeaderValue::from_str(&format!("Bearer {}", key))?;
            headers.insert(AUTHORIZATION, hv);
        }

        let body = serde_json::json!({
            "model": opts.model,
            "temperature": opts.temperature,
            "max_tokens": opts.max_tokens,
            "messages": messages,
        });

        let resp = self
            .http
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .context("failed to send chat request")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("LLM error: {}", status);
        }

        let completion: Completion = resp
            .json()
            .await
            .context("malformed completion response")?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .context("completion response contained no choices")?;
        tracing::debug!(chars = choice.message.content.len(), "completion received");
        Ok(choice.message.content)
    }
}

// Minimal response structures for OpenAI-like completions
#[derive(Debug, Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}
