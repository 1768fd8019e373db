//! Text-generation capability: an OpenAI-compatible chat client plus helpers
//! for extracting structured JSON from model replies.

use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::json;

/// Opaque text-generation capability.
///
/// Both pipeline stages drive their model calls through this trait so that
/// tests can substitute a scripted implementation.  `system` carries the
/// stage's standing instructions, `input` the per-run payload (profile,
/// candidate links, digest).
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, system: &str, input: &str) -> Result<String>;
}

// ── OpenAI-compatible client ──────────────────────────────────────────────────

/// Chat-completions client for OpenAI-compatible endpoints.
///
/// One client per model: the researcher and curator stages each construct
/// their own with the model id they are configured for.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Generator for OpenAiClient {
    async fn generate(&self, system: &str, input: &str) -> Result<String> {
        let endpoint = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": input}
            ]
        });

        tracing::debug!(model = %self.model, "chat completion request");

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;
        if !status.is_success() {
            bail!("chat completions error ({status}): {body}");
        }

        let content = body
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str());

        match content {
            Some(text) => Ok(text.to_string()),
            None => bail!("chat completions response missing content: {body}"),
        }
    }
}

// ── Structured output extraction ──────────────────────────────────────────────

/// Extract the first valid JSON payload from a model reply.
///
/// Looks for a fenced ` ```json ` block first; falls back to the first
/// `{`..`}` span of the bare text.  Returns `None` when neither strategy
/// yields valid JSON for `T`.  Used by the researcher stage, whose
/// link-selection reply is requested as fenced JSON.
pub fn extract_json_output<T: serde::de::DeserializeOwned>(response: &str) -> Option<T> {
    // Strategy 1: fenced ```json ... ``` blocks.
    if let Some(fence_start) = response.find("```json") {
        let after_fence = &response[fence_start + "```json".len()..];
        if let Some(json_start) = after_fence.find(|c: char| !c.is_whitespace()) {
            let json_body = &after_fence[json_start..];
            if let Some(fence_end) = json_body.find("```") {
                let json_str = json_body[..fence_end].trim();
                if let Ok(val) = serde_json::from_str(json_str) {
                    return Some(val);
                }
            }
        }
    }

    // Strategy 2: bare JSON object — first '{' to last '}'.
    let trimmed = response.trim();
    if let Some(start) = trimmed.find('{') {
        if let Some(end) = trimmed.rfind('}') {
            if end > start {
                let candidate = &trimmed[start..=end];
                if let Ok(val) = serde_json::from_str(candidate) {
                    return Some(val);
                }
            }
        }
    }

    None
}

// ── Tests ────────────────────────────────────────────────────────────────────
