use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory when no
/// explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "giftscout.toml";

// ── Credentials ───────────────────────────────────────────────────────────────

/// API credentials for the two external capabilities.
///
/// Environment variables (`OPENAI_API_KEY`, `SERPAPI_API_KEY`) take precedence
/// over values in the config file.  Keys are never logged in full; the `Debug`
/// impl redacts everything past the first four characters.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub openai_api_key: String,
    pub serpapi_api_key: String,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("serpapi_api_key", &redact(&self.serpapi_api_key))
            .finish()
    }
}

/// Redact a key for display: first four characters, then an ellipsis.
/// Blank keys render as `<unset>`.
pub fn redact(key: &str) -> String {
    let key = key.trim();
    if key.is_empty() {
        return "<unset>".to_string();
    }
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}…")
}

// ── Models ────────────────────────────────────────────────────────────────────

/// Generation model settings.  The researcher and curator stages use
/// different models: the researcher favours a capable generalist, the
/// curator a cheaper reasoning model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub researcher_model: String,
    pub curator_model: String,
    /// Base URL for the OpenAI-compatible chat completions API.
    pub base_url: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            researcher_model: "gpt-4o".to_string(),
            curator_model: "o3-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Raw results requested from the search provider before curation.
    /// The digest itself is capped at ten entries regardless.
    pub max_results: usize,
    /// Per-request timeout applied uniformly to every external call.
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 20,
            timeout_secs: 60,
        }
    }
}

// ── AppConfig ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub credentials: CredentialsConfig,
    pub models: ModelsConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = fs::read_to_string(path) {
            config = toml::from_str(&raw)?;
        }

        // Env overrides take precedence over the config file.
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                config.credentials.openai_api_key = key;
            }
        }
        if let Ok(key) = env::var("SERPAPI_API_KEY") {
            if !key.trim().is_empty() {
                config.credentials.serpapi_api_key = key;
            }
        }

        Ok(config)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(self)?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// The OpenAI key, if present and non-blank.
    pub fn openai_key(&self) -> Option<&str> {
        let key = self.credentials.openai_api_key.trim();
        (!key.is_empty()).then_some(key)
    }

    /// The SerpAPI key, if present and non-blank.
    pub fn serpapi_key(&self) -> Option<&str> {
        let key = self.credentials.serpapi_api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
