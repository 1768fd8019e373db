//! Web-search capability: SerpAPI client behind a provider trait.

use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single web search hit as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Opaque web-search capability.
///
/// The researcher stage invokes this exactly once per run.  Any provider
/// returning titled links with snippets can satisfy it; tests use a scripted
/// implementation.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

// ── SerpAPI client ────────────────────────────────────────────────────────────

/// [SerpAPI](https://serpapi.com) Google-engine client.
pub struct SerpApiClient {
    client: reqwest::Client,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("giftscout/0.1 (https://github.com/your-org/giftscout)")
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        tracing::debug!(%query, max_results, "serpapi search");

        let resp = self
            .client
            .get("https://serpapi.com/search.json")
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("num", &max_results.to_string()),
                ("api_key", &self.api_key),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("SerpAPI error {}: {}", status, body);
        }

        let json: serde_json::Value = resp.json().await?;
        if let Some(message) = json["error"].as_str() {
            bail!("SerpAPI error: {message}");
        }

        Ok(parse_organic_results(&json, max_results))
    }
}

/// Pull `{title, link, snippet}` rows out of a SerpAPI `organic_results`
/// array, skipping entries without a title or link.
fn parse_organic_results(json: &serde_json::Value, max_results: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();
    if let Some(items) = json["organic_results"].as_array() {
        for item in items.iter().take(max_results) {
            let title = item["title"].as_str().unwrap_or("").trim();
            let link = item["link"].as_str().unwrap_or("").trim();
            let snippet = item["snippet"].as_str().unwrap_or("").trim();
            if title.is_empty() || link.is_empty() {
                continue;
            }
            results.push(SearchResult {
                title: title.to_string(),
                link: link.to_string(),
                snippet: snippet.to_string(),
            });
        }
    }
    results
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_organic_results_basic() {
        let body = json!({
            "organic_results": [
                {"title": "50 Best Anniversary Gifts", "link": "https://www.goodhousekeeping.com/gifts", "snippet": "Curated picks."},
                {"title": "Gift Guide", "link": "https://www.etsy.com/market/gifts", "snippet": "Handmade ideas."}
            ]
        });
        let results = parse_organic_results(&body, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "50 Best Anniversary Gifts");
        assert_eq!(results[1].link, "https://www.etsy.com/market/gifts");
    }

    #[test]
    fn parse_skips_entries_missing_title_or_link() {
        let body = json!({
            "organic_results": [
                {"title": "", "link": "https://example.com", "snippet": "no title"},
                {"title": "No link", "snippet": "missing"},
                {"title": "Keeper", "link": "https://example.com/ok", "snippet": ""}
            ]
        });
        let results = parse_organic_results(&body, 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Keeper");
        assert_eq!(results[0].snippet, "");
    }

    #[test]
    fn parse_caps_at_max_results() {
        let items: Vec<_> = (0..30)
            .map(|i| {
                json!({"title": format!("t{i}"), "link": format!("https://example.com/{i}"), "snippet": ""})
            })
            .collect();
        let body = json!({ "organic_results": items });
        assert_eq!(parse_organic_results(&body, 20).len(), 20);
    }

    #[test]
    fn parse_empty_body_yields_no_results() {
        assert!(parse_organic_results(&json!({}), 10).is_empty());
    }
}
