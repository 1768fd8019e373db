//! Researcher stage: profile → search query → curated research digest.

use serde::Deserialize;

use giftscout_llm::{Generator, extract_json_output};
use giftscout_search::{SearchProvider, SearchResult};

use crate::digest::{DigestEntry, ResearchDigest};
use crate::error::{PipelineError, Result};
use crate::profile::GiftProfile;

/// Digest size bounds: the researcher curates 8–10 links when the search
/// yields enough, fewer otherwise.
pub const DIGEST_MIN_LINKS: usize = 8;
pub const DIGEST_MAX_LINKS: usize = 10;

/// Recognized gift-guide and curated-shopping domains, ranked ahead of
/// everything else when curating raw results.
const GIFT_GUIDE_DOMAINS: &[&str] = &[
    "goodhousekeeping.com",
    "nytimes.com", // Wirecutter
    "buzzfeed.com",
    "nymag.com", // The Strategist
    "thestrategist.com",
    "etsy.com",
    "uncommongoods.com",
    "oprahdaily.com",
    "realsimple.com",
    "countryliving.com",
    "esquire.com",
    "cosmopolitan.com",
    "giftadvisor.com",
];

const RESEARCHER_SYSTEM: &str = "\
You are a gift discovery expert helping users find thoughtful, trending, and well-reviewed gift ideas.

You are given the user's gift preferences (recipient profile, occasion, interests, budget) and a numbered list of candidate web search results for a focused gift query.

Instructions:
- Carefully read the gift preferences to understand the recipient, occasion, interests, and budget.
- From the numbered candidates, pick the 8-10 most relevant curated gift lists from trustworthy sources (Good Housekeeping, Wirecutter, BuzzFeed, The Strategist, Etsy, UncommonGoods, and similar).
- Do NOT invent links. Only pick from the numbered candidates.
- Reply with a fenced JSON block of the form:
```json
{\"picks\": [1, 4, 7], \"context\": \"one short note on what these sources cover\"}
```
- `picks` holds the candidate numbers of your selections, most relevant first.";

/// Structured reply expected from the selection call.
#[derive(Debug, Deserialize)]
struct Selection {
    #[serde(default)]
    picks: Vec<usize>,
    #[serde(default)]
    context: Option<String>,
}

/// Build the single focused search query for a profile.
///
/// The template always includes the occasion, one qualifier (recipient
/// descriptor, sharpened by an interest when one is listed), and the budget
/// phrase — a bare "gift ideas" query is impossible by construction.
pub fn build_query(profile: &GiftProfile) -> String {
    let mut query = format!(
        "best {} gifts for {}",
        profile.occasion.query_term(),
        profile.recipient_descriptor(),
    );
    if let Some(interest) = profile.interests.first() {
        query.push_str(" who loves ");
        query.push_str(interest.love_phrase());
    }
    query.push(' ');
    query.push_str(profile.budget.query_phrase());
    query
}

/// Stamp the current date into a stage's standing instructions so the model
/// can judge "trending" and seasonal relevance.
pub(crate) fn with_current_date(system: &str) -> String {
    let today = chrono::Utc::now().format("%B %e, %Y");
    format!("{system}\n\nCurrent date: {today}.")
}

// ── Researcher ────────────────────────────────────────────────────────────────

pub struct Researcher {
    generator: Box<dyn Generator>,
    search: Box<dyn SearchProvider>,
    max_results: usize,
}

impl Researcher {
    pub fn new(
        generator: Box<dyn Generator>,
        search: Box<dyn SearchProvider>,
        max_results: usize,
    ) -> Self {
        Self {
            generator,
            search,
            max_results,
        }
    }

    /// Run the researcher stage: one query, one search call, heuristic
    /// ranking, then model-driven selection into the digest.
    pub async fn research(&self, profile: &GiftProfile) -> Result<ResearchDigest> {
        profile.validate()?;

        let query = build_query(profile);
        tracing::info!(%query, "researcher: searching");

        let raw = self
            .search
            .search(&query, self.max_results)
            .await
            .map_err(|e| PipelineError::SearchFailure(e.to_string()))?;

        let candidates = rank_results(raw);
        if candidates.is_empty() {
            tracing::warn!(%query, "researcher: no usable search results");
            return Ok(ResearchDigest::default());
        }

        let selection = self.select(profile, &candidates).await?;
        let mut entries = apply_selection(&candidates, &selection.picks);
        if entries.is_empty() {
            // A well-formed reply can still pick nothing usable (empty or
            // all out-of-range).  Usable search results must never degrade
            // into an empty digest, so fall back to the ranked order.
            tracing::warn!("researcher: selection picked no usable candidates, using ranked order");
            entries = apply_selection(&candidates, &ranked_picks(candidates.len()));
        }
        if entries.len() < DIGEST_MIN_LINKS {
            tracing::debug!(
                links = entries.len(),
                "researcher: digest below the preferred {DIGEST_MIN_LINKS}-link minimum"
            );
        }

        tracing::info!(links = entries.len(), "researcher: digest assembled");
        Ok(ResearchDigest {
            entries,
            context: selection.context,
        })
    }

    /// Ask the generator to pick the most relevant candidates.  An
    /// unparseable reply falls back to the heuristic ranking; a failed call
    /// propagates as a generation failure.
    async fn select(&self, profile: &GiftProfile, candidates: &[SearchResult]) -> Result<Selection> {
        let input = selection_input(profile, candidates);
        let system = with_current_date(RESEARCHER_SYSTEM);

        let reply = self
            .generator
            .generate(&system, &input)
            .await
            .map_err(|e| PipelineError::GenerationFailure(e.to_string()))?;

        match extract_json_output::<Selection>(&reply) {
            Some(selection) => Ok(selection),
            None => {
                tracing::warn!("researcher: selection reply was not valid JSON, using ranked order");
                Ok(Selection {
                    picks: ranked_picks(candidates.len()),
                    context: None,
                })
            }
        }
    }
}

/// 1-based picks following the heuristic ranking, capped at the digest
/// maximum.
fn ranked_picks(candidates: usize) -> Vec<usize> {
    (1..=candidates.min(DIGEST_MAX_LINKS)).collect()
}

/// The user-message payload for the selection call: profile block plus the
/// numbered candidate list.
fn selection_input(profile: &GiftProfile, candidates: &[SearchResult]) -> String {
    let mut parts = vec![
        "User's Gift Preferences:".to_string(),
        profile.render(),
        "Candidate search results:".to_string(),
    ];
    for (i, result) in candidates.iter().enumerate() {
        parts.push(format!(
            "{}. {}\n   {}\n   {}",
            i + 1,
            result.title,
            result.link,
            result.snippet,
        ));
    }
    parts.join("\n\n")
}

/// Order raw results for curation: recognized gift-guide domains first
/// (keeping their relative order), everything else after, results with
/// unparseable links dropped.
fn rank_results(raw: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut recognized = Vec::new();
    let mut rest = Vec::new();
    for result in raw {
        let Some(host) = host_of(&result.link) else {
            continue;
        };
        if is_gift_guide_domain(&host) {
            recognized.push(result);
        } else {
            rest.push(result);
        }
    }
    recognized.extend(rest);
    recognized
}

fn host_of(link: &str) -> Option<String> {
    let parsed = url::Url::parse(link).ok()?;
    parsed.host_str().map(|h| h.to_ascii_lowercase())
}

fn is_gift_guide_domain(host: &str) -> bool {
    GIFT_GUIDE_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}

/// Map 1-based picks onto candidates, ignoring out-of-range or duplicate
/// numbers, capped at the digest maximum.
fn apply_selection(candidates: &[SearchResult], picks: &[usize]) -> Vec<DigestEntry> {
    let mut seen = vec![false; candidates.len()];
    let mut entries = Vec::new();
    for &pick in picks {
        if entries.len() == DIGEST_MAX_LINKS {
            break;
        }
        let Some(index) = pick.checked_sub(1) else {
            continue;
        };
        if index >= candidates.len() || seen[index] {
            continue;
        }
        seen[index] = true;
        let result = &candidates[index];
        entries.push(DigestEntry {
            title: result.title.clone(),
            link: result.link.clone(),
            snippet: result.snippet.clone(),
        });
    }
    entries
}

// ── Tests ────────────────────────────────────────────────────────────────────
