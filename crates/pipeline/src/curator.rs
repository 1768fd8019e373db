//! Curator stage: profile + digest → validated gift report.
//!
//! The model is instructed not to fabricate and to follow the exact block
//! format, but instructions alone are not a guarantee: every reply is
//! re-parsed, its source links cross-checked against the digest, and the
//! canonical document re-rendered from the validated blocks.

use giftscout_llm::Generator;

use crate::digest::ResearchDigest;
use crate::error::{PipelineError, Result};
use crate::profile::GiftProfile;
use crate::report::{
    GiftReport, MAX_RECOMMENDATIONS, MIN_RECOMMENDATIONS, REPORT_HEADING, RecommendationBlock,
    empty_report, parse_blocks, render_report,
};
use crate::researcher::with_current_date;

const CURATOR_SYSTEM: &str = "\
You are a thoughtful gift recommendation assistant.
Your role is to use the user's recipient profile and a set of trusted research links to create a personalized, curated shortlist of gift suggestions.

You receive:
1. A structured summary of the user's gift preferences (recipient, occasion, interests, budget, style).
2. A numbered list of research links pointing to curated gift recommendation sources.

Instructions:
- Review the user's gift preferences carefully, then analyze the research links.
- Extract real gift suggestions that match the recipient's profile, occasion, and budget.
- For each gift, provide: product name, 1-line description, why it's a good match, and a markdown link to the source.
- Use this format exactly:
### [Gift Name]
**Description**:
**Why it's a great fit**:
**Source**: [Site Name](link)
- Do NOT invent or fabricate gift ideas. Only include products found in the sources, and only link to the provided research links.
- Do NOT add intros or summaries — start directly with '## 🧾 Gift Recommendations'.
- Include 8–12 recommendations only. Focus on quality, variety, and relevance.";

pub struct Curator {
    generator: Box<dyn Generator>,
}

impl Curator {
    pub fn new(generator: Box<dyn Generator>) -> Self {
        Self { generator }
    }

    /// Run the curator stage.  An empty digest short-circuits to the minimal
    /// report without touching the generator — there is nothing to extract
    /// from, and padding with invented entries is forbidden.
    pub async fn curate(
        &self,
        profile: &GiftProfile,
        digest: &ResearchDigest,
    ) -> Result<GiftReport> {
        if digest.is_empty() {
            tracing::warn!("curator: empty digest, emitting minimal report");
            return Ok(empty_report());
        }

        let system = with_current_date(CURATOR_SYSTEM);
        let input = curator_input(profile, digest);

        let reply = self
            .generator
            .generate(&system, &input)
            .await
            .map_err(|e| PipelineError::GenerationFailure(e.to_string()))?;

        let blocks = validate_reply(&reply, digest)?;
        tracing::info!(recommendations = blocks.len(), "curator: report validated");
        Ok(render_report(&blocks))
    }
}

/// The user-message payload for the curation call: profile block followed by
/// the serialized research digest.
fn curator_input(profile: &GiftProfile, digest: &ResearchDigest) -> String {
    format!(
        "User's Gift Preferences:\n\n{}\n\nResearch Results:\n\n{}\n\nUse these details to generate a gift recommendation report.",
        profile.render(),
        digest.to_text(),
    )
}

/// Validate a curator reply against the output contract and the digest.
///
/// - The mandated heading must be present; anything the model emitted before
///   it is stripped, a reply without it is a contract breach.
/// - Blocks are structurally parsed; a malformed block fails the run.
/// - More than twelve blocks are truncated to twelve; fewer than eight are
///   accepted as-is (never padded).
/// - Every source link must trace to the digest, else the run fails with a
///   fabrication error.
fn validate_reply(reply: &str, digest: &ResearchDigest) -> Result<Vec<RecommendationBlock>> {
    let Some(heading_at) = reply.find(REPORT_HEADING) else {
        return Err(PipelineError::GenerationFailure(
            "curator reply missing the report heading".to_string(),
        ));
    };
    let body = &reply[heading_at..];

    let mut blocks = parse_blocks(body).map_err(|msg| {
        PipelineError::GenerationFailure(format!("curator reply malformed: {msg}"))
    })?;

    if blocks.len() > MAX_RECOMMENDATIONS {
        tracing::warn!(
            count = blocks.len(),
            "curator: truncating report to {MAX_RECOMMENDATIONS} recommendations"
        );
        blocks.truncate(MAX_RECOMMENDATIONS);
    }
    if blocks.len() < MIN_RECOMMENDATIONS {
        // Fewer supportable products than the preferred range; accepted
        // as-is, padding with invented entries is forbidden.
        tracing::debug!(
            count = blocks.len(),
            "curator: below the preferred {MIN_RECOMMENDATIONS}-recommendation minimum"
        );
    }

    for block in &blocks {
        if !digest.contains_link(&block.source_link) {
            return Err(PipelineError::Fabrication {
                link: block.source_link.clone(),
            });
        }
    }

    Ok(blocks)
}

// ── Tests ────────────────────────────────────────────────────────────────────
