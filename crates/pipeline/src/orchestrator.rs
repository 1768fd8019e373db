//! Pipeline orchestrator: credential precondition + researcher → curator.

use std::time::Duration;

use giftscout_config::AppConfig;
use giftscout_llm::OpenAiClient;
use giftscout_search::SerpApiClient;

use crate::curator::Curator;
use crate::error::{CredentialKind, PipelineError, Result};
use crate::profile::GiftProfile;
use crate::report::GiftReport;
use crate::researcher::Researcher;

/// Owns the two stages and runs them strictly in sequence.  The curator's
/// no-fabrication check depends on having the complete digest, so the stages
/// never overlap.
pub struct GiftPipeline {
    researcher: Researcher,
    curator: Curator,
}

impl GiftPipeline {
    /// Wire the production capabilities from config.
    ///
    /// Fails fast with [`PipelineError::MissingCredential`] when either key
    /// is absent or blank — neither capability is constructed, let alone
    /// invoked.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let openai_key = config
            .openai_key()
            .ok_or(PipelineError::MissingCredential(CredentialKind::Generation))?;
        let serpapi_key = config
            .serpapi_key()
            .ok_or(PipelineError::MissingCredential(CredentialKind::Search))?;

        let timeout = Duration::from_secs(config.search.timeout_secs);

        let researcher_llm = OpenAiClient::new(
            &config.models.base_url,
            openai_key,
            &config.models.researcher_model,
            timeout,
        )
        .map_err(|e| PipelineError::GenerationFailure(e.to_string()))?;
        let curator_llm = OpenAiClient::new(
            &config.models.base_url,
            openai_key,
            &config.models.curator_model,
            timeout,
        )
        .map_err(|e| PipelineError::GenerationFailure(e.to_string()))?;
        let search = SerpApiClient::new(serpapi_key, timeout)
            .map_err(|e| PipelineError::SearchFailure(e.to_string()))?;

        Ok(Self {
            researcher: Researcher::new(
                Box::new(researcher_llm),
                Box::new(search),
                config.search.max_results,
            ),
            curator: Curator::new(Box::new(curator_llm)),
        })
    }

    /// Assemble a pipeline from pre-built stages.  Used by tests to inject
    /// scripted capabilities.
    pub fn from_parts(researcher: Researcher, curator: Curator) -> Self {
        Self {
            researcher,
            curator,
        }
    }

    /// Run the full pipeline for one profile.  A failure in either stage
    /// propagates unchanged — a failed run yields no report.
    pub async fn run(&self, profile: &GiftProfile) -> Result<GiftReport> {
        profile.validate()?;
        let digest = self.researcher.research(profile).await?;
        let report = self.curator.curate(profile, &digest).await?;
        Ok(report)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{BudgetRange, Interest, Occasion, Relationship};
    use crate::report::{REPORT_HEADING, parse_blocks};
    use anyhow::Result as AnyResult;
    use async_trait::async_trait;
    use giftscout_llm::Generator;
    use giftscout_search::{SearchProvider, SearchResult};

    fn profile() -> GiftProfile {
        GiftProfile {
            age: 30,
            relationship: Relationship::Partner,
            gender: None,
            occasion: Occasion::Anniversary,
            interests: vec![Interest::FoodAndCooking],
            personality: None,
            budget: BudgetRange::From50To100,
            gift_style: None,
            notes: None,
        }
    }

    #[test]
    fn new_fails_fast_without_openai_key() {
        let mut config = AppConfig::default();
        config.credentials.serpapi_api_key = "serp-123".to_string();
        let Err(err) = GiftPipeline::new(&config) else {
            panic!("pipeline constructed without an OpenAI key");
        };
        assert!(matches!(
            err,
            PipelineError::MissingCredential(CredentialKind::Generation)
        ));
    }

    #[test]
    fn new_fails_fast_without_serpapi_key() {
        let mut config = AppConfig::default();
        config.credentials.openai_api_key = "sk-123".to_string();
        let Err(err) = GiftPipeline::new(&config) else {
            panic!("pipeline constructed without a SerpAPI key");
        };
        assert!(matches!(
            err,
            PipelineError::MissingCredential(CredentialKind::Search)
        ));
    }

    #[test]
    fn new_succeeds_with_both_keys() {
        let mut config = AppConfig::default();
        config.credentials.openai_api_key = "sk-123".to_string();
        config.credentials.serpapi_api_key = "serp-123".to_string();
        assert!(GiftPipeline::new(&config).is_ok());
    }

    // ── full run with scripted capabilities ────────────────────────────────

    struct StaticSearch(Vec<SearchResult>);

    #[async_trait]
    impl SearchProvider for StaticSearch {
        async fn search(&self, _query: &str, _max: usize) -> AnyResult<Vec<SearchResult>> {
            Ok(self.0.clone())
        }
    }

    /// Plays the researcher's selection reply on the first call and the
    /// curator's report reply on the second.
    struct TwoStageGenerator {
        selection: String,
        report: String,
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl Generator for TwoStageGenerator {
        async fn generate(&self, _system: &str, _input: &str) -> AnyResult<String> {
            let call = self
                .calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if call == 0 {
                Ok(self.selection.clone())
            } else {
                Ok(self.report.clone())
            }
        }
    }

    #[tokio::test]
    async fn run_sequences_researcher_then_curator() {
        let results: Vec<SearchResult> = (1..=10)
            .map(|i| SearchResult {
                title: format!("Guide {i}"),
                link: format!("https://www.uncommongoods.com/guide-{i}"),
                snippet: "snippet".to_string(),
            })
            .collect();

        // The researcher and curator stages each get their own generator in
        // production (different models); sharing a scripted one here keeps
        // the call order visible.
        let selection = "```json\n{\"picks\": [1,2,3,4,5,6,7,8], \"context\": \"ok\"}\n```";
        let report = format!(
            "{REPORT_HEADING}\n\n### Pasta Maker\n**Description**: Hand-cranked.\n**Why it's a great fit**: They love cooking.\n**Source**: [UncommonGoods](https://www.uncommongoods.com/guide-1)\n"
        );

        let researcher = Researcher::new(
            Box::new(TwoStageGenerator {
                selection: selection.to_string(),
                report: report.clone(),
                calls: std::sync::atomic::AtomicUsize::new(0),
            }),
            Box::new(StaticSearch(results)),
            20,
        );
        let curator = Curator::new(Box::new(TwoStageGenerator {
            selection: report.clone(),
            report: report.clone(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }));

        let pipeline = GiftPipeline::from_parts(researcher, curator);
        let out = pipeline.run(&profile()).await.unwrap();

        assert!(out.as_str().starts_with(REPORT_HEADING));
        let blocks = parse_blocks(out.as_str()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].source_link,
            "https://www.uncommongoods.com/guide-1"
        );
    }

    #[tokio::test]
    async fn run_rejects_invalid_profile_before_any_stage() {
        let mut config = AppConfig::default();
        config.credentials.openai_api_key = "sk-123".to_string();
        config.credentials.serpapi_api_key = "serp-123".to_string();
        let pipeline = GiftPipeline::new(&config).unwrap();

        let mut bad = profile();
        bad.age = 0;
        let err = pipeline.run(&bad).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidProfile(_)));
    }
}
