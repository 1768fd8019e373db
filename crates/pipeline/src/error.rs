//! Error taxonomy for the pipeline.
//!
//! The capability adapters (`giftscout-llm`, `giftscout-search`) return
//! `anyhow::Result` internally; the stages map their failures into this
//! typed taxonomy at the stage boundary.  A failed run yields no report —
//! errors are never downgraded into partial results.

use std::fmt;

/// Which credential a [`PipelineError::MissingCredential`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// The generation-provider key (OpenAI-compatible API).
    Generation,
    /// The search-provider key (SerpAPI).
    Search,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation => write!(f, "OpenAI API key"),
            Self::Search => write!(f, "SerpAPI key"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required credential was absent before either capability was touched.
    #[error("missing credential: {0}")]
    MissingCredential(CredentialKind),

    /// The supplied profile failed validation (e.g. zero age).
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// The search capability call failed.  Zero results is *not* a failure;
    /// it produces an empty digest instead.
    #[error("search failure: {0}")]
    SearchFailure(String),

    /// A generation call failed, or its reply broke the stage contract
    /// (e.g. the curator omitted the mandated report heading).
    #[error("generation failure: {0}")]
    GenerationFailure(String),

    /// The curator emitted a recommendation whose source link cannot be
    /// traced to the research digest.
    #[error("fabricated source link not present in research digest: {link}")]
    Fabrication { link: String },
}

/// Convenience alias used throughout the pipeline crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_credential() {
        let err = PipelineError::MissingCredential(CredentialKind::Search);
        assert_eq!(err.to_string(), "missing credential: SerpAPI key");
    }

    #[test]
    fn fabrication_names_the_link() {
        let err = PipelineError::Fabrication {
            link: "https://example.com/made-up".to_string(),
        };
        assert!(err.to_string().contains("https://example.com/made-up"));
    }
}
