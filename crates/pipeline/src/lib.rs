//! Two-stage gift-recommendation pipeline: researcher → curator.
//!
//! The researcher turns a [`GiftProfile`] into one focused search query,
//! runs it through the search capability, and curates the hits into a
//! [`ResearchDigest`].  The curator turns the profile plus the digest into
//! a formatted [`GiftReport`] whose every recommendation is traceable to a
//! digest link.  [`GiftPipeline`] sequences the two stages and enforces the
//! credential precondition up front.

pub mod curator;
pub mod digest;
pub mod error;
pub mod orchestrator;
pub mod profile;
pub mod report;
pub mod researcher;

pub use curator::Curator;
pub use digest::{DigestEntry, ResearchDigest};
pub use error::{CredentialKind, PipelineError, Result};
pub use orchestrator::GiftPipeline;
pub use profile::{
    BudgetRange, Gender, GiftProfile, GiftStyle, Interest, Occasion, Personality, Relationship,
};
pub use report::{GiftReport, REPORT_HEADING, RecommendationBlock};
pub use researcher::{Researcher, build_query};
