//! Satya Domain Layer
//!
//! Core data model and pure business logic for the fact-checking service.
//! Infrastructure (LLM providers, storage, HTTP) lives in other crates and
//! plugs in through the traits defined in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Article**: one submission (text, URL, or image) and its normalized text
//! - **Claim**: a verifiable assertion extracted from an article, with a verdict
//! - **SourceReference**: a trusted source's stance on a claim, with the
//!   credibility score copied in at verification time
//! - **SourceRegistry**: the fixed table of trusted sources
//! - **Aggregation**: credibility-weighted verdict policy
//!
//! ## Architecture
//!
//! - Pure data and deterministic computation only
//! - No I/O; every external interaction is a trait

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregation;
pub mod article;
pub mod claim;
pub mod language;
pub mod registry;
pub mod source;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use aggregation::{
    aggregate, overall_assessment, overall_assessment_for, Aggregate, NO_CLAIMS_ASSESSMENT,
};
pub use article::{Article, ArticleId, InputType};
pub use claim::{Claim, ClaimId, Entity};
pub use language::Language;
pub use registry::{
    reputation, RegistryError, SourceCategory, SourceEntry, SourceRegistry, DEFAULT_URL_CREDIBILITY,
};
pub use source::{SourceReference, Stance};
pub use verdict::{
    StoredVerification, Verdict, VerdictCounts, VerificationResult, VerificationStats,
};
