//! Satya Verification Pipeline
//!
//! Turns a submission (text, URL, or image) into a verdict per claim.
//!
//! # Architecture
//!
//! ```text
//! Request → Normalizer → Language → Extractor → Verifier (per claim) → Aggregate → DocumentStore
//!              │             │           │            │
//!         fetch / OCR   detect +     LLM claims   one stance query per
//!                       translate                  registered source
//! ```
//!
//! # Key Features
//!
//! - **Input Normalization**: raw text, fetched and stripped web pages, OCR'd images
//! - **Translation**: regional-language content is verified in English
//! - **Strict Model Boundary**: every structured LLM answer is schema-checked
//! - **Bounded Fan-out**: stance queries for one claim run concurrently and
//!   are joined in registry order
//! - **Best-effort Persistence**: a store failure never loses the result
//!
//! # Example Usage
//!
//! ```no_run
//! use satya_domain::SourceRegistry;
//! use satya_llm::MockProvider;
//! use satya_pipeline::{PipelineConfig, VerificationPipeline, VerificationRequest, WebFetcher};
//! use satya_store::SqliteStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = VerificationPipeline::new(
//!     MockProvider::new("English"),
//!     SqliteStore::new(":memory:")?,
//!     Arc::new(WebFetcher::new()?),
//!     SourceRegistry::builtin(),
//!     PipelineConfig::default(),
//! )?;
//!
//! let report = pipeline
//!     .verify(VerificationRequest::text("The RBI kept the repo rate at 6.5% in June."))
//!     .await?;
//!
//! println!("{}", report.result.overall_assessment);
//! for claim in &report.result.claims {
//!     println!("{}: {} ({}%)", claim.label(), claim.verdict, claim.confidence);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod fetch;
mod language;
mod normalizer;
mod parser;
mod pipeline;
mod prompt;
mod types;
mod verifier;

#[cfg(test)]
mod tests;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use extractor::ClaimExtractor;
pub use fetch::{ContentFetcher, FetchError, FetchedPage, WebFetcher, DEFAULT_FETCH_TIMEOUT_SECS};
pub use language::LanguageStage;
pub use normalizer::{decode_image, InputNormalizer, MarkupStripper};
pub use parser::{ClaimType, ExtractedClaim, StanceLabel, StanceResponse};
pub use pipeline::{excerpt, VerificationPipeline, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
pub use types::{
    LanguageOutcome, NormalizedInput, SourceSummary, VerificationReport, VerificationRequest,
};
pub use verifier::SourceVerifier;
