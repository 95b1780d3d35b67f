//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in `satya-llm` and `satya-store`.

use crate::{StoredVerification, VerificationStats};
use async_trait::async_trait;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (satya-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a free-text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate output constrained to JSON (if the backend supports it)
    ///
    /// `schema` is a human-readable description of the expected shape; the
    /// caller still validates the response.
    async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}

/// Trait for optical character recognition
///
/// Implemented by the infrastructure layer (satya-llm), usually by a
/// vision-capable model.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Error type for OCR operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extract all visible text from raw image bytes
    async fn extract_text(&self, image: &[u8]) -> Result<String, Self::Error>;
}

/// Trait for the append-only verification document store
///
/// Implemented by the infrastructure layer (satya-store). Methods take
/// `&self`: implementations must be safe under concurrent inserts.
pub trait DocumentStore: Send + Sync {
    /// Error type for store operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert one verification document; never overwrites
    fn insert(&self, document: &StoredVerification) -> Result<(), Self::Error>;

    /// Most recent documents, newest first
    fn list_recent(&self, limit: usize) -> Result<Vec<StoredVerification>, Self::Error>;

    /// Totals and per-verdict claim counts
    fn aggregate_counts(&self) -> Result<VerificationStats, Self::Error>;
}
