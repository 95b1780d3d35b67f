//! End-to-end orchestration of one verification

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::extractor::ClaimExtractor;
use crate::fetch::ContentFetcher;
use crate::language::LanguageStage;
use crate::normalizer::InputNormalizer;
use crate::types::{SourceSummary, VerificationReport, VerificationRequest};
use crate::verifier::SourceVerifier;
use chrono::Utc;
use satya_domain::traits::{DocumentStore, LlmProvider, OcrProvider};
use satya_domain::{
    overall_assessment, Article, ArticleId, SourceRegistry, StoredVerification,
    VerificationResult, VerificationStats,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// History entries returned when the caller does not ask for a number
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Upper bound on history entries per request
pub const MAX_HISTORY_LIMIT: usize = 100;

/// The verification pipeline
///
/// Stages run strictly in order for one request: normalize, detect and
/// translate, extract, verify each claim, aggregate, persist. Any stage
/// failure aborts the request. A persistence failure does not: the result is
/// returned with `persistence_error` set.
pub struct VerificationPipeline<L, S>
where
    L: LlmProvider + OcrProvider,
    S: DocumentStore,
{
    llm: Arc<L>,
    store: Arc<S>,
    fetcher: Arc<dyn ContentFetcher>,
    registry: Arc<SourceRegistry>,
    config: PipelineConfig,
    normalizer: InputNormalizer,
    language: LanguageStage<L>,
    extractor: ClaimExtractor<L>,
    verifier: SourceVerifier<L>,
}

impl<L, S> VerificationPipeline<L, S>
where
    L: LlmProvider + OcrProvider + 'static,
    S: DocumentStore + 'static,
{
    /// Create a new pipeline
    pub fn new(
        llm: L,
        store: S,
        fetcher: Arc<dyn ContentFetcher>,
        registry: SourceRegistry,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        let llm = Arc::new(llm);
        let registry = Arc::new(registry);
        let normalizer = InputNormalizer::new(config.min_content_chars, config.max_content_chars)
            .map_err(|e| PipelineError::Config(format!("Markup patterns: {}", e)))?;

        Ok(Self {
            language: LanguageStage::new(Arc::clone(&llm), config.detection_sample_chars),
            extractor: ClaimExtractor::new(Arc::clone(&llm), config.max_claims),
            verifier: SourceVerifier::new(
                Arc::clone(&llm),
                Arc::clone(&registry),
                config.max_concurrent_source_queries,
            ),
            llm,
            store: Arc::new(store),
            fetcher,
            registry,
            config,
            normalizer,
        })
    }

    /// Run one verification end to end
    pub async fn verify(
        &self,
        request: VerificationRequest,
    ) -> Result<VerificationReport, PipelineError> {
        let start_time = Instant::now();
        info!(input_type = %request.input_type, "Received verification request");

        let normalized = self
            .normalizer
            .normalize(&request, self.fetcher.as_ref(), self.llm.as_ref())
            .await?;
        let language = self.language.process(&normalized.text).await?;

        let article = Article {
            id: ArticleId::new(),
            input_type: request.input_type,
            content: normalized.content,
            detected_language: language.language,
            original_text: normalized.text,
            english_text: language.english_text,
            created_at: Utc::now(),
        };

        let candidates = self.extractor.extract(&article.english_text).await?;
        info!(article_id = %article.id, "Verifying {} claims", candidates.len());

        let mut claims = Vec::with_capacity(candidates.len());
        for (position, candidate) in candidates.into_iter().enumerate() {
            claims.push(self.verifier.verify(article.id, position + 1, candidate).await?);
        }

        let result = VerificationResult {
            article_id: article.id,
            detected_language: article.detected_language,
            original_text: excerpt(&article.original_text, self.config.excerpt_chars),
            overall_assessment: overall_assessment(&claims),
            claims,
            timestamp: Utc::now(),
        };

        info!(
            article_id = %article.id,
            claims = result.claims.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Verification complete. Overall: {}",
            result.overall_assessment
        );

        let document = StoredVerification {
            article,
            result: result.clone(),
        };
        let persistence_error = match self.persist(document).await {
            Ok(()) => None,
            Err(e) => {
                warn!(
                    article_id = %result.article_id,
                    error = %e,
                    "Failed to persist verification"
                );
                Some(e.to_string())
            }
        };

        Ok(VerificationReport {
            result,
            persistence_error,
        })
    }

    /// Most recent verifications, newest first (at most [`MAX_HISTORY_LIMIT`])
    pub async fn history(&self, limit: usize) -> Result<Vec<StoredVerification>, PipelineError> {
        let limit = limit.min(MAX_HISTORY_LIMIT);
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.list_recent(limit))
            .await
            .map_err(|e| PipelineError::Persistence(format!("Task join error: {}", e)))?
            .map_err(|e| PipelineError::Persistence(e.to_string()))
    }

    /// Totals and per-verdict counts over everything stored
    pub async fn stats(&self) -> Result<VerificationStats, PipelineError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.aggregate_counts())
            .await
            .map_err(|e| PipelineError::Persistence(format!("Task join error: {}", e)))?
            .map_err(|e| PipelineError::Persistence(e.to_string()))
    }

    /// Registered sources, most credible first
    pub fn sources(&self) -> Vec<SourceSummary> {
        self.registry
            .sorted_by_credibility()
            .into_iter()
            .map(SourceSummary::from)
            .collect()
    }

    /// The source registry in use
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// The active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The underlying document store
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn persist(&self, document: StoredVerification) -> Result<(), PipelineError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.insert(&document))
            .await
            .map_err(|e| PipelineError::Persistence(format!("Task join error: {}", e)))?
            .map_err(|e| PipelineError::Persistence(e.to_string()))
    }
}

/// First `max_chars` characters of `text`, with `...` appended when truncated
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
