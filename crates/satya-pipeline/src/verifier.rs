//! Verification stage: per-source stance queries, aggregation, explanation

use crate::error::PipelineError;
use crate::parser::{parse_explanation, parse_stance, ExtractedClaim};
use crate::prompt::{PromptBuilder, EXPLANATION_SCHEMA, STANCE_SCHEMA};
use futures::stream::{self, StreamExt, TryStreamExt};
use satya_domain::traits::LlmProvider;
use satya_domain::{
    aggregate, ArticleId, Claim, ClaimId, SourceEntry, SourceReference, SourceRegistry, Stance,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Checks claims against every registered source
pub struct SourceVerifier<L> {
    llm: Arc<L>,
    registry: Arc<SourceRegistry>,
    concurrency: usize,
}

impl<L> SourceVerifier<L>
where
    L: LlmProvider,
{
    /// Create a verifier running at most `concurrency` stance queries per claim
    pub fn new(llm: Arc<L>, registry: Arc<SourceRegistry>, concurrency: usize) -> Self {
        Self {
            llm,
            registry,
            concurrency: concurrency.max(1),
        }
    }

    /// Verify one extracted claim
    ///
    /// Stance queries fan out concurrently; results are joined back in
    /// registry order, so the outcome does not depend on completion order.
    pub async fn verify(
        &self,
        article_id: ArticleId,
        index: usize,
        candidate: ExtractedClaim,
    ) -> Result<Claim, PipelineError> {
        let claim_text = candidate.claim_text.trim().to_string();
        debug!("Verifying claim #{}: {}", index, claim_text);

        // Built eagerly so the returned future stays Send
        let queries: Vec<_> = self
            .registry
            .entries()
            .iter()
            .map(|entry| self.query_source(&claim_text, entry))
            .collect();
        let references: Vec<Option<SourceReference>> = stream::iter(queries)
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let (supporting, contradicting): (Vec<SourceReference>, Vec<SourceReference>) = references
            .into_iter()
            .flatten()
            .partition(|reference| reference.stance == Stance::Supports);

        let outcome = aggregate(&supporting, &contradicting);
        info!(
            "Claim #{}: {} ({}%), {} supporting, {} contradicting",
            index,
            outcome.verdict,
            outcome.confidence,
            supporting.len(),
            contradicting.len()
        );

        let prompt = PromptBuilder::explanation(&claim_text, &outcome, &supporting, &contradicting);
        let response = self
            .llm
            .generate_structured(&prompt, EXPLANATION_SCHEMA)
            .await
            .map_err(|e| PipelineError::Llm(format!("Explanation: {}", e)))?;
        let explanation = parse_explanation(&response)?;

        Ok(Claim {
            id: ClaimId::new(),
            article_id,
            index,
            claim_text,
            entities: candidate.entities,
            verdict: outcome.verdict,
            confidence: outcome.confidence,
            explanation,
            supporting_sources: supporting,
            contradicting_sources: contradicting,
        })
    }

    /// Ask one source for its stance; `None` when the source is silent
    async fn query_source(
        &self,
        claim_text: &str,
        entry: &SourceEntry,
    ) -> Result<Option<SourceReference>, PipelineError> {
        let prompt = PromptBuilder::stance(claim_text, entry);
        let response = self
            .llm
            .generate_structured(&prompt, STANCE_SCHEMA)
            .await
            .map_err(|e| PipelineError::Llm(format!("Stance query to {}: {}", entry.name, e)))?;

        let parsed = parse_stance(&response).map_err(|e| match e {
            PipelineError::ModelResponse(msg) => {
                PipelineError::ModelResponse(format!("{}: {}", entry.name, msg))
            }
            other => other,
        })?;

        let Some(stance) = parsed.stance.stance() else {
            return Ok(None);
        };

        let credibility_score = self
            .registry
            .credibility(&entry.name)
            .map_err(|e| PipelineError::UnknownSource(e.to_string()))?;

        if let Some(url) = &parsed.source_url {
            debug!(
                source = %entry.name,
                url = %url,
                url_credibility = self.registry.credibility_for_url(url),
                "Model cited a URL"
            );
        }

        Ok(Some(SourceReference {
            source_name: entry.name.clone(),
            source_url: parsed.source_url,
            credibility_score,
            relevant_text: parsed.relevant_text,
            stance,
        }))
    }
}
