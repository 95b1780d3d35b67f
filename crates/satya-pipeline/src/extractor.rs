//! Claim extraction

use crate::error::PipelineError;
use crate::parser::{parse_claims, ClaimType, ExtractedClaim};
use crate::prompt::{PromptBuilder, CLAIMS_SCHEMA};
use satya_domain::traits::LlmProvider;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Extracts verifiable claims from English text
pub struct ClaimExtractor<L> {
    llm: Arc<L>,
    max_claims: usize,
}

impl<L> ClaimExtractor<L>
where
    L: LlmProvider,
{
    /// Create an extractor keeping at most `max_claims` claims
    pub fn new(llm: Arc<L>, max_claims: usize) -> Self {
        Self { llm, max_claims }
    }

    /// Extract factual claims, in model order
    ///
    /// Opinion and satire are dropped before the `max_claims` cap applies.
    /// An empty result is not an error.
    pub async fn extract(&self, english_text: &str) -> Result<Vec<ExtractedClaim>, PipelineError> {
        let prompt = PromptBuilder::claim_extraction(english_text);
        debug!("Prompt length: {} chars", prompt.len());

        let response = self
            .llm
            .generate_structured(&prompt, CLAIMS_SCHEMA)
            .await
            .map_err(|e| PipelineError::Llm(format!("Claim extraction: {}", e)))?;
        debug!("LLM response length: {} chars", response.len());

        let candidates = parse_claims(&response)?;
        let total = candidates.len();

        let mut factual: Vec<ExtractedClaim> = candidates
            .into_iter()
            .filter(|claim| claim.claim_type == ClaimType::Factual)
            .collect();
        let filtered = total - factual.len();

        if factual.len() > self.max_claims {
            warn!(
                "Keeping the first {} of {} factual claims",
                self.max_claims,
                factual.len()
            );
            factual.truncate(self.max_claims);
        }

        info!(
            "Extraction complete: {} candidates, {} non-factual dropped, {} kept",
            total,
            filtered,
            factual.len()
        );
        Ok(factual)
    }
}
