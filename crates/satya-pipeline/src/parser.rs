//! Parse LLM output into typed stage results
//!
//! Every structured response is validated against a fixed serde schema; a
//! mismatch is a [`PipelineError::ModelResponse`], never a silent default.

use crate::error::PipelineError;
use satya_domain::{Entity, Stance};
use serde::Deserialize;

/// Category the extractor assigns to a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    /// Checkable statement of fact
    Factual,
    /// Opinion or commentary
    Opinion,
    /// Satire or parody
    Satire,
}

/// One claim as reported by the extraction model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractedClaim {
    /// Self-contained claim statement
    pub claim_text: String,
    /// Claim category
    pub claim_type: ClaimType,
    /// Named entities mentioned by the claim
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// Stance label as reported by the model; `silent` has no domain counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StanceLabel {
    /// Source backs the claim
    Supports,
    /// Source refutes the claim
    Contradicts,
    /// Source has nothing on the claim
    Silent,
}

impl StanceLabel {
    /// Domain stance, or `None` for silence
    pub fn stance(self) -> Option<Stance> {
        match self {
            StanceLabel::Supports => Some(Stance::Supports),
            StanceLabel::Contradicts => Some(Stance::Contradicts),
            StanceLabel::Silent => None,
        }
    }
}

/// One source's answer to a stance query
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StanceResponse {
    /// Position taken
    pub stance: StanceLabel,
    /// What the source says
    #[serde(default)]
    pub relevant_text: String,
    /// Cited article URL
    #[serde(default)]
    pub source_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClaimsPayload {
    Wrapped { claims: Vec<ExtractedClaim> },
    Bare(Vec<ExtractedClaim>),
}

#[derive(Deserialize)]
struct ExplanationResponse {
    explanation: String,
}

/// Parse the claim extraction response
///
/// Accepts `{"claims": [...]}` or a bare array.
pub fn parse_claims(response: &str) -> Result<Vec<ExtractedClaim>, PipelineError> {
    let json_str = extract_json(response)?;
    let payload: ClaimsPayload = serde_json::from_str(&json_str).map_err(|e| {
        PipelineError::ModelResponse(format!("Claims do not match the expected schema: {}", e))
    })?;

    let claims = match payload {
        ClaimsPayload::Wrapped { claims } | ClaimsPayload::Bare(claims) => claims,
    };

    // Opinion and satire items are dropped later, so only factual text must be present
    if let Some(position) = claims
        .iter()
        .position(|c| c.claim_type == ClaimType::Factual && c.claim_text.trim().is_empty())
    {
        return Err(PipelineError::ModelResponse(format!(
            "Claim {} has empty claim_text",
            position + 1
        )));
    }
    Ok(claims)
}

/// Parse a stance query response
pub fn parse_stance(response: &str) -> Result<StanceResponse, PipelineError> {
    let json_str = extract_json(response)?;
    let mut stance: StanceResponse = serde_json::from_str(&json_str).map_err(|e| {
        PipelineError::ModelResponse(format!("Stance does not match the expected schema: {}", e))
    })?;

    stance.relevant_text = stance.relevant_text.trim().to_string();
    stance.source_url = stance
        .source_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());
    Ok(stance)
}

/// Parse an explanation response
pub fn parse_explanation(response: &str) -> Result<String, PipelineError> {
    let json_str = extract_json(response)?;
    let parsed: ExplanationResponse = serde_json::from_str(&json_str).map_err(|e| {
        PipelineError::ModelResponse(format!(
            "Explanation does not match the expected schema: {}",
            e
        ))
    })?;

    let explanation = parsed.explanation.trim();
    if explanation.is_empty() {
        return Err(PipelineError::ModelResponse("Empty explanation".to_string()));
    }
    Ok(explanation.to_string())
}

/// Extract JSON from response, handling markdown code blocks
pub fn extract_json(response: &str) -> Result<String, PipelineError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::ModelResponse("Empty response".to_string()));
    }

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(PipelineError::ModelResponse("Empty code block".to_string()));
        }

        // Skip the opening fence line; drop the closing fence if present
        let body = &lines[1..];
        let body = match body.last() {
            Some(last) if last.trim() == "```" => &body[..body.len() - 1],
            _ => body,
        };
        Ok(body.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}
