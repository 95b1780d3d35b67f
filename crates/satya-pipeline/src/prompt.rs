//! LLM prompt engineering for each pipeline stage

use satya_domain::{Aggregate, Language, SourceEntry, SourceReference};

/// Shape hint passed to `generate_structured` for claim extraction
pub const CLAIMS_SCHEMA: &str =
    r#"{"claims": [{"claim_text": string, "claim_type": "factual"|"opinion"|"satire", "entities": [{"type": string, "value": string}]}]}"#;

/// Shape hint passed to `generate_structured` for stance queries
pub const STANCE_SCHEMA: &str =
    r#"{"stance": "supports"|"contradicts"|"silent", "relevant_text": string, "source_url": string|null}"#;

/// Shape hint passed to `generate_structured` for explanations
pub const EXPLANATION_SCHEMA: &str = r#"{"explanation": string}"#;

/// Builds prompts for every LLM call the pipeline makes
pub struct PromptBuilder;

impl PromptBuilder {
    /// Language identification over a leading sample of the text
    pub fn language_detection(sample: &str) -> String {
        let names: Vec<&str> = Language::SINGLE.iter().map(|l| l.name()).collect();
        format!(
            "{}\nRespond with ONLY the language name ({}, or Mixed).\n\nText: {}",
            DETECTION_INSTRUCTIONS,
            names.join(", "),
            sample
        )
    }

    /// Translation of the whole text into English
    pub fn translation(text: &str, language: Language) -> String {
        format!(
            "Translate the following {} text to English. {}\n\nText: {}",
            language.name(),
            TRANSLATION_INSTRUCTIONS,
            text
        )
    }

    /// Claim extraction over the English text
    pub fn claim_extraction(text: &str) -> String {
        let mut prompt = String::new();
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nText:\n---\n");
        prompt.push_str(text);
        prompt.push_str("\n---\n\n");
        prompt.push_str(EXTRACTION_FORMAT_REMINDER);
        prompt
    }

    /// Stance of one trusted source on one claim
    ///
    /// `Claim:` and `Source:` sit on adjacent lines so a claim/source pair is
    /// identifiable from the prompt alone.
    pub fn stance(claim_text: &str, source: &SourceEntry) -> String {
        let mut prompt = String::new();
        prompt.push_str(STANCE_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(&format!("Claim: {}\n", claim_text));
        prompt.push_str(&format!("Source: {} ({})\n", source.name, source.domain));
        if !source.specializations.is_empty() {
            prompt.push_str(&format!(
                "Source coverage: {}\n",
                source.specializations.join(", ")
            ));
        }
        prompt.push('\n');
        prompt.push_str(STANCE_FORMAT_REMINDER);
        prompt
    }

    /// Explanation of a verdict that has already been decided
    pub fn explanation(
        claim_text: &str,
        aggregate: &Aggregate,
        supporting: &[SourceReference],
        contradicting: &[SourceReference],
    ) -> String {
        let mut prompt = String::new();
        prompt.push_str(EXPLANATION_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(&format!("Claim: {}\n", claim_text));
        prompt.push_str(&format!(
            "Verdict: {} (confidence {}%)\n\n",
            aggregate.verdict, aggregate.confidence
        ));
        push_evidence(&mut prompt, "Supporting evidence", supporting);
        push_evidence(&mut prompt, "Contradicting evidence", contradicting);
        prompt.push_str(EXPLANATION_FORMAT_REMINDER);
        prompt
    }
}

fn push_evidence(prompt: &mut String, heading: &str, evidence: &[SourceReference]) {
    prompt.push_str(heading);
    prompt.push_str(":\n");
    if evidence.is_empty() {
        prompt.push_str("- None\n");
    }
    for reference in evidence {
        prompt.push_str(&format!(
            "- {} [credibility {}]: {}\n",
            reference.source_name, reference.credibility_score, reference.relevant_text
        ));
    }
    prompt.push('\n');
}

const DETECTION_INSTRUCTIONS: &str =
    "Identify the primary language of this text. It is news content from India.";

const TRANSLATION_INSTRUCTIONS: &str =
    "Maintain the meaning and context accurately. Keep names, numbers and dates unchanged. \
Return ONLY the translated text.";

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract all factual claims from this text that can be verified. Ignore opinions and satire.

For each claim, provide:
1. The claim text, as a self-contained statement in English
2. Claim type ('factual', 'opinion', or 'satire')
3. Key entities mentioned (people, places, organizations, dates)

List claims in the order they appear in the text."#;

const EXTRACTION_FORMAT_REMINDER: &str = r#"Output format (JSON only, no additional text):
{
  "claims": [
    {
      "claim_text": "specific factual statement",
      "claim_type": "factual",
      "entities": [{"type": "person", "value": "Name"}]
    }
  ]
}

If the text contains no verifiable claims, return {"claims": []}.
Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

const STANCE_INSTRUCTIONS: &str = r#"You are a fact-checking research assistant with knowledge of Indian news and fact-check databases.
Based on what the named source has published, decide whether it supports the claim, contradicts it, or has said nothing about it.

Rules:
- Answer "silent" unless you know of specific coverage by this source
- "relevant_text" summarises what the source says, in one or two sentences
- "source_url" is the article URL if you know it, otherwise null"#;

const STANCE_FORMAT_REMINDER: &str = r#"Output format (JSON only, no additional text):
{"stance": "supports" | "contradicts" | "silent", "relevant_text": "Key findings about the claim", "source_url": null}"#;

const EXPLANATION_INSTRUCTIONS: &str = r#"You are an expert fact-checker. The verdict below was computed from the credibility-weighted evidence and is final.
Write a clear explanation of the verdict in 2-3 sentences for a general reader. Do not contradict the verdict or change the confidence."#;

const EXPLANATION_FORMAT_REMINDER: &str = r#"Output format (JSON only, no additional text):
{"explanation": "Clear explanation in 2-3 sentences"}"#;
