//! Verdict aggregation
//!
//! Reduces per-source stances to one verdict and confidence per claim with a
//! credibility-weighted majority, and synthesises an overall assessment over
//! all claims of an article. Everything here is a pure function of its
//! inputs.

use crate::{Claim, SourceReference, Verdict};

/// Confidence reported when no source took a position
pub const UNVERIFIED_CONFIDENCE: u8 = 20;

/// Share of total weight one side needs to decide the verdict
pub const DOMINANCE_SHARE: f64 = 0.65;

/// Minimum confidence of a TRUE or FALSE verdict
pub const MIN_DOMINANT_CONFIDENCE: u8 = 60;

/// Confidence of a MISLEADING verdict with perfectly balanced weights
pub const MISLEADING_BASE_CONFIDENCE: u8 = 15;

/// Overall assessment when extraction found nothing to check
pub const NO_CLAIMS_ASSESSMENT: &str = "No verifiable factual claims were found in this content.";

/// Verdict, confidence, and the weights they were derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    /// Categorical verdict
    pub verdict: Verdict,
    /// Confidence [0, 100]
    pub confidence: u8,
    /// Sum of credibility over supporting sources
    pub support_weight: u32,
    /// Sum of credibility over contradicting sources
    pub contradict_weight: u32,
}

/// Sum of credibility scores
pub fn weight(sources: &[SourceReference]) -> u32 {
    sources.iter().map(|s| u32::from(s.credibility_score)).sum()
}

/// Aggregate supporting and contradicting evidence into a verdict
///
/// Policy:
/// 1. No weight on either side: UNVERIFIED at [`UNVERIFIED_CONFIDENCE`].
/// 2. Support share at least [`DOMINANCE_SHARE`]: TRUE, confidence is the
///    share as a percentage, floored at [`MIN_DOMINANT_CONFIDENCE`].
/// 3. Contradict share at least [`DOMINANCE_SHARE`]: FALSE, symmetric.
/// 4. Otherwise MISLEADING, confidence grows with the gap between the sides
///    from [`MISLEADING_BASE_CONFIDENCE`].
///
/// # Examples
///
/// ```
/// use satya_domain::{aggregate, SourceReference, Stance, Verdict};
///
/// let pib = SourceReference {
///     source_name: "PIB Fact Check".to_string(),
///     source_url: None,
///     credibility_score: 95,
///     relevant_text: "Confirmed by the ministry".to_string(),
///     stance: Stance::Supports,
/// };
/// let result = aggregate(&[pib], &[]);
/// assert_eq!(result.verdict, Verdict::True);
/// assert!(result.confidence > 50);
/// ```
pub fn aggregate(supporting: &[SourceReference], contradicting: &[SourceReference]) -> Aggregate {
    let support_weight = weight(supporting);
    let contradict_weight = weight(contradicting);
    let (verdict, confidence) = decide(support_weight, contradict_weight);

    Aggregate {
        verdict,
        confidence,
        support_weight,
        contradict_weight,
    }
}

/// Verdict and confidence from raw weights
pub fn decide(support_weight: u32, contradict_weight: u32) -> (Verdict, u8) {
    let total = support_weight + contradict_weight;
    if total == 0 {
        return (Verdict::Unverified, UNVERIFIED_CONFIDENCE);
    }

    let total = f64::from(total);
    let support_share = f64::from(support_weight) / total;
    let contradict_share = f64::from(contradict_weight) / total;

    if support_share >= DOMINANCE_SHARE {
        (Verdict::True, dominant_confidence(support_share))
    } else if contradict_share >= DOMINANCE_SHARE {
        (Verdict::False, dominant_confidence(contradict_share))
    } else {
        let gap = (support_share - contradict_share).abs();
        let confidence = f64::from(MISLEADING_BASE_CONFIDENCE) + (gap * 100.0).round();
        (Verdict::Misleading, to_percent(confidence))
    }
}

fn dominant_confidence(share: f64) -> u8 {
    to_percent((share * 100.0).round()).max(MIN_DOMINANT_CONFIDENCE)
}

fn to_percent(value: f64) -> u8 {
    value.clamp(0.0, 100.0) as u8
}

/// One-sentence synthesis across all claim verdicts
///
/// Any FALSE or MISLEADING claim flags the content as misinformation; a
/// FALSE majority is called out more strongly. Without misinformation the
/// content is largely factual when most claims are TRUE, otherwise
/// unverifiable.
pub fn overall_assessment(claims: &[Claim]) -> String {
    overall_assessment_for(claims.iter().map(|c| c.verdict))
}

/// [`overall_assessment`] over bare verdicts
pub fn overall_assessment_for(verdicts: impl IntoIterator<Item = Verdict>) -> String {
    let verdicts: Vec<Verdict> = verdicts.into_iter().collect();
    if verdicts.is_empty() {
        return NO_CLAIMS_ASSESSMENT.to_string();
    }

    let total = verdicts.len();
    let count = |wanted: Verdict| verdicts.iter().filter(|v| **v == wanted).count();
    let false_count = count(Verdict::False);
    let true_count = count(Verdict::True);

    let text = if false_count * 2 > total {
        "This content contains multiple false claims and is likely misinformation."
    } else if verdicts.iter().any(Verdict::is_misinformation) {
        "This content contains misleading or false information."
    } else if true_count * 2 > total {
        "This content appears to be largely factual based on available evidence."
    } else {
        "Unable to fully verify this content. Some claims lack sufficient evidence."
    };
    text.to_string()
}
