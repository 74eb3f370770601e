//! Weighted keyword scoring with a blunt negation override.
//!
//! Runs only when the pattern matcher found nothing. Keyword hits are
//! presence-based: a word repeated five times counts once.
//!
//! The override fires on any `"not "` substring and does not parse negation
//! scope, so "not only good but great" still flips to NEGATIVE.

use crate::error::ClassifierError;
use crate::rules::{Keyword, RuleSet};
use crate::sentiment::Sentiment;
use crate::state::AnalysisState;

/// Keyword scoring never claims more certainty than this.
pub const MAX_KEYWORD_CONFIDENCE: f64 = 0.85;

/// Confidence for a NEUTRAL keyword verdict.
pub const NEUTRAL_CONFIDENCE: f64 = 0.5;

/// Keeps the ratio finite when both scores are tiny.
const SMOOTHING: f64 = 0.1;

/// Floor applied when the override flips POSITIVE to NEGATIVE.
const NEGATION_FLIP_FLOOR: f64 = 0.7;

/// Confidence when the override turns a scored NEUTRAL into NEGATIVE.
const NEGATION_NEUTRAL_CONFIDENCE: f64 = 0.6;

/// Summed weights of the keywords present in a text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeywordScores {
    pub positive: f64,
    pub negative: f64,
}

impl KeywordScores {
    /// Score already-lowercased text against both keyword tables.
    pub fn compute(lowered: &str, rules: &RuleSet) -> Self {
        Self {
            positive: sum_present(rules.positive_keywords(), lowered, "positive"),
            negative: sum_present(rules.negative_keywords(), lowered, "negative"),
        }
    }

    /// Label and unrounded confidence before the negation override.
    pub fn verdict(&self) -> (Sentiment, f64) {
        let (pos, neg) = (self.positive, self.negative);
        let total = pos + neg + SMOOTHING;

        if pos > neg && pos > 0.0 {
            (Sentiment::Positive, MAX_KEYWORD_CONFIDENCE.min(pos / total))
        } else if neg > pos && neg > 0.0 {
            (Sentiment::Negative, MAX_KEYWORD_CONFIDENCE.min(neg / total))
        } else {
            (Sentiment::Neutral, NEUTRAL_CONFIDENCE)
        }
    }

    fn any(&self) -> bool {
        self.positive > 0.0 || self.negative > 0.0
    }
}

fn sum_present(keywords: &[Keyword], lowered: &str, polarity: &str) -> f64 {
    keywords
        .iter()
        .filter(|kw| kw.is_present(lowered))
        .inspect(|kw| {
            tracing::debug!(polarity, keyword = kw.word(), weight = kw.weight(), "Keyword hit");
        })
        .fold(0.0, |acc, kw| acc + kw.weight())
}

/// Apply the `"not "` override to a keyword verdict.
pub fn apply_negation_override(
    lowered: &str,
    scores: &KeywordScores,
    sentiment: Sentiment,
    confidence: f64,
) -> (Sentiment, f64) {
    if !lowered.contains("not ") {
        return (sentiment, confidence);
    }

    match sentiment {
        Sentiment::Positive => (Sentiment::Negative, confidence.max(NEGATION_FLIP_FLOOR)),
        Sentiment::Neutral if scores.any() => (Sentiment::Negative, NEGATION_NEUTRAL_CONFIDENCE),
        _ => (sentiment, confidence),
    }
}

/// Round to two decimal places, ties to even on the exact binary value.
///
/// `1.5 / 2.4` lands on 0.625 exactly and rounds down to 0.62.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Run the keyword scorer. Always completes unless entered with an error or
/// an already complete state, which pass through untouched.
pub fn run(mut state: AnalysisState, rules: &RuleSet) -> AnalysisState {
    if state.has_error() || state.complete {
        return state;
    }

    if let Err(e) = score(&mut state, rules) {
        tracing::warn!(error = %e, "Keyword analysis failed");
        state.fail("Keyword analysis error", &e);
    }

    state
}

fn score(state: &mut AnalysisState, rules: &RuleSet) -> Result<(), ClassifierError> {
    let lowered = state.normalized_text()?.to_lowercase();
    let scores = KeywordScores::compute(&lowered, rules);

    if !scores.positive.is_finite() || !scores.negative.is_finite() {
        return Err(ClassifierError::InvalidScore {
            positive: scores.positive,
            negative: scores.negative,
        });
    }

    let (sentiment, confidence) = scores.verdict();
    let (sentiment, confidence) = apply_negation_override(&lowered, &scores, sentiment, confidence);
    let confidence = round2(confidence);

    tracing::info!(%sentiment, confidence, "Keyword analysis");

    let reasoning = format!(
        "Keyword analysis: positive score={:.2}, negative score={:.2}",
        scores.positive, scores.negative
    );
    state.decide(sentiment, confidence, reasoning);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::default_rules;
    use crate::stages::preprocess;

    fn scored(text: &str) -> AnalysisState {
        let rules = default_rules().unwrap();
        run(preprocess::run(AnalysisState::new(text), 1000), &rules)
    }

    #[test]
    fn single_positive_keyword_is_capped() {
        // love = 0.9 → 0.9 / 1.0 capped to 0.85
        let state = scored("I love this store!");
        assert!(state.complete);
        assert_eq!(state.sentiment, Some(Sentiment::Positive));
        assert_eq!(state.confidence, 0.85);
        assert_eq!(
            state.reasoning,
            "Keyword analysis: positive score=0.90, negative score=0.00"
        );
    }

    #[test]
    fn mixed_scores_use_ratio() {
        // fine = 0.5 vs poor = 0.7 → 0.7 / 1.3 = 0.538...
        let state = scored("Delivery was fine, packaging poor");
        assert_eq!(state.sentiment, Some(Sentiment::Negative));
        assert_eq!(state.confidence, 0.54);
    }

    #[test]
    fn multiple_negative_keywords_accumulate() {
        let state = scored("Waste of money, completely useless");
        assert_eq!(state.sentiment, Some(Sentiment::Negative));
        assert_eq!(state.confidence, 0.85);
        assert!(state.reasoning.contains("negative score=1.55"));
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let once = KeywordScores::compute("good", &default_rules().unwrap());
        let many = KeywordScores::compute("good good good good", &default_rules().unwrap());
        assert_eq!(once, many);
        assert_eq!(once.positive, 0.7);
    }

    #[test]
    fn no_keywords_is_neutral() {
        let state = scored("It's okay, nothing special");
        assert_eq!(state.sentiment, Some(Sentiment::Neutral));
        assert_eq!(state.confidence, 0.5);
    }

    #[test]
    fn tie_is_neutral() {
        let scores = KeywordScores {
            positive: 0.7,
            negative: 0.7,
        };
        assert_eq!(scores.verdict(), (Sentiment::Neutral, 0.5));
    }

    #[test]
    fn negation_flips_positive() {
        let state = scored("I am not happy");
        assert_eq!(state.sentiment, Some(Sentiment::Negative));
        assert!(state.confidence >= 0.7);
    }

    #[test]
    fn negation_raises_low_confidence_to_floor() {
        let scores = KeywordScores {
            positive: 0.5,
            negative: 0.45,
        };
        let (label, conf) = scores.verdict();
        assert_eq!(label, Sentiment::Positive);
        assert!(conf < 0.7);

        let (label, conf) = apply_negation_override("not fine", &scores, label, conf);
        assert_eq!(label, Sentiment::Negative);
        assert_eq!(conf, 0.7);
    }

    #[test]
    fn negation_turns_scored_neutral_negative() {
        let scores = KeywordScores {
            positive: 0.7,
            negative: 0.7,
        };
        let out = apply_negation_override("not good or bad", &scores, Sentiment::Neutral, 0.5);
        assert_eq!(out, (Sentiment::Negative, 0.6));
    }

    #[test]
    fn negation_leaves_unscored_neutral() {
        let scores = KeywordScores::default();
        let out = apply_negation_override("not sure", &scores, Sentiment::Neutral, 0.5);
        assert_eq!(out, (Sentiment::Neutral, 0.5));
    }

    #[test]
    fn negation_leaves_negative_alone() {
        let scores = KeywordScores {
            positive: 0.0,
            negative: 0.9,
        };
        let out = apply_negation_override("do not hate", &scores, Sentiment::Negative, 0.82);
        assert_eq!(out, (Sentiment::Negative, 0.82));
    }

    #[test]
    fn completed_state_passes_through() {
        let rules = default_rules().unwrap();
        let mut state = preprocess::run(AnalysisState::new("bad"), 1000);
        state.decide(Sentiment::Positive, 0.9, "earlier stage");

        let out = run(state.clone(), &rules);
        assert_eq!(out, state);
    }

    #[test]
    fn round2_rounds_ties_to_even() {
        assert_eq!(round2(0.625), 0.62);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(0.538_461), 0.54);
        assert_eq!(round2(0.85), 0.85);
        assert_eq!(round2(0.0), 0.0);
    }
}
