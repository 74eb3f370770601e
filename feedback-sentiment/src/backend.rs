//! Public result type and the backend seam.
//!
//! Alternate classifiers plug in behind `SentimentBackend`. The rule-based
//! pipeline is the default and reference implementation.

use serde::{Deserialize, Serialize};

use crate::sentiment::Sentiment;
use crate::stages::finalize::FALLBACK_CONFIDENCE;
use crate::state::Verdict;

/// What callers get back from `classify`.
///
/// NEUTRAL is both a genuine verdict and the failure fallback; check
/// `success` (or `error`) to tell them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub sentiment: Sentiment,
    /// In `[0, 1]`, two decimal places
    pub confidence: f64,
    pub reasoning: String,
    pub success: bool,
    /// Empty when `success` is true
    pub error: String,
}

impl ClassificationResult {
    /// NEUTRAL/0.5 result for a failure outside the stages.
    pub fn fallback(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            sentiment: Sentiment::Neutral,
            confidence: FALLBACK_CONFIDENCE,
            reasoning: format!("Analysis failed: {error}"),
            success: false,
            error,
        }
    }
}

impl From<Verdict> for ClassificationResult {
    fn from(verdict: Verdict) -> Self {
        let error = verdict.error.unwrap_or_default();
        Self {
            sentiment: verdict.sentiment,
            confidence: verdict.confidence,
            reasoning: verdict.reasoning,
            success: error.is_empty(),
            error,
        }
    }
}

/// A sentiment classifier behind the `classify` contract.
///
/// Implementations must never panic on any input and must always return a
/// label with a confidence in `[0, 1]`.
pub trait SentimentBackend: Send + Sync {
    /// Backend name (e.g., "rule_based").
    fn name(&self) -> &str;

    /// Classify one piece of feedback.
    fn classify(&self, text: &str) -> ClassificationResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBackend;

    impl SentimentBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn classify(&self, _text: &str) -> ClassificationResult {
            ClassificationResult {
                sentiment: Sentiment::Positive,
                confidence: 1.0,
                reasoning: "always positive".into(),
                success: true,
                error: String::new(),
            }
        }
    }

    #[test]
    fn backends_are_object_safe() {
        let backend: Box<dyn SentimentBackend> = Box::new(FixedBackend);
        assert_eq!(backend.name(), "fixed");
        assert_eq!(backend.classify("x").sentiment, Sentiment::Positive);
    }

    #[test]
    fn fallback_shape() {
        let result = ClassificationResult::fallback("rules unavailable");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.reasoning, "Analysis failed: rules unavailable");
        assert!(!result.success);
        assert_eq!(result.error, "rules unavailable");
    }

    #[test]
    fn serializes_to_wire_shape() {
        let result = ClassificationResult {
            sentiment: Sentiment::Negative,
            confidence: 0.95,
            reasoning: "r".into(),
            success: true,
            error: String::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["sentiment"], "NEGATIVE");
        assert_eq!(json["confidence"], 0.95);
        assert_eq!(json["success"], true);
        assert_eq!(json["error"], "");
    }
}
