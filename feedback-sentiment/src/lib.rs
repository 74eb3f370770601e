//! Feedback Sentiment - rule-based sentiment classification for short feedback.
//!
//! Text runs through a fixed sequence of stages:
//! - Preprocess: trim, collapse whitespace, cap at 1000 characters
//! - Pattern match: negation rules, then canonical phrases (first hit wins)
//! - Keyword score: weighted keyword tables plus a `"not "` override
//! - Finalize: always produces a label with a confidence in `[0, 1]`
//!
//! `classify` never fails. Anything that goes wrong inside becomes a
//! NEUTRAL/0.5 result with `success == false` and a non-empty `error`.
//!
//! ## Example
//!
//! ```
//! use feedback_sentiment::{classify, Sentiment};
//!
//! let result = classify("The product is not good at all");
//! assert_eq!(result.sentiment, Sentiment::Negative);
//! assert!(result.success);
//! ```

#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod pipeline;
pub mod rules;
pub mod sentiment;
pub mod stages;
pub mod state;

use std::sync::LazyLock;

pub use backend::{ClassificationResult, SentimentBackend};
pub use error::ClassifierError;
pub use pipeline::RuleBasedClassifier;
pub use rules::{RuleDef, RuleDefinitions, RuleSet};
pub use sentiment::Sentiment;
pub use stages::Stage;
pub use state::{AnalysisState, TextFeatures, Verdict};

static DEFAULT_CLASSIFIER: LazyLock<RuleBasedClassifier> = LazyLock::new(RuleBasedClassifier::new);

/// Classify feedback text with the built-in rules.
pub fn classify(text: &str) -> ClassificationResult {
    DEFAULT_CLASSIFIER.classify(text)
}

/// Classify raw, possibly non-UTF-8 input with the built-in rules.
pub fn classify_bytes(raw: &[u8]) -> ClassificationResult {
    DEFAULT_CLASSIFIER.classify_bytes(raw)
}
