//! Orchestrator for the staged classification pipeline.
//!
//! Each call builds and owns its own `AnalysisState`; compiled rules are
//! shared read-only, so a single classifier can serve many threads.

use feedback_common::config::{ClassifierConfig, DEFAULT_MAX_CHARS};
use rayon::prelude::*;
use std::sync::Arc;

use crate::backend::{ClassificationResult, SentimentBackend};
use crate::error::ClassifierError;
use crate::rules::{self, RuleDefinitions, RuleSet};
use crate::stages::{finalize, keyword, pattern, preprocess, Stage};
use crate::state::{AnalysisState, Verdict};

/// The rule-based sentiment classifier.
#[derive(Debug, Clone)]
pub struct RuleBasedClassifier {
    rules: Result<Arc<RuleSet>, ClassifierError>,
    max_chars: usize,
}

impl Default for RuleBasedClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedClassifier {
    /// Classifier over the built-in rule tables.
    pub fn new() -> Self {
        Self {
            rules: rules::default_rules(),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Classifier over an already compiled rule set.
    pub fn with_rules(rules: RuleSet) -> Self {
        Self {
            rules: Ok(Arc::new(rules)),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Classifier over custom tables.
    ///
    /// A compilation failure is kept, not returned: every later call then
    /// yields the fallback result with the compilation error attached.
    pub fn from_definitions(defs: &RuleDefinitions) -> Self {
        Self {
            rules: RuleSet::compile(defs).map(Arc::new),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Built-in rules with settings from configuration.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new().with_max_chars(config.max_chars)
    }

    /// Override the character cap applied during preprocessing.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Run the pipeline and return the full verdict, including the stage
    /// path and text features.
    ///
    /// Only a pipeline-level failure (unusable rule tables) is an `Err`;
    /// stage failures come back as a fallback verdict.
    pub fn analyze(&self, text: &str) -> Result<Verdict, ClassifierError> {
        let rules = self.rules.as_deref().map_err(Clone::clone)?;
        Ok(self.run(AnalysisState::new(text), rules))
    }

    /// Like [`analyze`](Self::analyze) for input that may not be valid UTF-8.
    pub fn analyze_bytes(&self, raw: &[u8]) -> Result<Verdict, ClassifierError> {
        let rules = self.rules.as_deref().map_err(Clone::clone)?;
        Ok(self.run(AnalysisState::from_bytes(raw), rules))
    }

    /// Classify one piece of feedback. Never fails.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        into_result(self.analyze(text))
    }

    /// Classify raw bytes; invalid UTF-8 yields an unsuccessful NEUTRAL result.
    pub fn classify_bytes(&self, raw: &[u8]) -> ClassificationResult {
        into_result(self.analyze_bytes(raw))
    }

    /// Classify many texts in parallel, preserving input order.
    pub fn classify_batch<S>(&self, texts: &[S]) -> Vec<ClassificationResult>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.classify(text.as_ref()))
            .collect()
    }

    fn run(&self, mut state: AnalysisState, rules: &RuleSet) -> Verdict {
        let span = tracing::debug_span!("sentiment_pipeline");
        let _enter = span.enter();

        let mut stage = Stage::Preprocess;
        let mut path = Vec::with_capacity(4);

        loop {
            path.push(stage);
            state = match stage {
                Stage::Preprocess => preprocess::run(state, self.max_chars),
                Stage::PatternMatch => pattern::run(state, rules),
                Stage::KeywordScore => keyword::run(state, rules),
                Stage::Finalize | Stage::Done => break,
            };
            stage = stage.next(&state);
        }

        let mut verdict = finalize::run(state);
        verdict.path = path;
        verdict
    }
}

fn into_result(outcome: Result<Verdict, ClassifierError>) -> ClassificationResult {
    match outcome {
        Ok(verdict) => verdict.into(),
        Err(e) => {
            tracing::error!(error = %e, "Sentiment rules unavailable");
            ClassificationResult::fallback(e.to_string())
        }
    }
}

impl SentimentBackend for RuleBasedClassifier {
    fn name(&self) -> &str {
        "rule_based"
    }

    fn classify(&self, text: &str) -> ClassificationResult {
        RuleBasedClassifier::classify(self, text)
    }
}
