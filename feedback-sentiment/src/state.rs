//! Pipeline state and the finalized verdict.

use serde::Serialize;

use crate::error::ClassifierError;
use crate::sentiment::Sentiment;
use crate::stages::Stage;

/// Input as handed to the pipeline, before the preprocessor has run.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Text(String),
    Bytes(Vec<u8>),
}

/// Surface features noted during preprocessing. They never affect the label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextFeatures {
    /// "not" followed by a word
    pub has_negation: bool,
    pub has_exclamation: bool,
    pub has_question: bool,
}

/// The record threaded through every stage.
///
/// Each stage takes it by value and hands back the updated record. Once
/// `complete` is set, only the finalizer may touch the verdict fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisState {
    pub(crate) raw: Option<RawInput>,
    /// Working copy of the feedback, normalized by the preprocessor
    pub text: String,
    pub sentiment: Option<Sentiment>,
    pub confidence: f64,
    pub reasoning: String,
    pub error: Option<String>,
    pub complete: bool,
    pub features: TextFeatures,
}

impl AnalysisState {
    /// Fresh state for a piece of feedback text.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_raw(RawInput::Text(text.into()))
    }

    /// Fresh state for undecoded input.
    pub fn from_bytes(raw: impl Into<Vec<u8>>) -> Self {
        Self::with_raw(RawInput::Bytes(raw.into()))
    }

    fn with_raw(raw: RawInput) -> Self {
        Self {
            raw: Some(raw),
            text: String::new(),
            sentiment: None,
            confidence: 0.0,
            reasoning: String::new(),
            error: None,
            complete: false,
            features: TextFeatures::default(),
        }
    }

    /// True until the preprocessor has consumed the raw input.
    pub fn is_pending(&self) -> bool {
        self.raw.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Working text, or `MissingField` if preprocessing never ran.
    pub(crate) fn normalized_text(&self) -> Result<&str, ClassifierError> {
        if self.is_pending() {
            return Err(ClassifierError::MissingField("text"));
        }
        Ok(&self.text)
    }

    /// Record a final verdict and mark the state complete.
    pub(crate) fn decide(
        &mut self,
        sentiment: Sentiment,
        confidence: f64,
        reasoning: impl Into<String>,
    ) {
        self.sentiment = Some(sentiment);
        self.confidence = confidence;
        self.reasoning = reasoning.into();
        self.complete = true;
    }

    /// Record a stage failure with a stage-specific prefix.
    pub(crate) fn fail(&mut self, prefix: &str, err: &ClassifierError) {
        self.error = Some(format!("{prefix}: {err}"));
    }
}

/// The finalizer's output: always a label and an in-range confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub reasoning: String,
    /// The normalized, possibly truncated text that was analyzed
    pub original_text: String,
    pub error: Option<String>,
    pub features: TextFeatures,
    /// Stages visited, in order
    pub path: Vec<Stage>,
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
