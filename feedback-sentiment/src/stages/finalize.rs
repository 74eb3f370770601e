//! Safety net: turns any state into a well-formed verdict.

use crate::error::ClassifierError;
use crate::sentiment::Sentiment;
use crate::state::{AnalysisState, TextFeatures, Verdict};

/// Confidence of every fallback verdict.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Reasoning used when no stage reached a verdict.
pub const UNDETERMINED_REASONING: &str = "Analysis could not determine sentiment";

/// Run the finalizer. Accepts any state and always yields a label with a
/// confidence in `[0, 1]`.
pub fn run(state: AnalysisState) -> Verdict {
    let AnalysisState {
        text,
        sentiment,
        confidence,
        reasoning,
        error,
        complete,
        features,
        ..
    } = state;

    if let Some(error) = error {
        tracing::warn!(%error, "Falling back after stage error");
        let reasoning = format!("Analysis failed: {error}");
        return fallback(text, features, reasoning, Some(error));
    }

    if !complete {
        tracing::warn!("Pipeline ended without a verdict");
        return fallback(
            text,
            features,
            UNDETERMINED_REASONING.to_string(),
            None,
        );
    }

    match checked(sentiment, confidence) {
        Ok(sentiment) => {
            tracing::info!(%sentiment, confidence, "Final result");
            Verdict {
                sentiment,
                confidence,
                reasoning,
                original_text: text,
                error: None,
                features,
                path: Vec::new(),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Finalization failed");
            fallback(
                text,
                features,
                format!("Finalization error: {e}"),
                Some(e.to_string()),
            )
        }
    }
}

fn fallback(
    text: String,
    features: TextFeatures,
    reasoning: String,
    error: Option<String>,
) -> Verdict {
    Verdict {
        sentiment: Sentiment::Neutral,
        confidence: FALLBACK_CONFIDENCE,
        reasoning,
        original_text: text,
        error,
        features,
        path: Vec::new(),
    }
}

fn checked(sentiment: Option<Sentiment>, confidence: f64) -> Result<Sentiment, ClassifierError> {
    let sentiment = sentiment.ok_or_else(|| {
        ClassifierError::InvalidState("complete state has no sentiment".into())
    })?;

    if !(0.0..=1.0).contains(&confidence) {
        return Err(ClassifierError::InvalidState(format!(
            "confidence {confidence} outside [0, 1]"
        )));
    }

    Ok(sentiment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::preprocess;

    fn prepared(text: &str) -> AnalysisState {
        preprocess::run(AnalysisState::new(text), 1000)
    }

    #[test]
    fn passes_through_completed_verdict() {
        let mut state = prepared("  very   good ");
        state.decide(Sentiment::Positive, 0.9, "phrase");

        let verdict = run(state);
        assert_eq!(verdict.sentiment, Sentiment::Positive);
        assert_eq!(verdict.confidence, 0.9);
        assert_eq!(verdict.reasoning, "phrase");
        assert_eq!(verdict.original_text, "very good");
        assert!(verdict.is_success());
    }

    #[test]
    fn error_forces_neutral_fallback() {
        let mut state = prepared("whatever");
        state.decide(Sentiment::Negative, 0.95, "ignored");
        state.error = Some("Keyword analysis error: boom".into());

        let verdict = run(state);
        assert_eq!(verdict.sentiment, Sentiment::Neutral);
        assert_eq!(verdict.confidence, 0.5);
        assert_eq!(
            verdict.reasoning,
            "Analysis failed: Keyword analysis error: boom"
        );
        assert_eq!(verdict.error.as_deref(), Some("Keyword analysis error: boom"));
        assert_eq!(verdict.original_text, "whatever");
    }

    #[test]
    fn incomplete_state_gets_distinct_reasoning() {
        let verdict = run(prepared("anything"));
        assert_eq!(verdict.sentiment, Sentiment::Neutral);
        assert_eq!(verdict.confidence, 0.5);
        assert_eq!(verdict.reasoning, UNDETERMINED_REASONING);
        assert_eq!(verdict.original_text, "anything");
        assert!(verdict.is_success());
    }

    #[test]
    fn out_of_range_confidence_is_a_finalization_error() {
        let mut state = prepared("x");
        state.decide(Sentiment::Positive, 1.7, "bogus");

        let verdict = run(state);
        assert_eq!(verdict.sentiment, Sentiment::Neutral);
        assert_eq!(verdict.confidence, 0.5);
        assert!(verdict.reasoning.starts_with("Finalization error: inconsistent state"));
        assert!(!verdict.is_success());
        assert_eq!(verdict.original_text, "x");
    }

    #[test]
    fn missing_label_is_a_finalization_error() {
        let mut state = prepared("x");
        state.complete = true;

        let verdict = run(state);
        assert_eq!(verdict.sentiment, Sentiment::Neutral);
        assert!(verdict.error.is_some());
    }

    #[test]
    fn nan_confidence_is_rejected() {
        let mut state = prepared("x");
        state.decide(Sentiment::Negative, f64::NAN, "nan");
        assert!(!run(state).is_success());
    }
}
