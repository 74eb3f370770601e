//! Text normalization.
//!
//! Trims, collapses whitespace runs and cuts the text to `max_chars`
//! characters. The cut is a hard safety cap and can silently drop context
//! from very long feedback.

use feedback_common::util::{collapse_whitespace, preview, truncate_chars};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::ClassifierError;
use crate::state::{AnalysisState, RawInput, TextFeatures};

static NEGATION_FEATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnot\s+\w+").unwrap());

/// Run the preprocessor. Failures are recorded in `error`, never raised.
pub fn run(mut state: AnalysisState, max_chars: usize) -> AnalysisState {
    state.error = None;
    state.complete = false;

    match normalize(&mut state, max_chars) {
        Ok(()) => {
            tracing::info!(
                preview = %preview(&state.text),
                chars = state.text.chars().count(),
                "Preprocessed feedback"
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "Preprocessing failed");
            state.fail("Preprocessing error", &e);
        }
    }

    state
}

fn normalize(state: &mut AnalysisState, max_chars: usize) -> Result<(), ClassifierError> {
    let decoded = match state.raw.take() {
        Some(RawInput::Text(text)) => text,
        Some(RawInput::Bytes(bytes)) => String::from_utf8(bytes)
            .map_err(|e| ClassifierError::InvalidEncoding(e.utf8_error().to_string()))?,
        // Already normalized once; normalizing again is a no-op on valid text.
        None => std::mem::take(&mut state.text),
    };

    let collapsed = collapse_whitespace(&decoded);
    state.text = truncate_chars(&collapsed, max_chars).to_string();
    state.features = detect_features(&state.text);
    Ok(())
}

fn detect_features(text: &str) -> TextFeatures {
    let lowered = text.to_lowercase();
    TextFeatures {
        has_negation: NEGATION_FEATURE.is_match(&lowered),
        has_exclamation: text.contains('!'),
        has_question: text.contains('?'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_and_trims() {
        let state = run(AnalysisState::new("  The   app\tis \n fine  "), 1000);
        assert_eq!(state.text, "The app is fine");
        assert!(!state.is_pending());
        assert!(!state.has_error());
        assert!(!state.complete);
    }

    #[test]
    fn keeps_original_casing() {
        let state = run(AnalysisState::new("GREAT Service"), 1000);
        assert_eq!(state.text, "GREAT Service");
    }

    #[test]
    fn truncates_to_max_chars() {
        let state = run(AnalysisState::new("a".repeat(2000)), 1000);
        assert_eq!(state.text.chars().count(), 1000);
        assert!(!state.has_error());
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let state = run(AnalysisState::new("é".repeat(20)), 10);
        assert_eq!(state.text, "é".repeat(10));
    }

    #[test]
    fn empty_input_is_fine() {
        let state = run(AnalysisState::new(""), 1000);
        assert_eq!(state.text, "");
        assert!(!state.has_error());
    }

    #[test]
    fn invalid_utf8_is_recorded_not_raised() {
        let state = run(AnalysisState::from_bytes(vec![0x66, 0x6f, 0xff, 0x6f]), 1000);
        let err = state.error.as_deref().unwrap();
        assert!(err.starts_with("Preprocessing error: invalid input encoding"));
    }

    #[test]
    fn resets_error_and_completion() {
        let mut state = AnalysisState::new("fine");
        state.error = Some("stale".into());
        state.complete = true;

        let state = run(state, 1000);
        assert!(!state.has_error());
        assert!(!state.complete);
    }

    #[test]
    fn detects_surface_features() {
        let state = run(AnalysisState::new("Why is this NOT working?!"), 1000);
        assert_eq!(
            state.features,
            TextFeatures {
                has_negation: true,
                has_exclamation: true,
                has_question: true,
            }
        );

        let state = run(AnalysisState::new("cannot."), 1000);
        assert!(!state.features.has_negation);
    }
}
