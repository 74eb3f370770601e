//! Negation and canonical-phrase matching.
//!
//! Catches phrasing a bag-of-words scorer gets wrong ("not good" contains
//! "good"). Order: negation rules, then positive phrases, then negative
//! phrases. The first hit anywhere ends the search.

use crate::error::ClassifierError;
use crate::rules::{first_match, RuleSet};
use crate::state::AnalysisState;

/// Run the pattern matcher. Leaves the state untouched when nothing matches.
pub fn run(mut state: AnalysisState, rules: &RuleSet) -> AnalysisState {
    if state.has_error() {
        return state;
    }

    if let Err(e) = match_rules(&mut state, rules) {
        tracing::warn!(error = %e, "Pattern analysis failed");
        state.fail("Pattern analysis error", &e);
    }

    state
}

fn match_rules(state: &mut AnalysisState, rules: &RuleSet) -> Result<(), ClassifierError> {
    let lowered = state.normalized_text()?.to_lowercase();

    if let Some(rule) = first_match(rules.negation_rules(), &lowered) {
        tracing::info!(pattern = rule.pattern(), sentiment = %rule.label(), "Matched negation pattern");
        let reasoning = format!("Matched negation pattern: '{}'", rule.pattern());
        state.decide(rule.label(), rule.confidence(), reasoning);
        return Ok(());
    }

    if let Some(rule) = first_match(rules.positive_phrases(), &lowered) {
        tracing::info!(pattern = rule.pattern(), "Matched positive phrase");
        let reasoning = format!("Matched positive phrase: '{}'", rule.pattern());
        state.decide(rule.label(), rule.confidence(), reasoning);
        return Ok(());
    }

    if let Some(rule) = first_match(rules.negative_phrases(), &lowered) {
        tracing::info!(pattern = rule.pattern(), "Matched negative phrase");
        let reasoning = format!("Matched negative phrase: '{}'", rule.pattern());
        state.decide(rule.label(), rule.confidence(), reasoning);
        return Ok(());
    }

    tracing::debug!("No strong pattern, falling through to keyword scoring");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::default_rules;
    use crate::sentiment::Sentiment;
    use crate::stages::preprocess;

    fn matched(text: &str) -> AnalysisState {
        let rules = default_rules().unwrap();
        run(preprocess::run(AnalysisState::new(text), 1000), &rules)
    }

    #[test]
    fn negated_positive_is_negative() {
        let state = matched("The product is NOT good at all");
        assert!(state.complete);
        assert_eq!(state.sentiment, Some(Sentiment::Negative));
        assert_eq!(state.confidence, 0.95);
        assert_eq!(
            state.reasoning,
            r"Matched negation pattern: '\bnot\s+(?:so\s+)?good\b'"
        );
    }

    #[test]
    fn not_bad_is_positive() {
        let state = matched("Not bad for the price");
        assert_eq!(state.sentiment, Some(Sentiment::Positive));
        assert_eq!(state.confidence, 0.85);
    }

    #[test]
    fn negation_rules_beat_phrases() {
        // "excellent" is also a positive phrase, but the negation rule comes first.
        let state = matched("not so excellent");
        assert_eq!(state.sentiment, Some(Sentiment::Negative));
        assert_eq!(state.confidence, 0.95);
    }

    #[test]
    fn positive_phrases_are_checked_before_negative() {
        let state = matched("I love it even though shipping was terrible");
        assert_eq!(state.sentiment, Some(Sentiment::Positive));
        assert_eq!(state.confidence, 0.9);
        assert!(state.reasoning.starts_with("Matched positive phrase"));
    }

    #[test]
    fn negative_phrase_match() {
        let state = matched("This is terrible, never buying again");
        assert_eq!(state.sentiment, Some(Sentiment::Negative));
        assert_eq!(state.confidence, 0.9);
        assert_eq!(state.reasoning, r"Matched negative phrase: '\bterrible\b'");
    }

    #[test]
    fn no_match_leaves_state_incomplete() {
        let state = matched("I love this store!");
        assert!(!state.complete);
        assert!(state.sentiment.is_none());
        assert!(state.reasoning.is_empty());
    }

    #[test]
    fn error_state_passes_through() {
        let rules = default_rules().unwrap();
        let mut state = preprocess::run(AnalysisState::new("not good"), 1000);
        state.error = Some("earlier failure".into());

        let out = run(state.clone(), &rules);
        assert_eq!(out, state);
    }

    #[test]
    fn unpreprocessed_state_records_missing_field() {
        let rules = default_rules().unwrap();
        let state = run(AnalysisState::new("not good"), &rules);
        assert!(!state.complete);
        assert_eq!(
            state.error.as_deref(),
            Some("Pattern analysis error: missing field: text")
        );
    }
}
