//! Rule tables for the pattern matcher and keyword scorer.
//!
//! `RuleDefinitions` holds the raw, editable tables. `RuleSet::compile` turns
//! them into regexes once; the compiled set is immutable and shared across
//! threads. The built-in tables compile lazily on first use.
//!
//! List order matters everywhere: the first matching rule wins, even when a
//! later one is more specific.

use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::error::ClassifierError;
use crate::sentiment::Sentiment;

/// Confidence assigned to every canonical phrase match.
pub const PHRASE_CONFIDENCE: f64 = 0.9;

const NEGATION_RULES: &[(&str, Sentiment, f64)] = &[
    (r"\bnot\s+(?:so\s+)?good\b", Sentiment::Negative, 0.95),
    (r"\bnot\s+(?:so\s+)?great\b", Sentiment::Negative, 0.95),
    (r"\bnot\s+(?:so\s+)?excellent\b", Sentiment::Negative, 0.95),
    (r"\bnot\s+(?:so\s+)?nice\b", Sentiment::Negative, 0.9),
    (r"\bno\s+good\b", Sentiment::Negative, 0.96),
    (r"\bnever\s+(?:so\s+)?good\b", Sentiment::Negative, 0.96),
    // "not bad" reads as mild praise
    (r"\bnot\s+(?:that\s+)?bad\b", Sentiment::Positive, 0.85),
    (r"\bnot\s+(?:too\s+)?bad\b", Sentiment::Positive, 0.85),
];

const POSITIVE_PHRASES: &[&str] = &[
    r"\blove\s+it\b",
    r"\bvery\s+good\b",
    r"\bexcellent\b",
    r"\bperfect\b",
    r"\bawesome\b",
];

const NEGATIVE_PHRASES: &[&str] = &[
    r"\bhate\s+it\b",
    r"\bvery\s+bad\b",
    r"\bterrible\b",
    r"\bawful\b",
    r"\bhorrible\b",
];

// No "okay": hedged feedback such as "it's okay" stays NEUTRAL.
const POSITIVE_KEYWORDS: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 0.9),
    ("awesome", 0.85),
    ("love", 0.9),
    ("perfect", 0.95),
    ("best", 0.85),
    ("happy", 0.8),
    ("nice", 0.6),
    ("fine", 0.5),
    ("satisfied", 0.7),
    ("recommend", 0.8),
    ("excited", 0.8),
    ("pleased", 0.7),
];

const NEGATIVE_KEYWORDS: &[(&str, f64)] = &[
    ("bad", 0.7),
    ("terrible", 0.9),
    ("awful", 0.9),
    ("horrible", 0.9),
    ("worst", 0.95),
    ("hate", 0.9),
    ("poor", 0.7),
    ("useless", 0.8),
    ("disappointed", 0.8),
    ("waste", 0.75),
    ("broken", 0.8),
];

// ============================================================================
// Definitions
// ============================================================================

/// One uncompiled negation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDef {
    pub pattern: String,
    pub label: Sentiment,
    pub confidence: f64,
}

impl RuleDef {
    pub fn new(pattern: impl Into<String>, label: Sentiment, confidence: f64) -> Self {
        Self {
            pattern: pattern.into(),
            label,
            confidence,
        }
    }
}

/// Raw rule tables. `Default` yields the built-in tables.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDefinitions {
    /// Negated-sentiment rules, tried first
    pub negation: Vec<RuleDef>,
    /// Canonical positive phrases, tried after negation rules
    pub positive_phrases: Vec<String>,
    /// Canonical negative phrases, tried after positive phrases
    pub negative_phrases: Vec<String>,
    /// Confidence for any phrase match
    pub phrase_confidence: f64,
    /// Positive keyword weights, each in (0, 1]
    pub positive_keywords: Vec<(String, f64)>,
    /// Negative keyword weights, each in (0, 1]
    pub negative_keywords: Vec<(String, f64)>,
}

impl Default for RuleDefinitions {
    fn default() -> Self {
        let owned_keywords = |table: &[(&str, f64)]| -> Vec<(String, f64)> {
            table.iter().map(|(w, s)| ((*w).to_string(), *s)).collect()
        };

        Self {
            negation: NEGATION_RULES
                .iter()
                .map(|(p, label, c)| RuleDef::new(*p, *label, *c))
                .collect(),
            positive_phrases: POSITIVE_PHRASES.iter().map(|p| (*p).to_string()).collect(),
            negative_phrases: NEGATIVE_PHRASES.iter().map(|p| (*p).to_string()).collect(),
            phrase_confidence: PHRASE_CONFIDENCE,
            positive_keywords: owned_keywords(POSITIVE_KEYWORDS),
            negative_keywords: owned_keywords(NEGATIVE_KEYWORDS),
        }
    }
}

// ============================================================================
// Compiled rules
// ============================================================================

/// A compiled pattern with a pre-assigned verdict.
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    label: Sentiment,
    confidence: f64,
}

impl Rule {
    fn compile(pattern: &str, label: Sentiment, confidence: f64) -> Result<Self, ClassifierError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ClassifierError::InvalidWeight {
                item: pattern.to_string(),
                weight: confidence,
                reason: "rule confidence must be within [0, 1]".into(),
            });
        }

        let regex = Regex::new(pattern).map_err(|e| ClassifierError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            regex,
            label,
            confidence,
        })
    }

    /// Source text of the pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn label(&self) -> Sentiment {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// A whole-word keyword with its weight.
#[derive(Debug, Clone)]
pub struct Keyword {
    word: String,
    weight: f64,
    matcher: Regex,
}

impl Keyword {
    fn compile(word: &str, weight: f64) -> Result<Self, ClassifierError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(ClassifierError::InvalidPattern {
                pattern: word,
                reason: "keyword must not be empty".into(),
            });
        }
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(ClassifierError::InvalidWeight {
                item: word,
                weight,
                reason: "keyword weight must be within (0, 1]".into(),
            });
        }

        let pattern = format!(r"\b{}\b", regex::escape(&word));
        let matcher = Regex::new(&pattern).map_err(|e| ClassifierError::InvalidPattern {
            pattern,
            reason: e.to_string(),
        })?;

        Ok(Self {
            word,
            weight,
            matcher,
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Whole-word presence test against already-lowercased text.
    pub fn is_present(&self, lowered: &str) -> bool {
        self.matcher.is_match(lowered)
    }
}

/// Compiled, immutable rule tables.
#[derive(Debug, Clone)]
pub struct RuleSet {
    negation: Vec<Rule>,
    positive_phrases: Vec<Rule>,
    negative_phrases: Vec<Rule>,
    positive_keywords: Vec<Keyword>,
    negative_keywords: Vec<Keyword>,
}

impl RuleSet {
    /// Compile definitions, failing on the first bad pattern or weight.
    pub fn compile(defs: &RuleDefinitions) -> Result<Self, ClassifierError> {
        let negation = defs
            .negation
            .iter()
            .map(|d| Rule::compile(&d.pattern, d.label, d.confidence))
            .collect::<Result<Vec<_>, _>>()?;

        let phrases = |list: &[String], label| {
            list.iter()
                .map(|p| Rule::compile(p, label, defs.phrase_confidence))
                .collect::<Result<Vec<_>, _>>()
        };
        let positive_phrases = phrases(&defs.positive_phrases, Sentiment::Positive)?;
        let negative_phrases = phrases(&defs.negative_phrases, Sentiment::Negative)?;

        let keywords = |table: &[(String, f64)]| {
            table
                .iter()
                .map(|(w, weight)| Keyword::compile(w, *weight))
                .collect::<Result<Vec<_>, _>>()
        };
        let positive_keywords = keywords(&defs.positive_keywords)?;
        let negative_keywords = keywords(&defs.negative_keywords)?;

        tracing::debug!(
            negation = negation.len(),
            positive_phrases = positive_phrases.len(),
            negative_phrases = negative_phrases.len(),
            positive_keywords = positive_keywords.len(),
            negative_keywords = negative_keywords.len(),
            "Compiled sentiment rules"
        );

        Ok(Self {
            negation,
            positive_phrases,
            negative_phrases,
            positive_keywords,
            negative_keywords,
        })
    }

    pub fn negation_rules(&self) -> &[Rule] {
        &self.negation
    }

    pub fn positive_phrases(&self) -> &[Rule] {
        &self.positive_phrases
    }

    pub fn negative_phrases(&self) -> &[Rule] {
        &self.negative_phrases
    }

    pub fn positive_keywords(&self) -> &[Keyword] {
        &self.positive_keywords
    }

    pub fn negative_keywords(&self) -> &[Keyword] {
        &self.negative_keywords
    }
}

/// First rule in list order whose pattern matches.
pub fn first_match<'a>(rules: &'a [Rule], text: &str) -> Option<&'a Rule> {
    rules.iter().find(|rule| rule.is_match(text))
}

static DEFAULT_RULES: LazyLock<Result<Arc<RuleSet>, ClassifierError>> =
    LazyLock::new(|| RuleSet::compile(&RuleDefinitions::default()).map(Arc::new));

/// The built-in rule set, compiled on first access.
pub fn default_rules() -> Result<Arc<RuleSet>, ClassifierError> {
    DEFAULT_RULES.clone()
}
