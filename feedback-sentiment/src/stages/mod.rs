//! Pipeline stages and the routing between them.
//!
//! ```text
//! Preprocess ──► PatternMatch ──┬── complete ──► Finalize ──► Done
//!                               └── otherwise ─► KeywordScore ──► Finalize
//! ```
//!
//! Every stage is a plain function from state to state. Routing is the only
//! branching logic; labels are decided inside the stages.

pub mod finalize;
pub mod keyword;
pub mod pattern;
pub mod preprocess;

use serde::Serialize;
use std::fmt;

use crate::state::AnalysisState;

/// Position in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Preprocess,
    PatternMatch,
    KeywordScore,
    Finalize,
    Done,
}

impl Stage {
    /// The stage that follows `self` given the state it produced.
    pub fn next(self, state: &AnalysisState) -> Stage {
        match self {
            Stage::Preprocess => Stage::PatternMatch,
            Stage::PatternMatch if state.complete => Stage::Finalize,
            Stage::PatternMatch => Stage::KeywordScore,
            Stage::KeywordScore => Stage::Finalize,
            Stage::Finalize | Stage::Done => Stage::Done,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Preprocess => "preprocess",
            Stage::PatternMatch => "pattern_match",
            Stage::KeywordScore => "keyword_score",
            Stage::Finalize => "finalize",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
