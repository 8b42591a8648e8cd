//! Suggestion sources.
//!
//! A suggestion source turns the current sentence into a ranked list of
//! next words or phrases. Sources are optional and untrusted: whatever they
//! return goes through [`normalize`] first, and any failure is treated as
//! "no suggestions" by the session.

mod generative;
mod http;

pub use generative::{extract_candidates, GenerationParams, GenerativeSource, TextGenerator};
pub use http::HttpSuggestionSource;

use crate::error::SuggestResult;
use async_trait::async_trait;
use dwell_layout::MAX_SUGGESTIONS;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Suggestions at or beyond this many characters are dropped.
pub const MAX_SUGGESTION_CHARS: usize = 40;

/// A request to re-derive the layout for a sentence.
///
/// `ticket` is the derivation epoch at the time of the request; a result is
/// applied only while the epoch is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeriveRequest {
    pub ticket: u64,
    pub sentence: String,
}

/// Source of ranked next-word suggestions.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Suggestions for `sentence`, best first.
    async fn suggest(&self, sentence: &str) -> SuggestResult<Vec<String>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Clean a raw suggestion list.
///
/// Trims entries, drops blank and over-long ones, removes duplicates
/// (keeping the first occurrence) and caps the list at `max` (never more
/// than [`MAX_SUGGESTIONS`]).
pub fn normalize(raw: Vec<String>, max: usize) -> Vec<String> {
    let cap = max.min(MAX_SUGGESTIONS);
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s.chars().count() < MAX_SUGGESTION_CHARS)
        .filter(|s| seen.insert(s.clone()))
        .take(cap)
        .collect()
}

/// Fixed answers keyed by lower-cased sentence.
///
/// Backs the simulator's scripted suggestions and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptedSource {
    answers: BTreeMap<String, Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sentence: &str, answers: &[&str]) -> Self {
        self.answers.insert(
            sentence.trim().to_lowercase(),
            answers.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[async_trait]
impl SuggestionSource for ScriptedSource {
    async fn suggest(&self, sentence: &str) -> SuggestResult<Vec<String>> {
        Ok(self
            .answers
            .get(&sentence.trim().to_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
