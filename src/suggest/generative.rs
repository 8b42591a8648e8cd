//! Suggestions from a text-continuation model.
//!
//! The generator is sampled several times for the sentence; every sample's
//! continuation yields up to three candidates (its first word, first two
//! words and first three words). Candidates are ranked by first appearance.
//!
//! ```text
//!   "i like" ──prime──► "A person is thinking: i like"
//!            ──sample×N──► ["...i like to play outside.", ...]
//!            ──extract──► ["to", "to play", "to play outside", ...]
//! ```

use super::{SuggestionSource, MAX_SUGGESTION_CHARS};
use crate::error::SuggestResult;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Context prepended to very short inputs so the model treats them as
/// speech rather than a fragment.
const PRIMING_PHRASES: [&str; 3] = [
    "In a conversation, someone might say: ",
    "A person is thinking: ",
    "They want to express: ",
];

/// Inputs with at most this many words get primed.
const PRIME_MAX_WORDS: usize = 2;

/// Sampling parameters forwarded to the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub max_new_tokens: usize,
    pub samples: usize,
    pub temperature: f32,
    pub top_k: usize,
    pub top_p: f32,
    pub repetition_penalty: f32,
}

impl GenerationParams {
    /// Parameters for `count` suggestions: four samples per wanted item.
    pub fn for_count(count: usize) -> Self {
        Self {
            samples: count.max(1) * 4,
            ..Self::default()
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 25,
            samples: 32,
            temperature: 0.9,
            top_k: 60,
            top_p: 0.95,
            repetition_penalty: 1.3,
        }
    }
}

/// A sampling text generator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Full generated texts (prompt included), one per sample.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> SuggestResult<Vec<String>>;
}

/// [`SuggestionSource`] backed by a [`TextGenerator`].
pub struct GenerativeSource<G> {
    generator: G,
    count: usize,
}

impl<G: TextGenerator> GenerativeSource<G> {
    pub fn new(generator: G, count: usize) -> Self {
        Self { generator, count }
    }

    fn prime(sentence: &str) -> String {
        let words = sentence.split_whitespace().count();
        if words > PRIME_MAX_WORDS {
            return sentence.to_string();
        }
        let prefix = PRIMING_PHRASES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default();
        format!("{prefix}{sentence}")
    }
}

#[async_trait]
impl<G: TextGenerator> SuggestionSource for GenerativeSource<G> {
    async fn suggest(&self, sentence: &str) -> SuggestResult<Vec<String>> {
        if sentence.trim().is_empty() {
            return Ok(Vec::new());
        }

        let prompt = Self::prime(sentence);
        let params = GenerationParams::for_count(self.count);
        let outputs = self.generator.generate(&prompt, &params).await?;
        tracing::debug!(samples = outputs.len(), "generator returned");

        let mut seen = HashSet::new();
        Ok(extract_candidates(&prompt, sentence, &outputs)
            .into_iter()
            .filter(|c| !c.is_empty() && c.len() < MAX_SUGGESTION_CHARS)
            .filter(|c| seen.insert(c.clone()))
            .take(self.count)
            .collect())
    }

    fn name(&self) -> &str {
        "generative"
    }
}

// =============================================================================
// CANDIDATE PATTERNS
// =============================================================================

/// One word: letters, apostrophes, hyphens.
static SINGLE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z'-]+$").unwrap());

/// Phrase: the same alphabet plus spaces.
static PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z' -]+$").unwrap());

/// Pull 1-, 2- and 3-word candidates out of generated texts.
///
/// The continuation is the text after `prompt`; when the prompt was primed
/// and the input sentence appears in the output, the text after the
/// sentence is used instead. Trailing `.,!?;:` is stripped from each word.
/// Candidates are lower-cased; duplicates are kept for the caller to drop.
pub fn extract_candidates(prompt: &str, sentence: &str, outputs: &[String]) -> Vec<String> {
    let mut candidates = Vec::new();

    for output in outputs {
        let mut continuation = output.get(prompt.len()..).unwrap_or_default().trim();
        if prompt != sentence {
            if let Some((_, after)) = output.split_once(sentence) {
                if !after.trim().is_empty() {
                    continuation = after.trim();
                }
            }
        }
        if continuation.is_empty() {
            continue;
        }

        let words: Vec<&str> = continuation
            .split_whitespace()
            .map(|w| w.trim_end_matches(['.', ',', '!', '?', ';', ':']))
            .collect();

        if let Some(first) = words.first().filter(|w| SINGLE_WORD_RE.is_match(w)) {
            candidates.push(first.to_lowercase());
        }
        if let [a, b, ..] = words.as_slice() {
            if !a.is_empty() && !b.is_empty() {
                let two = format!("{a} {b}");
                if PHRASE_RE.is_match(&two) && two.len() <= 30 {
                    candidates.push(two.to_lowercase());
                }
            }
        }
        if let [a, b, c, ..] = words.as_slice() {
            if !a.is_empty() && !b.is_empty() && !c.is_empty() {
                let three = format!("{a} {b} {c}");
                if PHRASE_RE.is_match(&three) && three.len() <= 40 {
                    candidates.push(three.to_lowercase());
                }
            }
        }
    }

    candidates
}
