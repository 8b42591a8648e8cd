//! The sentence under construction.

use serde::{Deserialize, Serialize};

/// Ordered tokens selected so far.
///
/// A token is whatever one key appended, so it may be a phrase ("to play").
/// `revision` increases on every mutation and never decreases; the session
/// uses it to tell whether a derivation result still matches the sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceBuffer {
    tokens: Vec<String>,
    revision: u64,
}

impl SentenceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one token.
    pub fn append(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
        self.revision += 1;
    }

    /// Remove the final token. No-op (and no revision bump) when empty.
    pub fn delete_last(&mut self) -> Option<String> {
        let removed = self.tokens.pop()?;
        self.revision += 1;
        Some(removed)
    }

    /// Empty the buffer.
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.revision += 1;
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.iter().all(|t| t.trim().is_empty())
    }

    /// Rendered sentence: tokens joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }

    /// Lower-cased words of the whole sentence, whitespace-normalized.
    pub fn words(&self) -> Vec<String> {
        self.tokens
            .iter()
            .flat_map(|t| t.split_whitespace())
            .map(str::to_lowercase)
            .collect()
    }

    /// The last `n` normalized words joined by single spaces.
    ///
    /// Fewer words are returned when the sentence is shorter than `n`.
    pub fn trailing(&self, n: usize) -> String {
        let words = self.words();
        let start = words.len().saturating_sub(n);
        words[start..].join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn append_renders_with_spaces() {
        let mut buffer = SentenceBuffer::new();
        assert_eq!(buffer.text(), "");
        buffer.append("i");
        buffer.append("like");
        buffer.append("to play");
        assert_eq!(buffer.text(), "i like to play");
        assert_eq!(buffer.tokens().len(), 3);
        assert_eq!(buffer.revision(), 3);
    }

    #[test]
    fn delete_last_removes_whole_token() {
        let mut buffer = SentenceBuffer::new();
        buffer.append("i");
        buffer.append("to play");
        assert_eq!(buffer.delete_last().as_deref(), Some("to play"));
        assert_eq!(buffer.text(), "i");
        assert_eq!(buffer.delete_last().as_deref(), Some("i"));

        let revision = buffer.revision();
        assert_eq!(buffer.delete_last(), None);
        assert_eq!(buffer.revision(), revision);
    }

    #[test]
    fn trailing_is_normalized() {
        let mut buffer = SentenceBuffer::new();
        buffer.append("  I ");
        buffer.append("LIKE");
        buffer.append("to   play");
        assert_eq!(buffer.trailing(1), "play");
        assert_eq!(buffer.trailing(2), "to play");
        assert_eq!(buffer.trailing(3), "like to play");
        assert_eq!(buffer.trailing(10), "i like to play");
    }

    #[test]
    fn clear_always_bumps_revision() {
        let mut buffer = SentenceBuffer::new();
        buffer.clear();
        assert_eq!(buffer.revision(), 1);
        assert!(buffer.is_empty());
    }

    proptest! {
        #[test]
        fn append_then_delete_round_trips(
            tokens in prop::collection::vec("[a-z' ]{1,12}", 0..8),
            extra in "[a-z]{1,10}",
        ) {
            let mut buffer = SentenceBuffer::new();
            for t in &tokens {
                buffer.append(t.clone());
            }
            let before = buffer.text();
            let revision = buffer.revision();

            buffer.append(extra.clone());
            prop_assert_eq!(buffer.delete_last(), Some(extra));
            prop_assert_eq!(buffer.text(), before);
            prop_assert!(buffer.revision() > revision);
        }
    }
}
