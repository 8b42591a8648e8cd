//! Suggestion pipeline errors.

use thiserror::Error;

/// Why a suggestion request produced nothing.
///
/// Every variant is handled the same way by the session (fall back to
/// rule-based derivation); the distinction only matters for logs.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("Suggestion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Suggestion service returned status {0}")]
    Status(u16),

    #[error("Unexpected suggestion payload: {0}")]
    Payload(String),

    #[error("Suggestion request timed out after {0}ms")]
    Timeout(u64),

    #[error("Text generator failed: {0}")]
    Generator(String),

    #[error("No suggestion source configured")]
    Unavailable,
}

/// Result type for suggestion sources.
pub type SuggestResult<T> = Result<T, SuggestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_details() {
        assert!(SuggestError::Timeout(500).to_string().contains("500ms"));
        assert!(SuggestError::Status(503).to_string().contains("503"));
    }
}
