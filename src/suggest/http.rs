//! HTTP suggestion source.

use super::SuggestionSource;
use crate::error::{SuggestError, SuggestResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Accepted response bodies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuggestionPayload {
    List(Vec<String>),
    Wrapped { suggestions: Vec<String> },
}

/// POSTs `{"sentence": ..}` to an endpoint and reads back a JSON array of
/// strings, or an object with a `suggestions` array.
pub struct HttpSuggestionSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSuggestionSource {
    /// Create a source whose client enforces `timeout` per request.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> SuggestResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SuggestionSource for HttpSuggestionSource {
    async fn suggest(&self, sentence: &str) -> SuggestResult<Vec<String>> {
        tracing::debug!(url = %self.url, sentence, "requesting suggestions");

        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "sentence": sentence }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SuggestError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let payload: SuggestionPayload =
            serde_json::from_str(&body).map_err(|e| SuggestError::Payload(e.to_string()))?;

        Ok(match payload {
            SuggestionPayload::List(items) => items,
            SuggestionPayload::Wrapped { suggestions } => suggestions,
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
