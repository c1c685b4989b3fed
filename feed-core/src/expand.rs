use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::ExpansionConfig;
use crate::error::FeedError;

#[derive(Debug, Deserialize)]
struct RelatedWord {
    word: String,
}

/// Search terms sent to the feed endpoint: the lowercased raw query first, then the
/// related terms in lookup order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedQuery {
    terms: Vec<String>,
}

impl ExpandedQuery {
    pub fn new(raw: &str, related: impl IntoIterator<Item = String>) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }
        let mut terms = vec![raw.to_lowercase()];
        terms.extend(related);
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Comma-joined `query` parameter, or `None` when there is nothing to search for.
    pub fn to_query_param(&self) -> Option<String> {
        if self.terms.is_empty() {
            None
        } else {
            Some(self.terms.join(","))
        }
    }
}

/// Looks up related terms on a lexical-association service (`?ml=<term>&max=<n>`).
#[derive(Debug, Clone)]
pub struct QueryExpander {
    client: Client,
    endpoint: Url,
    config: ExpansionConfig,
}

impl QueryExpander {
    pub fn new(client: Client, config: &ExpansionConfig) -> Result<Self, FeedError> {
        Ok(Self {
            client,
            endpoint: Url::parse(&config.endpoint)?,
            config: config.clone(),
        })
    }

    /// At most `max_terms` related words, lowercased.
    pub async fn related_terms(&self, term: &str) -> Result<Vec<String>, FeedError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("ml", term)
            .append_pair("max", &self.config.max_terms.to_string());

        let response = self
            .client
            .get(url)
            .timeout(self.config.request_timeout())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                endpoint: self.endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        let words: Vec<RelatedWord> = serde_json::from_slice(&bytes)?;

        Ok(words
            .into_iter()
            .map(|related| related.word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .take(self.config.max_terms)
            .collect())
    }

    /// Never fails: a lookup error degrades to the raw query alone.
    pub async fn expand(&self, raw: &str) -> ExpandedQuery {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ExpandedQuery::default();
        }
        if !self.config.enabled {
            return ExpandedQuery::new(trimmed, Vec::new());
        }

        match self.related_terms(trimmed).await {
            Ok(related) => {
                debug!(query = %trimmed, related = related.len(), "expanded query");
                ExpandedQuery::new(trimmed, related)
            }
            Err(err) => {
                warn!(query = %trimmed, error = %err, "query expansion failed, using raw query");
                ExpandedQuery::new(trimmed, Vec::new())
            }
        }
    }
}
