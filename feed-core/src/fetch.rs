use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::BackendClient;
use crate::error::FeedError;
use crate::expand::ExpandedQuery;
use crate::models::{Article, Reaction, ReactionFilter};

/// Issues feed queries and validates what comes back.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    backend: BackendClient,
}

impl FeedFetcher {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// One `GET /feed` call. A non-`all` filter is passed through as is; the backend
    /// is trusted to apply it.
    pub async fn fetch(
        &self,
        query: &ExpandedQuery,
        filter: ReactionFilter,
    ) -> Result<Vec<Article>, FeedError> {
        let param = query.to_query_param();
        let body = self.backend.feed(param.as_deref(), filter).await?;
        let articles = validate_articles(body)?;
        debug!(query = ?param, filter = filter.as_query_value(), count = articles.len(), "fetched feed");
        Ok(articles)
    }

    /// Articles the user saved, as stored by the backend.
    pub async fn fetch_saved(&self) -> Result<Vec<Article>, FeedError> {
        let body = self
            .backend
            .feed(None, ReactionFilter::Only(Reaction::Save))
            .await?;
        validate_articles(body)
    }
}

/// Checks the payload shape. `null` counts as an empty list, anything else that is not
/// an array is rejected. Individual records without a usable `link` or `title` are
/// skipped, and repeated links keep their first occurrence.
pub fn validate_articles(body: Value) -> Result<Vec<Article>, FeedError> {
    let records = match body {
        Value::Null => return Ok(Vec::new()),
        Value::Array(records) => records,
        other => {
            return Err(FeedError::InvalidPayload {
                endpoint: "/feed".to_owned(),
                reason: format!("expected an array, got {}", json_kind(&other)),
            })
        }
    };

    let mut seen = HashSet::new();
    let mut articles = Vec::with_capacity(records.len());
    for record in records {
        let article = match serde_json::from_value::<Article>(record) {
            Ok(article) => article,
            Err(err) => {
                warn!(error = %err, "skipping malformed article record");
                continue;
            }
        };
        if article.link.trim().is_empty() {
            warn!(title = %article.title, "skipping article without link");
            continue;
        }
        if seen.insert(article.link.clone()) {
            articles.push(article);
        }
    }
    Ok(articles)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
