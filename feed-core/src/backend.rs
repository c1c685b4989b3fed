use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::config::BackendConfig;
use crate::error::FeedError;
use crate::models::{FeedbackRecord, Reaction, ReactionFilter, UserTopic};

/// Thin JSON client for the feed backend. Host and port come from configuration.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base: Url,
}

#[derive(Debug, Serialize)]
pub struct SummaryRequest<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub link: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawFeedback {
    article_id: String,
    #[serde(default)]
    action: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    summary: Option<String>,
}

impl BackendClient {
    pub fn new(client: Client, config: &BackendConfig) -> Result<Self, FeedError> {
        Ok(Self {
            client,
            base: Url::parse(&config.base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FeedError> {
        Ok(self.base.join(path)?)
    }

    /// `GET /feed` returning the raw JSON body. Shape validation is the fetcher's job.
    pub async fn feed(
        &self,
        query: Option<&str>,
        filter: ReactionFilter,
    ) -> Result<serde_json::Value, FeedError> {
        let mut url = self.endpoint("feed")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(query) = query {
                pairs.append_pair("query", query);
            }
            if filter != ReactionFilter::All {
                pairs.append_pair("filter", filter.as_query_value());
            }
        }
        let response = self.client.get(url).send().await?;
        decode(check_status("/feed", response)?).await
    }

    /// Stored reactions. Records carrying an unknown action are dropped.
    pub async fn feedback(&self) -> Result<Vec<FeedbackRecord>, FeedError> {
        let url = self.endpoint("feedback")?;
        let response = self.client.get(url).send().await?;
        let raw: Option<Vec<RawFeedback>> = decode(check_status("/feedback", response)?).await?;
        let records = raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|record| {
                let action = match record.action.as_deref() {
                    None => None,
                    Some(value) => match value.parse::<Reaction>() {
                        Ok(reaction) => Some(reaction),
                        Err(err) => {
                            warn!(article = %record.article_id, error = %err, "ignoring feedback record");
                            return None;
                        }
                    },
                };
                Some(FeedbackRecord {
                    article_id: record.article_id,
                    action,
                })
            })
            .collect();
        Ok(records)
    }

    pub async fn submit_feedback(&self, record: &FeedbackRecord) -> Result<(), FeedError> {
        let url = self.endpoint("feedback")?;
        let response = self.client.post(url).json(record).send().await?;
        check_status("/feedback", response)?;
        Ok(())
    }

    pub async fn user_topics(&self) -> Result<Vec<UserTopic>, FeedError> {
        let url = self.endpoint("user-topics")?;
        let response = self.client.get(url).send().await?;
        let topics: Option<Vec<UserTopic>> =
            decode(check_status("/user-topics", response)?).await?;
        Ok(topics.unwrap_or_default())
    }

    /// Returns `Ok(None)` when the backend answers without a summary, which is how
    /// it reports rate limiting.
    pub async fn summarize(&self, request: &SummaryRequest<'_>) -> Result<Option<String>, FeedError> {
        let url = self.endpoint("summarize")?;
        let response = self.client.post(url).json(request).send().await?;
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Ok(None);
        }
        let body: SummaryResponse = decode(check_status("/summarize", response)?).await?;
        Ok(body.summary.filter(|text| !text.trim().is_empty()))
    }
}

fn check_status(endpoint: &str, response: Response) -> Result<Response, FeedError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FeedError::Status {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FeedError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
