use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::backend::{BackendClient, SummaryRequest};
use crate::models::Article;

/// Shown in place of a summary when the backend has none to give (rate limit, outage).
/// The entry stays cached for the session.
pub const SUMMARY_FALLBACK: &str = "No summary is available for this article.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryEntry {
    Pending,
    Ready(String),
    Unavailable,
}

impl SummaryEntry {
    pub fn is_pending(&self) -> bool {
        matches!(self, SummaryEntry::Pending)
    }

    /// Text to display, `None` while the request is in flight.
    pub fn display_text(&self) -> Option<&str> {
        match self {
            SummaryEntry::Pending => None,
            SummaryEntry::Ready(text) => Some(text),
            SummaryEntry::Unavailable => Some(SUMMARY_FALLBACK),
        }
    }
}

/// Session-long memo of per-article summaries keyed by link. Entries are never evicted.
#[derive(Debug, Clone)]
pub struct SummaryCache {
    backend: BackendClient,
    entries: Arc<RwLock<HashMap<String, SummaryEntry>>>,
}

impl SummaryCache {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn peek(&self, link: &str) -> Option<SummaryEntry> {
        self.entries.read().await.get(link).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns the cached entry, pending ones included. Otherwise marks the article
    /// pending, asks the backend and stores whatever comes back.
    pub async fn get_summary(&self, article: &Article) -> SummaryEntry {
        {
            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get(&article.link) {
                debug!(link = %article.link, "summary cache hit");
                return entry.clone();
            }
            entries.insert(article.link.clone(), SummaryEntry::Pending);
        }

        let content = article.plain_description();
        let request = SummaryRequest {
            title: &article.title,
            content: &content,
            link: &article.link,
        };
        let entry = match self.backend.summarize(&request).await {
            Ok(Some(summary)) => SummaryEntry::Ready(summary),
            Ok(None) => {
                warn!(link = %article.link, "backend returned no summary");
                SummaryEntry::Unavailable
            }
            Err(err) => {
                warn!(link = %article.link, error = %err, "summary request failed");
                SummaryEntry::Unavailable
            }
        };

        self.entries
            .write()
            .await
            .insert(article.link.clone(), entry.clone());
        entry
    }
}
