use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::backend::BackendClient;
use crate::compose::{compose, BoostedTopics};
use crate::config::EngineConfig;
use crate::error::FeedError;
use crate::expand::QueryExpander;
use crate::fetch::FeedFetcher;
use crate::models::{Article, CategoryFilter, FeedbackRecord, Reaction, ReactionFilter, Tab};
use crate::pagination::{Pagination, ScrollOutcome};
use crate::reactions::{ReactionStore, SavedItems, ToggleTargets, Transition};
use crate::summary::{SummaryCache, SummaryEntry};
use crate::view::{build_view, FeedView, ViewFilters, ViewSources};

/// Everything the client knows about the current browsing session.
#[derive(Debug, Clone, Default)]
pub struct FeedSessionState {
    pub query: String,
    pub last_query: String,
    pub has_searched: bool,
    /// A search is in flight.
    pub is_loading: bool,
    pub feed: Vec<Article>,
    pub saved: SavedItems,
    pub has_loaded_saved: bool,
    /// The saved-list fetch is in flight.
    pub is_loading_saved: bool,
    pub reactions: ReactionStore,
    pub boosted: BoostedTopics,
    pub pagination: Pagination,
    pub active_tab: Tab,
    pub filters: ViewFilters,
    search_seq: u64,
    toggle_seq: u64,
    toggled_at: HashMap<String, u64>,
}

impl FeedSessionState {
    /// Sequence number of the most recently issued search.
    pub fn search_seq(&self) -> u64 {
        self.search_seq
    }

    pub fn find_article(&self, link: &str) -> Option<&Article> {
        self.feed
            .iter()
            .find(|article| article.link == link)
            .or_else(|| self.saved.get(link))
    }

    pub fn view(&self) -> FeedView {
        let sources = ViewSources {
            tab: self.active_tab,
            feed: &self.feed,
            saved: &self.saved,
            reactions: &self.reactions,
        };
        let (items, total_matching) = build_view(&sources, self.filters, &self.pagination);
        let (is_loading, no_results) = match self.active_tab {
            Tab::Feed => (
                self.is_loading,
                !self.is_loading
                    && self.has_searched
                    && self.query == self.last_query
                    && total_matching == 0,
            ),
            Tab::Saved => (
                self.is_loading_saved,
                !self.is_loading_saved && self.has_loaded_saved && total_matching == 0,
            ),
        };
        FeedView {
            tab: self.active_tab,
            filters: self.filters,
            items,
            total_matching,
            visible_count: self.pagination.visible_count(),
            show_continue_options: self.pagination.show_continue_options(),
            is_loading,
            no_results,
            query: self.query.clone(),
        }
    }

    /// Folds a `/feedback` snapshot requested when the toggle counter was at `since`.
    /// Articles toggled locally after that point keep their local state, and the saved
    /// list is brought back in line with the resulting reactions.
    fn fold_feedback(&mut self, records: Vec<FeedbackRecord>, since: u64) {
        let FeedSessionState {
            feed,
            saved,
            reactions,
            toggled_at,
            ..
        } = self;
        reactions.load_keeping(records, |link| {
            toggled_at.get(link).is_some_and(|&seq| seq > since)
        });
        saved.reconcile(reactions, feed);
    }

    fn active_len(&self) -> usize {
        match self.active_tab {
            Tab::Feed => self.feed.len(),
            Tab::Saved => self.saved.len(),
        }
    }
}

/// A search that has been registered but whose network work has not run yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
    pub filter: ReactionFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results were installed as the current feed.
    Applied { count: usize },
    /// A newer search was issued meanwhile; the results were dropped.
    Superseded,
}

/// Owns the session state and the clients that feed it. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FeedSession {
    state: Arc<RwLock<FeedSessionState>>,
    backend: BackendClient,
    expander: QueryExpander,
    fetcher: FeedFetcher,
    summaries: SummaryCache,
    suggested_topics: Arc<Vec<String>>,
}

impl FeedSession {
    pub fn new(config: &EngineConfig) -> Result<Self, FeedError> {
        let client = config.http_client()?;
        let backend = BackendClient::new(client.clone(), &config.backend)?;
        let expander = QueryExpander::new(client, &config.expansion)?;
        Ok(Self {
            state: Arc::new(RwLock::new(FeedSessionState::default())),
            fetcher: FeedFetcher::new(backend.clone()),
            summaries: SummaryCache::new(backend.clone()),
            backend,
            expander,
            suggested_topics: Arc::new(config.feed.suggested_topics.clone()),
        })
    }

    pub fn suggested_topics(&self) -> &[String] {
        &self.suggested_topics
    }

    pub async fn snapshot(&self) -> FeedSessionState {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> FeedView {
        self.state.read().await.view()
    }

    pub async fn reaction(&self, link: &str) -> Option<Reaction> {
        self.state.read().await.reactions.get(link)
    }

    /// Loads boosted topics and stored reactions. Either request may fail on its own;
    /// the corresponding state is then left untouched.
    pub async fn load_profile(&self) {
        let since = self.state.read().await.toggle_seq;
        let (topics, feedback) = tokio::join!(self.backend.user_topics(), self.backend.feedback());

        let mut state = self.state.write().await;
        match topics {
            Ok(topics) => {
                state.boosted = BoostedTopics::from_user_topics(&topics);
                info!(count = state.boosted.len(), "loaded boosted topics");
            }
            Err(err) => warn!(error = %err, "failed to load user topics"),
        }
        match feedback {
            Ok(records) => {
                state.fold_feedback(records, since);
                info!(count = state.reactions.len(), "loaded stored reactions");
            }
            Err(err) => warn!(error = %err, "failed to load feedback"),
        }
    }

    /// Reloads `/feedback`, replacing local reactions with what the backend holds.
    pub async fn reload_feedback(&self) -> Result<(), FeedError> {
        let since = self.state.read().await.toggle_seq;
        let records = self.backend.feedback().await?;
        self.state.write().await.fold_feedback(records, since);
        Ok(())
    }

    /// Registers a new search: bumps the sequence number, resets the window and marks
    /// the session loading. Network work happens in [`FeedSession::run_search`].
    pub async fn begin_search(&self, raw_query: &str) -> SearchTicket {
        let mut state = self.state.write().await;
        state.search_seq += 1;
        state.query = raw_query.to_owned();
        state.has_searched = true;
        state.is_loading = true;
        state.pagination.reset();
        SearchTicket {
            seq: state.search_seq,
            query: raw_query.to_owned(),
            filter: state.filters.reaction,
        }
    }

    /// Expands, fetches and composes. Results are installed only if no newer search
    /// was registered while this one was in flight.
    pub async fn run_search(&self, ticket: SearchTicket) -> SearchOutcome {
        let expanded = self.expander.expand(&ticket.query).await;
        let fetched = match self.fetcher.fetch(&expanded, ticket.filter).await {
            Ok(articles) => articles,
            Err(err) => {
                warn!(query = %ticket.query, error = %err, "feed fetch failed");
                Vec::new()
            }
        };

        let mut state = self.state.write().await;
        if state.search_seq != ticket.seq {
            debug!(
                query = %ticket.query,
                seq = ticket.seq,
                latest = state.search_seq,
                "discarding superseded search results"
            );
            return SearchOutcome::Superseded;
        }
        let composed = compose(fetched, &state.boosted);
        let count = composed.len();
        state.feed = composed;
        state.last_query = ticket.query;
        state.is_loading = false;
        SearchOutcome::Applied { count }
    }

    pub async fn search(&self, raw_query: &str) -> SearchOutcome {
        let ticket = self.begin_search(raw_query).await;
        self.run_search(ticket).await
    }

    /// Picks the suggested topic at `choice`, or a random one, and prepares a search
    /// for it on the feed tab with the reaction filter cleared. Returns `None` when no
    /// topics are configured.
    pub async fn begin_suggested_search(&self, choice: Option<usize>) -> Option<SearchTicket> {
        let topic = pick_topic(&self.suggested_topics, choice)?.to_owned();
        {
            let mut state = self.state.write().await;
            state.pagination.reset();
            state.filters.reaction = ReactionFilter::All;
            state.active_tab = Tab::Feed;
        }
        Some(self.begin_search(&topic).await)
    }

    pub async fn try_suggested_topic(&self, choice: Option<usize>) -> Option<SearchOutcome> {
        let ticket = self.begin_suggested_search(choice).await?;
        Some(self.run_search(ticket).await)
    }

    pub async fn near_bottom(&self) -> ScrollOutcome {
        let mut state = self.state.write().await;
        let total = state.active_len();
        state.pagination.on_near_bottom(total)
    }

    pub async fn continue_scrolling(&self) {
        self.state.write().await.pagination.continue_scrolling();
    }

    pub async fn set_reaction_filter(&self, filter: ReactionFilter) {
        self.state.write().await.filters.reaction = filter;
    }

    pub async fn set_category_filter(&self, filter: CategoryFilter) {
        self.state.write().await.filters.category = filter;
    }

    /// Switches tab. Returns `true` when the saved list still has to be loaded, in which
    /// case the saved tab already reports loading.
    pub async fn switch_tab(&self, tab: Tab) -> bool {
        let mut state = self.state.write().await;
        state.active_tab = tab;
        let needs_saved = tab == Tab::Saved && !state.has_loaded_saved;
        if needs_saved {
            state.is_loading_saved = true;
        }
        needs_saved
    }

    /// Switches tab and loads the saved list on the first visit.
    pub async fn select_tab(&self, tab: Tab) {
        if self.switch_tab(tab).await {
            self.load_saved().await;
        }
    }

    /// Fetches `GET /feed?filter=save`. Articles saved locally while the request was
    /// in flight stay in the list.
    pub async fn load_saved(&self) {
        self.state.write().await.is_loading_saved = true;
        let fetched = self.fetcher.fetch_saved().await;

        let mut state = self.state.write().await;
        state.is_loading_saved = false;
        match fetched {
            Ok(articles) => {
                let local: Vec<Article> = state.saved.items().to_vec();
                state.saved.replace_with(articles, &local);
                state.has_loaded_saved = true;
                info!(count = state.saved.len(), "loaded saved articles");
            }
            Err(err) => warn!(error = %err, "failed to fetch saved articles"),
        }
    }

    /// Applies a toggle to local state only. Toggles on the same article take effect
    /// in the order this is called.
    pub async fn apply_toggle(&self, link: &str, reaction: Reaction) -> Transition {
        let mut state = self.state.write().await;
        let FeedSessionState {
            feed,
            saved,
            reactions,
            active_tab,
            toggle_seq,
            toggled_at,
            ..
        } = &mut *state;
        let transition = reactions.toggle(
            link,
            reaction,
            ToggleTargets {
                feed,
                saved,
                active_tab: *active_tab,
            },
        );
        *toggle_seq += 1;
        toggled_at.insert(link.to_owned(), *toggle_seq);
        debug!(link = %transition.link, previous = ?transition.previous, next = ?transition.next, "reaction toggled");
        transition
    }

    /// Persists a transition. Failures are logged and the local state is kept.
    pub async fn sync_transition(&self, transition: &Transition) -> bool {
        match self.backend.submit_feedback(&transition.feedback_record()).await {
            Ok(()) => true,
            Err(err) => {
                warn!(link = %transition.link, error = %err, "failed to persist reaction; keeping local state");
                false
            }
        }
    }

    pub async fn toggle_reaction(&self, link: &str, reaction: Reaction) -> Transition {
        let transition = self.apply_toggle(link, reaction).await;
        self.sync_transition(&transition).await;
        transition
    }

    /// Summary of a known article, `None` if the link is not in memory.
    pub async fn summary(&self, link: &str) -> Option<SummaryEntry> {
        let article = self.state.read().await.find_article(link).cloned()?;
        Some(self.summaries.get_summary(&article).await)
    }

    pub fn summaries(&self) -> &SummaryCache {
        &self.summaries
    }
}

fn pick_topic(topics: &[String], choice: Option<usize>) -> Option<&str> {
    if topics.is_empty() {
        return None;
    }
    let index = match choice {
        Some(index) => index % topics.len(),
        None => (uuid::Uuid::new_v4().as_u128() % topics.len() as u128) as usize,
    };
    topics.get(index).map(String::as_str)
}
