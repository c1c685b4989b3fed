use crate::models::{Article, CategoryFilter, Reaction, ReactionFilter, Tab};
use crate::pagination::Pagination;
use crate::reactions::{ReactionStore, SavedItems};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewFilters {
    pub reaction: ReactionFilter,
    pub category: CategoryFilter,
}

impl ViewFilters {
    /// Both filters must accept. The saved tab additionally requires the `save` state,
    /// which drops entries whose reaction was cleared since they were listed.
    pub fn matches(&self, tab: Tab, article: &Article, state: Option<Reaction>) -> bool {
        let tab_ok = match tab {
            Tab::Feed => true,
            Tab::Saved => state == Some(Reaction::Save),
        };
        tab_ok && self.reaction.accepts(state) && self.category.accepts(article.category)
    }
}

/// Borrowed inputs of the view model.
pub struct ViewSources<'a> {
    pub tab: Tab,
    pub feed: &'a [Article],
    pub saved: &'a SavedItems,
    pub reactions: &'a ReactionStore,
}

impl<'a> ViewSources<'a> {
    pub fn source_list(&self) -> &'a [Article] {
        match self.tab {
            Tab::Feed => self.feed,
            Tab::Saved => self.saved.items(),
        }
    }

    /// Every article of the active list that passes `filters`, in list order.
    pub fn filtered(&self, filters: &ViewFilters) -> Vec<&'a Article> {
        self.source_list()
            .iter()
            .filter(|article| filters.matches(self.tab, article, self.reactions.get(&article.link)))
            .collect()
    }
}

/// An article as handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewItem {
    pub article: Article,
    pub reaction: Option<Reaction>,
}

/// Snapshot of what the active view shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedView {
    pub tab: Tab,
    pub filters: ViewFilters,
    pub items: Vec<ViewItem>,
    /// Filtered items before windowing.
    pub total_matching: usize,
    pub visible_count: usize,
    pub show_continue_options: bool,
    pub is_loading: bool,
    pub no_results: bool,
    pub query: String,
}

impl FeedView {
    pub fn has_more(&self) -> bool {
        self.items.len() < self.total_matching
    }

    pub fn links(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.article.link.as_str()).collect()
    }
}

/// Applies filters, then the pagination window.
pub fn build_view(
    sources: &ViewSources<'_>,
    filters: ViewFilters,
    pagination: &Pagination,
) -> (Vec<ViewItem>, usize) {
    let filtered = sources.filtered(&filters);
    let total = filtered.len();
    let items = pagination
        .window(&filtered)
        .iter()
        .map(|article| ViewItem {
            article: (*article).clone(),
            reaction: sources.reactions.get(&article.link),
        })
        .collect();
    (items, total)
}
