use std::collections::HashMap;

use tracing::debug;

use crate::models::{Article, FeedbackRecord, Reaction, Tab};

/// Articles the user saved, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedItems {
    items: Vec<Article>,
}

impl SavedItems {
    pub fn new(items: Vec<Article>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Article] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.items.iter().any(|item| item.link == link)
    }

    pub fn get(&self, link: &str) -> Option<&Article> {
        self.items.iter().find(|item| item.link == link)
    }

    fn prepend(&mut self, article: Article) -> bool {
        if self.contains(&article.link) {
            return false;
        }
        self.items.insert(0, article);
        true
    }

    fn remove(&mut self, link: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.link != link);
        self.items.len() != before
    }

    /// Replaces the contents with a list fetched from the backend while keeping
    /// items in `keep_first` that the fetched list does not know about yet.
    pub(crate) fn replace_with(&mut self, fetched: Vec<Article>, keep_first: &[Article]) {
        let mut merged: Vec<Article> = keep_first
            .iter()
            .filter(|local| !fetched.iter().any(|remote| remote.link == local.link))
            .cloned()
            .collect();
        merged.extend(fetched);
        self.items = merged;
    }

    /// Drops entries whose reaction is no longer `save` and prepends in-memory copies of
    /// feed articles that are saved but missing from the list.
    pub(crate) fn reconcile(&mut self, reactions: &ReactionStore, feed: &[Article]) {
        self.items
            .retain(|item| reactions.get(&item.link) == Some(Reaction::Save));
        for article in feed.iter().rev() {
            if reactions.get(&article.link) == Some(Reaction::Save) {
                self.prepend(article.clone());
            }
        }
    }
}

/// One applied toggle: the state before and after, keyed by article link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub link: String,
    pub previous: Option<Reaction>,
    pub next: Option<Reaction>,
}

impl Transition {
    /// Upsert body for `POST /feedback`; `action: null` clears the reaction.
    pub fn feedback_record(&self) -> FeedbackRecord {
        FeedbackRecord {
            article_id: self.link.clone(),
            action: self.next,
        }
    }
}

/// The lists a toggle may touch.
pub struct ToggleTargets<'a> {
    pub feed: &'a mut Vec<Article>,
    pub saved: &'a mut SavedItems,
    pub active_tab: Tab,
}

/// Per-article reaction map. An article without an entry has no reaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionStore {
    reactions: HashMap<String, Reaction>,
}

impl ReactionStore {
    /// Builds the map from stored feedback; records with a null action are skipped and
    /// later records for the same article win.
    pub fn from_records(records: impl IntoIterator<Item = FeedbackRecord>) -> Self {
        let mut store = Self::default();
        store.load(records);
        store
    }

    pub fn load(&mut self, records: impl IntoIterator<Item = FeedbackRecord>) {
        self.load_keeping(records, |_| false);
    }

    /// Like [`ReactionStore::load`], but links for which `keep` holds retain their
    /// current state and ignore the incoming records.
    pub fn load_keeping(
        &mut self,
        records: impl IntoIterator<Item = FeedbackRecord>,
        keep: impl Fn(&str) -> bool,
    ) {
        self.reactions.retain(|link, _| keep(link));
        for record in records {
            if keep(&record.article_id) {
                continue;
            }
            match record.action {
                Some(action) => {
                    self.reactions.insert(record.article_id, action);
                }
                None => {
                    self.reactions.remove(&record.article_id);
                }
            }
        }
    }

    pub fn get(&self, link: &str) -> Option<Reaction> {
        self.reactions.get(link).copied()
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Reaction)> {
        self.reactions
            .iter()
            .map(|(link, reaction)| (link.as_str(), *reaction))
    }

    /// State that toggling `reaction` on `link` would produce.
    pub fn next_state(&self, link: &str, reaction: Reaction) -> Option<Reaction> {
        if self.get(link) == Some(reaction) {
            None
        } else {
            Some(reaction)
        }
    }

    /// Applies a toggle and its effects on the saved and active lists.
    ///
    /// Entering `save` prepends the in-memory copy of the article (feed list first,
    /// then the saved list) unless it is already saved. Leaving `save` removes it from
    /// the saved list. Entering `hide` drops it from the active tab's list.
    pub fn toggle(
        &mut self,
        link: &str,
        reaction: Reaction,
        targets: ToggleTargets<'_>,
    ) -> Transition {
        let previous = self.get(link);
        let next = self.next_state(link, reaction);

        match next {
            Some(state) => {
                self.reactions.insert(link.to_owned(), state);
            }
            None => {
                self.reactions.remove(link);
            }
        }

        if next == Some(Reaction::Save) && !targets.saved.contains(link) {
            let copy = targets
                .feed
                .iter()
                .find(|item| item.link == link)
                .cloned();
            match copy {
                Some(article) => {
                    targets.saved.prepend(article);
                }
                None => debug!(%link, "saved article is not in memory; saved list left as is"),
            }
        }

        if previous == Some(Reaction::Save) && next != Some(Reaction::Save) {
            targets.saved.remove(link);
        }

        if next == Some(Reaction::Hide) {
            match targets.active_tab {
                Tab::Feed => targets.feed.retain(|item| item.link != link),
                Tab::Saved => {
                    targets.saved.remove(link);
                }
            }
        }

        Transition {
            link: link.to_owned(),
            previous,
            next,
        }
    }
}
