use feed_core::models::{Article, Category, FeedbackRecord, Reaction, Tab};
use feed_core::reactions::{ReactionStore, SavedItems, ToggleTargets};

fn article(link: &str) -> Article {
    Article {
        title: format!("Title {link}"),
        link: link.into(),
        description: String::new(),
        category: Category::News,
        published: None,
    }
}

struct Lists {
    feed: Vec<Article>,
    saved: SavedItems,
}

impl Lists {
    fn new(feed: &[&str]) -> Self {
        Self {
            feed: feed.iter().map(|l| article(l)).collect(),
            saved: SavedItems::default(),
        }
    }

    fn targets(&mut self, active_tab: Tab) -> ToggleTargets<'_> {
        ToggleTargets {
            feed: &mut self.feed,
            saved: &mut self.saved,
            active_tab,
        }
    }
}

fn assert_saved_consistent(store: &ReactionStore, lists: &Lists, links: &[&str]) {
    for link in links {
        assert_eq!(
            lists.saved.contains(link),
            store.get(link) == Some(Reaction::Save),
            "saved list and reaction disagree for {link}"
        );
    }
}

#[test]
fn toggling_twice_restores_the_prior_state() {
    let mut cases: Vec<(Option<Reaction>, Reaction)> =
        Reaction::ALL.into_iter().map(|r| (None, r)).collect();
    cases.extend(Reaction::ALL.into_iter().map(|r| (Some(r), r)));

    for (initial, reaction) in cases {
        let mut store = ReactionStore::from_records(initial.map(|action| FeedbackRecord {
            article_id: "a".into(),
            action: Some(action),
        }));
        let mut lists = Lists::new(&["a"]);
        if initial == Some(Reaction::Save) {
            lists.saved = SavedItems::new(vec![article("a")]);
        }

        store.toggle("a", reaction, lists.targets(Tab::Feed));
        store.toggle("a", reaction, lists.targets(Tab::Feed));

        assert_eq!(store.get("a"), initial, "toggle {reaction} from {initial:?}");
    }
}

#[test]
fn setting_a_reaction_replaces_the_previous_one() {
    let mut store = ReactionStore::default();
    let mut lists = Lists::new(&["a"]);

    store.toggle("a", Reaction::Like, lists.targets(Tab::Feed));
    let transition = store.toggle("a", Reaction::Dislike, lists.targets(Tab::Feed));

    assert_eq!(transition.previous, Some(Reaction::Like));
    assert_eq!(transition.next, Some(Reaction::Dislike));
    assert_eq!(store.get("a"), Some(Reaction::Dislike));
    assert_eq!(store.len(), 1);
}

#[test]
fn clearing_produces_null_feedback_action() {
    let mut store = ReactionStore::default();
    let mut lists = Lists::new(&["a"]);

    let set = store.toggle("a", Reaction::Like, lists.targets(Tab::Feed));
    assert_eq!(
        set.feedback_record(),
        FeedbackRecord { article_id: "a".into(), action: Some(Reaction::Like) }
    );

    let cleared = store.toggle("a", Reaction::Like, lists.targets(Tab::Feed));
    assert_eq!(cleared.feedback_record().action, None);
    assert!(store.is_empty());
    assert_eq!(
        serde_json::to_value(cleared.feedback_record()).unwrap(),
        serde_json::json!({ "article_id": "a", "action": null })
    );
}

#[test]
fn saved_list_tracks_save_state_through_every_transition() {
    let links = ["a", "b", "c"];
    let mut store = ReactionStore::default();
    let mut lists = Lists::new(&links);

    let script = [
        ("a", Reaction::Save, Tab::Feed),
        ("b", Reaction::Save, Tab::Feed),
        ("a", Reaction::Like, Tab::Feed),
        ("b", Reaction::Save, Tab::Feed),
        ("c", Reaction::Save, Tab::Feed),
        ("c", Reaction::Hide, Tab::Feed),
        ("b", Reaction::Save, Tab::Feed),
        ("b", Reaction::Hide, Tab::Saved),
    ];
    for (link, reaction, tab) in script {
        store.toggle(link, reaction, lists.targets(tab));
        assert_saved_consistent(&store, &lists, &links);
        assert!(store.iter().filter(|(l, _)| *l == link).count() <= 1);
    }
}

#[test]
fn saving_prepends_the_in_memory_copy_once() {
    let mut store = ReactionStore::default();
    let mut lists = Lists::new(&["a", "b"]);

    store.toggle("a", Reaction::Save, lists.targets(Tab::Feed));
    store.toggle("b", Reaction::Save, lists.targets(Tab::Feed));

    let saved: Vec<&str> = lists.saved.items().iter().map(|a| a.link.as_str()).collect();
    assert_eq!(saved, vec!["b", "a"]);
}

#[test]
fn hide_removes_from_the_active_tab_only() {
    let mut store = ReactionStore::default();
    let mut lists = Lists::new(&["a", "b"]);
    lists.saved = SavedItems::new(vec![article("b")]);

    store.toggle("a", Reaction::Hide, lists.targets(Tab::Feed));
    assert!(lists.feed.iter().all(|a| a.link != "a"));

    store.toggle("b", Reaction::Hide, lists.targets(Tab::Saved));
    assert!(!lists.saved.contains("b"));
    assert!(lists.feed.iter().any(|a| a.link == "b"));
}

#[test]
fn bulk_load_skips_cleared_records() {
    let store = ReactionStore::from_records(vec![
        FeedbackRecord { article_id: "a".into(), action: Some(Reaction::Save) },
        FeedbackRecord { article_id: "b".into(), action: None },
        FeedbackRecord { article_id: "c".into(), action: Some(Reaction::Like) },
        FeedbackRecord { article_id: "c".into(), action: Some(Reaction::Hide) },
    ]);
    assert_eq!(store.get("a"), Some(Reaction::Save));
    assert_eq!(store.get("b"), None);
    assert_eq!(store.get("c"), Some(Reaction::Hide));
    assert_eq!(store.len(), 2);
}
