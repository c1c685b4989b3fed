use feed_core::models::{Article, Category, CategoryFilter, FeedbackRecord, Reaction, ReactionFilter, Tab};
use feed_core::pagination::{Pagination, ScrollOutcome, PAGE_SIZE};
use feed_core::reactions::{ReactionStore, SavedItems};
use feed_core::view::{build_view, ViewFilters, ViewSources};

fn article(link: &str, category: Category) -> Article {
    Article {
        title: format!("Title {link}"),
        link: link.into(),
        description: String::new(),
        category,
        published: None,
    }
}

#[test]
fn first_scroll_only_shows_the_prompt() {
    let mut pagination = Pagination::default();
    assert_eq!(pagination.visible_count(), PAGE_SIZE);

    let outcome = pagination.on_near_bottom(45);

    assert_eq!(outcome, ScrollOutcome::PromptShown);
    assert!(pagination.show_continue_options());
    assert_eq!(pagination.visible_count(), PAGE_SIZE);
}

#[test]
fn continuing_grows_the_window_until_the_list_is_covered() {
    let mut pagination = Pagination::default();
    pagination.on_near_bottom(25);
    pagination.continue_scrolling();
    assert!(!pagination.show_continue_options());
    assert!(pagination.has_continued());

    assert_eq!(pagination.on_near_bottom(25), ScrollOutcome::Grew(20));
    assert_eq!(pagination.on_near_bottom(25), ScrollOutcome::Grew(30));
    assert_eq!(pagination.on_near_bottom(25), ScrollOutcome::Exhausted);
    assert_eq!(pagination.visible_count(), 30);
    assert_eq!(pagination.clamp(25), 25);
}

#[test]
fn reset_closes_the_gate_again() {
    let mut pagination = Pagination::default();
    pagination.continue_scrolling();
    pagination.on_near_bottom(100);
    pagination.reset();

    assert_eq!(pagination, Pagination::default());
    assert_eq!(pagination.on_near_bottom(100), ScrollOutcome::PromptShown);
}

#[test]
fn window_clamps_to_short_lists() {
    let pagination = Pagination::default();
    let items = [1, 2, 3];
    assert_eq!(pagination.window(&items), &[1, 2, 3]);
}

#[test]
fn filters_apply_as_a_conjunction() {
    let feed = vec![
        article("news-liked", Category::News),
        article("grant-liked", Category::Grant),
        article("news-plain", Category::News),
    ];
    let reactions = ReactionStore::from_records(vec![
        FeedbackRecord { article_id: "news-liked".into(), action: Some(Reaction::Like) },
        FeedbackRecord { article_id: "grant-liked".into(), action: Some(Reaction::Like) },
    ]);
    let saved = SavedItems::default();
    let sources = ViewSources { tab: Tab::Feed, feed: &feed, saved: &saved, reactions: &reactions };

    let filters = ViewFilters {
        reaction: ReactionFilter::Only(Reaction::Like),
        category: CategoryFilter::Only(Category::News),
    };
    let matched: Vec<&str> = sources.filtered(&filters).into_iter().map(|a| a.link.as_str()).collect();
    assert_eq!(matched, vec!["news-liked"]);

    let all: Vec<&str> = sources
        .filtered(&ViewFilters::default())
        .into_iter()
        .map(|a| a.link.as_str())
        .collect();
    assert_eq!(all, vec!["news-liked", "grant-liked", "news-plain"]);
}

#[test]
fn saved_tab_requires_save_state_and_still_honours_reaction_filter() {
    let saved = SavedItems::new(vec![
        article("still-saved", Category::News),
        article("stale", Category::News),
    ]);
    let reactions = ReactionStore::from_records(vec![FeedbackRecord {
        article_id: "still-saved".into(),
        action: Some(Reaction::Save),
    }]);
    let sources = ViewSources { tab: Tab::Saved, feed: &[], saved: &saved, reactions: &reactions };

    let visible: Vec<&str> = sources
        .filtered(&ViewFilters::default())
        .into_iter()
        .map(|a| a.link.as_str())
        .collect();
    assert_eq!(visible, vec!["still-saved"]);

    let liked_news = ViewFilters {
        reaction: ReactionFilter::Only(Reaction::Like),
        category: CategoryFilter::Only(Category::News),
    };
    assert!(sources.filtered(&liked_news).is_empty());
}

#[test]
fn view_is_windowed_after_filtering() {
    let feed: Vec<Article> = (0..25)
        .map(|i| {
            let category = if i % 2 == 0 { Category::News } else { Category::Grant };
            article(&format!("a{i}"), category)
        })
        .collect();
    let reactions = ReactionStore::default();
    let saved = SavedItems::default();
    let sources = ViewSources { tab: Tab::Feed, feed: &feed, saved: &saved, reactions: &reactions };
    let filters = ViewFilters {
        reaction: ReactionFilter::All,
        category: CategoryFilter::Only(Category::News),
    };

    let (items, total) = build_view(&sources, filters, &Pagination::default());

    assert_eq!(total, 13);
    assert_eq!(items.len(), PAGE_SIZE);
    assert!(items.iter().all(|item| item.article.category == Category::News));
}

#[test]
fn filter_values_parse_from_their_wire_names() {
    assert_eq!("all".parse::<ReactionFilter>(), Ok(ReactionFilter::All));
    assert_eq!("save".parse::<ReactionFilter>(), Ok(ReactionFilter::Only(Reaction::Save)));
    assert_eq!(
        "Gov Opportunity".parse::<CategoryFilter>(),
        Ok(CategoryFilter::Only(Category::GovOpportunity))
    );
    assert!("bookmark".parse::<ReactionFilter>().is_err());
}
