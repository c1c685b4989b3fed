use feed_core::{compose, Article, BoostedTopics, Category};

fn article(link: &str, title: &str) -> Article {
    Article {
        title: title.into(),
        link: link.into(),
        description: String::new(),
        category: Category::News,
        published: None,
    }
}

fn links(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.link.as_str()).collect()
}

#[test]
fn interleaves_five_regular_then_one_boosted() {
    let mut fetched: Vec<Article> = (1..=12)
        .map(|i| article(&format!("r{i}"), &format!("Budget hearing {i}")))
        .collect();
    // Boosted items are fetched first to show that order comes from the composer.
    fetched.insert(0, article("b1", "New CYBER strategy"));
    fetched.insert(7, article("b2", "Cyber command reorganised"));

    let topics = BoostedTopics::new(["Cyber"]);
    let composed = compose(fetched, &topics);

    assert_eq!(
        links(&composed),
        vec!["r1", "r2", "r3", "r4", "r5", "b1", "r6", "r7", "r8", "r9", "r10", "b2", "r11", "r12"]
    );
}

#[test]
fn empty_topics_leave_fetch_order_untouched() {
    let fetched = vec![
        article("a", "Cyber drills"),
        article("b", "Grant call"),
        article("c", "Cyber budget"),
    ];
    let composed = compose(fetched.clone(), &BoostedTopics::default());
    assert_eq!(composed, fetched);
}

#[test]
fn no_matching_titles_keeps_order() {
    let fetched = vec![article("a", "Navy"), article("b", "Army")];
    let composed = compose(fetched.clone(), &BoostedTopics::new(["space"]));
    assert_eq!(composed, fetched);
}

#[test]
fn boosted_surplus_is_drained_after_regulars_run_out() {
    let fetched = vec![
        article("b1", "AI testing"),
        article("r1", "Shipbuilding"),
        article("b2", "AI procurement"),
        article("b3", "Ai ethics board"),
        article("r2", "Logistics"),
    ];
    let composed = compose(fetched, &BoostedTopics::new(["ai"]));
    assert_eq!(links(&composed), vec!["r1", "r2", "b1", "b2", "b3"]);
}

#[test]
fn all_boosted_keeps_relative_order() {
    let fetched = vec![article("b1", "AI one"), article("b2", "AI two")];
    let composed = compose(fetched, &BoostedTopics::new(["ai"]));
    assert_eq!(links(&composed), vec!["b1", "b2"]);
}

#[test]
fn topics_are_lowercased_and_blank_ones_dropped() {
    let topics = BoostedTopics::new(["  Defense ", "", "DEFENSE", "China"]);
    assert_eq!(topics.topics().to_vec(), vec!["defense".to_string(), "china".to_string()]);
    assert!(topics.matches("China's new carrier"));
    assert!(!topics.matches("Grant deadlines"));
}
