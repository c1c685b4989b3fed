use std::path::PathBuf;

use feed_core::models::{Article, Category};
use feed_core::EngineConfig;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("govfeed-test-{}", uuid::Uuid::new_v4()))
        .join(name)
}

#[test]
fn corrupted_config_falls_back_to_defaults() {
    let path = scratch_path("config.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"{ not json").unwrap();

    let config = EngineConfig::load_from(&path);

    assert_eq!(config.backend.base_url, "http://localhost:8080");
    assert_eq!(config.expansion.max_terms, 5);
    assert_eq!(
        config.feed.suggested_topics,
        vec!["AI", "Defense", "Cybersecurity", "China", "Pentagon"]
    );
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn missing_config_file_yields_defaults() {
    let config = EngineConfig::load_from(scratch_path("absent.json"));
    assert!(config.expansion.enabled);
    assert_eq!(config.backend.request_timeout_seconds, 15);
}

#[test]
fn saved_config_is_read_back() {
    let path = scratch_path("nested/config.json");
    let mut config = EngineConfig::default();
    config.backend.base_url = "https://feed.example.gov".into();
    config.expansion.enabled = false;
    config.feed.suggested_topics = vec!["Space".into()];

    config.save_to(&path).expect("write config");
    let loaded = EngineConfig::load_from(&path);

    assert_eq!(loaded.backend.base_url, "https://feed.example.gov");
    assert!(!loaded.expansion.enabled);
    assert_eq!(loaded.feed.suggested_topics, vec!["Space"]);
    let _ = std::fs::remove_dir_all(path.parent().unwrap().parent().unwrap());
}

#[test]
fn categories_use_their_display_names_on_the_wire() {
    let article: Article = serde_json::from_value(serde_json::json!({
        "title": "Brookings brief",
        "link": "https://example.com/tt",
        "category": "Think Tank"
    }))
    .unwrap();
    assert_eq!(article.category, Category::ThinkTank);
    assert_eq!(article.description, "");
    assert_eq!(article.published, None);

    assert_eq!(
        serde_json::to_value(Category::GovOpportunity).unwrap(),
        serde_json::json!("Gov Opportunity")
    );
    assert_eq!("think tank".parse::<Category>(), Ok(Category::ThinkTank));
}

#[test]
fn description_helpers_strip_markup_and_find_images() {
    let article = Article {
        title: "Contract".into(),
        link: "https://example.com/c".into(),
        description: r#"<p>Award <b>announced</b></p><img alt="x" src='https://img.example.com/c.jpg'>"#
            .into(),
        category: Category::News,
        published: None,
    };

    let plain = article.plain_description();
    assert!(plain.contains("Award"));
    assert!(plain.contains("announced"));
    assert!(!plain.contains('<'));
    assert_eq!(article.image_url(), Some("https://img.example.com/c.jpg"));

    let bare = Article { description: String::new(), ..article };
    assert_eq!(bare.plain_description(), "");
    assert_eq!(bare.image_url(), None);
}
