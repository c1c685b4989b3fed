use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Editorial bucket assigned to an article by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Category {
    News,
    Grant,
    #[serde(rename = "Gov Opportunity")]
    GovOpportunity,
    #[serde(rename = "Think Tank")]
    ThinkTank,
    International,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::News,
        Category::Grant,
        Category::GovOpportunity,
        Category::ThinkTank,
        Category::International,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::News => "News",
            Category::Grant => "Grant",
            Category::GovOpportunity => "Gov Opportunity",
            Category::ThinkTank => "Think Tank",
            Category::International => "International",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown category: {value}"))
    }
}

/// One feed entry. `link` is the identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
}

fn image_src_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<img[^>]*?src=['"]([^'"]*)['"]"#).expect("image pattern is a valid regex")
    })
}

impl Article {
    /// Description with all markup stripped, as shown in card previews.
    pub fn plain_description(&self) -> String {
        if self.description.is_empty() {
            return String::new();
        }
        html2text::from_read(self.description.as_bytes(), 2000)
            .trim()
            .to_owned()
    }

    /// First `<img src>` embedded in the description, if any.
    pub fn image_url(&self) -> Option<&str> {
        image_src_pattern()
            .captures(&self.description)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|src| !src.is_empty())
    }
}

/// A user's reaction to an article. The absence of a reaction is modelled as `None`
/// in the reaction map, never as a variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like,
    Dislike,
    Save,
    Hide,
}

impl Reaction {
    pub const ALL: [Reaction; 4] = [
        Reaction::Like,
        Reaction::Dislike,
        Reaction::Save,
        Reaction::Hide,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Reaction::Like => "like",
            Reaction::Dislike => "dislike",
            Reaction::Save => "save",
            Reaction::Hide => "hide",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reaction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Reaction::ALL
            .into_iter()
            .find(|reaction| reaction.as_str() == value.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown reaction: {value}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReactionFilter {
    #[default]
    All,
    Only(Reaction),
}

impl ReactionFilter {
    /// Value sent as the `filter` query parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            ReactionFilter::All => "all",
            ReactionFilter::Only(reaction) => reaction.as_str(),
        }
    }

    pub fn accepts(self, state: Option<Reaction>) -> bool {
        match self {
            ReactionFilter::All => true,
            ReactionFilter::Only(wanted) => state == Some(wanted),
        }
    }
}

impl FromStr for ReactionFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            Ok(ReactionFilter::All)
        } else {
            value.parse().map(ReactionFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn accepts(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            value.parse().map(CategoryFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Feed,
    Saved,
}

/// Body of `POST /feedback` and element of `GET /feedback`. A `None` action clears
/// the stored reaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub article_id: String,
    pub action: Option<Reaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserTopic {
    pub topic: String,
}
