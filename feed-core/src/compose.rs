use crate::models::{Article, UserTopic};

/// Number of regular articles emitted before each boosted one.
pub const REGULAR_RUN_LENGTH: usize = 5;

/// Lowercased interest topics matched against article titles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoostedTopics {
    topics: Vec<String>,
}

impl BoostedTopics {
    pub fn new<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut folded: Vec<String> = Vec::new();
        for topic in topics {
            let topic = topic.as_ref().trim().to_lowercase();
            if !topic.is_empty() && !folded.contains(&topic) {
                folded.push(topic);
            }
        }
        Self { topics: folded }
    }

    pub fn from_user_topics(topics: &[UserTopic]) -> Self {
        Self::new(topics.iter().map(|t| t.topic.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn matches(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.topics.iter().any(|topic| title.contains(topic.as_str()))
    }
}

/// Orders fetched articles for display.
///
/// Articles whose title mentions a boosted topic are spread through the list: after
/// every run of up to [`REGULAR_RUN_LENGTH`] regular articles comes one boosted
/// article. Once either side runs out the other is appended in fetch order. With no
/// boosted topics the input order is returned untouched.
pub fn compose(articles: Vec<Article>, boosted: &BoostedTopics) -> Vec<Article> {
    if boosted.is_empty() {
        return articles;
    }

    let total = articles.len();
    let (boosted_items, regular_items): (Vec<Article>, Vec<Article>) = articles
        .into_iter()
        .partition(|article| boosted.matches(&article.title));

    interleave(regular_items, boosted_items, REGULAR_RUN_LENGTH, total)
}

fn interleave<T>(regular: Vec<T>, boosted: Vec<T>, run: usize, capacity: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(capacity);
    let mut regular = regular.into_iter().peekable();
    let mut boosted = boosted.into_iter();

    while regular.peek().is_some() {
        out.extend(regular.by_ref().take(run));
        match boosted.next() {
            Some(item) => out.push(item),
            None => break,
        }
    }
    out.extend(regular);
    out.extend(boosted);
    out
}

#[cfg(test)]
mod tests {
    use super::interleave;

    #[test]
    fn interleave_drains_longer_side_in_order() {
        let out = interleave(vec![1, 2], vec![10, 11, 12], 5, 5);
        assert_eq!(out, vec![1, 2, 10, 11, 12]);
    }

    #[test]
    fn interleave_with_no_regular_items_keeps_boosted_order() {
        let out = interleave(Vec::new(), vec![10, 11], 5, 2);
        assert_eq!(out, vec![10, 11]);
    }
}
