use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_SOURCE: &str = "Unknown";
pub const NO_SUMMARY: &str = "No summary available";

/// A raw entry as returned by a feed source, before any defaulting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
}

/// A fetched feed: its own title (used as the article source) and its entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub title: Option<String>,
    pub entries: Vec<FeedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub source: String,
    /// Category of the feed the article was fetched from.
    pub feed_category: String,
    pub summary: String,
    /// Category assigned by the classifier. Always a member of the label set once set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Interest that got the article into a user's digest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_interest: Option<String>,
}

impl Article {
    /// Builds an article from a feed entry, replacing absent or blank fields
    /// with their placeholders.
    pub fn from_feed_entry(entry: FeedEntry, feed_title: Option<&str>, feed_category: &str) -> Self {
        Self {
            title: present(entry.title).unwrap_or_else(|| UNTITLED.to_string()),
            link: present(entry.link).unwrap_or_default(),
            source: present(feed_title.map(str::to_string)).unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            feed_category: feed_category.to_string(),
            summary: present(entry.summary).unwrap_or_else(|| NO_SUMMARY.to_string()),
            category: None,
            matched_interest: None,
        }
    }

    /// Category used for grouping: the derived one, or the feed's when the
    /// article has not been classified.
    pub fn display_category(&self) -> &str {
        self.category.as_deref().unwrap_or(&self.feed_category)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Articles sharing a derived category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub articles: Vec<Article>,
}

/// Groups articles by `display_category`. Groups appear in the order their
/// category is first seen and articles keep their relative order.
pub fn group_by_category<I>(articles: I) -> Vec<CategoryGroup>
where
    I: IntoIterator<Item = Article>,
{
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for article in articles {
        match groups.iter_mut().find(|g| g.category == article.display_category()) {
            Some(group) => group.articles.push(article),
            None => groups.push(CategoryGroup {
                category: article.display_category().to_string(),
                articles: vec![article],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, category: &str) -> Article {
        let mut article = Article::from_feed_entry(
            FeedEntry {
                title: Some(title.to_string()),
                link: Some(format!("https://example.com/{}", title)),
                summary: Some("summary".to_string()),
            },
            Some("Example"),
            "General News",
        );
        article.category = Some(category.to_string());
        article
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let article = Article::from_feed_entry(FeedEntry::default(), None, "Technology");
        assert_eq!(article.title, UNTITLED);
        assert_eq!(article.link, "");
        assert_eq!(article.source, UNKNOWN_SOURCE);
        assert_eq!(article.summary, NO_SUMMARY);
        assert_eq!(article.feed_category, "Technology");
        assert!(article.category.is_none());
        assert!(article.matched_interest.is_none());
    }

    #[test]
    fn test_blank_summary_counts_as_missing() {
        let entry = FeedEntry {
            title: Some("Title".to_string()),
            link: Some("https://example.com".to_string()),
            summary: Some("   \n".to_string()),
        };
        let article = Article::from_feed_entry(entry, Some("  "), "Science");
        assert_eq!(article.summary, NO_SUMMARY);
        assert_eq!(article.source, UNKNOWN_SOURCE);
    }

    #[test]
    fn test_group_by_category_keeps_first_seen_order() {
        let groups = group_by_category(vec![
            article("a", "Sports"),
            article("b", "Technology"),
            article("c", "Sports"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Sports");
        assert_eq!(groups[0].articles.len(), 2);
        assert_eq!(groups[0].articles[1].title, "c");
        assert_eq!(groups[1].category, "Technology");
    }

    #[test]
    fn test_unclassified_article_groups_by_feed_category() {
        let mut a = article("a", "Sports");
        a.category = None;
        let groups = group_by_category(vec![a]);
        assert_eq!(groups[0].category, "General News");
    }
}
