use std::sync::Arc;
use nd_core::config::DEFAULT_MAX_ARTICLES_PER_CATEGORY;
use nd_core::{Article, CategoryFeeds, FeedSource};
use crate::logging::Logger;

/// Gathers articles category by category, feed by feed, stopping each
/// category once it holds `max_per_category` articles.
pub struct FeedCollector {
    source: Arc<dyn FeedSource>,
    max_per_category: usize,
}

impl FeedCollector {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self::with_cap(source, DEFAULT_MAX_ARTICLES_PER_CATEGORY)
    }

    pub fn with_cap(source: Arc<dyn FeedSource>, max_per_category: usize) -> Self {
        Self { source, max_per_category }
    }

    pub fn max_per_category(&self) -> usize {
        self.max_per_category
    }

    /// Articles from every category in configuration order. A feed that
    /// fails to load contributes nothing.
    pub async fn collect(&self, categories: &[CategoryFeeds]) -> Vec<Article> {
        tracing::info!("📰 Fetching news from {} categories", categories.len());
        let mut articles = Vec::new();
        for category in categories {
            articles.extend(self.collect_category(category).await);
        }
        tracing::info!("✨ Found {} articles", articles.len());
        articles
    }

    pub async fn collect_category(&self, category: &CategoryFeeds) -> Vec<Article> {
        let logger = Logger::new().with_prefix(format!("[{}]", category.name));
        let mut articles = Vec::new();

        for url in &category.feeds {
            if articles.len() >= self.max_per_category {
                break;
            }

            logger.debug(&format!("Fetching {}", url));
            let feed = match self.source.fetch(url).await {
                Ok(feed) => feed,
                Err(e) => {
                    logger.warn(&format!("⚠️ Failed to fetch {}: {}", url, e));
                    continue;
                }
            };

            let remaining = self.max_per_category - articles.len();
            let feed_title = feed.title.as_deref();
            articles.extend(
                feed.entries
                    .iter()
                    .take(remaining)
                    .map(|entry| Article::from_feed_entry(entry.clone(), feed_title, &category.name)),
            );
        }

        logger.info(&format!("🗞️ Collected {} articles", articles.len()));
        articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use async_trait::async_trait;
    use nd_core::{Error, Feed, FeedEntry, Result};

    #[derive(Default)]
    struct FakeSource {
        feeds: HashMap<String, Feed>,
        fetched: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn with_feed(mut self, url: &str, title: Option<&str>, entries: usize) -> Self {
            let feed = Feed {
                title: title.map(str::to_string),
                entries: (0..entries)
                    .map(|i| FeedEntry {
                        title: Some(format!("{} #{}", url, i)),
                        link: Some(format!("{}/{}", url, i)),
                        summary: if i % 2 == 0 { Some("Summary".to_string()) } else { None },
                    })
                    .collect(),
            };
            self.feeds.insert(url.to_string(), feed);
            self
        }
    }

    #[async_trait]
    impl FeedSource for FakeSource {
        async fn fetch(&self, url: &str) -> Result<Feed> {
            self.fetched.lock().unwrap().push(url.to_string());
            self.feeds
                .get(url)
                .cloned()
                .ok_or_else(|| Error::Feed(format!("unreachable: {}", url)))
        }
    }

    fn category(name: &str, feeds: &[&str]) -> CategoryFeeds {
        CategoryFeeds {
            name: name.to_string(),
            feeds: feeds.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_cap_spans_feeds_and_skips_remaining() {
        let source = Arc::new(
            FakeSource::default()
                .with_feed("https://a.example", Some("A"), 3)
                .with_feed("https://b.example", Some("B"), 4)
                .with_feed("https://c.example", Some("C"), 4),
        );
        let collector = FeedCollector::new(source.clone());

        let articles = collector
            .collect_category(&category("Technology", &["https://a.example", "https://b.example", "https://c.example"]))
            .await;

        assert_eq!(articles.len(), 5);
        assert_eq!(articles[0].source, "A");
        assert_eq!(articles[3].source, "B");
        assert!(articles.iter().all(|a| a.feed_category == "Technology"));
        assert_eq!(*source.fetched.lock().unwrap(), vec!["https://a.example", "https://b.example"]);
    }

    #[tokio::test]
    async fn test_failed_feed_is_skipped() {
        let source = Arc::new(FakeSource::default().with_feed("https://ok.example", None, 2));
        let collector = FeedCollector::with_cap(source, 10);

        let articles = collector
            .collect(&[
                category("Science", &["https://down.example", "https://ok.example"]),
                category("Sports", &[]),
            ])
            .await;

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].source, "Unknown");
        assert_eq!(articles[0].summary, "Summary");
        assert_eq!(articles[1].summary, "No summary available");
    }

    #[tokio::test]
    async fn test_categories_keep_configuration_order() {
        let source = Arc::new(
            FakeSource::default()
                .with_feed("https://s.example", Some("S"), 1)
                .with_feed("https://t.example", Some("T"), 1),
        );
        let collector = FeedCollector::new(source);
        let articles = collector
            .collect(&[category("Sports", &["https://s.example"]), category("Technology", &["https://t.example"])])
            .await;
        let categories: Vec<&str> = articles.iter().map(|a| a.feed_category.as_str()).collect();
        assert_eq!(categories, vec!["Sports", "Technology"]);
    }

    #[tokio::test]
    async fn test_zero_cap_fetches_nothing() {
        let source = Arc::new(FakeSource::default().with_feed("https://a.example", None, 3));
        let collector = FeedCollector::with_cap(source.clone(), 0);
        assert!(collector.collect_category(&category("News", &["https://a.example"])).await.is_empty());
        assert!(source.fetched.lock().unwrap().is_empty());
    }
}
