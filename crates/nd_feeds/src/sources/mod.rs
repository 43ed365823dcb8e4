use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use nd_core::{Feed, FeedEntry, FeedSource, Result};

pub mod markup;
pub mod parser;

pub use markup::plain_text;
pub use parser::parse_feed;

const USER_AGENT: &str = concat!("nd/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Fetches feeds over HTTP and reduces their text fields to plain text.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<Feed> {
        let body = self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let feed = parse_feed(&body)?;
        Ok(clean_feed(feed))
    }
}

/// Strips markup from titles and summaries.
pub fn clean_feed(feed: Feed) -> Feed {
    Feed {
        title: feed.title.map(|t| plain_text(&t)),
        entries: feed
            .entries
            .into_iter()
            .map(|entry| FeedEntry {
                title: entry.title.map(|t| plain_text(&t)),
                link: entry.link.map(|l| l.trim().to_string()),
                summary: entry.summary.map(|s| plain_text(&s)),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_feed() {
        let feed = parse_feed(
            r#"<rss><channel><title>Wired</title><item>
                <title>Chips &amp;amp; more</title>
                <link> https://example.com/a </link>
                <description>&lt;p&gt;Fast &lt;i&gt;chips&lt;/i&gt;&lt;/p&gt;</description>
            </item></channel></rss>"#,
        )
        .unwrap();
        let feed = clean_feed(feed);
        let entry = &feed.entries[0];
        assert_eq!(entry.title.as_deref(), Some("Chips & more"));
        assert_eq!(entry.link.as_deref(), Some("https://example.com/a"));
        assert_eq!(entry.summary.as_deref(), Some("Fast chips"));
    }
}
