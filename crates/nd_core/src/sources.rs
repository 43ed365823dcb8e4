use async_trait::async_trait;
use crate::types::Feed;
use crate::Result;

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse the feed at `url`
    async fn fetch(&self, url: &str) -> Result<Feed>;
}
