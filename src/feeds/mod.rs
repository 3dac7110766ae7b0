pub mod headline;

use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct FeedMessage {
    pub feed_id: String,
    pub data: FeedData,
}

#[derive(Debug, Clone)]
pub enum FeedData {
    Headline(String),
    Error(String),
}

/// One pull from a remote feed, run on every poll tick.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    fn id(&self) -> &str;

    async fn fetch(&self) -> Result<FeedData>;
}
