use super::{FeedData, FeedFetcher};
use crate::api::ApiClient;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub const HEADLINE_FEED_ID: &str = "headline";

/// Polls `GET /headline` for the latest shared headline.
pub struct HeadlineFetcher {
    client: Arc<ApiClient>,
}

impl HeadlineFetcher {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedFetcher for HeadlineFetcher {
    fn id(&self) -> &str {
        HEADLINE_FEED_ID
    }

    async fn fetch(&self) -> Result<FeedData> {
        let headline = self.client.fetch_headline().await?;

        if headline.is_empty() {
            return Err(anyhow::anyhow!(
                "Headline endpoint at {} returned an empty body",
                self.client.base_url()
            ));
        }

        Ok(FeedData::Headline(headline))
    }
}
