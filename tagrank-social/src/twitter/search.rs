use async_trait::async_trait;
use tagrank_common::Result;

use crate::twitter::types::Status;

/// A provider that answers one raw search query with a single page of tweets.
///
/// Implementations must not paginate; the returned order is the provider's order.
#[async_trait]
pub trait TweetSearch: Send + Sync {
    /// Run `raw_query` (already percent-encoded, e.g. `q=%23sre&count=10`).
    async fn search(&self, raw_query: &str) -> Result<Vec<Status>>;
}
