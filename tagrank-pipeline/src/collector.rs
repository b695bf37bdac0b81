use tagrank_common::Result;
use tagrank_social::twitter::TweetSearch;
use tracing::{debug, info, warn};

use crate::Observation;

/// Build the raw search query for one hashtag.
///
/// ```
/// assert_eq!(
///     tagrank_pipeline::raw_query("%23sre", 10),
///     "q=%23sre&src=typed_query&count=10"
/// );
/// ```
pub fn raw_query(hashtag: &str, count: u32) -> String {
    format!("q={hashtag}&src=typed_query&count={count}")
}

/// Issues one search per hashtag through a shared [`TweetSearch`].
pub struct Collector<S> {
    search: S,
    hashtags: Vec<String>,
    page_size: u32,
}

impl<S: TweetSearch> Collector<S> {
    pub fn new<I, T>(search: S, hashtags: I, page_size: u32) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            search,
            hashtags: hashtags.into_iter().map(Into::into).collect(),
            page_size,
        }
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Search every hashtag in order and flatten the results.
    ///
    /// Requests are awaited one at a time; the first failure ends collection.
    pub async fn collect(&self) -> Result<Vec<Observation>> {
        let mut observations = Vec::new();

        for hashtag in &self.hashtags {
            let query = raw_query(hashtag, self.page_size);
            debug!(hashtag = %hashtag, query = %query, "collector.hashtag.start");

            let statuses = match self.search.search(&query).await {
                Ok(statuses) => statuses,
                Err(err) => {
                    warn!(hashtag = %hashtag, kind = err.kind().as_str(), error = %err, "collector.hashtag.failed");
                    return Err(err);
                }
            };

            let before = observations.len();
            observations.extend(statuses.iter().map(|s| Observation::from_status(hashtag, s)));
            info!(
                hashtag = %hashtag,
                observations = observations.len() - before,
                "collector.hashtag.done"
            );
        }

        Ok(observations)
    }
}
