//! Hashtag follower ranking: collect, rank, persist.
//!
//! A [`Pipeline`] runs the three stages once, in order:
//!
//! 1. [`Collector`] issues one search per hashtag and flattens the results into
//!    [`Observation`]s, keeping hashtag order and the provider's order within each.
//! 2. [`rank`] stable-sorts the complete collection by follower count, descending.
//! 3. [`persist`] upserts one [`UserRecord`] per observation, in ranked order.
//!
//! [`handler`] is the invocation boundary: it builds a pipeline from
//! configuration, runs it, and turns any failure into a logged `None`.
pub mod collector;
pub mod handler;
pub mod persister;
pub mod ranker;

use serde::Serialize;
use tagrank_common::Result;
use tagrank_social::twitter::TweetSearch;
use tagrank_social::twitter::types::Status;
use tagrank_store::{UserRecord, UserStore};
use tracing::info;

pub use collector::{Collector, raw_query};
pub use handler::{InvocationContext, handle, handler, handler_with_config, log_failure};
pub use persister::persist;
pub use ranker::rank;

/// Hashtags searched on every run, already percent-encoded for the raw query.
pub const HASHTAGS: [&str; 10] = [
    "%23openbanking",
    "%23remediation",
    "%23devops",
    "%23sre",
    "%23microservices",
    "%23observability",
    "%23oauth",
    "%23metrics",
    "%23logmonitoring",
    "%23opentracing",
];

/// Results requested per hashtag. Only the first page is ever read.
pub const PAGE_SIZE: u32 = 10;

/// One matching tweet reduced to its author and hashtags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub user_id: String,
    pub name: String,
    pub followers_count: u64,
    pub hashtags: Vec<String>,
    /// The configured hashtag whose query returned this tweet.
    pub source: String,
}

impl Observation {
    pub fn from_status(source: &str, status: &Status) -> Self {
        Self {
            user_id: status.user.id_str.clone(),
            name: status.user.name.clone(),
            followers_count: status.user.followers_count,
            hashtags: status.hashtag_texts(),
            source: source.to_string(),
        }
    }

    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            id: self.user_id.clone(),
            name: self.name.clone(),
            followers_count: self.followers_count,
        }
    }
}

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub collected: usize,
    pub persisted: usize,
    /// Observation count per configured hashtag, in search order.
    pub per_hashtag: Vec<(String, usize)>,
    /// Highest-ranked observation, if anything was collected.
    pub top: Option<Observation>,
}

pub struct Pipeline<S, U> {
    collector: Collector<S>,
    store: U,
}

impl<S: TweetSearch, U: UserStore> Pipeline<S, U> {
    pub fn new(collector: Collector<S>, store: U) -> Self {
        Self { collector, store }
    }

    pub fn collector(&self) -> &Collector<S> {
        &self.collector
    }

    pub fn store(&self) -> &U {
        &self.store
    }

    /// Collect, rank once, then persist in ranked order.
    ///
    /// A collection error returns before any write. A store error stops the
    /// remaining writes and leaves earlier ones in place.
    pub async fn run(&self) -> Result<RunReport> {
        info!(
            hashtags = self.collector.hashtags().len(),
            page_size = self.collector.page_size(),
            "pipeline.start"
        );

        let observations = self.collector.collect().await?;
        let per_hashtag = self
            .collector
            .hashtags()
            .iter()
            .map(|h| {
                let n = observations.iter().filter(|o| &o.source == h).count();
                (h.clone(), n)
            })
            .collect();

        let ranked = rank(observations);
        info!(observations = ranked.len(), "pipeline.insert");
        let persisted = persist(&self.store, &ranked).await?;

        let report = RunReport {
            collected: ranked.len(),
            persisted,
            per_hashtag,
            top: ranked.into_iter().next(),
        };
        info!(
            collected = report.collected,
            persisted = report.persisted,
            top_user = report.top.as_ref().map(|o| o.user_id.as_str()).unwrap_or("-"),
            "pipeline.done"
        );
        Ok(report)
    }
}
