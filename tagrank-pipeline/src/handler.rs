//! Invocation boundary for scheduled and command-line runs.
//!
//! Errors stop here: they are logged with their kind and the invocation ids, and
//! the caller receives `None`.
use serde_json::Value;
use tagrank_common::{Result, TagrankError};
use tagrank_config::{TagrankConfig, TagrankConfigLoader};
use tagrank_http::OAuth1Credentials;
use tagrank_social::twitter::{TweetSearch, TwitterApi};
use tagrank_store::{DynamoUserStore, UserStore};
use tracing::{Instrument, debug, error, info, info_span};

use crate::{Collector, HASHTAGS, PAGE_SIZE, Pipeline};

/// Identifies one invocation in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
    pub function_name: String,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            function_name: function_name.into(),
        }
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new("local", "tagrank")
    }
}

/// Load configuration (including `.env`) and run the job once.
///
/// Returns `Some(vec![])` on success and `None` after logging any failure.
pub async fn handler(event: Value, ctx: InvocationContext) -> Option<Vec<Value>> {
    match TagrankConfigLoader::new().with_dotenv().load() {
        Ok(cfg) => handler_with_config(&cfg, event, ctx).await,
        Err(err) => {
            log_failure(&TagrankError::from(err), &ctx);
            None
        }
    }
}

/// Same as [`handler`] with configuration already loaded.
pub async fn handler_with_config(
    cfg: &TagrankConfig,
    event: Value,
    ctx: InvocationContext,
) -> Option<Vec<Value>> {
    let span = info_span!(
        "invocation",
        request_id = %ctx.request_id,
        function = %ctx.function_name
    );
    async {
        debug!(event = %event, "handler.invoked");
        match bootstrap(cfg).await {
            Ok(pipeline) => handle(&pipeline, &ctx).await,
            Err(err) => {
                log_failure(&err, &ctx);
                None
            }
        }
    }
    .instrument(span)
    .await
}

/// Run an assembled pipeline and collapse the outcome for the caller.
pub async fn handle<S, U>(pipeline: &Pipeline<S, U>, ctx: &InvocationContext) -> Option<Vec<Value>>
where
    S: TweetSearch,
    U: UserStore,
{
    match pipeline.run().await {
        Ok(report) => {
            info!(
                request_id = %ctx.request_id,
                collected = report.collected,
                persisted = report.persisted,
                "handler.succeeded"
            );
            Some(Vec::new())
        }
        Err(err) => {
            log_failure(&err, ctx);
            None
        }
    }
}

pub fn log_failure(err: &TagrankError, ctx: &InvocationContext) {
    error!(
        request_id = %ctx.request_id,
        function = %ctx.function_name,
        kind = err.kind().as_str(),
        error = %err,
        "handler.failed"
    );
}

async fn bootstrap(cfg: &TagrankConfig) -> Result<Pipeline<TwitterApi, DynamoUserStore>> {
    let tw = &cfg.twitter;
    let credentials = OAuth1Credentials::new(
        tw.consumer_key.as_str(),
        tw.consumer_secret.as_str(),
        tw.access_token.as_str(),
        tw.access_token_secret.as_str(),
    );
    let api = TwitterApi::new(&tw.api_base_url, credentials)?;
    info!(api_base = api.base_url(), "handler.authenticated");

    let store = DynamoUserStore::connect(
        cfg.store.table_name.as_str(),
        cfg.store.region.as_str(),
        cfg.store.endpoint_url.as_deref(),
    )
    .await;

    Ok(Pipeline::new(Collector::new(api, HASHTAGS, PAGE_SIZE), store))
}
