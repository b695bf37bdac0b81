//! DynamoDB-backed [`UserStore`].
//!
//! Every upsert is an unconditional `PutItem`, so the last write for an id wins.
//! There is no batching and no transaction across records.
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use tagrank_common::{Result, TagrankError};
use tracing::{debug, info};

use crate::{UserRecord, UserStore};

#[derive(Clone, Debug)]
pub struct DynamoUserStore {
    client: Client,
    table: String,
}

impl DynamoUserStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Build a client from the ambient AWS credential chain.
    ///
    /// `endpoint_url` points the client at DynamoDB Local or another compatible
    /// endpoint instead of the regional service.
    pub async fn connect(
        table: impl Into<String>,
        region: impl Into<String>,
        endpoint_url: Option<&str>,
    ) -> Self {
        let region = Region::new(region.into());
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region.clone());
        if let Some(ep) = endpoint_url {
            loader = loader.endpoint_url(ep);
        }
        let sdk_config = loader.load().await;
        let store = Self::new(Client::new(&sdk_config), table);
        info!(
            table = %store.table,
            region = %region,
            endpoint = endpoint_url.unwrap_or("-"),
            "store.dynamo.connected"
        );
        store
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl UserStore for DynamoUserStore {
    async fn upsert(&self, record: &UserRecord) -> Result<()> {
        let item: HashMap<String, AttributeValue> = serde_dynamo::to_item(record)
            .map_err(|e| TagrankError::Store(format!("serialize user {}: {e}", record.id)))?;

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| {
                TagrankError::Store(format!(
                    "put user {} into {}: {}",
                    record.id,
                    self.table,
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(
            table = %self.table,
            user_id = %record.id,
            followers_count = record.followers_count,
            "store.dynamo.put_item"
        );
        Ok(())
    }
}
