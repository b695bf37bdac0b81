//! Durable storage for ranked users.
//!
//! A [`UserStore`] offers a single create-or-replace write keyed by user id.
//! [`dynamo::DynamoUserStore`] backs production runs; [`memory::MemoryUserStore`]
//! keeps rows in process for tests and dry runs.
pub mod dynamo;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tagrank_common::Result;

pub use dynamo::DynamoUserStore;
pub use memory::MemoryUserStore;

pub const DEFAULT_TABLE: &str = "users";
pub const DEFAULT_REGION: &str = "us-east-1";

/// One row of the `users` table: hash key `id`, plus `name` and `followers_count`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub followers_count: u64,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create or overwrite the row whose key is `record.id`.
    async fn upsert(&self, record: &UserRecord) -> Result<()>;
}
