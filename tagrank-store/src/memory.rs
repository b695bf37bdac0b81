use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tagrank_common::{Result, TagrankError};

use crate::{UserRecord, UserStore};

#[derive(Default)]
struct Inner {
    rows: HashMap<String, UserRecord>,
    writes: Vec<UserRecord>,
    fail_after: Option<usize>,
}

/// In-process [`UserStore`] that also records every write in call order.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `n` writes, then reject every following one.
    pub fn failing_after(n: usize) -> Self {
        let store = Self::default();
        store.lock().fail_after = Some(n);
        store
    }

    pub fn get(&self, id: &str) -> Option<UserRecord> {
        self.lock().rows.get(id).cloned()
    }

    /// Stored rows ordered by follower count, descending, then id.
    pub fn snapshot(&self) -> Vec<UserRecord> {
        let mut rows: Vec<UserRecord> = self.lock().rows.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.followers_count
                .cmp(&a.followers_count)
                .then_with(|| a.id.cmp(&b.id))
        });
        rows
    }

    /// Every accepted write, in the order it was issued.
    pub fn writes(&self) -> Vec<UserRecord> {
        self.lock().writes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking test thread must not hide the rows from later assertions.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn upsert(&self, record: &UserRecord) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_after.is_some_and(|n| inner.writes.len() >= n) {
            return Err(TagrankError::Store(format!(
                "memory store rejected user {}",
                record.id
            )));
        }
        inner.writes.push(record.clone());
        inner.rows.insert(record.id.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, followers: u64) -> UserRecord {
        UserRecord {
            id: id.into(),
            name: format!("user {id}"),
            followers_count: followers,
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_by_id() {
        let store = MemoryUserStore::new();
        store.upsert(&rec("u1", 10)).await.unwrap();
        store.upsert(&rec("u1", 5)).await.unwrap();

        assert_eq!(store.get("u1").unwrap().followers_count, 5);
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(store.writes().len(), 2);
    }

    #[tokio::test]
    async fn snapshot_orders_by_followers_descending() {
        let store = MemoryUserStore::new();
        for (id, f) in [("a", 1), ("b", 30), ("c", 30), ("d", 7)] {
            store.upsert(&rec(id, f)).await.unwrap();
        }
        let ids: Vec<String> = store.snapshot().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["b", "c", "d", "a"]);
    }

    #[tokio::test]
    async fn failing_store_keeps_earlier_writes() {
        let store = MemoryUserStore::failing_after(1);
        store.upsert(&rec("a", 1)).await.unwrap();
        let err = store.upsert(&rec("b", 2)).await.unwrap_err();

        assert!(matches!(err, TagrankError::Store(_)));
        assert!(store.get("a").is_some());
        assert!(store.get("b").is_none());
    }
}
