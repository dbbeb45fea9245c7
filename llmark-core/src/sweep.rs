//! TTL-based bookmark retention.

use tracing::{debug, info};

use crate::config::MarkConfig;
use crate::error::StoreError;
use crate::store::BookmarkStore;
use crate::types::now_ms;

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Bookmarks examined.
    pub scanned: usize,
    /// Bookmarks evicted for exceeding the TTL.
    pub evicted: usize,
    /// Whether the store was written back. False when nothing expired.
    pub wrote: bool,
}

/// Evicts bookmarks older than the retention TTL, across all URLs.
///
/// Invoked by an external periodic scheduler (roughly hourly); each pass is
/// independent and idempotent. A pass that evicts nothing performs no write
/// at all, so back-to-back sweeps cannot churn the shared key.
#[derive(Debug)]
pub struct RetentionSweeper {
    store: BookmarkStore,
    ttl_ms: i64,
}

impl RetentionSweeper {
    pub fn new(store: BookmarkStore, config: &MarkConfig) -> Self {
        Self {
            store,
            ttl_ms: config.retention.ttl_ms(),
        }
    }

    /// Sweep against the wall clock.
    pub async fn sweep(&self) -> Result<SweepStats, StoreError> {
        self.sweep_at(now_ms()).await
    }

    /// Sweep as of `now_ms`. A bookmark is evicted only when its age is
    /// strictly greater than the TTL: exactly-TTL-old survives.
    ///
    /// A failed read aborts the pass; it must never degrade into writing an
    /// empty store over real data.
    pub async fn sweep_at(&self, now_ms: i64) -> Result<SweepStats, StoreError> {
        let (marks, raw) = self.store.snapshot().await?;
        let scanned = marks.len();

        let (fresh, expired): (Vec<_>, Vec<_>) = marks
            .into_iter()
            .partition(|bm| now_ms - bm.created_ms() <= self.ttl_ms);

        if expired.is_empty() {
            debug!(scanned, "sweep found nothing expired");
            return Ok(SweepStats {
                scanned,
                evicted: 0,
                wrote: false,
            });
        }

        for bm in &expired {
            info!(id = %bm.id, title = %bm.title, "evicting expired bookmark");
        }
        self.store.replace_all(raw.as_ref(), &fresh).await?;

        let stats = SweepStats {
            scanned,
            evicted: expired.len(),
            wrote: true,
        };
        info!(evicted = stats.evicted, retained = fresh.len(), "sweep complete");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{KeyValueStore, MemoryKv};
    use crate::types::{Bookmark, BookmarkId};

    const TTL_MS: i64 = 14 * 24 * 60 * 60 * 1000;

    fn mark(id: i64, url: &str) -> Bookmark {
        Bookmark {
            id: BookmarkId(id),
            url: url.into(),
            title: format!("mark-{id}"),
            anchor_text: String::new(),
            pre_text: String::new(),
            post_text: String::new(),
            y: 0.0,
            color: "#FF5733".into(),
            created_at: None,
        }
    }

    fn sweeper(kv: Arc<dyn KeyValueStore>) -> RetentionSweeper {
        let config = MarkConfig::default();
        RetentionSweeper::new(BookmarkStore::new(kv, &config), &config)
    }

    async fn seeded() -> (RetentionSweeper, BookmarkStore) {
        let kv = Arc::new(MemoryKv::new());
        let config = MarkConfig::default();
        let store = BookmarkStore::new(kv.clone(), &config);
        (sweeper(kv), store)
    }

    #[tokio::test]
    async fn exactly_ttl_old_is_retained() {
        let (sweeper, store) = seeded().await;
        store.save("u", vec![mark(1_000, "u")]).await;

        let stats = sweeper.sweep_at(1_000 + TTL_MS).await.unwrap();
        assert_eq!(stats.evicted, 0);
        assert!(!stats.wrote);
        assert_eq!(store.load_for_url("u").await.len(), 1);
    }

    #[tokio::test]
    async fn one_millisecond_over_is_evicted() {
        let (sweeper, store) = seeded().await;
        store.save("u", vec![mark(1_000, "u")]).await;

        let stats = sweeper.sweep_at(1_000 + TTL_MS + 1).await.unwrap();
        assert_eq!(stats.evicted, 1);
        assert!(stats.wrote);
        assert!(store.load_for_url("u").await.is_empty());
    }

    #[tokio::test]
    async fn sweeping_twice_is_idempotent() {
        let (sweeper, store) = seeded().await;
        store
            .save("u", vec![mark(1_000, "u"), mark(500_000_000_000, "u")])
            .await;

        let now = 500_000_000_000 + 1_000;
        let first = sweeper.sweep_at(now).await.unwrap();
        assert_eq!(first.evicted, 1);
        assert!(first.wrote);

        let second = sweeper.sweep_at(now).await.unwrap();
        assert_eq!(second.evicted, 0);
        assert!(!second.wrote);
        assert_eq!(store.load_all().await, vec![mark(500_000_000_000, "u")]);
    }

    #[tokio::test]
    async fn sweep_is_global_across_urls() {
        let (sweeper, store) = seeded().await;
        store.save("u1", vec![mark(1_000, "u1")]).await;
        store.save("u2", vec![mark(2_000, "u2"), mark(900_000_000_000, "u2")]).await;

        let stats = sweeper.sweep_at(900_000_000_000).await.unwrap();
        assert_eq!(stats.scanned, 3);
        assert_eq!(stats.evicted, 2);
        assert!(store.load_for_url("u1").await.is_empty());
        assert_eq!(store.load_for_url("u2").await.len(), 1);
    }

    #[tokio::test]
    async fn legacy_created_at_drives_aging() {
        let (sweeper, store) = seeded().await;
        let mut bm = mark(900_000_000_000, "u");
        bm.created_at = Some(1_000); // much older than the id claims
        store.save("u", vec![bm]).await;

        let stats = sweeper.sweep_at(1_000 + TTL_MS + 1).await.unwrap();
        assert_eq!(stats.evicted, 1);
    }

    #[tokio::test]
    async fn unavailable_backend_aborts_without_writing() {
        #[derive(Debug)]
        struct DeniedKv;

        #[async_trait::async_trait]
        impl KeyValueStore for DeniedKv {
            async fn get(&self, _k: &str) -> Result<Option<serde_json::Value>, StoreError> {
                Err(StoreError::Unavailable("revoked".into()))
            }
            async fn set(&self, _k: &str, _v: serde_json::Value) -> Result<(), StoreError> {
                panic!("sweep must not write after a failed read");
            }
        }

        let sweeper = sweeper(Arc::new(DeniedKv));
        assert!(sweeper.sweep_at(1).await.is_err());
    }
}
