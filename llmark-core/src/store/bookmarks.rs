use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{MarkConfig, WritePolicy};
use crate::error::StoreError;
use crate::text::ellipsize;
use crate::types::{Bookmark, BookmarkId};

use super::KeyValueStore;

/// The bookmark store: every bookmark across every document lives under one
/// shared storage key; per-page lists are derived by filtering on `url`.
///
/// # Concurrency
///
/// Writes are read-modify-write against the shared key with no coordination
/// between writers (other tabs, the retention sweeper). Under the default
/// [`WritePolicy::LastWriteWins`] two concurrent writers can each read a
/// stale snapshot and the later write silently discards the earlier one.
/// That is the inherited contract of the storage collaborator, preserved
/// deliberately; [`WritePolicy::Guarded`] opts into compare-and-swap with
/// bounded retries for backends that support it.
///
/// # Degradation
///
/// When the backend is unavailable, reads degrade to an empty list and
/// writes are skipped; both log at `warn` and neither surfaces an error.
/// The capturing surface stays usable, just ephemeral for the session.
pub struct BookmarkStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    policy: WritePolicy,
    cas_retries: u32,
    title_chars: usize,
}

impl std::fmt::Debug for BookmarkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookmarkStore")
            .field("key", &self.key)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl BookmarkStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, config: &MarkConfig) -> Self {
        Self {
            kv,
            key: config.storage.key.clone(),
            policy: config.storage.write_policy,
            cas_retries: config.storage.cas_retries.max(1),
            title_chars: config.capture.title_chars,
        }
    }

    // ── Reads ──────────────────────────────────────────────────────

    /// Every stored bookmark, across all URLs. Degrades to empty on a
    /// backend failure.
    pub async fn load_all(&self) -> Vec<Bookmark> {
        match self.snapshot().await {
            Ok((marks, _)) => marks,
            Err(e) => {
                warn!(error = %e, "bookmark read failed; degrading to empty list");
                Vec::new()
            }
        }
    }

    /// Bookmarks belonging to exactly this URL, in stored order.
    pub async fn load_for_url(&self, url: &str) -> Vec<Bookmark> {
        self.load_all()
            .await
            .into_iter()
            .filter(|bm| bm.url == url)
            .collect()
    }

    /// Full store plus the raw snapshot value it was decoded from (the
    /// compare-and-swap expectation for guarded writes).
    pub(crate) async fn snapshot(&self) -> Result<(Vec<Bookmark>, Option<Value>), StoreError> {
        let raw = self.kv.get(&self.key).await?;
        let marks = match &raw {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match serde_json::from_value(item.clone()) {
                    Ok(bm) => Some(bm),
                    Err(e) => {
                        // A malformed record is dropped, not fatal; the
                        // rest of the store keeps working.
                        warn!(error = %e, "skipping malformed bookmark record");
                        None
                    }
                })
                .collect(),
            Some(other) => {
                warn!(kind = %value_kind(other), "stored value is not a list; treating as empty");
                Vec::new()
            }
        };
        Ok((marks, raw))
    }

    // ── Writes ─────────────────────────────────────────────────────

    /// Partition replace: drop every stored bookmark for `url`, then append
    /// `marks` as the complete new list for that URL. Other partitions are
    /// untouched. Callers pass the full desired list, not a delta.
    pub async fn save(&self, url: &str, marks: Vec<Bookmark>) {
        let url = url.to_string();
        let count = marks.len();
        self.write(move |mut all| {
            all.retain(|bm| bm.url != url);
            all.extend(marks.iter().cloned());
            all
        })
        .await;
        debug!(count, "saved bookmark partition");
    }

    /// Delete a single bookmark by id, regardless of URL.
    pub async fn delete_one(&self, id: BookmarkId) {
        self.write(move |mut all| {
            all.retain(|bm| bm.id != id);
            all
        })
        .await;
    }

    /// Rename a bookmark. The title is capped the same way derived titles
    /// are. No other field is ever mutated after creation.
    pub async fn save_title(&self, id: BookmarkId, title: &str) {
        let title = ellipsize(title.trim(), self.title_chars);
        self.write(move |mut all| {
            if let Some(bm) = all.iter_mut().find(|bm| bm.id == id) {
                bm.title = title.clone();
            }
            all
        })
        .await;
    }

    /// Replace the entire store. The sweeper's write path; errors propagate
    /// so a failed read never turns into a destructive empty write.
    pub(crate) async fn replace_all(
        &self,
        expected: Option<&Value>,
        marks: &[Bookmark],
    ) -> Result<(), StoreError> {
        let value = encode(marks)?;
        match self.policy {
            WritePolicy::LastWriteWins => self.kv.set(&self.key, value).await,
            WritePolicy::Guarded => {
                if self.kv.compare_and_swap(&self.key, expected, value).await? {
                    Ok(())
                } else {
                    Err(StoreError::Conflict {
                        key: self.key.clone(),
                        attempts: 1,
                    })
                }
            }
        }
    }

    /// Read-modify-write with the configured policy, degrading on failure.
    async fn write<F>(&self, mutate: F)
    where
        F: Fn(Vec<Bookmark>) -> Vec<Bookmark>,
    {
        if let Err(e) = self.try_write(&mutate).await {
            warn!(error = %e, "bookmark write skipped");
        }
    }

    async fn try_write<F>(&self, mutate: &F) -> Result<(), StoreError>
    where
        F: Fn(Vec<Bookmark>) -> Vec<Bookmark>,
    {
        let attempts = match self.policy {
            WritePolicy::LastWriteWins => 1,
            WritePolicy::Guarded => self.cas_retries,
        };
        for attempt in 1..=attempts {
            let (marks, raw) = self.snapshot().await?;
            let value = encode(&mutate(marks))?;
            match self.policy {
                WritePolicy::LastWriteWins => return self.kv.set(&self.key, value).await,
                WritePolicy::Guarded => {
                    if self
                        .kv
                        .compare_and_swap(&self.key, raw.as_ref(), value)
                        .await?
                    {
                        return Ok(());
                    }
                    debug!(attempt, "guarded write lost the race; retrying");
                }
            }
        }
        Err(StoreError::Conflict {
            key: self.key.clone(),
            attempts,
        })
    }
}

fn encode(marks: &[Bookmark]) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(marks)?)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::MemoryKv;
    use super::*;
    use crate::error::StoreError;

    fn mark(id: i64, url: &str, title: &str) -> Bookmark {
        Bookmark {
            id: BookmarkId(id),
            url: url.into(),
            title: title.into(),
            anchor_text: String::new(),
            pre_text: String::new(),
            post_text: String::new(),
            y: 0.0,
            color: "#FF5733".into(),
            created_at: None,
        }
    }

    fn store(kv: Arc<dyn KeyValueStore>) -> BookmarkStore {
        BookmarkStore::new(kv, &MarkConfig::default())
    }

    #[tokio::test]
    async fn save_then_load_round_trips_a_partition() {
        let s = store(Arc::new(MemoryKv::new()));
        let marks = vec![mark(1, "https://a.example/x", "one"), mark(2, "https://a.example/x", "two")];
        s.save("https://a.example/x", marks.clone()).await;
        assert_eq!(s.load_for_url("https://a.example/x").await, marks);
    }

    #[tokio::test]
    async fn partitions_are_isolated() {
        let s = store(Arc::new(MemoryKv::new()));
        s.save("https://a.example/x", vec![mark(1, "https://a.example/x", "x1"), mark(2, "https://a.example/x", "x2")])
            .await;
        s.save("https://a.example/y", vec![mark(3, "https://a.example/y", "y1")])
            .await;
        // Rewriting one partition leaves the other byte-identical.
        s.save("https://a.example/x", vec![mark(4, "https://a.example/x", "x3")])
            .await;

        let x = s.load_for_url("https://a.example/x").await;
        let y = s.load_for_url("https://a.example/y").await;
        assert_eq!(x, vec![mark(4, "https://a.example/x", "x3")]);
        assert_eq!(y, vec![mark(3, "https://a.example/y", "y1")]);
    }

    #[tokio::test]
    async fn save_is_a_replace_not_an_append() {
        let s = store(Arc::new(MemoryKv::new()));
        s.save("u", vec![mark(1, "u", "a"), mark(2, "u", "b")]).await;
        s.save("u", vec![mark(2, "u", "b")]).await;
        assert_eq!(s.load_for_url("u").await, vec![mark(2, "u", "b")]);
    }

    #[tokio::test]
    async fn delete_one_ignores_the_partition() {
        let s = store(Arc::new(MemoryKv::new()));
        s.save("u1", vec![mark(1, "u1", "a")]).await;
        s.save("u2", vec![mark(2, "u2", "b")]).await;
        s.delete_one(BookmarkId(2)).await;
        assert!(s.load_for_url("u2").await.is_empty());
        assert_eq!(s.load_for_url("u1").await.len(), 1);
    }

    #[tokio::test]
    async fn save_title_caps_and_trims() {
        let s = store(Arc::new(MemoryKv::new()));
        s.save("u", vec![mark(1, "u", "old")]).await;
        s.save_title(BookmarkId(1), &format!("  {}  ", "t".repeat(80)))
            .await;
        let loaded = s.load_for_url("u").await;
        assert_eq!(loaded[0].title, format!("{}…", "t".repeat(50)));
    }

    #[tokio::test]
    async fn bookmarks_on_other_urls_stay_invisible() {
        let s = store(Arc::new(MemoryKv::new()));
        s.save("https://a.example/x", vec![mark(1, "https://a.example/x", "a")])
            .await;
        // No normalization: trailing slash is a different document.
        assert!(s.load_for_url("https://a.example/x/").await.is_empty());
    }

    #[tokio::test]
    async fn malformed_records_are_skipped_not_fatal() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(
            "llmarks",
            json!([
                {"id": 1, "url": "u", "title": "good"},
                {"title": "no id at all"},
                "not even an object",
                {"id": 2, "url": "u", "title": "also good"}
            ]),
        )
        .await
        .unwrap();
        let s = store(kv);
        let loaded = s.load_for_url("u").await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title, "good");
        assert_eq!(loaded[1].title, "also good");
    }

    #[tokio::test]
    async fn non_list_store_value_reads_as_empty() {
        let kv = Arc::new(MemoryKv::new());
        kv.set("llmarks", json!({"oops": true})).await.unwrap();
        let s = store(kv);
        assert!(s.load_all().await.is_empty());
    }

    /// A backend that refuses everything, standing in for a revoked
    /// storage capability.
    #[derive(Debug)]
    struct DeniedKv;

    #[async_trait::async_trait]
    impl KeyValueStore for DeniedKv {
        async fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Unavailable("capability revoked".into()))
        }

        async fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("capability revoked".into()))
        }
    }

    #[tokio::test]
    async fn unavailable_backend_degrades_silently() {
        let s = store(Arc::new(DeniedKv));
        assert!(s.load_all().await.is_empty());
        assert!(s.load_for_url("u").await.is_empty());
        // Writes are skipped, not panics or errors.
        s.save("u", vec![mark(1, "u", "a")]).await;
        s.delete_one(BookmarkId(1)).await;
        s.save_title(BookmarkId(1), "t").await;
    }

    #[tokio::test]
    async fn guarded_writes_use_compare_and_swap() {
        let mut config = MarkConfig::default();
        config.storage.write_policy = WritePolicy::Guarded;
        let kv = Arc::new(MemoryKv::new());
        let s = BookmarkStore::new(kv.clone(), &config);

        s.save("u", vec![mark(1, "u", "a")]).await;
        s.save("u", vec![mark(1, "u", "a"), mark(2, "u", "b")]).await;
        assert_eq!(s.load_for_url("u").await.len(), 2);
    }
}
