use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

// ── Bookmark identity ──────────────────────────────────────────────

/// Unique bookmark id: milliseconds since the Unix epoch at creation time.
///
/// The id doubles as the creation timestamp for retention purposes, matching
/// the stored format of every existing record. Serializes transparently as a
/// plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookmarkId(pub i64);

impl BookmarkId {
    /// Creation time in milliseconds since the Unix epoch.
    pub fn timestamp_ms(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BookmarkId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Issues unique, monotonically increasing [`BookmarkId`]s.
///
/// Ids are wall-clock milliseconds, but two captures inside the same
/// millisecond would collide. The generator forces uniqueness by bumping
/// past the last issued value, so an id is never reused or overwritten —
/// at worst it runs a few milliseconds ahead of the clock.
#[derive(Debug, Default)]
pub struct BookmarkIdGen {
    last: AtomicI64,
}

impl BookmarkIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id at (or just after) `now_ms`.
    pub fn next(&self, now_ms: i64) -> BookmarkId {
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(last.max(now_ms - 1) + 1)
            });
        match prev {
            Ok(p) => BookmarkId(p.max(now_ms - 1) + 1),
            // Unreachable: the closure never returns None.
            Err(p) => BookmarkId(p.max(now_ms)),
        }
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ── Bookmark record ────────────────────────────────────────────────

/// One captured reading position.
///
/// Field names on the wire match the original extension's storage schema
/// exactly (`anchorText`, `preText`, `postText`) so that records written by
/// older versions keep loading. Every text field is `#[serde(default)]`:
/// legacy records that predate anchoring deserialize with empty anchor
/// fields and degrade to offset-only recall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,

    /// Exact URL of the page the bookmark was captured on. Used verbatim as
    /// the partition key — no normalization.
    #[serde(default)]
    pub url: String,

    /// Short display label, at most 50 characters plus an ellipsis.
    #[serde(default)]
    pub title: String,

    /// Full visible text of the anchor element at capture time. Empty when
    /// capture fell back to a selection or offset-only bookmark.
    #[serde(default, rename = "anchorText")]
    pub anchor_text: String,

    /// Up to 200 characters of the nearest non-blank sibling before the
    /// anchor. Empty when no such sibling existed.
    #[serde(default, rename = "preText")]
    pub pre_text: String,

    /// Up to 200 characters of the nearest non-blank sibling after the
    /// anchor. Empty when no such sibling existed.
    #[serde(default, rename = "postText")]
    pub post_text: String,

    /// Scroll offset of the owning scroll container at capture time.
    /// Fallback only — used when anchor re-matching fails.
    #[serde(default)]
    pub y: f64,

    /// Presentational tab color, drawn uniformly from [`PALETTE`].
    #[serde(default)]
    pub color: String,

    /// Legacy creation timestamp. Some very old records carry this in
    /// addition to `id`; when present it wins for retention aging.
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl Bookmark {
    /// Creation time used for TTL aging: the legacy `createdAt` field when
    /// present, otherwise the id itself.
    pub fn created_ms(&self) -> i64 {
        self.created_at.unwrap_or(self.id.0)
    }
}

// ── Colors ─────────────────────────────────────────────────────────

/// The fixed tab color palette of the original extension.
pub const PALETTE: [&str; 10] = [
    "#FF5733", "#33FF57", "#3357FF", "#FF33A1", "#FF8F33",
    "#33FFF5", "#8F33FF", "#FFD700", "#FF0000", "#00FF00",
];

/// Uniform random palette pick. Purely presentational; callers pass a
/// seeded rng in tests for determinism.
pub fn pick_color<R: rand::Rng>(rng: &mut R) -> String {
    PALETTE[rng.gen_range(0..PALETTE.len())].to_string()
}
