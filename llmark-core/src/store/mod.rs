//! Bookmark persistence: the key-value seam and the store built on it.

mod bookmarks;
mod memory;
mod sqlite;
mod traits;

pub use bookmarks::BookmarkStore;
pub use memory::MemoryKv;
pub use sqlite::SqliteKv;
pub use traits::KeyValueStore;
