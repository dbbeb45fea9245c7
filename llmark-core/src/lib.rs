//! LLMark core library — content-anchored reading bookmarks.
//!
//! Capture runs [`scroll::resolve`] and [`anchor::AnchorLocator`] to produce
//! a [`types::Bookmark`]; [`store::BookmarkStore`] persists it under one
//! shared key partitioned by URL; recall runs [`anchor::AnchorMatcher`] with
//! an offset fallback; [`sweep::RetentionSweeper`] evicts expired bookmarks.

pub mod anchor;
pub mod capture;
pub mod config;
pub mod dom;
pub mod error;
pub mod recall;
pub mod scroll;
pub mod store;
pub mod sweep;
pub mod text;
pub mod types;
