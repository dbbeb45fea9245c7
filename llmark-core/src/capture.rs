//! Bookmark capture.

use tracing::debug;

use crate::anchor::AnchorLocator;
use crate::config::MarkConfig;
use crate::dom::DocumentView;
use crate::scroll;
use crate::text::{collapse_ws, ellipsize};
use crate::types::{Bookmark, BookmarkIdGen, now_ms, pick_color};

/// Capture the current reading position as a new [`Bookmark`].
///
/// Best case, the visible-anchor locator supplies the anchor text and its
/// sibling context. Failing that, any active text selection names the
/// bookmark; failing that too, a generic positional label. Capture never
/// refuses: an offset-only bookmark still recalls, just less precisely.
///
/// `existing_count` is the page's current bookmark count, used for the
/// generic label's ordinal.
pub fn capture<R: rand::Rng>(
    doc: &dyn DocumentView,
    config: &MarkConfig,
    ids: &BookmarkIdGen,
    existing_count: usize,
    rng: &mut R,
) -> Bookmark {
    capture_at(doc, config, ids, existing_count, rng, now_ms())
}

/// [`capture`] with an explicit clock, for deterministic tests.
pub fn capture_at<R: rand::Rng>(
    doc: &dyn DocumentView,
    config: &MarkConfig,
    ids: &BookmarkIdGen,
    existing_count: usize,
    rng: &mut R,
    now_ms: i64,
) -> Bookmark {
    let target = scroll::resolve(doc);
    let y = target.current_offset(doc);
    let title_chars = config.capture.title_chars;

    let (title, anchor_text, pre_text, post_text) =
        match AnchorLocator::new(config).locate(doc) {
            Some(ctx) => (
                ellipsize(&ctx.anchor_text, title_chars),
                ctx.anchor_text,
                ctx.pre_text,
                ctx.post_text,
            ),
            None => {
                let selection = doc
                    .selection_text()
                    .map(|s| collapse_ws(&s))
                    .filter(|s| !s.is_empty());
                let title = match selection {
                    Some(sel) => ellipsize(&sel, title_chars),
                    None => format!("Position {}", existing_count + 1),
                };
                debug!("no anchor candidate; captured offset-only bookmark");
                (title, String::new(), String::new(), String::new())
            }
        };

    Bookmark {
        id: ids.next(now_ms),
        url: doc.url().to_string(),
        title,
        anchor_text,
        pre_text,
        post_text,
        y,
        color: pick_color(rng),
        created_at: None,
    }
}
