//! Bookmark recall: re-anchor if possible, offset fallback otherwise.

use tracing::debug;

use crate::anchor::AnchorMatcher;
use crate::config::MarkConfig;
use crate::dom::{DocumentView, NodeKey};
use crate::scroll;
use crate::types::Bookmark;

/// How a recall landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecallOutcome {
    /// The anchor was re-matched; the view scrolled to the element and the
    /// highlight pulse fired.
    Anchored(NodeKey),
    /// No anchor match; the view scrolled to the stored raw offset.
    Offset(f64),
}

/// Jump back to a bookmark's position.
///
/// Never reports failure: when the anchor cannot be re-matched (or was never
/// captured), the stored offset is replayed through the resolved scroll
/// container. Imprecise recall beats no recall.
pub fn recall(doc: &dyn DocumentView, config: &MarkConfig, bookmark: &Bookmark) -> RecallOutcome {
    if let Some(node) = AnchorMatcher::new(config).locate(doc, bookmark) {
        doc.scroll_into_view(node, true);
        doc.flash_highlight(node);
        return RecallOutcome::Anchored(node);
    }

    debug!(id = %bookmark.id, y = bookmark.y, "anchor miss; falling back to raw offset");
    scroll::resolve(doc).scroll_to(doc, bookmark.y, true);
    RecallOutcome::Offset(bookmark.y)
}
