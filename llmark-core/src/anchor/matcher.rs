//! Anchor re-matching at recall time.

use tracing::debug;

use crate::config::MarkConfig;
use crate::dom::{DocumentView, NodeKey};
use crate::text::{char_prefix, collapse_ws};
use crate::types::Bookmark;

use super::query_blocks;

/// Base score for containing the anchor prefix.
const SCORE_ANCHOR: u32 = 1;
/// Bonus per matching context side (pre and post each).
const SCORE_CONTEXT: u32 = 2;

/// Re-locates a stored anchor in a possibly mutated document.
///
/// Exact whole-text matching is fragile against streaming and re-rendered
/// content, so candidates qualify on an anchor *prefix* and are ranked by
/// how much of the stored sibling context still surrounds them. Repeated
/// phrases in a transcript land on the copy whose neighborhood matches.
#[derive(Debug)]
pub struct AnchorMatcher<'a> {
    config: &'a MarkConfig,
}

impl<'a> AnchorMatcher<'a> {
    pub fn new(config: &'a MarkConfig) -> Self {
        Self { config }
    }

    /// Best-scoring element for the bookmark's anchor, or `None` when no
    /// candidate contains the anchor prefix. The caller must then fall back
    /// to the stored raw offset.
    pub fn locate(&self, doc: &dyn DocumentView, bookmark: &Bookmark) -> Option<NodeKey> {
        let matching = &self.config.matching;
        let anchor = collapse_ws(&bookmark.anchor_text);
        if anchor.is_empty() {
            return None;
        }
        let needle = char_prefix(&anchor, matching.anchor_prefix_chars);

        let pre = collapse_ws(&bookmark.pre_text);
        let post = collapse_ws(&bookmark.post_text);
        let pre_needle = char_prefix(&pre, matching.context_prefix_chars);
        let post_needle = char_prefix(&post, matching.context_prefix_chars);

        let mut best: Option<(NodeKey, u32)> = None;
        for node in query_blocks(doc, &self.config.capture.selectors) {
            let text = collapse_ws(&doc.text(node));
            if !text.contains(needle) {
                continue;
            }

            let surrounding = self.surrounding_text(doc, node);
            let mut score = SCORE_ANCHOR;
            if !pre_needle.is_empty() && surrounding.contains(pre_needle) {
                score += SCORE_CONTEXT;
            }
            if !post_needle.is_empty() && surrounding.contains(post_needle) {
                score += SCORE_CONTEXT;
            }

            // Strictly higher wins; ties keep the first candidate found.
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((node, score));
            }
        }

        if let Some((node, score)) = best {
            debug!(node = node.0, score, "anchor re-matched");
        }
        best.map(|(node, _)| node)
    }

    /// The candidate's textual neighborhood: parent's previous sibling, own
    /// previous sibling, own text, own next sibling, parent's next sibling,
    /// concatenated in that order.
    fn surrounding_text(&self, doc: &dyn DocumentView, node: NodeKey) -> String {
        let text_of = |n: Option<NodeKey>| n.map(|n| collapse_ws(&doc.text(n)));

        let parent = doc.parent(node);
        let parts = [
            text_of(parent.and_then(|p| doc.prev_sibling(p))),
            text_of(doc.prev_sibling(node)),
            Some(collapse_ws(&doc.text(node))),
            text_of(doc.next_sibling(node)),
            text_of(parent.and_then(|p| doc.next_sibling(p))),
        ];
        parts
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
