//! Visible-anchor selection at capture time.

use tracing::debug;

use crate::config::MarkConfig;
use crate::dom::{DocumentView, NodeKey};
use crate::text::{collapse_ws, truncate_chars};

use super::query_blocks;

/// The anchor chosen for a capture: the element itself plus the sibling
/// context that disambiguates it later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorContext {
    pub node: NodeKey,
    /// Full visible text of the anchor, whitespace-collapsed.
    pub anchor_text: String,
    /// Nearest non-blank preceding sibling's text, capped. Empty when none.
    pub pre_text: String,
    /// Nearest non-blank following sibling's text, capped. Empty when none.
    pub post_text: String,
}

/// Finds the block the user is most likely reading: the most textually
/// substantial element inside the middle band of the viewport.
#[derive(Debug)]
pub struct AnchorLocator<'a> {
    config: &'a MarkConfig,
}

impl<'a> AnchorLocator<'a> {
    pub fn new(config: &'a MarkConfig) -> Self {
        Self { config }
    }

    /// Pick an anchor, or `None` when nothing in the band clears the
    /// minimum text length. The caller then falls back to the current
    /// selection or an offset-only bookmark.
    pub fn locate(&self, doc: &dyn DocumentView) -> Option<AnchorContext> {
        let capture = &self.config.capture;
        let viewport = doc.viewport();
        let band_top = viewport.height * capture.band_top;
        let band_bottom = viewport.height * capture.band_bottom;

        let mut best: Option<(NodeKey, String, usize)> = None;
        for node in query_blocks(doc, &capture.selectors) {
            let Some(bounds) = doc.bounds(node) else {
                continue;
            };
            if bounds.bottom < band_top || bounds.top > band_bottom {
                continue;
            }
            let text = collapse_ws(&doc.text(node));
            let len = text.chars().count();
            if len < capture.min_anchor_chars {
                continue;
            }
            // Longest wins; strict comparison keeps the first on ties.
            if best.as_ref().is_none_or(|(_, _, best_len)| len > *best_len) {
                best = Some((node, text, len));
            }
        }

        let (node, anchor_text, len) = best?;
        debug!(node = node.0, chars = len, "anchor selected");

        Some(AnchorContext {
            node,
            pre_text: self.sibling_context(doc, node, Direction::Before),
            post_text: self.sibling_context(doc, node, Direction::After),
            anchor_text,
        })
    }

    /// Text of the nearest sibling in `direction` whose content is not
    /// blank, capped at the configured context length.
    fn sibling_context(&self, doc: &dyn DocumentView, node: NodeKey, direction: Direction) -> String {
        let step = |n: NodeKey| match direction {
            Direction::Before => doc.prev_sibling(n),
            Direction::After => doc.next_sibling(n),
        };
        let mut cursor = step(node);
        while let Some(sibling) = cursor {
            let text = collapse_ws(&doc.text(sibling));
            if !text.is_empty() {
                return truncate_chars(&text, self.config.capture.context_chars);
            }
            cursor = step(sibling);
        }
        String::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Before,
    After,
}
