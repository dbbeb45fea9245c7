//! Scroll-container detection.
//!
//! Single-page apps frequently scroll an inner pane rather than the document
//! body; reading `window.scrollY` on those sites silently yields 0 forever.
//! [`resolve`] finds the surface that actually owns the scroll position.

use tracing::debug;

use crate::dom::{DocumentView, NodeKey};

/// The surface that owns a document's scroll position: the window itself or
/// an inner scrollable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Window,
    Element(NodeKey),
}

impl ScrollTarget {
    /// Current scroll offset, in this target's own coordinate space.
    pub fn current_offset(&self, doc: &dyn DocumentView) -> f64 {
        match self {
            Self::Window => doc.scroll_y(),
            Self::Element(node) => doc.scroll_top(*node),
        }
    }

    /// Scroll this target to an offset.
    pub fn scroll_to(&self, doc: &dyn DocumentView, y: f64, smooth: bool) {
        match self {
            Self::Window => doc.scroll_window_to(y, smooth),
            Self::Element(node) => doc.scroll_element_to(*node, y, smooth),
        }
    }
}

/// Resolve the scroll container for a document. Never fails: the window is
/// the universal fallback.
///
/// In order: a window that has already scrolled is trusted; then a
/// scrollable `main` landmark; then the largest laid-out scrollable element
/// taller than half the viewport; then the window.
pub fn resolve(doc: &dyn DocumentView) -> ScrollTarget {
    if doc.scroll_y() > 0.0 {
        return ScrollTarget::Window;
    }

    if let Some(main) = doc.select("main").into_iter().next() {
        if doc.can_scroll(main) && doc.bounds(main).is_some() {
            debug!(node = main.0, "scroll container: main landmark");
            return ScrollTarget::Element(main);
        }
    }

    let half_viewport = doc.viewport().height / 2.0;
    let mut best: Option<(NodeKey, f64)> = None;
    for node in doc.elements() {
        if !doc.can_scroll(node) {
            continue;
        }
        let Some(bounds) = doc.bounds(node) else {
            continue;
        };
        if bounds.height() <= half_viewport {
            continue;
        }
        let area = bounds.area();
        if best.is_none_or(|(_, best_area)| area > best_area) {
            best = Some((node, area));
        }
    }

    match best {
        Some((node, area)) => {
            debug!(node = node.0, area, "scroll container: largest scrollable pane");
            ScrollTarget::Element(node)
        }
        None => ScrollTarget::Window,
    }
}
