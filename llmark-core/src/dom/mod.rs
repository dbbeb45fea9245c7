//! Rendering-tree abstraction.
//!
//! The anchoring algorithms never touch a real DOM type. They see a
//! [`DocumentView`]: something with text content, bounding geometry, ordered
//! siblings and a parent, plus the scroll surface of the page. A browser
//! binding implements this over live elements; [`synthetic::SyntheticDocument`]
//! implements it over a plain arena tree so the whole core is testable
//! without a rendering engine.

pub mod synthetic;

pub use synthetic::SyntheticDocument;

/// Opaque handle to one element of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(pub u64);

/// Viewport geometry, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// An element's bounding box in viewport coordinates (the rendering-engine
/// convention: `top` is relative to the top of the visible viewport and goes
/// negative once the element scrolls above it).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Rect {
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Capability view over a rendered document.
///
/// Methods take `&self` even when they cause side effects (scrolling,
/// highlighting) — that is how a rendering surface behaves, and it keeps the
/// trait object shareable across the single-threaded event flow.
pub trait DocumentView {
    /// Exact URL of the document. Bookmarks partition on this verbatim.
    fn url(&self) -> &str;

    fn viewport(&self) -> Viewport;

    /// Current window scroll offset.
    fn scroll_y(&self) -> f64;

    /// Scroll the window itself.
    fn scroll_window_to(&self, y: f64, smooth: bool);

    /// Elements matching a selector, in document order. Selectors are the
    /// minimal dialect the anchoring algorithms need: `.class` matches by
    /// class, anything else by tag name.
    fn select(&self, selector: &str) -> Vec<NodeKey>;

    /// Every rendered element, in document order.
    fn elements(&self) -> Vec<NodeKey>;

    /// Full visible text of the element's subtree, un-normalized.
    fn text(&self, node: NodeKey) -> String;

    /// Bounding box in viewport coordinates, or `None` when the element is
    /// not laid out (hidden, detached).
    fn bounds(&self, node: NodeKey) -> Option<Rect>;

    fn parent(&self, node: NodeKey) -> Option<NodeKey>;
    fn prev_sibling(&self, node: NodeKey) -> Option<NodeKey>;
    fn next_sibling(&self, node: NodeKey) -> Option<NodeKey>;

    /// Whether the element's computed overflow allows it to scroll.
    fn can_scroll(&self, node: NodeKey) -> bool;

    /// Current scroll offset of a scrollable element.
    fn scroll_top(&self, node: NodeKey) -> f64;

    /// Scroll a scrollable element to an offset.
    fn scroll_element_to(&self, node: NodeKey, y: f64, smooth: bool);

    /// Bring an element into the viewport via whichever surface owns it.
    fn scroll_into_view(&self, node: NodeKey, smooth: bool);

    /// The user's active text selection, if any.
    fn selection_text(&self) -> Option<String>;

    /// Transient highlight pulse on an element. Cosmetic only; the surface
    /// reverts it after a fixed delay.
    fn flash_highlight(&self, node: NodeKey);
}
