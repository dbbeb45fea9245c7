//! Arena-backed [`DocumentView`] implementation.
//!
//! Stands in for a real rendering tree in unit tests, fixtures, and benches.
//! Geometry is declared in document space; the view converts to viewport
//! coordinates from the current window scroll and any scrolled ancestors,
//! the same way a rendering engine reports bounding boxes.

use std::cell::{Cell, RefCell};

use super::{DocumentView, NodeKey, Rect, Viewport};

/// Document-space box: `top`/`left` from the document origin.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DocRect {
    top: f64,
    left: f64,
    width: f64,
    height: f64,
}

#[derive(Debug)]
struct Node {
    tag: String,
    classes: Vec<String>,
    text: String,
    rect: Option<DocRect>,
    scrollable: bool,
    scroll_top: Cell<f64>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// A synthetic document tree.
///
/// Build with the `append_*`/`set_*` methods, then hand it to the anchoring
/// algorithms as a `&dyn DocumentView`. Mutating methods (`set_text`,
/// `remove`) model re-rendering between capture and recall.
#[derive(Debug)]
pub struct SyntheticDocument {
    url: String,
    viewport: Viewport,
    window_scroll: Cell<f64>,
    nodes: Vec<Node>,
    root: usize,
    selection: Option<String>,
    highlights: RefCell<Vec<NodeKey>>,
}

impl SyntheticDocument {
    /// Empty document with a `body` root and the given viewport size.
    pub fn new(url: &str, viewport_width: f64, viewport_height: f64) -> Self {
        let root = Node {
            tag: "body".into(),
            classes: Vec::new(),
            text: String::new(),
            rect: None,
            scrollable: false,
            scroll_top: Cell::new(0.0),
            parent: None,
            children: Vec::new(),
        };
        Self {
            url: url.to_string(),
            viewport: Viewport {
                width: viewport_width,
                height: viewport_height,
            },
            window_scroll: Cell::new(0.0),
            nodes: vec![root],
            root: 0,
            selection: None,
            highlights: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> NodeKey {
        NodeKey(self.root as u64)
    }

    /// Append a child element under `parent`.
    pub fn append(&mut self, parent: NodeKey, tag: &str) -> NodeKey {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            tag: tag.to_string(),
            classes: Vec::new(),
            text: String::new(),
            rect: None,
            scrollable: false,
            scroll_top: Cell::new(0.0),
            parent: Some(parent.0 as usize),
            children: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(idx);
        NodeKey(idx as u64)
    }

    /// Append a laid-out, full-width text block — the common fixture shape.
    pub fn append_block(
        &mut self,
        parent: NodeKey,
        tag: &str,
        text: &str,
        top: f64,
        height: f64,
    ) -> NodeKey {
        let node = self.append(parent, tag);
        self.set_text(node, text);
        self.set_rect(node, top, 0.0, self.viewport.width, height);
        node
    }

    pub fn set_classes(&mut self, node: NodeKey, classes: &[&str]) {
        self.nodes[node.0 as usize].classes = classes.iter().map(ToString::to_string).collect();
    }

    pub fn set_text(&mut self, node: NodeKey, text: &str) {
        self.nodes[node.0 as usize].text = text.to_string();
    }

    /// Declare document-space geometry. Elements without a rect are treated
    /// as not laid out.
    pub fn set_rect(&mut self, node: NodeKey, top: f64, left: f64, width: f64, height: f64) {
        self.nodes[node.0 as usize].rect = Some(DocRect {
            top,
            left,
            width,
            height,
        });
    }

    pub fn set_scrollable(&mut self, node: NodeKey, scrollable: bool) {
        self.nodes[node.0 as usize].scrollable = scrollable;
    }

    /// Detach an element (and its subtree) from the document, modeling a
    /// re-render that dropped it.
    pub fn remove(&mut self, node: NodeKey) {
        let idx = node.0 as usize;
        if let Some(parent) = self.nodes[idx].parent {
            self.nodes[parent].children.retain(|&c| c != idx);
        }
        self.nodes[idx].parent = None;
    }

    pub fn set_selection(&mut self, selection: Option<&str>) {
        self.selection = selection.map(ToString::to_string);
    }

    pub fn set_window_scroll(&mut self, y: f64) {
        self.window_scroll.set(y);
    }

    /// Highlight pulses fired so far, in order.
    pub fn highlights(&self) -> Vec<NodeKey> {
        self.highlights.borrow().clone()
    }

    fn node(&self, key: NodeKey) -> &Node {
        &self.nodes[key.0 as usize]
    }

    /// Pre-order walk of the attached tree (document order).
    fn walk(&self, idx: usize, out: &mut Vec<usize>) {
        out.push(idx);
        for &child in &self.nodes[idx].children {
            self.walk(child, out);
        }
    }

    fn document_order(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.walk(self.root, &mut out);
        out
    }

    /// Sum of scroll offsets between the document origin and this element:
    /// the window plus every scrolled ancestor pane.
    fn scrolled_distance(&self, idx: usize) -> f64 {
        let mut total = self.window_scroll.get();
        let mut cur = self.nodes[idx].parent;
        while let Some(p) = cur {
            if self.nodes[p].scrollable {
                total += self.nodes[p].scroll_top.get();
            }
            cur = self.nodes[p].parent;
        }
        total
    }

    fn subtree_text(&self, idx: usize, out: &mut String) {
        let node = &self.nodes[idx];
        if !node.text.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&node.text);
        }
        for &child in &node.children {
            self.subtree_text(child, out);
        }
    }
}

impl DocumentView for SyntheticDocument {
    fn url(&self) -> &str {
        &self.url
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_y(&self) -> f64 {
        self.window_scroll.get()
    }

    fn scroll_window_to(&self, y: f64, _smooth: bool) {
        self.window_scroll.set(y.max(0.0));
    }

    fn select(&self, selector: &str) -> Vec<NodeKey> {
        let by_class = selector.strip_prefix('.');
        self.document_order()
            .into_iter()
            .filter(|&idx| {
                let node = &self.nodes[idx];
                match by_class {
                    Some(class) => node.classes.iter().any(|c| c == class),
                    None => node.tag == selector,
                }
            })
            .map(|idx| NodeKey(idx as u64))
            .collect()
    }

    fn elements(&self) -> Vec<NodeKey> {
        self.document_order()
            .into_iter()
            .map(|idx| NodeKey(idx as u64))
            .collect()
    }

    fn text(&self, node: NodeKey) -> String {
        let mut out = String::new();
        self.subtree_text(node.0 as usize, &mut out);
        out
    }

    fn bounds(&self, node: NodeKey) -> Option<Rect> {
        let idx = node.0 as usize;
        // Detached subtrees have no layout.
        let mut top_most = idx;
        while let Some(p) = self.nodes[top_most].parent {
            top_most = p;
        }
        if top_most != self.root {
            return None;
        }
        let rect = self.nodes[idx].rect?;
        let offset = self.scrolled_distance(idx);
        Some(Rect {
            top: rect.top - offset,
            bottom: rect.top - offset + rect.height,
            left: rect.left,
            right: rect.left + rect.width,
        })
    }

    fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        self.node(node).parent.map(|idx| NodeKey(idx as u64))
    }

    fn prev_sibling(&self, node: NodeKey) -> Option<NodeKey> {
        let idx = node.0 as usize;
        let parent = self.nodes[idx].parent?;
        let siblings = &self.nodes[parent].children;
        let pos = siblings.iter().position(|&c| c == idx)?;
        pos.checked_sub(1)
            .map(|prev| NodeKey(siblings[prev] as u64))
    }

    fn next_sibling(&self, node: NodeKey) -> Option<NodeKey> {
        let idx = node.0 as usize;
        let parent = self.nodes[idx].parent?;
        let siblings = &self.nodes[parent].children;
        let pos = siblings.iter().position(|&c| c == idx)?;
        siblings.get(pos + 1).map(|&next| NodeKey(next as u64))
    }

    fn can_scroll(&self, node: NodeKey) -> bool {
        self.node(node).scrollable
    }

    fn scroll_top(&self, node: NodeKey) -> f64 {
        self.node(node).scroll_top.get()
    }

    fn scroll_element_to(&self, node: NodeKey, y: f64, _smooth: bool) {
        self.node(node).scroll_top.set(y.max(0.0));
    }

    fn scroll_into_view(&self, node: NodeKey, smooth: bool) {
        let idx = node.0 as usize;
        let Some(rect) = self.nodes[idx].rect else {
            return;
        };
        // Nearest scrollable ancestor owns the element; otherwise the window.
        let mut cur = self.nodes[idx].parent;
        while let Some(p) = cur {
            if self.nodes[p].scrollable {
                let pane_top = self.nodes[p].rect.map_or(0.0, |r| r.top);
                self.scroll_element_to(NodeKey(p as u64), rect.top - pane_top, smooth);
                return;
            }
            cur = self.nodes[p].parent;
        }
        self.scroll_window_to(rect.top, smooth);
    }

    fn selection_text(&self) -> Option<String> {
        self.selection.clone()
    }

    fn flash_highlight(&self, node: NodeKey) {
        self.highlights.borrow_mut().push(node);
    }
}
