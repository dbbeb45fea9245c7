// Integration test fixtures for LLMark: canned synthetic documents.

use llmark_core::dom::{NodeKey, SyntheticDocument};

/// Viewport used by every fixture: 600x800, so the 30–70% visibility band
/// is 240..560.
pub const VIEWPORT_W: f64 = 600.0;
pub const VIEWPORT_H: f64 = 800.0;

/// A three-paragraph article with the middle paragraph centered in the
/// viewport band. Returns the document and the centered paragraph.
pub fn fox_article() -> (SyntheticDocument, NodeKey) {
    let mut doc = SyntheticDocument::new("https://a.example/x", VIEWPORT_W, VIEWPORT_H);
    let body = doc.root();
    doc.append_block(body, "p", "Intro.", 100.0, 100.0);
    let fox = doc.append_block(body, "p", "The quick brown fox.", 300.0, 100.0);
    doc.append_block(body, "p", "Conclusion.", 600.0, 100.0);
    (doc, fox)
}

/// A chat-style transcript inside a scrollable pane: `turns` alternating
/// user/assistant messages, the window itself never scrolling. Returns the
/// document, the pane, and the message nodes in order.
pub fn chat_transcript(url: &str, turns: usize) -> (SyntheticDocument, NodeKey, Vec<NodeKey>) {
    let mut doc = SyntheticDocument::new(url, VIEWPORT_W, VIEWPORT_H);
    let body = doc.root();
    let pane = doc.append(body, "div");
    doc.set_rect(pane, 0.0, 0.0, VIEWPORT_W, VIEWPORT_H);
    doc.set_scrollable(pane, true);

    let mut messages = Vec::with_capacity(turns);
    for i in 0..turns {
        let role = if i % 2 == 0 { "user" } else { "assistant" };
        let text = format!("Turn {i} ({role}): enough words here to clear the anchor minimum.");
        let msg = doc.append_block(pane, "div", &text, i as f64 * 80.0, 70.0);
        doc.set_classes(msg, &["message-content"]);
        messages.push(msg);
    }
    (doc, pane, messages)
}

/// Text of the `i`-th transcript turn, matching [`chat_transcript`].
pub fn turn_text(i: usize) -> String {
    let role = if i % 2 == 0 { "user" } else { "assistant" };
    format!("Turn {i} ({role}): enough words here to clear the anchor minimum.")
}
