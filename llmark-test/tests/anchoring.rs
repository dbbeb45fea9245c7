// End-to-end capture → persist → mutate → recall scenarios.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use llmark_core::capture::capture_at;
use llmark_core::config::MarkConfig;
use llmark_core::dom::DocumentView;
use llmark_core::recall::{RecallOutcome, recall};
use llmark_core::store::{BookmarkStore, MemoryKv};
use llmark_core::types::BookmarkIdGen;
use llmark_test::{chat_transcript, fox_article, turn_text};

fn capture_fixture(doc: &dyn DocumentView) -> llmark_core::types::Bookmark {
    let config = MarkConfig::default();
    let ids = BookmarkIdGen::new();
    let mut rng = StdRng::seed_from_u64(1);
    capture_at(doc, &config, &ids, 0, &mut rng, 1_700_000_000_000)
}

#[test]
fn fox_article_capture_matches_the_reference_shape() {
    let (doc, _) = fox_article();
    let bm = capture_fixture(&doc);
    assert_eq!(bm.anchor_text, "The quick brown fox.");
    assert_eq!(bm.pre_text, "Intro.");
    assert_eq!(bm.post_text, "Conclusion.");
    assert_eq!(bm.url, "https://a.example/x");
}

#[tokio::test]
async fn capture_survives_a_full_persistence_round_trip() {
    let (doc, _) = fox_article();
    let bm = capture_fixture(&doc);

    let config = MarkConfig::default();
    let store = BookmarkStore::new(Arc::new(MemoryKv::new()), &config);
    store.save(&bm.url, vec![bm.clone()]).await;

    let loaded = store.load_for_url("https://a.example/x").await;
    assert_eq!(loaded, vec![bm]);
}

#[test]
fn recall_lands_on_the_anchor_after_content_above_grows() {
    // Streaming chat: everything above the anchor re-renders taller and
    // with different text, invalidating the raw offset entirely.
    let (mut doc, pane, messages) = chat_transcript("https://chat.example/t", 8);
    doc.scroll_element_to(pane, 0.0, false);
    let bm = capture_fixture(&doc);
    assert_eq!(bm.anchor_text, turn_text(3));

    // Regenerate earlier turns and push every block down 500px.
    doc.set_text(messages[1], "A regenerated reply, much longer than before, changing the page layout.");
    for (i, &msg) in messages.iter().enumerate() {
        doc.set_rect(msg, 500.0 + i as f64 * 80.0, 0.0, 600.0, 70.0);
    }

    let outcome = recall(&doc, &MarkConfig::default(), &bm);
    assert_eq!(outcome, RecallOutcome::Anchored(messages[3]));
    // The pane scrolled to the anchor's new position, not the stale offset.
    assert_eq!(doc.scroll_top(pane), 500.0 + 3.0 * 80.0);
    assert_eq!(doc.highlights(), vec![messages[3]]);
}

#[test]
fn context_steers_recall_between_duplicate_messages() {
    let (mut doc, _, messages) = chat_transcript("https://chat.example/t", 8);
    let bm = capture_fixture(&doc);

    // A later turn now repeats the anchor text verbatim, but its
    // surroundings differ from the stored context.
    doc.set_text(messages[6], &turn_text(3));

    let outcome = recall(&doc, &MarkConfig::default(), &bm);
    assert_eq!(outcome, RecallOutcome::Anchored(messages[3]));
}

#[test]
fn removed_anchor_with_a_lookalike_still_recalls_the_lookalike() {
    // The original anchor is gone; an unrelated block carries the same
    // text with none of the stored context. Score 1 clears the bar, so it
    // is selected — recall is preferred over precision here by design.
    let (mut doc, _, messages) = chat_transcript("https://chat.example/t", 8);
    let bm = capture_fixture(&doc);

    doc.remove(messages[3]);
    doc.set_text(messages[6], &turn_text(3));

    let outcome = recall(&doc, &MarkConfig::default(), &bm);
    assert_eq!(outcome, RecallOutcome::Anchored(messages[6]));
}

#[test]
fn recall_always_does_something() {
    // Anchor removed, no lookalike: the stored offset must be replayed.
    let (mut doc, pane, messages) = chat_transcript("https://chat.example/t", 8);
    doc.scroll_element_to(pane, 130.0, false);
    let bm = capture_fixture(&doc);
    assert_eq!(bm.y, 130.0);

    for &msg in &messages {
        doc.remove(msg);
    }
    doc.scroll_element_to(pane, 0.0, false);

    let outcome = recall(&doc, &MarkConfig::default(), &bm);
    assert_eq!(outcome, RecallOutcome::Offset(130.0));
    assert_eq!(doc.scroll_top(pane), 130.0);
}

#[test]
fn offset_only_bookmarks_from_legacy_records_recall_by_offset() {
    let (doc, pane, _) = chat_transcript("https://chat.example/t", 8);
    let bm: llmark_core::types::Bookmark =
        serde_json::from_str(r#"{"id": 1, "url": "https://chat.example/t", "y": 220.0}"#).unwrap();

    let outcome = recall(&doc, &MarkConfig::default(), &bm);
    assert_eq!(outcome, RecallOutcome::Offset(220.0));
    assert_eq!(doc.scroll_top(pane), 220.0);
}
