//! Content anchoring: selecting a visible anchor at capture time and
//! re-locating it at recall time.
//!
//! Both halves scan the same selector list and normalize text the same way;
//! the data structure the locator produces is the only input the matcher
//! ever gets.

mod locate;
mod matcher;

pub use locate::{AnchorContext, AnchorLocator};
pub use matcher::AnchorMatcher;

use std::collections::HashSet;

use crate::dom::{DocumentView, NodeKey};

/// All block-level candidates matching any selector, in document order.
///
/// Document order, not selector order: downstream length ties must resolve
/// to the earliest element on the page, regardless of which selector
/// matched it.
fn query_blocks(doc: &dyn DocumentView, selectors: &[String]) -> Vec<NodeKey> {
    let mut matched = HashSet::new();
    for selector in selectors {
        matched.extend(doc.select(selector));
    }
    doc.elements()
        .into_iter()
        .filter(|node| matched.contains(node))
        .collect()
}
