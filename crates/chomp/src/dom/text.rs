// ABOUTME: Text helpers for the cleaning pipeline: visible text, whitespace normalization, tokens.
// ABOUTME: Visible text ignores subtrees the edit plan has already skipped.

use ego_tree::NodeRef;
use scraper::Node;

use super::serialize::EditPlan;

/// Collapse runs of whitespace to single spaces and trim.
pub fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-delimited tokens.
pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Concatenated text of all descendant text nodes, skipping planned removals.
pub fn visible_text(node: NodeRef<'_, Node>, plan: &EditPlan) -> String {
    let mut out = String::new();
    collect_text(node, plan, &mut out);
    out
}

fn collect_text(node: NodeRef<'_, Node>, plan: &EditPlan, out: &mut String) {
    for child in node.children() {
        if plan.is_skipped(child.id()) {
            continue;
        }
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => collect_text(child, plan, out),
            _ => {}
        }
    }
}

/// Normalized visible text, used as the identity of a content block.
pub fn text_identity(node: NodeRef<'_, Node>, plan: &EditPlan) -> String {
    normalize_spaces(&visible_text(node, plan))
}
