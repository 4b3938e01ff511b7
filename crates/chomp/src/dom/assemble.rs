// ABOUTME: Fragment assembly: joins surviving fragments with block spacing and sweeps empty elements.
// ABOUTME: The joined markup is reparsed so the sweep sees a fresh, well-formed tree.

use scraper::{ElementRef, Html};
use tracing::trace;

use super::serialize::{serialize_children, EditPlan};
use super::IMAGE_TAG;

/// Line breaks are void but meaningful; the renderer turns them into newlines.
const LINE_BREAK_TAG: &str = "br";

/// Tags followed by a line break when assembled.
const BLOCK_TAGS: &[&str] = &[
    "div", "p", "article", "section", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// One surviving top-level unit of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Tag name of the fragment's top-level element.
    pub tag: String,
    /// Serialized markup with edits applied.
    pub html: String,
}

impl Fragment {
    pub fn new(tag: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            html: html.into(),
        }
    }

    pub fn is_block(&self) -> bool {
        BLOCK_TAGS.contains(&self.tag.as_str())
    }
}

/// Concatenate fragments, reparse, and drop elements left empty.
pub fn assemble(fragments: &[Fragment]) -> String {
    let mut joined = String::new();
    for fragment in fragments {
        joined.push_str(&fragment.html);
        if fragment.is_block() {
            joined.push('\n');
        }
    }

    let parsed = Html::parse_fragment(&joined);
    let root = parsed.root_element();

    let mut plan = EditPlan::default();
    for node in root.descendants().skip(1) {
        if let Some(el) = ElementRef::wrap(node) {
            if is_empty_element(&el) {
                trace!(tag = el.value().name(), "sweeping empty element");
                plan.skip(el.id());
            }
        }
    }

    serialize_children(*root, &plan)
}

/// Elements other than images and line breaks with no children, or with only
/// whitespace text and no image inside, are empty.
fn is_empty_element(element: &ElementRef<'_>) -> bool {
    let name = element.value().name();
    if name == IMAGE_TAG || name == LINE_BREAK_TAG {
        return false;
    }
    if !element.has_children() {
        return true;
    }
    let text: String = element.text().collect();
    text.trim().is_empty() && !contains_image(element)
}

fn contains_image(element: &ElementRef<'_>) -> bool {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|el| el.value().name() == IMAGE_TAG)
}
