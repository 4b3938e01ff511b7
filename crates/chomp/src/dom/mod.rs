// ABOUTME: DOM cleaning pipeline: structural filtering, deduplication, image handling, assembly.
// ABOUTME: Works over scraper's arena tree; edits are recorded by NodeId and applied on serialization.

//! DOM utilities for turning a parsed page into cleaned fragment markup.
//!
//! The filter never mutates the parsed tree. Removals, anchor unwrapping and
//! image `src` rewrites are collected in an [`EditPlan`] and applied when a
//! fragment is serialized.

pub mod assemble;
pub mod dedup;
pub mod filter;
pub mod images;
pub mod serialize;
pub mod text;

pub use assemble::{assemble, Fragment};
pub use dedup::{DedupState, HeaderIdentity, IdentitySet};
pub use filter::StructuralFilter;
pub use images::{is_image_url, ImageResolver};
pub use serialize::EditPlan;

/// Tag name of image elements.
pub const IMAGE_TAG: &str = "img";

/// Heading tags.
pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Returns true if the tag is a heading (h1..h6).
pub fn is_heading(tag: &str) -> bool {
    HEADING_TAGS.contains(&tag)
}
