// ABOUTME: Markdown rendering for cleaned markup using htmd, plus spacing post-processing.
// ABOUTME: Renderer settings are fixed: ATX headings, inline links, literal line breaks.

//! Output format conversion module.
//!
//! [`render_markdown`] converts assembled markup with a fixed converter
//! configuration; [`html_to_markdown`] adds the spacing post-processor on top.

pub mod spacing;

use htmd::options::{HeadingStyle, LinkStyle, Options};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{instrument, warn};

pub use spacing::normalize_spacing;

static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?\s*>").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Preprocess HTML before conversion: replace <br> tags with newlines.
fn preprocess_br_tags(html: &str) -> String {
    BR_RE.replace_all(html, "\n").to_string()
}

/// Collapse more than 2 consecutive blank lines to exactly 2.
fn collapse_blank_lines_to_two(text: &str) -> String {
    BLANK_RUN_RE.replace_all(text, "\n\n").to_string()
}

/// Convert markup to Markdown without spacing post-processing.
///
/// Links are rendered inline, headings in ATX style, and script/style tags are
/// skipped. On conversion error, returns the input unchanged.
pub fn render_markdown(html: &str) -> String {
    let preprocessed = preprocess_br_tags(html);

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "noscript"])
        .options(Options {
            heading_style: HeadingStyle::Atx,
            link_style: LinkStyle::Inlined,
            ..Default::default()
        })
        .build();

    let md = converter.convert(&preprocessed).unwrap_or_else(|err| {
        warn!(error = %err, "markdown conversion failed, returning markup unchanged");
        preprocessed.clone()
    });

    collapse_blank_lines_to_two(&md)
}

/// Convert cleaned markup to Markdown and apply spacing normalization.
#[instrument(level = "debug", skip(html), fields(len = html.len()))]
pub fn html_to_markdown(html: &str, double_space: bool) -> String {
    normalize_spacing(&render_markdown(html), double_space)
}
