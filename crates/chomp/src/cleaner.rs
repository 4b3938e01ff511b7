// ABOUTME: The cleaning pipeline entry points: document -> fragments -> assembled clean HTML.
// ABOUTME: Also hosts the convenience functions parse_html and url_to_markdown.

use tracing::{debug, instrument};

use crate::dom::{assemble, DedupState, StructuralFilter};
use crate::formats::html_to_markdown;
use crate::loader::{Document, Loader};
use crate::options::CleanOptions;

/// Clean an already-loaded document and return the assembled markup.
///
/// Empty output is a valid result: nothing in the document survived filtering.
#[instrument(level = "debug", skip_all, fields(url = doc.url().unwrap_or("")))]
pub fn clean_document(doc: &Document, opts: &CleanOptions) -> String {
    let mut state = DedupState::new();
    let filter = StructuralFilter::new(opts, doc.url());
    let fragments = filter.run(doc.content_root(), &mut state);
    let html = assemble(&fragments);
    debug!(fragments = fragments.len(), bytes = html.len(), "assembled cleaned HTML");
    html
}

/// Load a URL or raw markup and return cleaned HTML.
pub fn parse_html(url_or_html: &str, opts: &CleanOptions) -> String {
    clean_with(&Loader::default(), url_or_html, opts)
}

pub(crate) fn clean_with(loader: &Loader, url_or_html: &str, opts: &CleanOptions) -> String {
    let doc = loader.load(url_or_html);
    clean_document(&doc, opts)
}

/// Fetch a page and convert it straight to Markdown with default rules.
///
/// Returns an empty string when the page cannot be fetched or nothing survives
/// cleaning.
pub fn url_to_markdown(url: &str, retain_images: bool) -> String {
    let opts = CleanOptions {
        retain_images,
        ..Default::default()
    };
    let cleaned = parse_html(url, &opts);
    if cleaned.is_empty() {
        return String::new();
    }
    html_to_markdown(&cleaned, opts.double_space)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_document_drops_navigation() {
        let doc = Document::parse(
            "<body><nav>Menu</nav><h1>Title</h1><p>This paragraph has words.</p></body>",
            None,
        );
        let html = clean_document(&doc, &CleanOptions::default());
        assert_eq!(html, "<h1>Title</h1>\n<p>This paragraph has words.</p>\n");
    }

    #[test]
    fn parse_html_empty_input_is_empty() {
        assert_eq!(parse_html("", &CleanOptions::default()), "");
    }

    #[test]
    fn document_url_is_used_as_image_base() {
        let doc = Document::parse(
            r#"<img src="/logo.png">"#,
            Some("https://example.com/blog/post".to_string()),
        );
        let opts = CleanOptions {
            retain_images: true,
            ..Default::default()
        };
        assert_eq!(
            clean_document(&doc, &opts),
            r#"<img src="https://example.com/logo.png" />"#
        );
    }

    #[test]
    fn configured_base_url_wins_over_document_url() {
        let doc = Document::parse(
            r#"<img src="/logo.png">"#,
            Some("https://example.com/blog/post".to_string()),
        );
        let opts = CleanOptions {
            retain_images: true,
            base_url: Some("https://cdn.example.org/".to_string()),
            ..Default::default()
        };
        assert_eq!(
            clean_document(&doc, &opts),
            r#"<img src="https://cdn.example.org/logo.png" />"#
        );
    }
}
