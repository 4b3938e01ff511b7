// ABOUTME: Document loader: detects URL vs raw markup input, fetches, parses, and picks the content root.
// ABOUTME: Fetch failures are absorbed into an empty document so the pipeline yields empty output.

use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use crate::resource::{build_client, fetch, FetchOptions};

/// Where the input came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Markup(String),
}

impl Source {
    /// Classify raw input. `http://` and `https://` prefixes mark a URL; a bare
    /// `www.` host is treated as an https URL. Everything else is markup.
    pub fn detect(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Source::Url(trimmed.to_string())
        } else if trimmed.starts_with("www.") {
            Source::Url(format!("https://{}", trimmed))
        } else {
            Source::Markup(input.to_string())
        }
    }
}

/// A parsed page plus the URL it was loaded from, if any.
pub struct Document {
    html: Html,
    url: Option<String>,
}

impl Document {
    /// Parse markup. Fragments land inside the parser's implicit `body`.
    pub fn parse(markup: &str, url: Option<String>) -> Self {
        Self {
            html: Html::parse_document(markup),
            url,
        }
    }

    /// A document with no content, used when loading failed.
    pub fn empty(url: Option<String>) -> Self {
        Self::parse("", url)
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The page URL (after redirects) for fetched documents.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The subtree the cleaner walks: `body`, else `main`, else the root element.
    pub fn content_root(&self) -> ElementRef<'_> {
        ["body", "main"]
            .iter()
            .filter_map(|css| Selector::parse(css).ok())
            .find_map(|sel| self.html.select(&sel).next())
            .unwrap_or_else(|| self.html.root_element())
    }
}

/// Loads documents from URLs or raw markup.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    fetch: FetchOptions,
}

impl Loader {
    pub fn new(fetch: FetchOptions) -> Self {
        Self { fetch }
    }

    /// Load a URL or markup string. Never fails: unreachable content yields an
    /// empty document.
    pub fn load(&self, input: &str) -> Document {
        match Source::detect(input) {
            Source::Url(url) => self.load_url(url),
            Source::Markup(markup) => {
                info!("parsing provided HTML content");
                Document::parse(&markup, None)
            }
        }
    }

    fn load_url(&self, url: String) -> Document {
        info!(url = %url, "downloading HTML content");
        let result = build_client(&self.fetch).and_then(|client| fetch(&client, &url, &self.fetch));
        match result {
            Ok(fetched) => {
                let text = fetched.text();
                Document::parse(&text, Some(fetched.final_url))
            }
            Err(err) => {
                warn!(error = %err, "fetch failed, continuing with empty content");
                Document::empty(Some(url))
            }
        }
    }
}
