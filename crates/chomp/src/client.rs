// ABOUTME: The Chomp struct: a configured source (URL or HTML) with cached cleaning and conversion.
// ABOUTME: Each conversion result is computed on first use and returned from the cache afterwards.

use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::cleaner::{clean_document, clean_with};
use crate::error::ChompError;
use crate::formats::html_to_markdown;
use crate::loader::{Document, Loader};
use crate::options::{ChompBuilder, Options};
use crate::resource::FetchOptions;

const MISSING_INPUT: &str = "either a URL or HTML content must be provided";

/// A page to clean, either fetched from `url` or supplied as `html`.
///
/// When both are set, the URL wins and is fetched; the supplied markup is
/// only used when no URL is configured.
#[derive(Debug)]
pub struct Chomp {
    url: Option<String>,
    html: Option<String>,
    opts: Options,
    cleaned: OnceCell<String>,
    markdown: OnceCell<String>,
}

impl Chomp {
    pub fn new(url: Option<String>, html: Option<String>, opts: Options) -> Self {
        Self {
            url,
            html,
            opts,
            cleaned: OnceCell::new(),
            markdown: OnceCell::new(),
        }
    }

    /// Start building a Chomp with custom options.
    pub fn builder() -> ChompBuilder {
        ChompBuilder::new()
    }

    /// Convenience constructor for a page URL with default options.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self::new(Some(url.into()), None, Options::default())
    }

    /// Convenience constructor for raw markup with default options.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self::new(None, Some(html.into()), Options::default())
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn loader(&self) -> Loader {
        Loader::new(FetchOptions {
            timeout: self.opts.timeout,
            user_agent: self.opts.user_agent.clone(),
            headers: self.opts.headers.clone(),
        })
    }

    /// Cleaned HTML for the configured source. Computed on first call.
    pub fn clean(&self) -> Result<&str, ChompError> {
        if let Some(cleaned) = self.cleaned.get() {
            return Ok(cleaned);
        }

        let cleaned = match (&self.url, &self.html) {
            (Some(url), _) => clean_with(&self.loader(), url, &self.opts.clean),
            (None, Some(html)) => clean_document(&Document::parse(html, None), &self.opts.clean),
            (None, None) => return Err(ChompError::invalid_argument("Clean", MISSING_INPUT)),
        };
        debug!(bytes = cleaned.len(), "cached cleaned HTML");

        Ok(self.cleaned.get_or_init(|| cleaned))
    }

    /// Markdown for the configured source, cleaning first if needed.
    pub fn convert_to_markdown(&self) -> Result<&str, ChompError> {
        if let Some(markdown) = self.markdown.get() {
            return Ok(markdown);
        }

        let cleaned = self.clean()?;
        let markdown = if cleaned.is_empty() {
            String::new()
        } else {
            html_to_markdown(cleaned, self.opts.clean.double_space)
        };

        Ok(self.markdown.get_or_init(|| markdown))
    }

    /// Markdown for the configured URL. Shares the cache of
    /// [`convert_to_markdown`](Self::convert_to_markdown), since a configured
    /// URL always takes precedence over supplied markup.
    pub fn url_to_markdown(&self) -> Result<&str, ChompError> {
        if self.url.is_none() {
            return Err(ChompError::invalid_argument(
                "UrlToMarkdown",
                "a URL must be provided",
            ));
        }
        self.convert_to_markdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn clean_without_input_is_invalid_argument() {
        let chomp = Chomp::new(None, None, Options::default());
        let err = chomp.clean().unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains(MISSING_INPUT));
        assert!(chomp.convert_to_markdown().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn clean_html_is_cached() {
        let chomp = Chomp::from_html("<h1>Title</h1><p>Some body text</p>");
        let first = chomp.clean().unwrap();
        let second = chomp.clean().unwrap();
        assert_eq!(first, "<h1>Title</h1>\n<p>Some body text</p>\n");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn empty_html_is_valid_and_empty() {
        let chomp = Chomp::from_html("");
        assert_eq!(chomp.clean().unwrap(), "");
        assert_eq!(chomp.convert_to_markdown().unwrap(), "");
    }

    #[test]
    fn convert_to_markdown_uses_spacing_option() {
        let chomp = Chomp::builder()
            .html("<h1>Title</h1><p>Some body text</p><p>More body text</p>")
            .double_space(false)
            .build();
        assert_eq!(
            chomp.convert_to_markdown().unwrap(),
            "# Title\n\nSome body text\n\nMore body text"
        );
    }

    #[test]
    fn url_takes_precedence_over_html() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/remote");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html><body><p>Remote page words</p></body></html>");
        });

        let chomp = Chomp::builder()
            .url(server.url("/remote"))
            .html("<p>local markup words</p>")
            .build();
        assert_eq!(chomp.clean().unwrap(), "<p>Remote page words</p>\n");
        assert_eq!(chomp.convert_to_markdown().unwrap(), "Remote page words\n");
        assert_eq!(
            chomp.url_to_markdown().unwrap(),
            chomp.convert_to_markdown().unwrap()
        );
        mock.assert_hits(1);
    }

    #[test]
    fn unreachable_url_does_not_fall_back_to_html() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let chomp = Chomp::builder()
            .url(format!("http://127.0.0.1:{}/x", port))
            .html("<p>local markup words</p>")
            .build();
        assert_eq!(chomp.clean().unwrap(), "");
        assert_eq!(chomp.url_to_markdown().unwrap(), "");
    }

    #[test]
    fn url_to_markdown_requires_url() {
        let chomp = Chomp::from_html("<p>two words</p>");
        assert!(chomp.url_to_markdown().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn clean_fetches_url_once() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/article");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html><body><h2>Heading</h2><p>Fetched body text</p></body></html>");
        });

        let chomp = Chomp::from_url(server.url("/article"));
        let md = chomp.convert_to_markdown().unwrap().to_string();
        let again = chomp.convert_to_markdown().unwrap();
        mock.assert_hits(1);
        assert_eq!(md, "## Heading\n\nFetched body text\n");
        assert_eq!(again, md);
    }

    #[test]
    fn url_to_markdown_fetch_failure_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/down");
            then.status(503);
        });

        let chomp = Chomp::from_url(server.url("/down"));
        assert_eq!(chomp.url_to_markdown().unwrap(), "");
    }
}
