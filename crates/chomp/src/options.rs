// ABOUTME: Configuration for chomp: CleanOptions (cleaning rules), Options, and ChompBuilder.
// ABOUTME: ChompBuilder provides a fluent API for constructing Chomp instances with custom settings.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::client::Chomp;

/// Tags kept at the top level when their text is substantive.
pub const DEFAULT_RETAIN_TAGS: &[&str] = &["p", "strong", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Rules for one cleaning invocation.
///
/// Every field has a default, so a partial JSON document such as
/// `{"retain_images": true}` deserializes into a complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// Keep `<img>` elements (deduplicated by resolved URL).
    pub retain_images: bool,
    /// Minimum whitespace-delimited token count for a block to count as content.
    pub min_word_length: usize,
    /// Top-level tags kept when substantive. Lowercased on deserialization.
    #[serde(deserialize_with = "deserialize_tags")]
    pub retain_tags: BTreeSet<String>,
    /// Case-insensitive substrings that keep a retain-tag block regardless of length.
    pub retain_keywords: Vec<String>,
    /// Base for resolving relative image sources.
    pub base_url: Option<String>,
    /// Separate every non-blank Markdown line with a blank line.
    pub double_space: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            retain_images: false,
            min_word_length: 2,
            retain_tags: DEFAULT_RETAIN_TAGS.iter().map(|t| t.to_string()).collect(),
            retain_keywords: Vec::new(),
            base_url: None,
            double_space: true,
        }
    }
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Vec::<String>::deserialize(deserializer)?;
    Ok(tags
        .iter()
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect())
}

impl CleanOptions {
    /// Parse options from a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Full configuration for a [`Chomp`] instance: cleaning rules plus fetch settings.
#[derive(Debug, Clone)]
pub struct Options {
    pub clean: CleanOptions,
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            clean: CleanOptions::default(),
            timeout: Duration::from_secs(30),
            user_agent: format!("chomp/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
        }
    }
}

/// Builder for constructing Chomp instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ChompBuilder {
    url: Option<String>,
    html: Option<String>,
    opts: Options,
}

impl ChompBuilder {
    /// Create a new ChompBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page URL to fetch.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set raw HTML to clean instead of fetching.
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Replace all cleaning rules at once.
    pub fn clean_options(mut self, clean: CleanOptions) -> Self {
        self.opts.clean = clean;
        self
    }

    pub fn retain_images(mut self, retain: bool) -> Self {
        self.opts.clean.retain_images = retain;
        self
    }

    pub fn min_word_length(mut self, min: usize) -> Self {
        self.opts.clean.min_word_length = min;
        self
    }

    /// Replace the set of retained top-level tags.
    pub fn retain_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opts.clean.retain_tags = tags
            .into_iter()
            .map(|t| t.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Add a keyword that keeps short retain-tag blocks.
    pub fn retain_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.opts.clean.retain_keywords.push(keyword.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.opts.clean.base_url = Some(base_url.into());
        self
    }

    pub fn double_space(mut self, double_space: bool) -> Self {
        self.opts.clean.double_space = double_space;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Build the Chomp instance with the configured options.
    pub fn build(self) -> Chomp {
        Chomp::new(self.url, self.html, self.opts)
    }
}
