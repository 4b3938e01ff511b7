// ABOUTME: Image source resolution against a base URL and image-like URL validation.
// ABOUTME: Resolved URLs are the identity used for image deduplication.

use scraper::ElementRef;
use tracing::warn;
use url::Url;

/// Extensions recognised by [`is_image_url`].
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Resolves `src` attributes of image elements against an optional base URL.
#[derive(Debug, Clone, Default)]
pub struct ImageResolver {
    base: Option<Url>,
}

impl ImageResolver {
    /// Create a resolver. An unparseable base is treated as absent.
    pub fn new(base_url: Option<&str>) -> Self {
        let base = base_url.and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(err) => {
                warn!(base_url = raw, error = %err, "ignoring unparseable base URL");
                None
            }
        });
        Self { base }
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Resolve the node's `src`. Returns None if it has no `src` attribute.
    pub fn resolve(&self, element: &ElementRef<'_>) -> Option<String> {
        element.value().attr("src").map(|src| self.resolve_src(src))
    }

    /// Join a raw source against the base. Without a base, or when joining
    /// fails, the source is returned verbatim.
    pub fn resolve_src(&self, src: &str) -> String {
        match self.base {
            Some(ref base) => base
                .join(src.trim())
                .map(|url| url.to_string())
                .unwrap_or_else(|_| src.to_string()),
            None => src.to_string(),
        }
    }
}

/// Checks whether a URL looks like a direct link to an image file.
///
/// The URL must be absolute (`http://`, `https://`) or root-relative (`/`) and
/// end with a common raster image extension.
pub fn is_image_url(url: &str) -> bool {
    if !(url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/')) {
        return false;
    }
    let lower = url.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
