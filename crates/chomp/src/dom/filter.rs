// ABOUTME: Structural filter that classifies top-level children of the content root.
// ABOUTME: Drops boilerplate, dedups headings and blocks, retains images, emits ordered fragments.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;
use ego_tree::NodeRef;
use scraper::{ElementRef, Node};
use tracing::{debug, trace, warn};

use super::dedup::{DedupState, HeaderIdentity};
use super::images::{is_image_url, ImageResolver};
use super::serialize::{serialize_node, EditPlan};
use super::text::{normalize_spaces, text_identity, token_count, visible_text};
use super::{is_heading, Fragment, IMAGE_TAG};
use crate::options::CleanOptions;

/// Tags removed wherever they appear under the content root.
const REMOVE_TAGS: &[&str] = &["nav", "aside", "footer", "script", "style", "menu", "search"];

/// ARIA roles removed wherever they appear under the content root.
const REMOVE_ROLES: &[&str] = &["navigation", "menu"];

/// Generic containers judged by keyword and length heuristics.
const CONTAINER_TAGS: &[&str] = &["div", "section", "article", "figure"];

// Class/id keywords marking boilerplate blocks
static UNWANTED_KEYWORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(social|comments?|sidebar|widget|menu|nav|modal)").unwrap()
});

/// Returns true if the element's class or id matches a boilerplate keyword.
pub fn has_unwanted_class_or_id(element: &ElementRef<'_>) -> bool {
    let class = element.value().attr("class").unwrap_or("");
    let id = element.value().attr("id").unwrap_or("");
    UNWANTED_KEYWORDS_RE.is_match(class) || UNWANTED_KEYWORDS_RE.is_match(id)
}

/// Returns true for tags and roles that never reach the output.
pub fn is_removed_outright(element: &ElementRef<'_>) -> bool {
    let name = element.value().name();
    if REMOVE_TAGS.contains(&name) {
        return true;
    }
    element
        .value()
        .attr("role")
        .map(|role| {
            let role = role.trim();
            REMOVE_ROLES.iter().any(|r| role.eq_ignore_ascii_case(r))
        })
        .unwrap_or(false)
}

/// Walks the top-level children of a content root and builds the fragment list.
pub struct StructuralFilter<'a> {
    opts: &'a CleanOptions,
    images: ImageResolver,
    keywords: Option<AhoCorasick>,
}

impl<'a> StructuralFilter<'a> {
    /// Create a filter. `base_url` overrides `opts.base_url` when the caller
    /// knows where the document came from and no explicit base was configured.
    pub fn new(opts: &'a CleanOptions, base_url: Option<&str>) -> Self {
        let base = opts.base_url.as_deref().or(base_url);
        Self {
            opts,
            images: ImageResolver::new(base),
            keywords: build_keyword_matcher(&opts.retain_keywords),
        }
    }

    /// Classify every top-level child of `root` and return the surviving fragments
    /// in document order.
    pub fn run(&self, root: ElementRef<'_>, state: &mut DedupState) -> Vec<Fragment> {
        let mut plan = EditPlan::default();
        self.mark_removed(root, &mut plan);

        let mut fragments = Vec::new();
        for child in root.children().filter_map(ElementRef::wrap) {
            if plan.is_skipped(child.id()) || has_unwanted_class_or_id(&child) {
                trace!(tag = child.value().name(), "dropping boilerplate element");
                continue;
            }

            let tag = child.value().name();
            let kept = if tag == IMAGE_TAG {
                self.top_level_image(child, &mut plan, state)
            } else if is_heading(tag) {
                self.heading(child, &mut plan, state)
            } else if CONTAINER_TAGS.contains(&tag) {
                self.container(child, &mut plan, state)
            } else if self.opts.retain_tags.contains(tag) {
                self.retained_tag(child, &mut plan, state)
            } else {
                false
            };

            if kept {
                fragments.push(Fragment::new(tag, serialize_node(*child, &plan)));
            } else {
                trace!(tag, "element not retained");
            }
        }

        debug!(
            fragments = fragments.len(),
            headers = state.headers.len(),
            images = state.images.len(),
            blocks = state.content.len(),
            "structural filter complete"
        );
        fragments
    }

    /// Skip removal tags and navigation roles anywhere below the root.
    fn mark_removed(&self, root: ElementRef<'_>, plan: &mut EditPlan) {
        for node in root.descendants().skip(1) {
            if let Some(el) = ElementRef::wrap(node) {
                if is_removed_outright(&el) {
                    plan.skip(el.id());
                }
            }
        }
    }

    fn top_level_image(
        &self,
        element: ElementRef<'_>,
        plan: &mut EditPlan,
        state: &mut DedupState,
    ) -> bool {
        if !self.opts.retain_images {
            return false;
        }
        self.accept_image(element, plan, state)
    }

    fn heading(&self, element: ElementRef<'_>, plan: &mut EditPlan, state: &mut DedupState) -> bool {
        let identity = HeaderIdentity::new(element.value().name(), text_identity(*element, plan));
        if !state.headers.mark(identity) {
            return false;
        }
        for node in element.descendants().skip(1) {
            if let Some(el) = ElementRef::wrap(node) {
                if el.value().name() == "a" {
                    plan.unwrap(el.id());
                }
            }
        }
        self.retain_images_within(element, plan, state);
        true
    }

    fn container(&self, element: ElementRef<'_>, plan: &mut EditPlan, state: &mut DedupState) -> bool {
        let text = visible_text(*element, plan);
        if self.is_unwanted(&element, &text) {
            trace!(tag = element.value().name(), "unwanted container");
            return false;
        }
        let identity = normalize_spaces(&text);
        if identity.is_empty() || !state.content.mark(identity) {
            return false;
        }
        self.retain_images_within(element, plan, state);
        true
    }

    fn retained_tag(&self, element: ElementRef<'_>, plan: &mut EditPlan, state: &mut DedupState) -> bool {
        let identity = text_identity(*element, plan);
        if identity.is_empty() || state.content.seen(&identity) {
            return false;
        }
        let substantive = element.has_children()
            && (self.matches_keyword(&identity) || token_count(&identity) >= self.opts.min_word_length);
        if !substantive {
            return false;
        }
        self.retain_images_within(element, plan, state);
        state.content.mark(identity);
        true
    }

    /// Keyword, "related" and length heuristics for generic containers.
    fn is_unwanted(&self, element: &ElementRef<'_>, text: &str) -> bool {
        text.to_lowercase().contains("related")
            || has_unwanted_class_or_id(element)
            || token_count(text) < self.opts.min_word_length
    }

    fn matches_keyword(&self, text: &str) -> bool {
        match self.keywords {
            Some(ref matcher) => matcher.is_match(&text.to_lowercase()),
            None => false,
        }
    }

    /// Apply image retention to every image below `element` that will reach
    /// the output. Images inside skipped subtrees never claim an identity.
    fn retain_images_within(&self, element: ElementRef<'_>, plan: &mut EditPlan, state: &mut DedupState) {
        let mut images = Vec::new();
        collect_live_images(*element, plan, &mut images);
        for img in images {
            if !self.opts.retain_images || !self.accept_image(img, plan, state) {
                plan.skip(img.id());
            }
        }
    }

    /// Resolve, dedup and rewrite a single image. Returns false if it must be dropped.
    fn accept_image(&self, img: ElementRef<'_>, plan: &mut EditPlan, state: &mut DedupState) -> bool {
        let Some(resolved) = self.images.resolve(&img) else {
            return false;
        };
        if !state.images.mark(resolved.clone()) {
            trace!(src = %resolved, "duplicate image");
            return false;
        }
        if !is_image_url(&resolved) {
            trace!(src = %resolved, "keeping image without a recognised image URL");
        }
        plan.rewrite_src(img.id(), resolved);
        true
    }
}

/// Images below `node`, not descending into skipped subtrees.
fn collect_live_images<'b>(node: NodeRef<'b, Node>, plan: &EditPlan, out: &mut Vec<ElementRef<'b>>) {
    for child in node.children() {
        if plan.is_skipped(child.id()) {
            continue;
        }
        if let Some(el) = ElementRef::wrap(child) {
            if el.value().name() == IMAGE_TAG {
                out.push(el);
            } else {
                collect_live_images(child, plan, out);
            }
        }
    }
}

/// Build a case-insensitive matcher over the non-empty keywords.
fn build_keyword_matcher(keywords: &[String]) -> Option<AhoCorasick> {
    let patterns: Vec<String> = keywords
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| k.to_lowercase())
        .collect();
    if patterns.is_empty() {
        return None;
    }
    match AhoCorasick::new(&patterns) {
        Ok(matcher) => Some(matcher),
        Err(err) => {
            warn!(error = %err, "failed to build retain keyword matcher");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn run(html: &str, opts: &CleanOptions) -> Vec<Fragment> {
        let doc = Html::parse_document(html);
        let body = doc.select(&Selector::parse("body").unwrap()).next().unwrap();
        let filter = StructuralFilter::new(opts, None);
        filter.run(body, &mut DedupState::new())
    }

    fn tags(fragments: &[Fragment]) -> Vec<&str> {
        fragments.iter().map(|f| f.tag.as_str()).collect()
    }

    #[test]
    fn test_drops_removal_tags_and_roles() {
        let html = r#"<nav>Main menu links</nav><aside>Aside words here</aside>
            <div role="navigation">Go somewhere else now</div>
            <p>Actual paragraph content here.</p>"#;
        let fragments = run(html, &CleanOptions::default());
        assert_eq!(tags(&fragments), vec!["p"]);
    }

    #[test]
    fn test_images_in_removed_subtrees_do_not_claim_identity() {
        let html = r#"<div><nav><img src="/a.png"></nav><p>Some real content words here</p></div>
            <p>Figure <img src="/a.png"> shown here</p>"#;
        let opts = CleanOptions {
            retain_images: true,
            ..Default::default()
        };
        let fragments = run(html, &opts);
        assert_eq!(tags(&fragments), vec!["div", "p"]);
        assert!(!fragments[0].html.contains("<img"));
        assert!(fragments[1].html.contains(r#"<img src="/a.png" />"#));
    }

    #[test]
    fn test_removes_nested_scripts_from_containers() {
        let html = "<div><p>Some useful words</p><script>track()</script><footer>Legal</footer></div>";
        let fragments = run(html, &CleanOptions::default());
        assert_eq!(fragments.len(), 1);
        assert!(!fragments[0].html.contains("track()"));
        assert!(!fragments[0].html.contains("Legal"));
    }

    #[test]
    fn test_drops_keyword_class_on_any_top_level_tag() {
        let html = r#"<div class="social-share"><p>Share this</p></div>
            <p id="comments">Leave a comment below please</p>
            <section class="Modal-dialog">Subscribe to our newsletter today</section>"#;
        assert!(run(html, &CleanOptions::default()).is_empty());
    }

    #[test]
    fn test_container_with_related_text_is_unwanted() {
        let html = "<div><h3>Related articles</h3><p>Some other story</p></div>";
        assert!(run(html, &CleanOptions::default()).is_empty());
    }

    #[test]
    fn test_short_container_is_unwanted() {
        let opts = CleanOptions {
            min_word_length: 4,
            ..Default::default()
        };
        let html = "<div>only three words</div><div>now there are four</div>";
        let fragments = run(html, &opts);
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].html.contains("now there are four"));
    }

    #[test]
    fn test_duplicate_headings_keep_first() {
        let html = "<h2>Same</h2><h2>Same</h2><h3>Same</h3>";
        let fragments = run(html, &CleanOptions::default());
        assert_eq!(tags(&fragments), vec!["h2", "h3"]);
    }

    #[test]
    fn test_heading_anchors_are_unwrapped() {
        let html = r##"<h1><a href="#top">Title <b>bold</b></a></h1>"##;
        let fragments = run(html, &CleanOptions::default());
        assert_eq!(fragments[0].html, "<h1>Title <b>bold</b></h1>");
    }

    #[test]
    fn test_duplicate_content_blocks_are_dropped() {
        let html = "<p>Repeated  paragraph text</p><div>Repeated paragraph text</div>";
        let fragments = run(html, &CleanOptions::default());
        assert_eq!(tags(&fragments), vec!["p"]);
    }

    #[test]
    fn test_retain_keyword_overrides_length() {
        let html = "<p>Price</p><p>Shipping</p>";
        let opts = CleanOptions {
            retain_keywords: vec!["PRICE".to_string()],
            ..Default::default()
        };
        let fragments = run(html, &opts);
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].html.contains("Price"));
    }

    #[test]
    fn test_unlisted_tags_are_dropped() {
        let html = "<ul><li>List items are not retained</li></ul><span>Nor are spans here</span>";
        assert!(run(html, &CleanOptions::default()).is_empty());
    }

    #[test]
    fn test_images_dropped_when_not_retained() {
        let html = r#"<img src="/a.png"><div><img src="/b.png"> Some words around it</div>"#;
        let fragments = run(html, &CleanOptions::default());
        assert_eq!(fragments.len(), 1);
        assert!(!fragments[0].html.contains("<img"));
    }

    #[test]
    fn test_images_resolved_and_deduplicated() {
        let opts = CleanOptions {
            retain_images: true,
            base_url: Some("https://example.com/post/1".to_string()),
            ..Default::default()
        };
        let html = r#"<img src="/a.png"><img src="https://example.com/a.png">
            <div><img src="b.png"><img> Caption words for the figure</div>"#;
        let fragments = run(html, &opts);
        assert_eq!(tags(&fragments), vec!["img", "div"]);
        assert_eq!(fragments[0].html, r#"<img src="https://example.com/a.png" />"#);
        assert!(fragments[1]
            .html
            .contains(r#"<img src="https://example.com/post/b.png" />"#));
        assert_eq!(fragments[1].html.matches("<img").count(), 1);
    }

    #[test]
    fn test_caller_base_url_used_when_not_configured() {
        let doc = Html::parse_document(r#"<img src="pic.gif">"#);
        let body = doc.select(&Selector::parse("body").unwrap()).next().unwrap();
        let opts = CleanOptions {
            retain_images: true,
            ..Default::default()
        };
        let filter = StructuralFilter::new(&opts, Some("https://site.test/dir/page"));
        let fragments = filter.run(body, &mut DedupState::new());
        assert_eq!(fragments[0].html, r#"<img src="https://site.test/dir/pic.gif" />"#);
    }
}
