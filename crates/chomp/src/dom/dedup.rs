// ABOUTME: Duplicate suppression state for one cleaning invocation.
// ABOUTME: Three identity sets: headers (tag + text), images (resolved URL), content blocks (text).

use std::collections::HashSet;
use std::hash::Hash;

/// Identity of a heading: its tag name and normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeaderIdentity {
    pub tag: String,
    pub text: String,
}

impl HeaderIdentity {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
        }
    }
}

/// Set of identities already emitted. No eviction.
#[derive(Debug, Clone)]
pub struct IdentitySet<T> {
    seen: HashSet<T>,
}

impl<T> Default for IdentitySet<T> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash> IdentitySet<T> {
    pub fn seen(&self, id: &T) -> bool {
        self.seen.contains(id)
    }

    /// Record an identity. Returns true if it had not been seen before.
    pub fn mark(&mut self, id: T) -> bool {
        self.seen.insert(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Dedup state scoped to a single cleaning call.
///
/// Passed explicitly into the structural filter so repeated or parallel
/// invocations never share identities.
#[derive(Debug, Clone, Default)]
pub struct DedupState {
    pub headers: IdentitySet<HeaderIdentity>,
    pub images: IdentitySet<String>,
    pub content: IdentitySet<String>,
}

impl DedupState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_reports_first_insertion_only() {
        let mut set = IdentitySet::default();
        assert!(!set.seen(&"a".to_string()));
        assert!(set.mark("a".to_string()));
        assert!(set.seen(&"a".to_string()));
        assert!(!set.mark("a".to_string()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn header_identity_depends_on_tag() {
        let mut state = DedupState::new();
        assert!(state.headers.mark(HeaderIdentity::new("h2", "Same")));
        assert!(!state.headers.seen(&HeaderIdentity::new("h3", "Same")));
        assert!(state.headers.seen(&HeaderIdentity::new("h2", "Same")));
    }

    #[test]
    fn identity_spaces_are_independent() {
        let mut state = DedupState::new();
        state.content.mark("https://example.com/a.png".to_string());
        assert!(!state.images.seen(&"https://example.com/a.png".to_string()));
        assert!(state.headers.is_empty());
    }
}
