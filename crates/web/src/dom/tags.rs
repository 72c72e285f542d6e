// ABOUTME: TagFilter, a case-insensitive set of element names used to pick elements for removal.
// ABOUTME: Also holds the default noise-tag lists applied by the sanitizer.

use std::collections::BTreeSet;

/// Elements removed by default: document metadata, scripts and embeds.
pub const CLEAN_TAGS: &[&str] = &["head", "script", "link", "style", "noscript", "meta", "iframe"];

/// Elements removed in addition to [`CLEAN_TAGS`] unless explicitly kept.
pub const EXTRA_TAGS: &[&str] = &["img"];

/// A set of element names. Names are compared ASCII case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    names: BTreeSet<String>,
}

impl TagFilter {
    /// An empty filter that matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default [`CLEAN_TAGS`] set.
    pub fn clean_tags() -> Self {
        CLEAN_TAGS.iter().copied().collect()
    }

    /// The default [`EXTRA_TAGS`] set.
    pub fn extra_tags() -> Self {
        EXTRA_TAGS.iter().copied().collect()
    }

    /// Add a name.
    pub fn with(mut self, name: impl AsRef<str>) -> Self {
        self.insert(name);
        self
    }

    /// Remove a name.
    pub fn without(mut self, name: impl AsRef<str>) -> Self {
        self.remove(name);
        self
    }

    pub fn insert(&mut self, name: impl AsRef<str>) -> bool {
        self.names.insert(name.as_ref().trim().to_ascii_lowercase())
    }

    pub fn remove(&mut self, name: impl AsRef<str>) -> bool {
        self.names.remove(&name.as_ref().trim().to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        // html5ever already lowercases HTML element names.
        if self.names.contains(name) {
            return true;
        }
        name.bytes().any(|b| b.is_ascii_uppercase()) && self.names.contains(&name.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Union of two filters.
    pub fn union(&self, other: &TagFilter) -> TagFilter {
        TagFilter {
            names: self.names.union(&other.names).cloned().collect(),
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut filter = TagFilter::new();
        for name in iter {
            filter.insert(name);
        }
        filter
    }
}

impl<S: AsRef<str>> Extend<S> for TagFilter {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name);
        }
    }
}
