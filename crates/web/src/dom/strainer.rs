// ABOUTME: Strainer, a filter that limits which elements of a parsed document are kept.
// ABOUTME: Matching elements are copied with their subtrees into a fresh fragment tree.

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::node::Element;
use scraper::{Html, Node};

/// How an attribute constraint is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    /// The attribute exists, whatever its value.
    Present,
    /// The attribute equals the value. For `class`, any single class
    /// token matching also counts.
    Equals(String),
}

/// Selects the elements that survive into the document tree.
///
/// An element matches when its name equals the strainer's name (if any)
/// and every attribute constraint holds. Only the outermost matching
/// elements are kept, each with its whole subtree, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Strainer {
    name: Option<String>,
    attrs: Vec<(String, AttrMatch)>,
}

impl Strainer {
    /// Match elements named `name`.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Some(name.as_ref().trim().to_ascii_lowercase()),
            attrs: Vec::new(),
        }
    }

    /// Match any element; combine with attribute constraints.
    pub fn any() -> Self {
        Self::default()
    }

    /// Require `key` to equal `value`.
    pub fn attr(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.attrs
            .push((key.as_ref().to_ascii_lowercase(), AttrMatch::Equals(value.into())));
        self
    }

    /// Require `key` to be present.
    pub fn has_attr(mut self, key: impl AsRef<str>) -> Self {
        self.attrs.push((key.as_ref().to_ascii_lowercase(), AttrMatch::Present));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check a single element against the strainer.
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(ref name) = self.name {
            if !element.name().eq_ignore_ascii_case(name) {
                return false;
            }
        }

        self.attrs.iter().all(|(key, want)| match (element.attr(key), want) {
            (None, _) => false,
            (Some(_), AttrMatch::Present) => true,
            (Some(value), AttrMatch::Equals(expected)) => {
                value == expected
                    || (key == "class" && value.split_ascii_whitespace().any(|c| c == expected))
            }
        })
    }

    /// Build a fragment holding copies of the outermost matching subtrees of `doc`.
    pub fn apply(&self, doc: &Html) -> Html {
        let mut out = Html::new_fragment();
        let root = out.tree.root().id();
        self.collect(doc.tree.root(), &mut out.tree, root);
        out
    }

    fn collect(&self, node: NodeRef<'_, Node>, out: &mut Tree<Node>, parent: NodeId) {
        let mut stack: Vec<NodeRef<'_, Node>> = node.children().rev().collect();
        while let Some(current) = stack.pop() {
            if let Node::Element(el) = current.value() {
                if self.matches(el) {
                    copy_subtree(current, out, parent);
                    continue;
                }
            }
            stack.extend(current.children().rev());
        }
    }
}

/// Append a deep copy of `node` under `parent` in `out`.
///
/// Walks with an explicit stack so nesting depth is bounded by the heap,
/// not the thread stack.
pub(crate) fn copy_subtree(node: NodeRef<'_, Node>, out: &mut Tree<Node>, parent: NodeId) {
    let mut stack = vec![(node, parent)];
    while let Some((source, dest)) = stack.pop() {
        let id = match out.get_mut(dest) {
            Some(mut p) => p.append(source.value().clone()).id(),
            None => continue,
        };
        stack.extend(source.children().rev().map(|child| (child, id)));
    }
}
