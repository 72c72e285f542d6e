// ABOUTME: Removes noise elements and comment-like nodes from a parsed document in one traversal.
// ABOUTME: CleanOptions carries the tag sets and flags; clean_document mutates the tree in place.

use ego_tree::{NodeId, Tree};
use scraper::{Html, Node};

use super::strainer::copy_subtree;
use super::tags::{TagFilter, EXTRA_TAGS};

/// Configuration for [`clean_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    pub tags: TagFilter,
    pub extra_tags: TagFilter,
    /// When false, `img` is dropped from `extra_tags` before cleaning.
    pub remove_imgs: bool,
    /// Remove comment, processing-instruction and doctype nodes.
    pub remove_comments: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            tags: TagFilter::clean_tags(),
            extra_tags: TagFilter::extra_tags(),
            remove_imgs: true,
            remove_comments: true,
        }
    }
}

impl CleanOptions {
    pub fn tags(mut self, tags: TagFilter) -> Self {
        self.tags = tags;
        self
    }

    pub fn extra_tags(mut self, extra_tags: TagFilter) -> Self {
        self.extra_tags = extra_tags;
        self
    }

    pub fn remove_imgs(mut self, remove: bool) -> Self {
        self.remove_imgs = remove;
        self
    }

    pub fn remove_comments(mut self, remove: bool) -> Self {
        self.remove_comments = remove;
        self
    }

    /// The combined set of element names to remove.
    ///
    /// `remove_imgs = false` only takes `img` out of the extra tags; an
    /// `img` listed in `tags` is still removed.
    pub fn removal_set(&self) -> TagFilter {
        let mut extra = self.extra_tags.clone();
        if !self.remove_imgs {
            for tag in EXTRA_TAGS {
                extra.remove(tag);
            }
        }
        self.tags.union(&extra)
    }
}

/// Counts of what a clean pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    /// Elements detached because their name was in the removal set.
    /// Descendants of a removed element are not counted separately.
    pub elements: usize,
    /// Comment, processing-instruction and doctype nodes detached.
    pub noise_nodes: usize,
}

impl CleanStats {
    pub fn total(&self) -> usize {
        self.elements + self.noise_nodes
    }
}

fn is_noise_node(node: &Node) -> bool {
    matches!(
        node,
        Node::Comment(_) | Node::ProcessingInstruction(_) | Node::Doctype(_)
    )
}

/// Strip unwanted elements and noise nodes from `doc`.
///
/// Every element named in [`CleanOptions::removal_set`] is detached with
/// its whole subtree. With `remove_comments`, every comment, processing
/// instruction and doctype node still attached is detached as well.
/// Applying the same options twice is a no-op the second time.
pub fn clean_document(doc: &mut Html, opts: &CleanOptions) -> CleanStats {
    let removal = opts.removal_set();
    let mut stats = CleanStats::default();
    let mut doomed: Vec<NodeId> = Vec::new();

    // Pre-order walk that never descends into a subtree already marked.
    let mut stack = vec![doc.tree.root().id()];
    while let Some(id) = stack.pop() {
        let Some(node) = doc.tree.get(id) else {
            continue;
        };

        let remove = match node.value() {
            Node::Element(el) if removal.contains(el.name()) => {
                stats.elements += 1;
                true
            }
            value if opts.remove_comments && is_noise_node(value) => {
                stats.noise_nodes += 1;
                true
            }
            _ => false,
        };

        if remove {
            doomed.push(id);
            continue;
        }

        let children: Vec<NodeId> = node.children().map(|c| c.id()).collect();
        stack.extend(children.into_iter().rev());
    }

    for id in doomed {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    if stats.total() > 0 {
        compact(doc);
        log::debug!(
            "clean: removed {} elements, {} noise nodes",
            stats.elements,
            stats.noise_nodes
        );
    }

    stats
}

/// Rebuild the tree from its attached nodes.
///
/// ego_tree keeps detached nodes in its arena and `Html::select` walks the
/// arena, so without this a removed `<head>` would still be selectable.
fn compact(doc: &mut Html) {
    let root = doc.tree.root();
    let mut tree = Tree::new(root.value().clone());
    let new_root = tree.root().id();
    for child in root.children() {
        copy_subtree(child, &mut tree, new_root);
    }
    doc.tree = tree;
}
