//! Hierarchical tag tree built from flat `(path, text)` entries.
//!
//! A node is either a leaf holding text or a branch holding children keyed by
//! tag segment. Children live in a `BTreeMap`, so iteration is in byte order
//! of the segment, which is the order rendering requires.
use std::collections::BTreeMap;

use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::record::Entry;
use crate::core::render;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeKind {
    Leaf(String),
    Branch(BTreeMap<String, Node>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    tag: String,
    depth: usize,
    element_count: usize,
    kind: NodeKind,
}

impl Node {
    fn new(tag: &str, depth: usize) -> Self {
        Self {
            tag: tag.to_string(),
            depth,
            element_count: 0,
            kind: NodeKind::Leaf(String::new()),
        }
    }

    fn root() -> Self {
        Self {
            tag: String::new(),
            depth: 0,
            element_count: 0,
            kind: NodeKind::Branch(BTreeMap::new()),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of insertions that passed through or ended at this node.
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf(text) => Some(text),
            NodeKind::Branch(_) => None,
        }
    }

    pub fn child(&self, tag: &str) -> Option<&Node> {
        match &self.kind {
            NodeKind::Branch(children) => children.get(tag),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        let children = match &self.kind {
            NodeKind::Branch(children) => Some(children.values()),
            NodeKind::Leaf(_) => None,
        };
        children.into_iter().flatten()
    }

    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(_) => 1,
            NodeKind::Branch(children) => children.values().map(Node::leaf_count).sum(),
        }
    }

    fn child_mut(&mut self, tag: &str) -> &mut Node {
        let depth = self.depth + 1;
        if let NodeKind::Leaf(text) = &self.kind {
            if !text.is_empty() {
                debug!(tag = %self.tag, "leaf gains children; dropping its text");
            }
            self.kind = NodeKind::Branch(BTreeMap::new());
        }
        let NodeKind::Branch(children) = &mut self.kind else {
            unreachable!("leaf was converted to a branch above");
        };
        children
            .entry(tag.to_string())
            .or_insert_with(|| Node::new(tag, depth))
    }

    fn set_text(&mut self, text: String) {
        match &mut self.kind {
            NodeKind::Branch(children) if !children.is_empty() => {
                debug!(tag = %self.tag, "branch keeps its children; dropping leaf text");
            }
            kind => *kind = NodeKind::Leaf(text),
        }
    }

    fn collect_entries(&self, path: &mut Vec<String>, out: &mut Vec<Entry>) {
        match &self.kind {
            NodeKind::Leaf(text) => out.push(Entry::new(path.clone(), text.clone())),
            NodeKind::Branch(children) => {
                for (tag, child) in children {
                    path.push(tag.clone());
                    child.collect_entries(path, out);
                    path.pop();
                }
            }
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TagTree {
    root: Node,
}

impl Default for TagTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TagTree {
    pub fn new() -> Self {
        Self { root: Node::root() }
    }

    pub fn from_entries<I>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut tree = Self::new();
        for entry in entries {
            tree.insert(&entry.path, entry.text)?;
        }
        Ok(tree)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.children().next().is_none()
    }

    /// Sets `text` at `path`, creating missing nodes; an existing leaf is overwritten.
    pub fn insert<S: AsRef<str>>(
        &mut self,
        path: &[S],
        text: impl Into<String>,
    ) -> Result<(), Error> {
        let Some((last, parents)) = path.split_last() else {
            return Err(Error::new(ErrorKind::Usage).with_message("tag path must not be empty"));
        };
        let mut node = &mut self.root;
        node.element_count += 1;
        for segment in parents {
            node = node.child_mut(segment.as_ref());
            node.element_count += 1;
        }
        let leaf = node.child_mut(last.as_ref());
        leaf.element_count += 1;
        leaf.set_text(text.into());
        Ok(())
    }

    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        path.iter()
            .try_fold(&self.root, |node, segment| node.child(segment.as_ref()))
    }

    /// Leaves as entries, in sorted path order.
    pub fn entries(&self) -> Vec<Entry> {
        let mut out = Vec::new();
        self.root.collect_entries(&mut Vec::new(), &mut out);
        out
    }

    pub fn render(&self) -> String {
        render::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeKind, TagTree};
    use crate::core::error::ErrorKind;
    use crate::core::record::Entry;

    #[test]
    fn insert_creates_intermediate_branches() {
        let mut tree = TagTree::new();
        tree.insert(&["menu", "file", "open"], "Open").expect("insert");

        let file = tree.get(&["menu", "file"]).expect("file");
        assert_eq!(file.depth(), 2);
        assert!(matches!(file.kind(), NodeKind::Branch(_)));
        let open = tree.get(&["menu", "file", "open"]).expect("open");
        assert_eq!(open.tag(), "open");
        assert_eq!(open.depth(), 3);
        assert_eq!(open.text(), Some("Open"));
    }

    #[test]
    fn last_write_wins_without_duplicates() {
        let mut tree = TagTree::new();
        tree.insert(&["a", "b"], "first").expect("insert");
        tree.insert(&["a", "b"], "second").expect("insert");

        let a = tree.get(&["a"]).expect("a");
        assert_eq!(a.children().count(), 1);
        assert_eq!(tree.root().leaf_count(), 1);
        assert_eq!(tree.get(&["a", "b"]).and_then(|n| n.text()), Some("second"));
        assert_eq!(tree.root().element_count(), 2);
    }

    #[test]
    fn empty_path_is_rejected() {
        let mut tree = TagTree::new();
        let empty: [&str; 0] = [];
        let err = tree.insert(&empty, "x").expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(tree.is_empty());
    }

    #[test]
    fn empty_segments_are_distinct_keys() {
        let mut tree = TagTree::new();
        tree.insert(&["a", "", "b"], "x").expect("insert");
        tree.insert(&["a", "c"], "y").expect("insert");
        assert_eq!(tree.get(&["a", "", "b"]).and_then(|n| n.text()), Some("x"));
        assert_eq!(tree.get(&["a"]).map(|n| n.children().count()), Some(2));
    }

    #[test]
    fn children_below_a_leaf_replace_its_text() {
        let mut tree = TagTree::new();
        tree.insert(&["a"], "leaf").expect("insert");
        tree.insert(&["a", "b"], "child").expect("insert");
        let a = tree.get(&["a"]).expect("a");
        assert_eq!(a.text(), None);
        assert_eq!(a.child("b").and_then(|n| n.text()), Some("child"));
    }

    #[test]
    fn leaf_text_on_a_branch_is_dropped() {
        let mut tree = TagTree::new();
        tree.insert(&["a", "b"], "child").expect("insert");
        tree.insert(&["a"], "leaf").expect("insert");
        let a = tree.get(&["a"]).expect("a");
        assert_eq!(a.text(), None);
        assert_eq!(a.children().count(), 1);
    }

    #[test]
    fn entries_come_back_sorted() {
        let tree = TagTree::from_entries(vec![
            Entry::from_tag("z", "1"),
            Entry::from_tag("a/y", "2"),
            Entry::from_tag("a/x", "3"),
        ])
        .expect("tree");
        let tags: Vec<String> = tree.entries().iter().map(Entry::tag).collect();
        assert_eq!(tags, vec!["a/x", "a/y", "z"]);
    }
}
