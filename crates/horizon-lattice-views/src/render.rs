//! Render tree for embedded views.
//!
//! A DOM-like tree of render nodes stored in an arena. Embedded views keep
//! references to their root render nodes here, and the container operations
//! link and unlink those nodes as views are attached, detached and moved.
//!
//! # Key Types
//!
//! - [`RenderTree`] - Arena holding every render node and its parent/children
//! - [`RenderNodeId`] - Stable handle to a render node
//! - [`RenderNodeKind`] - What a render node represents
//!
//! Inserting a node that already has a parent moves it, the same way a DOM
//! `insertBefore`/`appendChild` does.

use std::fmt::Write as FmtWrite;

use slotmap::{SlotMap, new_key_type};

use crate::error::{ViewError, ViewResult};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a node in the [`RenderTree`].
    ///
    /// Handles stay valid while the node exists, regardless of where it is
    /// linked in the tree.
    pub struct RenderNodeId;
}

/// The kind of content a render node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNodeKind {
    /// An element with a tag name.
    Element(String),
    /// A text node.
    Text(String),
    /// A comment, typically used as a view container placeholder.
    Comment(String),
}

impl RenderNodeKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Element(tag) => format!("<{tag}>"),
            Self::Text(text) => format!("\"{text}\""),
            Self::Comment(text) => format!("<!--{text}-->"),
        }
    }
}

struct RenderNode {
    kind: RenderNodeKind,
    parent: Option<RenderNodeId>,
    children: Vec<RenderNodeId>,
}

impl RenderNode {
    fn new(kind: RenderNodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// An arena-backed render tree.
///
/// # Example
///
/// ```
/// use horizon_lattice_views::RenderTree;
///
/// let mut tree = RenderTree::new();
/// let body = tree.create_element("body");
/// let anchor = tree.create_comment("container");
/// let text = tree.create_text("hello");
///
/// tree.append_child(body, anchor).unwrap();
/// tree.append_child(body, text).unwrap();
///
/// assert_eq!(tree.children(body).unwrap(), &[anchor, text]);
/// assert_eq!(tree.next_sibling(anchor).unwrap(), Some(text));
/// ```
pub struct RenderTree {
    nodes: SlotMap<RenderNodeId, RenderNode>,
}

impl RenderTree {
    /// Create an empty render tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Create a detached node of the given kind.
    pub fn create_node(&mut self, kind: RenderNodeKind) -> RenderNodeId {
        let id = self.nodes.insert(RenderNode::new(kind));
        tracing::trace!(target: targets::RENDER, ?id, "created render node");
        id
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: impl Into<String>) -> RenderNodeId {
        self.create_node(RenderNodeKind::Element(tag.into()))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> RenderNodeId {
        self.create_node(RenderNodeKind::Text(text.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> RenderNodeId {
        self.create_node(RenderNodeKind::Comment(text.into()))
    }

    /// Check if a node exists.
    pub fn contains(&self, id: RenderNodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the tree, linked or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the kind of a node.
    pub fn kind(&self, id: RenderNodeId) -> ViewResult<&RenderNodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: RenderNodeId) -> ViewResult<Option<RenderNodeId>> {
        self.node(id).map(|n| n.parent)
    }

    /// Get the children of a node.
    pub fn children(&self, id: RenderNodeId) -> ViewResult<&[RenderNodeId]> {
        self.node(id).map(|n| n.children.as_slice())
    }

    /// Get the sibling that follows a node under its parent.
    pub fn next_sibling(&self, id: RenderNodeId) -> ViewResult<Option<RenderNodeId>> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(None);
        };
        let siblings = &self.node(parent)?.children;
        Ok(siblings
            .iter()
            .position(|&child| child == id)
            .and_then(|pos| siblings.get(pos + 1))
            .copied())
    }

    /// Get the sibling that precedes a node under its parent.
    pub fn previous_sibling(&self, id: RenderNodeId) -> ViewResult<Option<RenderNodeId>> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(None);
        };
        let siblings = &self.node(parent)?.children;
        Ok(siblings
            .iter()
            .position(|&child| child == id)
            .filter(|&pos| pos > 0)
            .map(|pos| siblings[pos - 1]))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// If `child` is already linked somewhere it is moved.
    pub fn append_child(&mut self, parent: RenderNodeId, child: RenderNodeId) -> ViewResult<()> {
        self.check_insert(parent, child)?;
        self.unlink(child);
        self.link(parent, child, None);
        tracing::trace!(target: targets::RENDER, ?parent, ?child, "appended child");
        Ok(())
    }

    /// Insert `child` under `parent` immediately before `reference`.
    ///
    /// `reference` must be a child of `parent`. If `child` is already linked
    /// somewhere it is moved.
    pub fn insert_before(
        &mut self,
        parent: RenderNodeId,
        child: RenderNodeId,
        reference: RenderNodeId,
    ) -> ViewResult<()> {
        self.check_insert(parent, child)?;
        if self.node(reference)?.parent != Some(parent) {
            return Err(ViewError::NotAChild {
                parent,
                child: reference,
            });
        }
        if child == reference {
            return Ok(());
        }
        self.unlink(child);
        self.link(parent, child, Some(reference));
        tracing::trace!(target: targets::RENDER, ?parent, ?child, ?reference, "inserted child");
        Ok(())
    }

    /// Remove `child` from `parent`. The node itself stays in the arena.
    pub fn remove_child(&mut self, parent: RenderNodeId, child: RenderNodeId) -> ViewResult<()> {
        self.node(parent)?;
        if self.node(child)?.parent != Some(parent) {
            return Err(ViewError::NotAChild { parent, child });
        }
        self.unlink(child);
        tracing::trace!(target: targets::RENDER, ?parent, ?child, "removed child");
        Ok(())
    }

    /// Debug dump of the subtree rooted at `id`.
    pub fn dump_tree(&self, id: RenderNodeId) -> ViewResult<String> {
        let mut output = String::new();
        self.dump_tree_recursive(id, 0, &mut output)?;
        Ok(output)
    }

    fn dump_tree_recursive(
        &self,
        id: RenderNodeId,
        depth: usize,
        output: &mut String,
    ) -> ViewResult<()> {
        let node = self.node(id)?;
        let indent = "  ".repeat(depth);
        writeln!(output, "{}{}", indent, node.kind.describe()).expect("write to String");
        for &child in &node.children {
            self.dump_tree_recursive(child, depth + 1, output)?;
        }
        Ok(())
    }

    fn node(&self, id: RenderNodeId) -> ViewResult<&RenderNode> {
        self.nodes.get(id).ok_or(ViewError::InvalidRenderNode(id))
    }

    /// Check that `child` can be linked under `parent`: both exist and
    /// `child` is neither `parent` nor one of its ancestors.
    pub(crate) fn check_insert(&self, parent: RenderNodeId, child: RenderNodeId) -> ViewResult<()> {
        self.node(parent)?;
        self.node(child)?;
        // Walk up from the new parent; finding the child means a cycle.
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return Err(ViewError::CircularParentage);
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        Ok(())
    }

    fn unlink(&mut self, child: RenderNodeId) {
        let old_parent = self.nodes.get_mut(child).and_then(|n| n.parent.take());
        if let Some(parent) = old_parent {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|&c| c != child);
            }
        }
    }

    fn link(&mut self, parent: RenderNodeId, child: RenderNodeId, before: Option<RenderNodeId>) {
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            let pos = before
                .and_then(|reference| parent_node.children.iter().position(|&c| c == reference))
                .unwrap_or(parent_node.children.len());
            parent_node.children.insert(pos, child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
        }
    }
}

impl Default for RenderTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_siblings() {
        let mut tree = RenderTree::new();
        let root = tree.create_element("div");
        let a = tree.create_text("a");
        let b = tree.create_text("b");

        tree.append_child(root, a).unwrap();
        tree.append_child(root, b).unwrap();

        assert_eq!(tree.children(root).unwrap(), &[a, b]);
        assert_eq!(tree.parent(a).unwrap(), Some(root));
        assert_eq!(tree.next_sibling(a).unwrap(), Some(b));
        assert_eq!(tree.next_sibling(b).unwrap(), None);
        assert_eq!(tree.previous_sibling(b).unwrap(), Some(a));
        assert_eq!(tree.previous_sibling(a).unwrap(), None);
    }

    #[test]
    fn test_insert_before() {
        let mut tree = RenderTree::new();
        let root = tree.create_element("div");
        let a = tree.create_text("a");
        let b = tree.create_text("b");
        let c = tree.create_text("c");

        tree.append_child(root, a).unwrap();
        tree.append_child(root, c).unwrap();
        tree.insert_before(root, b, c).unwrap();

        assert_eq!(tree.children(root).unwrap(), &[a, b, c]);
    }

    #[test]
    fn test_insert_moves_linked_node() {
        let mut tree = RenderTree::new();
        let first = tree.create_element("first");
        let second = tree.create_element("second");
        let node = tree.create_text("x");

        tree.append_child(first, node).unwrap();
        tree.append_child(second, node).unwrap();

        assert!(tree.children(first).unwrap().is_empty());
        assert_eq!(tree.children(second).unwrap(), &[node]);
        assert_eq!(tree.parent(node).unwrap(), Some(second));
    }

    #[test]
    fn test_insert_before_requires_child_reference() {
        let mut tree = RenderTree::new();
        let root = tree.create_element("div");
        let stray = tree.create_text("stray");
        let node = tree.create_text("node");

        let err = tree.insert_before(root, node, stray).unwrap_err();
        assert_eq!(
            err,
            ViewError::NotAChild {
                parent: root,
                child: stray
            }
        );
        assert_eq!(tree.parent(node).unwrap(), None);
    }

    #[test]
    fn test_remove_child() {
        let mut tree = RenderTree::new();
        let root = tree.create_element("div");
        let a = tree.create_text("a");
        tree.append_child(root, a).unwrap();

        tree.remove_child(root, a).unwrap();
        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.parent(a).unwrap(), None);
        assert!(tree.contains(a));

        assert!(tree.remove_child(root, a).is_err());
    }

    #[test]
    fn test_circular_insert_rejected() {
        let mut tree = RenderTree::new();
        let outer = tree.create_element("outer");
        let inner = tree.create_element("inner");
        tree.append_child(outer, inner).unwrap();

        assert_eq!(
            tree.append_child(inner, outer),
            Err(ViewError::CircularParentage)
        );
    }

    #[test]
    fn test_dump_tree() {
        let mut tree = RenderTree::new();
        let root = tree.create_element("ul");
        let anchor = tree.create_comment("anchor");
        let text = tree.create_text("item");
        tree.append_child(root, anchor).unwrap();
        tree.append_child(root, text).unwrap();

        let dump = tree.dump_tree(root).unwrap();
        assert_eq!(dump, "<ul>\n  <!--anchor-->\n  \"item\"\n");
    }
}
