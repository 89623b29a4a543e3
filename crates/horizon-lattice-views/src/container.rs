//! Embedded view containers.
//!
//! A container is an anchor in the render tree that hosts an ordered list of
//! embedded views. Views render as siblings following the anchor, in list
//! order. A view may be declared under one container and attached to another;
//! the declaring container then tracks it in its projected-view list.
//!
//! Every structural change performed by [`ViewTree`]:
//! 1. splices the container's view list,
//! 2. updates the declaring container's projected-view list when the view is
//!    attached away from where it was declared,
//! 3. marks every query matched inside the view dirty,
//! 4. links or unlinks the view's root render nodes, either through the
//!    view's [`ViewRenderer`](crate::ViewRenderer) or directly in the
//!    [`RenderTree`].
//!
//! When the container's anchor has no parent in the render tree the render
//! step is skipped; the list bookkeeping and query dirtying still happen.
//!
//! # Example
//!
//! ```
//! use horizon_lattice_views::{DirtyQueries, QueryId, RootNode, ViewBuilder, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let body = tree.render_mut().create_element("body");
//! let anchor = tree.render_mut().create_comment("list");
//! tree.render_mut().append_child(body, anchor).unwrap();
//! let list = tree.create_container(anchor).unwrap();
//!
//! let row = tree.render_mut().create_text("row");
//! let view = tree.create_view(
//!     ViewBuilder::new()
//!         .root_node(RootNode::Node(row))
//!         .matched_query(QueryId(1)),
//! );
//!
//! let mut dirty = DirtyQueries::new();
//! tree.attach_embedded_view(list, None, view, &mut dirty).unwrap();
//!
//! assert_eq!(tree.embedded_views(list).unwrap(), &[view]);
//! assert_eq!(tree.render().children(body).unwrap(), &[anchor, row]);
//! assert!(dirty.is_dirty(QueryId(1)));
//! ```

use parking_lot::RwLock;

use crate::error::{ViewError, ViewResult};
use crate::logging::targets;
use crate::query::QueryInvalidator;
use crate::render::{RenderNodeId, RenderTree};
use crate::traversal::{
    RenderNodeAction, last_root_render_node, root_render_nodes, visit_root_render_nodes,
};
use crate::view::{ContainerId, RootNode, ViewBuilder, ViewId, ViewRegistry};

/// Owns the view registry and the render tree, and keeps them in sync.
pub struct ViewTree {
    registry: ViewRegistry,
    render: RenderTree,
}

static_assertions::assert_impl_all!(ViewTree: Send, Sync);

impl ViewTree {
    /// Create an empty view tree with an empty render tree.
    pub fn new() -> Self {
        Self::with_render_tree(RenderTree::new())
    }

    /// Create a view tree over an existing render tree.
    pub fn with_render_tree(render: RenderTree) -> Self {
        Self {
            registry: ViewRegistry::new(),
            render,
        }
    }

    /// The container and view bookkeeping.
    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// The render tree.
    pub fn render(&self) -> &RenderTree {
        &self.render
    }

    /// Mutable access to the render tree, for building nodes.
    pub fn render_mut(&mut self) -> &mut RenderTree {
        &mut self.render
    }

    /// Create a container whose views render after `anchor`.
    pub fn create_container(&mut self, anchor: RenderNodeId) -> ViewResult<ContainerId> {
        if !self.render.contains(anchor) {
            return Err(ViewError::InvalidRenderNode(anchor));
        }
        Ok(self.registry.register_container(anchor))
    }

    /// Register a detached view.
    pub fn create_view(&mut self, builder: ViewBuilder) -> ViewId {
        self.registry.register_view(builder)
    }

    /// Remove a detached view from the registry. Its render nodes stay in
    /// the render tree.
    pub fn destroy_view(&mut self, view: ViewId) -> ViewResult<()> {
        self.registry.remove_view(view)
    }

    // =========================================================================
    // Container queries
    // =========================================================================

    /// Number of views attached to a container.
    pub fn len(&self, container: ContainerId) -> ViewResult<usize> {
        self.registry.embedded_views(container).map(<[ViewId]>::len)
    }

    /// Whether a container has no attached views.
    pub fn is_empty(&self, container: ContainerId) -> ViewResult<bool> {
        self.len(container).map(|len| len == 0)
    }

    /// The view at `index`, if any.
    pub fn get(&self, container: ContainerId, index: usize) -> ViewResult<Option<ViewId>> {
        self.registry
            .embedded_views(container)
            .map(|views| views.get(index).copied())
    }

    /// Position of `view` in the container's list.
    pub fn index_of(&self, container: ContainerId, view: ViewId) -> ViewResult<Option<usize>> {
        self.registry
            .embedded_views(container)
            .map(|views| views.iter().position(|&v| v == view))
    }

    /// The ordered list of views attached to a container.
    pub fn embedded_views(&self, container: ContainerId) -> ViewResult<&[ViewId]> {
        self.registry.embedded_views(container)
    }

    /// Views declared in `container` but attached to another container.
    pub fn projected_views(&self, container: ContainerId) -> ViewResult<&[ViewId]> {
        self.registry.projected_views(container)
    }

    /// The container a view is attached to, if any.
    pub fn attached_container(&self, view: ViewId) -> ViewResult<Option<ContainerId>> {
        self.registry.attached_container(view)
    }

    /// The container a view was declared in, if any.
    pub fn declared_container(&self, view: ViewId) -> ViewResult<Option<ContainerId>> {
        self.registry.declared_container(view)
    }

    // =========================================================================
    // Structural operations
    // =========================================================================

    /// Attach `view` to `container` at `index` (appends when `None`).
    ///
    /// Returns `IndexOutOfRange` if `index` is past the end of the list and
    /// `ViewAlreadyAttached` if the view is attached anywhere.
    #[tracing::instrument(skip(self, queries), target = "horizon_lattice_views::container", level = "trace")]
    pub fn attach_embedded_view(
        &mut self,
        container: ContainerId,
        index: Option<usize>,
        view: ViewId,
        queries: &mut dyn QueryInvalidator,
    ) -> ViewResult<()> {
        let len = self.registry.embedded_views(container)?.len();
        if let Some(current) = self.registry.view(view)?.attached_to {
            return Err(ViewError::ViewAlreadyAttached {
                view,
                container: current,
            });
        }
        let index = index.unwrap_or(len);
        if index > len {
            return Err(ViewError::IndexOutOfRange { index, len });
        }
        if self.view_hosts_container(view, container)? {
            return Err(ViewError::CircularParentage);
        }
        let declared = self.projection_source(container, view)?;
        if let Some(declared) = declared {
            self.registry.container(declared)?;
        }
        self.check_render_nodes(view)?;
        let preceding = &self.registry.embedded_views(container)?[..index];
        let anchor = self.anchor_after(container, preceding)?;
        self.check_render_attach(view, anchor)?;

        add_to_vec(
            &mut self.registry.container_mut(container)?.embedded_views,
            index,
            view,
        );
        self.registry.view_mut(view)?.attached_to = Some(container);
        if let Some(declared) = declared {
            self.registry
                .container_mut(declared)?
                .projected_views
                .get_or_insert_with(Vec::new)
                .push(view);
            tracing::trace!(target: targets::CONTAINER, ?view, ?declared, "projected view");
        }

        self.dirty_matched_queries(view, queries)?;
        self.render_attach_embedded_view(container, index, view)?;
        tracing::trace!(target: targets::CONTAINER, ?container, ?view, index, "attached view");
        Ok(())
    }

    /// Detach the view at `index` (the last view when `None`) and return it.
    ///
    /// The view is unlinked, not destroyed; it may be attached again.
    #[tracing::instrument(skip(self, queries), target = "horizon_lattice_views::container", level = "trace")]
    pub fn detach_embedded_view(
        &mut self,
        container: ContainerId,
        index: Option<usize>,
        queries: &mut dyn QueryInvalidator,
    ) -> ViewResult<ViewId> {
        let views = self.registry.embedded_views(container)?;
        let len = views.len();
        let index = match index {
            Some(index) => index,
            None => len
                .checked_sub(1)
                .ok_or(ViewError::IndexOutOfRange { index: 0, len })?,
        };
        let view = *views
            .get(index)
            .ok_or(ViewError::IndexOutOfRange { index, len })?;
        let projected = match self.projection_source(container, view)? {
            Some(declared) => {
                let pos = self
                    .registry
                    .projected_views(declared)?
                    .iter()
                    .position(|&v| v == view)
                    .ok_or(ViewError::ViewNotAttached(view))?;
                Some((declared, pos))
            }
            None => None,
        };
        self.check_render_nodes(view)?;

        remove_from_vec(
            &mut self.registry.container_mut(container)?.embedded_views,
            index,
        );
        self.registry.view_mut(view)?.attached_to = None;
        if let Some((declared, pos)) = projected {
            if let Some(projected_views) = self
                .registry
                .container_mut(declared)?
                .projected_views
                .as_mut()
            {
                remove_from_vec(projected_views, pos);
            }
            tracing::trace!(target: targets::CONTAINER, ?view, ?declared, "unprojected view");
        }

        self.dirty_matched_queries(view, queries)?;
        self.render_detach_embedded_view(container, view)?;
        tracing::trace!(target: targets::CONTAINER, ?container, ?view, index, "detached view");
        Ok(view)
    }

    /// Detach `view` from `container`, looking its index up by identity.
    pub fn detach_view(
        &mut self,
        container: ContainerId,
        view: ViewId,
        queries: &mut dyn QueryInvalidator,
    ) -> ViewResult<ViewId> {
        let index = self
            .index_of(container, view)?
            .ok_or(ViewError::ViewNotAttached(view))?;
        self.detach_embedded_view(container, Some(index), queries)
    }

    /// Move the view at `old_index` to `new_index` and return it.
    ///
    /// `new_index` refers to the list after the view has been taken out, so
    /// it may be at most `len - 1`; `None` moves the view to the end. The
    /// projected-view list of the declaring container is left alone.
    #[tracing::instrument(skip(self, queries), target = "horizon_lattice_views::container", level = "trace")]
    pub fn move_embedded_view(
        &mut self,
        container: ContainerId,
        old_index: usize,
        new_index: Option<usize>,
        queries: &mut dyn QueryInvalidator,
    ) -> ViewResult<ViewId> {
        let views = self.registry.embedded_views(container)?;
        let len = views.len();
        let view = *views.get(old_index).ok_or(ViewError::IndexOutOfRange {
            index: old_index,
            len,
        })?;
        let remaining = len - 1;
        let new_index = new_index.unwrap_or(remaining);
        if new_index > remaining {
            return Err(ViewError::IndexOutOfRange {
                index: new_index,
                len: remaining,
            });
        }
        self.check_render_nodes(view)?;
        let mut reordered = views.to_vec();
        reordered.remove(old_index);
        let anchor = self.anchor_after(container, &reordered[..new_index])?;
        self.check_render_attach(view, anchor)?;

        let embedded_views = &mut self.registry.container_mut(container)?.embedded_views;
        remove_from_vec(embedded_views, old_index);
        add_to_vec(embedded_views, new_index, view);

        self.dirty_matched_queries(view, queries)?;
        self.render_detach_embedded_view(container, view)?;
        self.render_attach_embedded_view(container, new_index, view)?;
        tracing::trace!(target: targets::CONTAINER, ?container, ?view, old_index, new_index, "moved view");
        Ok(view)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// The declaring container, when it differs from `container`.
    fn projection_source(
        &self,
        container: ContainerId,
        view: ViewId,
    ) -> ViewResult<Option<ContainerId>> {
        Ok(self
            .registry
            .declared_container(view)?
            .filter(|&declared| declared != container))
    }

    fn dirty_matched_queries(
        &self,
        view: ViewId,
        queries: &mut dyn QueryInvalidator,
    ) -> ViewResult<()> {
        for &query in self.registry.matched_queries(view)? {
            queries.dirty_query(query, view);
        }
        Ok(())
    }

    fn check_render_nodes(&self, view: ViewId) -> ViewResult<()> {
        for node in root_render_nodes(&self.registry, view)? {
            if !self.render.contains(node) {
                return Err(ViewError::InvalidRenderNode(node));
            }
        }
        Ok(())
    }

    /// Reject linking `view` after `anchor` when one of its root render nodes
    /// is the anchor's parent or an ancestor of it.
    fn check_render_attach(&self, view: ViewId, anchor: RenderNodeId) -> ViewResult<()> {
        if self.registry.renderer(view)?.is_some() {
            return Ok(());
        }
        let Some(parent) = self.render.parent(anchor)? else {
            return Ok(());
        };
        for node in root_render_nodes(&self.registry, view)? {
            self.render.check_insert(parent, node)?;
        }
        Ok(())
    }

    /// Whether `container` is nested somewhere inside `view`.
    fn view_hosts_container(&self, view: ViewId, container: ContainerId) -> ViewResult<bool> {
        for root in self.registry.root_nodes(view)? {
            if let RootNode::Container(nested) = *root {
                if nested == container {
                    return Ok(true);
                }
                for &inner in self.registry.embedded_views(nested)? {
                    if self.view_hosts_container(inner, container)? {
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }

    /// The node a view renders after when `preceding` are the views before
    /// it: the last render node of the nearest one that renders anything,
    /// else the container anchor.
    fn anchor_after(
        &self,
        container: ContainerId,
        preceding: &[ViewId],
    ) -> ViewResult<RenderNodeId> {
        for &prev in preceding.iter().rev() {
            if let Some(node) = last_root_render_node(&self.registry, prev)? {
                return Ok(node);
            }
        }
        self.registry.anchor(container)
    }

    fn render_attach_embedded_view(
        &mut self,
        container: ContainerId,
        index: usize,
        view: ViewId,
    ) -> ViewResult<()> {
        let views = self.registry.embedded_views(container)?;
        let anchor = self.anchor_after(container, &views[..index])?;
        if let Some(renderer) = self.registry.renderer(view)?.cloned() {
            let nodes = root_render_nodes(&self.registry, view)?;
            renderer.attach_view_after(&mut self.render, anchor, &nodes);
            return Ok(());
        }

        let Some(parent) = self.render.parent(anchor)? else {
            tracing::debug!(target: targets::RENDER, ?container, ?view, "anchor not rendered, skipping attach");
            return Ok(());
        };
        let action = match self.render.next_sibling(anchor)? {
            Some(next) => RenderNodeAction::InsertBefore(next),
            None => RenderNodeAction::AppendChild,
        };
        visit_root_render_nodes(&self.registry, &mut self.render, view, action, parent)
    }

    fn render_detach_embedded_view(
        &mut self,
        container: ContainerId,
        view: ViewId,
    ) -> ViewResult<()> {
        if let Some(renderer) = self.registry.renderer(view)?.cloned() {
            let nodes = root_render_nodes(&self.registry, view)?;
            renderer.detach_view(&mut self.render, &nodes);
            return Ok(());
        }

        let anchor = self.registry.anchor(container)?;
        let Some(parent) = self.render.parent(anchor)? else {
            tracing::debug!(target: targets::RENDER, ?container, ?view, "anchor not rendered, skipping detach");
            return Ok(());
        };
        visit_root_render_nodes(
            &self.registry,
            &mut self.render,
            view,
            RenderNodeAction::RemoveChild,
            parent,
        )
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert `value` at `index`, pushing when it lands at the end.
pub(crate) fn add_to_vec<T>(vec: &mut Vec<T>, index: usize, value: T) {
    if index >= vec.len() {
        vec.push(value);
    } else {
        vec.insert(index, value);
    }
}

/// Remove the entry at `index`, popping when it is the last one.
pub(crate) fn remove_from_vec<T>(vec: &mut Vec<T>, index: usize) -> Option<T> {
    if index + 1 >= vec.len() {
        vec.pop()
    } else {
        Some(vec.remove(index))
    }
}

/// A thread-safe wrapper around [`ViewTree`].
///
/// The structural operations themselves never lock; this wrapper is for
/// callers that need to share one tree between owners.
pub struct SharedViewTree {
    inner: RwLock<ViewTree>,
}

impl SharedViewTree {
    /// Wrap a view tree.
    pub fn new(tree: ViewTree) -> Self {
        Self {
            inner: RwLock::new(tree),
        }
    }

    /// Attach a view. See [`ViewTree::attach_embedded_view`].
    pub fn attach_embedded_view(
        &self,
        container: ContainerId,
        index: Option<usize>,
        view: ViewId,
        queries: &mut dyn QueryInvalidator,
    ) -> ViewResult<()> {
        self.inner
            .write()
            .attach_embedded_view(container, index, view, queries)
    }

    /// Detach a view. See [`ViewTree::detach_embedded_view`].
    pub fn detach_embedded_view(
        &self,
        container: ContainerId,
        index: Option<usize>,
        queries: &mut dyn QueryInvalidator,
    ) -> ViewResult<ViewId> {
        self.inner
            .write()
            .detach_embedded_view(container, index, queries)
    }

    /// Move a view. See [`ViewTree::move_embedded_view`].
    pub fn move_embedded_view(
        &self,
        container: ContainerId,
        old_index: usize,
        new_index: Option<usize>,
        queries: &mut dyn QueryInvalidator,
    ) -> ViewResult<ViewId> {
        self.inner
            .write()
            .move_embedded_view(container, old_index, new_index, queries)
    }

    /// The views attached to a container (owned copy).
    pub fn embedded_views(&self, container: ContainerId) -> ViewResult<Vec<ViewId>> {
        self.inner.read().embedded_views(container).map(<[ViewId]>::to_vec)
    }

    /// Access the tree with a read lock for complex operations.
    pub fn with_read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ViewTree) -> R,
    {
        f(&self.inner.read())
    }

    /// Access the tree with a write lock for complex operations.
    pub fn with_write<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ViewTree) -> R,
    {
        f(&mut self.inner.write())
    }

    /// Unwrap the inner tree.
    pub fn into_inner(self) -> ViewTree {
        self.inner.into_inner()
    }
}

impl Default for SharedViewTree {
    fn default() -> Self {
        Self::new(ViewTree::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DirtyQueries;
    use crate::view::QueryId;

    #[test]
    fn test_add_to_vec() {
        let mut v = vec![1, 3];
        add_to_vec(&mut v, 1, 2);
        add_to_vec(&mut v, 3, 4);
        assert_eq!(v, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_from_vec() {
        let mut v = vec![1, 2, 3, 4];
        assert_eq!(remove_from_vec(&mut v, 3), Some(4));
        assert_eq!(remove_from_vec(&mut v, 0), Some(1));
        assert_eq!(v, vec![2, 3]);
    }

    fn mounted_container(tree: &mut ViewTree) -> (RenderNodeId, ContainerId) {
        let parent = tree.render_mut().create_element("div");
        let anchor = tree.render_mut().create_comment("anchor");
        tree.render_mut().append_child(parent, anchor).unwrap();
        let container = tree.create_container(anchor).unwrap();
        (parent, container)
    }

    fn text_view(tree: &mut ViewTree, text: &str) -> (ViewId, RenderNodeId) {
        let node = tree.render_mut().create_text(text);
        let view = tree.create_view(ViewBuilder::new().root_node(RootNode::Node(node)));
        (view, node)
    }

    #[test]
    fn test_attach_rejects_past_end() {
        let mut tree = ViewTree::new();
        let (_, container) = mounted_container(&mut tree);
        let (view, _) = text_view(&mut tree, "a");
        let mut dirty = DirtyQueries::new();

        let err = tree
            .attach_embedded_view(container, Some(1), view, &mut dirty)
            .unwrap_err();
        assert_eq!(err, ViewError::IndexOutOfRange { index: 1, len: 0 });
        assert!(tree.is_empty(container).unwrap());
        assert_eq!(tree.attached_container(view).unwrap(), None);
    }

    #[test]
    fn test_attach_rejects_attached_view() {
        let mut tree = ViewTree::new();
        let (_, first) = mounted_container(&mut tree);
        let (_, second) = mounted_container(&mut tree);
        let (view, _) = text_view(&mut tree, "a");
        let mut dirty = DirtyQueries::new();

        tree.attach_embedded_view(first, None, view, &mut dirty).unwrap();
        let err = tree
            .attach_embedded_view(second, None, view, &mut dirty)
            .unwrap_err();
        assert_eq!(
            err,
            ViewError::ViewAlreadyAttached {
                view,
                container: first
            }
        );
        assert!(tree.is_empty(second).unwrap());
    }

    #[test]
    fn test_attach_into_own_nested_container_rejected() {
        let mut tree = ViewTree::new();
        let nested_anchor = tree.render_mut().create_comment("nested");
        let nested = tree.create_container(nested_anchor).unwrap();
        let view = tree.create_view(ViewBuilder::new().root_node(RootNode::Container(nested)));
        let mut dirty = DirtyQueries::new();

        assert_eq!(
            tree.attach_embedded_view(nested, None, view, &mut dirty),
            Err(ViewError::CircularParentage)
        );
    }

    #[test]
    fn test_detach_empty_container() {
        let mut tree = ViewTree::new();
        let (_, container) = mounted_container(&mut tree);
        let mut dirty = DirtyQueries::new();

        assert_eq!(
            tree.detach_embedded_view(container, None, &mut dirty),
            Err(ViewError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_detach_defaults_to_last() {
        let mut tree = ViewTree::new();
        let (parent, container) = mounted_container(&mut tree);
        let (a, a_node) = text_view(&mut tree, "a");
        let (b, _) = text_view(&mut tree, "b");
        let mut dirty = DirtyQueries::new();
        tree.attach_embedded_view(container, None, a, &mut dirty).unwrap();
        tree.attach_embedded_view(container, None, b, &mut dirty).unwrap();

        assert_eq!(tree.detach_embedded_view(container, None, &mut dirty), Ok(b));
        assert_eq!(tree.embedded_views(container).unwrap(), &[a]);
        let anchor = tree.registry().anchor(container).unwrap();
        assert_eq!(tree.render().children(parent).unwrap(), &[anchor, a_node]);
        assert_eq!(tree.attached_container(b).unwrap(), None);
    }

    #[test]
    fn test_detach_view_by_identity() {
        let mut tree = ViewTree::new();
        let (_, container) = mounted_container(&mut tree);
        let (a, _) = text_view(&mut tree, "a");
        let (b, _) = text_view(&mut tree, "b");
        let mut dirty = DirtyQueries::new();
        tree.attach_embedded_view(container, None, a, &mut dirty).unwrap();

        assert_eq!(tree.detach_view(container, a, &mut dirty), Ok(a));
        assert_eq!(
            tree.detach_view(container, b, &mut dirty),
            Err(ViewError::ViewNotAttached(b))
        );
    }

    #[test]
    fn test_move_rejects_out_of_range() {
        let mut tree = ViewTree::new();
        let (_, container) = mounted_container(&mut tree);
        let (a, _) = text_view(&mut tree, "a");
        let (b, _) = text_view(&mut tree, "b");
        let mut dirty = DirtyQueries::new();
        tree.attach_embedded_view(container, None, a, &mut dirty).unwrap();
        tree.attach_embedded_view(container, None, b, &mut dirty).unwrap();

        assert_eq!(
            tree.move_embedded_view(container, 2, Some(0), &mut dirty),
            Err(ViewError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            tree.move_embedded_view(container, 0, Some(2), &mut dirty),
            Err(ViewError::IndexOutOfRange { index: 2, len: 1 })
        );
        assert_eq!(tree.embedded_views(container).unwrap(), &[a, b]);
    }

    #[test]
    fn test_move_defaults_to_end() {
        let mut tree = ViewTree::new();
        let (parent, container) = mounted_container(&mut tree);
        let (a, a_node) = text_view(&mut tree, "a");
        let (b, b_node) = text_view(&mut tree, "b");
        let (c, c_node) = text_view(&mut tree, "c");
        let mut dirty = DirtyQueries::new();
        for view in [a, b, c] {
            tree.attach_embedded_view(container, None, view, &mut dirty).unwrap();
        }

        assert_eq!(tree.move_embedded_view(container, 0, None, &mut dirty), Ok(a));
        assert_eq!(tree.embedded_views(container).unwrap(), &[b, c, a]);
        let anchor = tree.registry().anchor(container).unwrap();
        assert_eq!(
            tree.render().children(parent).unwrap(),
            &[anchor, b_node, c_node, a_node]
        );
    }

    #[test]
    fn test_attach_after_empty_view_uses_earlier_sibling() {
        let mut tree = ViewTree::new();
        let (parent, container) = mounted_container(&mut tree);
        let (a, a_node) = text_view(&mut tree, "a");
        let empty = tree.create_view(ViewBuilder::new());
        let (c, c_node) = text_view(&mut tree, "c");
        let trailing = tree.render_mut().create_text("trailing");
        tree.render_mut().append_child(parent, trailing).unwrap();
        let mut dirty = DirtyQueries::new();

        tree.attach_embedded_view(container, None, a, &mut dirty).unwrap();
        tree.attach_embedded_view(container, None, empty, &mut dirty).unwrap();
        tree.attach_embedded_view(container, None, c, &mut dirty).unwrap();

        let anchor = tree.registry().anchor(container).unwrap();
        assert_eq!(
            tree.render().children(parent).unwrap(),
            &[anchor, a_node, c_node, trailing]
        );
    }

    #[test]
    fn test_destroy_view_requires_detached() {
        let mut tree = ViewTree::new();
        let (_, container) = mounted_container(&mut tree);
        let (view, _) = text_view(&mut tree, "a");
        let mut dirty = DirtyQueries::new();
        tree.attach_embedded_view(container, None, view, &mut dirty).unwrap();

        assert!(tree.destroy_view(view).is_err());
        tree.detach_embedded_view(container, Some(0), &mut dirty).unwrap();
        tree.destroy_view(view).unwrap();
        assert!(!tree.registry().contains_view(view));
    }

    #[test]
    fn test_shared_view_tree() {
        let mut tree = ViewTree::new();
        let (_, container) = mounted_container(&mut tree);
        let node = tree.render_mut().create_text("a");
        let view = tree.create_view(
            ViewBuilder::new()
                .root_node(RootNode::Node(node))
                .matched_query(QueryId(4)),
        );
        let shared = SharedViewTree::new(tree);
        let mut dirty = DirtyQueries::new();

        shared
            .attach_embedded_view(container, None, view, &mut dirty)
            .unwrap();
        assert_eq!(shared.embedded_views(container).unwrap(), vec![view]);
        assert_eq!(shared.with_read(|t| t.len(container)).unwrap(), 1);
        assert!(dirty.is_dirty(QueryId(4)));

        let tree = shared.into_inner();
        assert_eq!(tree.index_of(container, view).unwrap(), Some(0));
    }
}
