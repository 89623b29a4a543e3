//! Storage for view containers and embedded views.
//!
//! Provides:
//! - Stable identifiers for containers and views via arena-based storage
//! - The ordered list of views attached to each container
//! - The projected-view lists kept on declaration containers
//! - Per-view metadata: root nodes, matched queries, declaration container,
//!   and an optional pluggable renderer
//!
//! # Key Types
//!
//! - [`ViewRegistry`] - Arena storing every container and view
//! - [`ContainerId`] / [`ViewId`] - Stable handles into the registry
//! - [`ViewBuilder`] - Describes a view before it is registered
//! - [`RootNode`] - A top-level entry of a view
//! - [`QueryId`] - Identifies a live query matched inside a view
//!
//! The registry is pure bookkeeping. Structural changes that must keep the
//! render tree and queries in sync go through [`crate::ViewTree`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};

use crate::error::{ViewError, ViewResult};
use crate::logging::targets;
use crate::render::RenderNodeId;
use crate::renderer::ViewRenderer;

new_key_type! {
    /// A unique identifier for a view container.
    pub struct ContainerId;
}

new_key_type! {
    /// A unique identifier for an embedded view.
    ///
    /// The ID stays valid across attach, detach and move. It becomes
    /// invalid once the view is destroyed with [`crate::ViewTree::destroy_view`].
    pub struct ViewId;
}

/// Identifies a live query whose results may include nodes of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryId(pub u32);

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "query#{}", self.0)
    }
}

/// A top-level entry of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootNode {
    /// A render node owned by the view.
    Node(RenderNodeId),
    /// A nested view container. Its anchor renders here, followed by the
    /// nodes of every view currently attached to it.
    Container(ContainerId),
}

pub(crate) struct ContainerData {
    pub(crate) anchor: RenderNodeId,
    pub(crate) embedded_views: Vec<ViewId>,
    /// Created on the first projection; order is never significant.
    pub(crate) projected_views: Option<Vec<ViewId>>,
}

pub(crate) struct ViewData {
    pub(crate) root_nodes: Vec<RootNode>,
    pub(crate) matched_queries: BTreeSet<QueryId>,
    pub(crate) declared_in: Option<ContainerId>,
    pub(crate) renderer: Option<Arc<dyn ViewRenderer>>,
    pub(crate) attached_to: Option<ContainerId>,
}

/// Describes a view before it is registered.
///
/// # Example
///
/// ```
/// use horizon_lattice_views::{QueryId, RootNode, ViewBuilder, ViewTree};
///
/// let mut tree = ViewTree::new();
/// let text = tree.render_mut().create_text("row");
/// let view = tree.create_view(
///     ViewBuilder::new()
///         .root_node(RootNode::Node(text))
///         .matched_query(QueryId(1)),
/// );
/// assert!(tree.attached_container(view).unwrap().is_none());
/// ```
#[derive(Default)]
pub struct ViewBuilder {
    root_nodes: Vec<RootNode>,
    matched_queries: BTreeSet<QueryId>,
    declared_in: Option<ContainerId>,
    renderer: Option<Arc<dyn ViewRenderer>>,
}

impl ViewBuilder {
    /// Create a builder for an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root node.
    pub fn root_node(mut self, node: RootNode) -> Self {
        self.root_nodes.push(node);
        self
    }

    /// Append several root nodes in order.
    pub fn root_nodes(mut self, nodes: impl IntoIterator<Item = RootNode>) -> Self {
        self.root_nodes.extend(nodes);
        self
    }

    /// Record a query matched by a node inside the view.
    pub fn matched_query(mut self, query: QueryId) -> Self {
        self.matched_queries.insert(query);
        self
    }

    /// Record several matched queries.
    pub fn matched_queries(mut self, queries: impl IntoIterator<Item = QueryId>) -> Self {
        self.matched_queries.extend(queries);
        self
    }

    /// Set the container the view was declared in.
    pub fn declared_in(mut self, container: ContainerId) -> Self {
        self.declared_in = Some(container);
        self
    }

    /// Delegate render tree linking for this view to a pluggable renderer.
    pub fn renderer(mut self, renderer: Arc<dyn ViewRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }
}

/// The registry that stores all containers and views.
///
/// Uses arena-based storage via SlotMap for stable IDs.
pub struct ViewRegistry {
    containers: SlotMap<ContainerId, ContainerData>,
    views: SlotMap<ViewId, ViewData>,
}

impl ViewRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            containers: SlotMap::with_key(),
            views: SlotMap::with_key(),
        }
    }

    /// Register a container whose views render after `anchor`.
    pub fn register_container(&mut self, anchor: RenderNodeId) -> ContainerId {
        let id = self.containers.insert(ContainerData {
            anchor,
            embedded_views: Vec::new(),
            projected_views: None,
        });
        tracing::trace!(target: targets::CONTAINER, ?id, ?anchor, "registered container");
        id
    }

    /// Register a view described by `builder`. The view starts detached.
    pub fn register_view(&mut self, builder: ViewBuilder) -> ViewId {
        let id = self.views.insert(ViewData {
            root_nodes: builder.root_nodes,
            matched_queries: builder.matched_queries,
            declared_in: builder.declared_in,
            renderer: builder.renderer,
            attached_to: None,
        });
        tracing::trace!(target: targets::CONTAINER, ?id, "registered view");
        id
    }

    /// Remove a detached view from the registry.
    pub fn remove_view(&mut self, id: ViewId) -> ViewResult<()> {
        let data = self.view(id)?;
        if let Some(container) = data.attached_to {
            return Err(ViewError::ViewAlreadyAttached {
                view: id,
                container,
            });
        }
        self.views.remove(id);
        tracing::trace!(target: targets::CONTAINER, ?id, "removed view");
        Ok(())
    }

    /// Check if a container exists.
    pub fn contains_container(&self, id: ContainerId) -> bool {
        self.containers.contains_key(id)
    }

    /// Check if a view exists.
    pub fn contains_view(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    /// The render node views of this container are rendered after.
    pub fn anchor(&self, id: ContainerId) -> ViewResult<RenderNodeId> {
        self.container(id).map(|c| c.anchor)
    }

    /// The ordered list of views attached to a container.
    pub fn embedded_views(&self, id: ContainerId) -> ViewResult<&[ViewId]> {
        self.container(id).map(|c| c.embedded_views.as_slice())
    }

    /// Views declared in this container but attached elsewhere.
    ///
    /// Empty if nothing was ever projected out of the container.
    pub fn projected_views(&self, id: ContainerId) -> ViewResult<&[ViewId]> {
        self.container(id)
            .map(|c| c.projected_views.as_deref().unwrap_or(&[]))
    }

    /// The top-level entries of a view.
    pub fn root_nodes(&self, id: ViewId) -> ViewResult<&[RootNode]> {
        self.view(id).map(|v| v.root_nodes.as_slice())
    }

    /// The queries matched inside a view.
    pub fn matched_queries(&self, id: ViewId) -> ViewResult<&BTreeSet<QueryId>> {
        self.view(id).map(|v| &v.matched_queries)
    }

    /// The container the view was declared in, if any.
    pub fn declared_container(&self, id: ViewId) -> ViewResult<Option<ContainerId>> {
        self.view(id).map(|v| v.declared_in)
    }

    /// The container the view is currently attached to, if any.
    pub fn attached_container(&self, id: ViewId) -> ViewResult<Option<ContainerId>> {
        self.view(id).map(|v| v.attached_to)
    }

    /// The pluggable renderer of a view, if it has one.
    pub fn renderer(&self, id: ViewId) -> ViewResult<Option<&Arc<dyn ViewRenderer>>> {
        self.view(id).map(|v| v.renderer.as_ref())
    }

    /// Number of registered containers.
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Number of registered views.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Iterate over all container IDs.
    pub fn containers(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.containers.keys()
    }

    pub(crate) fn container(&self, id: ContainerId) -> ViewResult<&ContainerData> {
        self.containers.get(id).ok_or(ViewError::InvalidContainer(id))
    }

    pub(crate) fn container_mut(&mut self, id: ContainerId) -> ViewResult<&mut ContainerData> {
        self.containers
            .get_mut(id)
            .ok_or(ViewError::InvalidContainer(id))
    }

    pub(crate) fn view(&self, id: ViewId) -> ViewResult<&ViewData> {
        self.views.get(id).ok_or(ViewError::InvalidView(id))
    }

    pub(crate) fn view_mut(&mut self, id: ViewId) -> ViewResult<&mut ViewData> {
        self.views.get_mut(id).ok_or(ViewError::InvalidView(id))
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderTree;

    #[test]
    fn test_register_container() {
        let mut render = RenderTree::new();
        let anchor = render.create_comment("c");
        let mut registry = ViewRegistry::new();

        let container = registry.register_container(anchor);
        assert!(registry.contains_container(container));
        assert_eq!(registry.anchor(container).unwrap(), anchor);
        assert!(registry.embedded_views(container).unwrap().is_empty());
        assert!(registry.projected_views(container).unwrap().is_empty());
    }

    #[test]
    fn test_register_view_from_builder() {
        let mut render = RenderTree::new();
        let anchor = render.create_comment("decl");
        let text = render.create_text("t");
        let mut registry = ViewRegistry::new();
        let declared = registry.register_container(anchor);

        let view = registry.register_view(
            ViewBuilder::new()
                .root_node(RootNode::Node(text))
                .matched_queries([QueryId(2), QueryId(1), QueryId(2)])
                .declared_in(declared),
        );

        assert_eq!(registry.root_nodes(view).unwrap(), &[RootNode::Node(text)]);
        let queries: Vec<_> = registry.matched_queries(view).unwrap().iter().copied().collect();
        assert_eq!(queries, vec![QueryId(1), QueryId(2)]);
        assert_eq!(registry.declared_container(view).unwrap(), Some(declared));
        assert_eq!(registry.attached_container(view).unwrap(), None);
        assert!(registry.renderer(view).unwrap().is_none());
    }

    #[test]
    fn test_remove_view() {
        let mut registry = ViewRegistry::new();
        let view = registry.register_view(ViewBuilder::new());
        assert_eq!(registry.view_count(), 1);

        registry.remove_view(view).unwrap();
        assert!(!registry.contains_view(view));
        assert_eq!(registry.remove_view(view), Err(ViewError::InvalidView(view)));
    }

    #[test]
    fn test_query_id_display() {
        assert_eq!(QueryId(7).to_string(), "query#7");
    }
}
