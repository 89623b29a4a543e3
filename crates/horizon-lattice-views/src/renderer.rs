//! Pluggable renderers for embedded views.
//!
//! A view may carry a [`ViewRenderer`]. When it does, the container
//! operations hand the view's root render nodes to the renderer instead of
//! linking them into the render tree themselves. The renderer decides how
//! (and when) the nodes are physically placed, so it may apply them
//! immediately or batch them.

use crate::render::{RenderNodeId, RenderTree};

/// Links and unlinks the root render nodes of a view.
///
/// `nodes` is the flattened list of root render nodes in document order,
/// including the anchors and nodes of nested containers.
///
/// # Example
///
/// ```
/// use horizon_lattice_views::{RenderNodeId, RenderTree, ViewRenderer};
///
/// /// Renderer that only links nodes when the anchor is mounted.
/// struct SiblingRenderer;
///
/// impl ViewRenderer for SiblingRenderer {
///     fn attach_view_after(
///         &self,
///         tree: &mut RenderTree,
///         anchor: RenderNodeId,
///         nodes: &[RenderNodeId],
///     ) {
///         let Ok(Some(parent)) = tree.parent(anchor) else { return };
///         let mut after = anchor;
///         for &node in nodes {
///             let linked = match tree.next_sibling(after) {
///                 Ok(Some(next)) => tree.insert_before(parent, node, next),
///                 Ok(None) => tree.append_child(parent, node),
///                 Err(err) => Err(err),
///             };
///             if let Err(err) = linked {
///                 tracing::warn!(?node, %err, "failed to link view node");
///                 return;
///             }
///             after = node;
///         }
///     }
///
///     fn detach_view(&self, tree: &mut RenderTree, nodes: &[RenderNodeId]) {
///         for &node in nodes {
///             match tree.parent(node) {
///                 Ok(Some(parent)) => {
///                     if let Err(err) = tree.remove_child(parent, node) {
///                         tracing::warn!(?node, %err, "failed to unlink view node");
///                     }
///                 }
///                 Ok(None) => {}
///                 Err(err) => tracing::warn!(?node, %err, "unknown view node"),
///             }
///         }
///     }
/// }
/// ```
pub trait ViewRenderer: Send + Sync {
    /// Place `nodes` after `anchor`.
    fn attach_view_after(
        &self,
        tree: &mut RenderTree,
        anchor: RenderNodeId,
        nodes: &[RenderNodeId],
    );

    /// Remove `nodes` from wherever they are linked.
    fn detach_view(&self, tree: &mut RenderTree, nodes: &[RenderNodeId]);
}
