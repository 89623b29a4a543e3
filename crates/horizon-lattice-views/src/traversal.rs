//! Root render node traversal.
//!
//! Utilities that walk the top-level render nodes of a view. Nested view
//! containers are followed transparently: a container entry yields its
//! anchor followed by the nodes of every view attached to it, in order.

use crate::error::ViewResult;
use crate::logging::targets;
use crate::render::{RenderNodeId, RenderTree};
use crate::view::{RootNode, ViewId, ViewRegistry};

/// What to do with each root render node during a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderNodeAction {
    /// Append each node to the parent.
    AppendChild,
    /// Insert each node into the parent before the reference node.
    InsertBefore(RenderNodeId),
    /// Remove each node from the parent.
    RemoveChild,
}

/// The render node that comes last in document order among a view's roots.
///
/// Returns `None` if the view renders no nodes at all.
pub fn last_root_render_node(
    registry: &ViewRegistry,
    view: ViewId,
) -> ViewResult<Option<RenderNodeId>> {
    for root in registry.root_nodes(view)?.iter().rev() {
        match *root {
            RootNode::Node(node) => return Ok(Some(node)),
            RootNode::Container(container) => {
                for &nested in registry.embedded_views(container)?.iter().rev() {
                    if let Some(node) = last_root_render_node(registry, nested)? {
                        return Ok(Some(node));
                    }
                }
                return registry.anchor(container).map(Some);
            }
        }
    }
    Ok(None)
}

/// The top-level render nodes of a view in document order.
pub fn root_render_nodes(registry: &ViewRegistry, view: ViewId) -> ViewResult<Vec<RenderNodeId>> {
    let mut nodes = Vec::new();
    collect_root_render_nodes(registry, view, &mut nodes)?;
    Ok(nodes)
}

fn collect_root_render_nodes(
    registry: &ViewRegistry,
    view: ViewId,
    nodes: &mut Vec<RenderNodeId>,
) -> ViewResult<()> {
    for root in registry.root_nodes(view)? {
        match *root {
            RootNode::Node(node) => nodes.push(node),
            RootNode::Container(container) => {
                nodes.push(registry.anchor(container)?);
                for &nested in registry.embedded_views(container)? {
                    collect_root_render_nodes(registry, nested, nodes)?;
                }
            }
        }
    }
    Ok(())
}

/// Apply `action` to every root render node of `view` under `parent`.
///
/// Nodes are visited in document order, so inserting each one before the
/// same reference keeps their relative order. Removal skips nodes that are
/// not currently children of `parent`; those were never linked there.
pub fn visit_root_render_nodes(
    registry: &ViewRegistry,
    tree: &mut RenderTree,
    view: ViewId,
    action: RenderNodeAction,
    parent: RenderNodeId,
) -> ViewResult<()> {
    for node in root_render_nodes(registry, view)? {
        match action {
            RenderNodeAction::AppendChild => tree.append_child(parent, node)?,
            RenderNodeAction::InsertBefore(reference) => {
                tree.insert_before(parent, node, reference)?
            }
            RenderNodeAction::RemoveChild => {
                if tree.parent(node)? == Some(parent) {
                    tree.remove_child(parent, node)?;
                } else {
                    tracing::debug!(target: targets::RENDER, ?node, ?parent, "node not linked under parent, skipping removal");
                }
            }
        }
    }
    Ok(())
}
