//! Error types for embedded view containers.

use crate::render::RenderNodeId;
use crate::view::{ContainerId, ViewId};

/// Errors that can occur while manipulating view containers or the render tree.
///
/// Every operation validates its inputs before mutating anything, so an
/// error always leaves the container, view and render tree untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The container ID is invalid or has been removed.
    #[error("Invalid or removed container {0:?}")]
    InvalidContainer(ContainerId),

    /// The view ID is invalid or has been destroyed.
    #[error("Invalid or destroyed view {0:?}")]
    InvalidView(ViewId),

    /// The render node ID is invalid or has been removed.
    #[error("Invalid or removed render node {0:?}")]
    InvalidRenderNode(RenderNodeId),

    /// An index was outside the container's view list.
    #[error("View index {index} out of range for container with {len} views")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the view list at the time of the call.
        len: usize,
    },

    /// The view is not attached where the caller said it was.
    #[error("View {0:?} is not attached to the given container")]
    ViewNotAttached(ViewId),

    /// The view is already attached to a container.
    #[error("View {view:?} is already attached to container {container:?}")]
    ViewAlreadyAttached {
        /// The view being attached.
        view: ViewId,
        /// The container it is currently attached to.
        container: ContainerId,
    },

    /// The reference node is not a child of the given parent.
    #[error("Render node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The parent that was expected to contain the node.
        parent: RenderNodeId,
        /// The node that was not found among the parent's children.
        child: RenderNodeId,
    },

    /// Attempted to insert a render node into its own subtree.
    #[error("Cannot insert a render node into itself or one of its descendants")]
    CircularParentage,
}

/// A specialized Result type for view container operations.
pub type ViewResult<T> = std::result::Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_out_of_range_message() {
        let err = ViewError::IndexOutOfRange { index: 3, len: 2 };
        assert_eq!(
            err.to_string(),
            "View index 3 out of range for container with 2 views"
        );
    }
}
