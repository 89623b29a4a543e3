//! Embedded view containers for Horizon Lattice.
//!
//! This crate manages the ordered list of embedded views attached to a
//! container anchor and keeps a render tree in sync with that order:
//!
//! - **View Lists**: Attach, detach and move views within a container
//! - **Projection**: Views declared in one container but attached to another
//!   are tracked on the declaring container
//! - **Query Invalidation**: Queries matched inside a view are marked dirty
//!   whenever the view's attachment changes
//! - **Render Sync**: Root render nodes are linked after the right sibling,
//!   either directly or through a per-view [`ViewRenderer`]
//!
//! # Example
//!
//! ```
//! use horizon_lattice_views::{DirtyQueries, QueryId, RootNode, ViewBuilder, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let body = tree.render_mut().create_element("body");
//! let anchor = tree.render_mut().create_comment("rows");
//! tree.render_mut().append_child(body, anchor).unwrap();
//! let rows = tree.create_container(anchor).unwrap();
//!
//! let first = tree.render_mut().create_text("first");
//! let second = tree.render_mut().create_text("second");
//! let a = tree.create_view(ViewBuilder::new().root_node(RootNode::Node(first)).matched_query(QueryId(1)));
//! let b = tree.create_view(ViewBuilder::new().root_node(RootNode::Node(second)));
//!
//! let mut dirty = DirtyQueries::new();
//! tree.attach_embedded_view(rows, None, a, &mut dirty).unwrap();
//! tree.attach_embedded_view(rows, None, b, &mut dirty).unwrap();
//!
//! // Swap the two rows.
//! tree.move_embedded_view(rows, 0, Some(1), &mut dirty).unwrap();
//! assert_eq!(tree.embedded_views(rows).unwrap(), &[b, a]);
//! assert_eq!(tree.render().children(body).unwrap(), &[anchor, second, first]);
//!
//! // Take a view out again; it can be re-attached later.
//! let detached = tree.detach_embedded_view(rows, Some(1), &mut dirty).unwrap();
//! assert_eq!(detached, a);
//! assert!(dirty.is_dirty(QueryId(1)));
//! ```

mod container;
mod error;
pub mod logging;
pub mod query;
pub mod render;
pub mod renderer;
pub mod traversal;
pub mod view;

pub use container::{SharedViewTree, ViewTree};
pub use error::{ViewError, ViewResult};
pub use logging::{TreeFormatOptions, TreeStyle, ViewTreeDebug};
pub use query::{DirtyQueries, QueryInvalidator};
pub use render::{RenderNodeId, RenderNodeKind, RenderTree};
pub use renderer::ViewRenderer;
pub use traversal::RenderNodeAction;
pub use view::{ContainerId, QueryId, RootNode, ViewBuilder, ViewId, ViewRegistry};
