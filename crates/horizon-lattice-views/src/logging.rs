//! Logging and debugging facilities for embedded view containers.
//!
//! This module provides:
//! - Target names for filtering the `tracing` output of this crate
//! - Debug visualization of containers and the views attached to them
//!
//! # Tracing Integration
//!
//! Structural operations emit `trace` events for every list, projection and
//! render tree change, and a `debug` event when render sync is skipped
//! because a container's anchor is not rendered yet. Install any `tracing`
//! subscriber in your application to see them:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_lattice_views::container=trace")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! ```
//! use horizon_lattice_views::{DirtyQueries, RootNode, ViewBuilder, ViewTree};
//! use horizon_lattice_views::logging::{TreeFormatOptions, ViewTreeDebug};
//!
//! let mut tree = ViewTree::new();
//! let anchor = tree.render_mut().create_comment("items");
//! let container = tree.create_container(anchor).unwrap();
//! let row = tree.render_mut().create_text("row");
//! let view = tree.create_view(ViewBuilder::new().root_node(RootNode::Node(row)));
//! tree.attach_embedded_view(container, None, view, &mut DirtyQueries::new()).unwrap();
//!
//! let debug = ViewTreeDebug::with_options(TreeFormatOptions::minimal());
//! let output = debug.format_container(&tree, container).unwrap();
//! assert!(output.contains("<!--items-->"));
//! assert!(output.contains("\"row\""));
//! ```

use std::fmt::Write as FmtWrite;

use crate::container::ViewTree;
use crate::error::ViewResult;
use crate::view::{ContainerId, RootNode, ViewId};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Crate-wide target.
    pub const VIEWS: &str = "horizon_lattice_views";
    /// Container list and projection bookkeeping.
    pub const CONTAINER: &str = "horizon_lattice_views::container";
    /// Render tree mutations.
    pub const RENDER: &str = "horizon_lattice_views::render";
    /// Query dirtying.
    pub const QUERY: &str = "horizon_lattice_views::query";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for view tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show container and view IDs.
    pub show_ids: bool,
    /// Whether to show the queries matched by each view.
    pub show_queries: bool,
    /// Whether to list views projected out of each container.
    pub show_projected: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_queries: false,
            show_projected: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_queries: true,
            ..Default::default()
        }
    }

    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_queries: false,
            show_projected: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing containers and their attached views.
#[derive(Debug, Clone, Default)]
pub struct ViewTreeDebug {
    options: TreeFormatOptions,
}

impl ViewTreeDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format every container that is not nested inside a view.
    pub fn format_all(&self, tree: &ViewTree) -> ViewResult<String> {
        let registry = tree.registry();
        let mut nested = Vec::new();
        for container in registry.containers() {
            for &view in registry.embedded_views(container)? {
                for root in registry.root_nodes(view)? {
                    if let RootNode::Container(inner) = *root {
                        nested.push(inner);
                    }
                }
            }
        }

        let mut output = String::new();
        writeln!(
            output,
            "View Tree ({} containers, {} views):",
            registry.container_count(),
            registry.view_count()
        )
        .expect("write to String");
        for container in registry.containers().filter(|c| !nested.contains(c)) {
            self.format_container_into(tree, container, 0, true, &mut output)?;
        }
        Ok(output)
    }

    /// Format a container and everything attached beneath it.
    pub fn format_container(&self, tree: &ViewTree, container: ContainerId) -> ViewResult<String> {
        let mut output = String::new();
        self.format_container_into(tree, container, 0, true, &mut output)?;
        Ok(output)
    }

    fn format_container_into(
        &self,
        tree: &ViewTree,
        container: ContainerId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> ViewResult<()> {
        if self.exceeds_depth(depth) {
            return Ok(());
        }
        let registry = tree.registry();
        let anchor = registry.anchor(container)?;

        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str("container ");
        output.push_str(&tree.render().kind(anchor)?.describe());
        if self.options.show_ids {
            write!(output, " [{:?}]", container).expect("write to String");
        }
        output.push('\n');

        if self.options.show_projected {
            let projected = registry.projected_views(container)?;
            if !projected.is_empty() {
                writeln!(
                    output,
                    "{}  projected: {:?}",
                    self.build_continuation(depth),
                    projected
                )
                .expect("write to String");
            }
        }

        let views = registry.embedded_views(container)?;
        for (i, &view) in views.iter().enumerate() {
            self.format_view_into(tree, view, depth + 1, i + 1 == views.len(), output)?;
        }
        Ok(())
    }

    fn format_view_into(
        &self,
        tree: &ViewTree,
        view: ViewId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> ViewResult<()> {
        if self.exceeds_depth(depth) {
            return Ok(());
        }
        let registry = tree.registry();

        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str("view");
        if self.options.show_ids {
            write!(output, " [{:?}]", view).expect("write to String");
        }
        if self.options.show_queries {
            let queries = registry.matched_queries(view)?;
            if !queries.is_empty() {
                let names: Vec<String> = queries.iter().map(ToString::to_string).collect();
                write!(output, " queries({})", names.join(", ")).expect("write to String");
            }
        }
        if registry.renderer(view)?.is_some() {
            output.push_str(" (renderer)");
        }
        output.push('\n');

        let roots = registry.root_nodes(view)?;
        for (i, root) in roots.iter().enumerate() {
            let last = i + 1 == roots.len();
            match *root {
                RootNode::Node(node) => {
                    if self.exceeds_depth(depth + 1) {
                        continue;
                    }
                    output.push_str(&self.build_prefix(depth + 1, last));
                    output.push_str(&tree.render().kind(node)?.describe());
                    output.push('\n');
                }
                RootNode::Container(nested) => {
                    self.format_container_into(tree, nested, depth + 1, last, output)?;
                }
            }
        }
        Ok(())
    }

    fn exceeds_depth(&self, depth: usize) -> bool {
        self.options.max_depth.is_some_and(|max| depth > max)
    }

    /// Build the prefix string for a tree line.
    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, corner, last_corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            for _ in 0..self.options.indent_size {
                prefix.push(' ');
            }
        }
        prefix.push_str(if is_last { last_corner } else { corner });
        prefix.push(' ');
        prefix
    }

    /// Build the prefix for detail lines under an entry.
    fn build_continuation(&self, depth: usize) -> String {
        let branch = match self.options.style {
            TreeStyle::Ascii => "|",
            TreeStyle::Unicode => "\u{2502}",
            TreeStyle::Compact => "",
        };
        let mut prefix = String::new();
        for _ in 0..depth {
            prefix.push_str(branch);
            for _ in 0..self.options.indent_size {
                prefix.push(' ');
            }
        }
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DirtyQueries;
    use crate::view::{QueryId, ViewBuilder};

    fn sample() -> (ViewTree, ContainerId, ContainerId) {
        let mut tree = ViewTree::new();
        let outer_anchor = tree.render_mut().create_comment("outer");
        let outer = tree.create_container(outer_anchor).unwrap();
        let inner_anchor = tree.render_mut().create_comment("inner");
        let inner = tree.create_container(inner_anchor).unwrap();
        let title = tree.render_mut().create_text("title");
        let item = tree.render_mut().create_text("item");

        let host = tree.create_view(
            ViewBuilder::new()
                .root_node(RootNode::Node(title))
                .root_node(RootNode::Container(inner))
                .matched_query(QueryId(9)),
        );
        let child = tree.create_view(ViewBuilder::new().root_node(RootNode::Node(item)));

        let mut dirty = DirtyQueries::new();
        tree.attach_embedded_view(outer, None, host, &mut dirty).unwrap();
        tree.attach_embedded_view(inner, None, child, &mut dirty).unwrap();
        (tree, outer, inner)
    }

    #[test]
    fn test_format_container_nested() {
        let (tree, outer, _) = sample();
        let debug = ViewTreeDebug::with_options(TreeFormatOptions::minimal());
        let output = debug.format_container(&tree, outer).unwrap();

        let outer_pos = output.find("<!--outer-->").unwrap();
        let inner_pos = output.find("<!--inner-->").unwrap();
        let item_pos = output.find("\"item\"").unwrap();
        assert!(outer_pos < inner_pos && inner_pos < item_pos);
        assert!(!output.contains('['));
    }

    #[test]
    fn test_format_detailed_shows_queries() {
        let (tree, outer, _) = sample();
        let debug = ViewTreeDebug::with_options(TreeFormatOptions::detailed());
        let output = debug.format_container(&tree, outer).unwrap();
        assert!(output.contains("queries(query#9)"));
    }

    #[test]
    fn test_format_all_skips_nested_roots() {
        let (tree, _, _) = sample();
        let output = ViewTreeDebug::new().format_all(&tree).unwrap();
        assert!(output.starts_with("View Tree (2 containers, 2 views):"));
        assert_eq!(output.matches("<!--inner-->").count(), 1);
    }

    #[test]
    fn test_max_depth() {
        let (tree, outer, _) = sample();
        let options = TreeFormatOptions {
            max_depth: Some(1),
            ..TreeFormatOptions::minimal()
        };
        let output = ViewTreeDebug::with_options(options)
            .format_container(&tree, outer)
            .unwrap();
        assert!(output.contains("view"));
        assert!(!output.contains("\"title\""));
    }
}
