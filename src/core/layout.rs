//! Left-to-right tree layout
//!
//! Depth maps to the horizontal axis (`y = depth × spacing`); sibling order maps to
//! the vertical axis. Leaves of the visible tree take consecutive rows and every
//! parent sits midway between its first and last visible child, so subtrees never
//! overlap.

use crate::core::models::{NodeId, Point, Tree};
use std::collections::HashMap;

/// Geometry parameters for a layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    /// Horizontal distance between two depth levels
    pub spacing: f64,
    /// Vertical distance between two leaf rows
    pub row_height: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            spacing: 180.0,
            row_height: 20.0,
        }
    }
}

/// Result of a layout pass over the visible nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    positions: HashMap<NodeId, Point>,
    order: Vec<NodeId>,
    width: f64,
    height: f64,
}

impl TreeLayout {
    /// Position of a visible node
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Visible nodes in pre-order
    #[must_use]
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Number of laid out nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nothing is visible
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Horizontal extent: deepest level plus one spacing step
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent of all rows
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }
}

/// Lay out every node reachable from the root through `children`.
#[must_use]
pub fn layout(tree: &Tree, settings: LayoutSettings) -> TreeLayout {
    let mut result = TreeLayout::default();
    let mut next_row = 0usize;
    let mut max_depth = 0usize;
    place(tree, tree.root(), settings, &mut next_row, &mut max_depth, &mut result);

    // `place` finishes parents last, so pre-order comes from the tree walk.
    result.order = tree.visible();
    #[allow(clippy::cast_precision_loss)]
    {
        result.width = (max_depth + 1) as f64 * settings.spacing;
        result.height = next_row.saturating_sub(1) as f64 * settings.row_height;
    }
    result
}

/// Lay out the tree and store the positions in the nodes' `x`/`y` fields.
pub fn apply_layout(tree: &mut Tree, settings: LayoutSettings) -> TreeLayout {
    let result = layout(tree, settings);
    for &id in result.order() {
        if let Some(point) = result.position(id) {
            let node = tree.node_mut(id);
            node.x = point.x;
            node.y = point.y;
        }
    }
    result
}

#[allow(clippy::cast_precision_loss)]
fn place(
    tree: &Tree,
    id: NodeId,
    settings: LayoutSettings,
    next_row: &mut usize,
    max_depth: &mut usize,
    out: &mut TreeLayout,
) -> Point {
    let node = tree.node(id);
    let depth = node.depth();
    *max_depth = (*max_depth).max(depth);
    let y = depth as f64 * settings.spacing;

    let children = node.children();
    let x = if children.is_empty() {
        let row = *next_row;
        *next_row += 1;
        row as f64 * settings.row_height
    } else {
        let mut first = None;
        let mut last = 0.0;
        for &child in children {
            let point = place(tree, child, settings, next_row, max_depth, out);
            first.get_or_insert(point.x);
            last = point.x;
        }
        (first.unwrap_or(last) + last) / 2.0
    };

    let point = Point::new(x, y);
    out.positions.insert(id, point);
    point
}
