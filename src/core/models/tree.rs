//! Arena-backed classification tree with an expanded/collapsed partition
//!
//! Every node keeps its subtree in exactly one of two lists: `children` when it is
//! expanded, `collapsed_children` when it is collapsed. Leaves have both empty.
//! The structure itself never changes after construction; only the partition and
//! the layout coordinates do.

use crate::core::models::CweRecord;
use std::fmt;

/// Stable identity of a node, assigned once at construction (pre-order index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout position. `x` is the breadth axis (rows), `y` the depth axis (columns).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Breadth coordinate (sibling order)
    pub x: f64,
    /// Depth coordinate (level × spacing)
    pub y: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`, `t` in `[0, 1]`
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            x: (other.x - self.x).mul_add(t, self.x),
            y: (other.y - self.y).mul_add(t, self.y),
        }
    }
}

/// One classification entry in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Display label
    pub name: String,
    /// External identifier used for the reference URL
    pub cid: String,
    /// Current layout position
    pub x: f64,
    /// Current layout position
    pub y: f64,
    /// Position in the previous rendered frame
    pub x0: f64,
    /// Position in the previous rendered frame
    pub y0: f64,
    id: NodeId,
    parent: Option<NodeId>,
    depth: usize,
    children: Vec<NodeId>,
    collapsed_children: Vec<NodeId>,
}

impl TreeNode {
    /// Stable identity
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Parent node, `None` for the root
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Distance from the root
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Visible children (empty when collapsed or a leaf)
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Hidden children (empty when expanded or a leaf)
    #[must_use]
    pub fn collapsed_children(&self) -> &[NodeId] {
        &self.collapsed_children
    }

    /// Whichever list currently holds the subtree
    #[must_use]
    pub fn subtree(&self) -> &[NodeId] {
        if self.children.is_empty() {
            &self.collapsed_children
        } else {
            &self.children
        }
    }

    /// True when the node has no subtree at all
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.collapsed_children.is_empty()
    }

    /// True when the subtree is hidden
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        !self.collapsed_children.is_empty()
    }

    /// Current position
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Position in the previous frame
    #[must_use]
    pub const fn previous_position(&self) -> Point {
        Point::new(self.x0, self.y0)
    }
}

/// A static classification tree
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    /// Build a fully expanded tree from a dataset record
    #[must_use]
    pub fn from_record(record: &CweRecord) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(record.count()),
        };
        tree.push_record(record, None, 0);
        tree
    }

    fn push_record(&mut self, record: &CweRecord, parent: Option<NodeId>, depth: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            name: record.name.clone(),
            cid: record.cid.clone(),
            x: 0.0,
            y: 0.0,
            x0: 0.0,
            y0: 0.0,
            id,
            parent,
            depth,
            children: Vec::with_capacity(record.children.len()),
            collapsed_children: Vec::new(),
        });
        for child in &record.children {
            let child_id = self.push_record(child, Some(id), depth + 1);
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    /// Convert back into a dataset record, ignoring the collapse state
    #[must_use]
    pub fn to_record(&self) -> CweRecord {
        self.record_at(self.root())
    }

    fn record_at(&self, id: NodeId) -> CweRecord {
        let node = self.node(id);
        CweRecord {
            cid: node.cid.clone(),
            name: node.name.clone(),
            children: node.subtree().iter().map(|&c| self.record_at(c)).collect(),
        }
    }

    /// Root node id
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds at least its root
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node
    ///
    /// # Panics
    /// Panics if `id` was not produced by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Mutably borrow a node (coordinates only; the partition is private)
    ///
    /// # Panics
    /// Panics if `id` was not produced by this tree.
    pub fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    /// Borrow a node if the id belongs to this tree
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Iterate over all nodes in pre-order of construction
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Find the first node with the given CWE identifier
    #[must_use]
    pub fn find_by_cid(&self, cid: &str) -> Option<NodeId> {
        self.nodes.iter().find(|node| node.cid == cid).map(TreeNode::id)
    }

    /// Swap a node between expanded and collapsed. Leaves are left untouched.
    ///
    /// Returns `true` when the node changed state.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        let node = &mut self.nodes[id.0];
        if node.is_leaf() {
            return false;
        }
        if node.children.is_empty() {
            node.children = std::mem::take(&mut node.collapsed_children);
        } else {
            node.collapsed_children = std::mem::take(&mut node.children);
        }
        true
    }

    /// Collapse a node if it is expanded
    pub fn collapse(&mut self, id: NodeId) {
        if !self.nodes[id.0].children.is_empty() {
            self.toggle(id);
        }
    }

    /// Expand a node if it is collapsed
    pub fn expand(&mut self, id: NodeId) {
        if !self.nodes[id.0].collapsed_children.is_empty() {
            self.toggle(id);
        }
    }

    /// Collapse `id` and every non-leaf below it, deepest first
    pub fn collapse_subtree(&mut self, id: NodeId) {
        let below: Vec<NodeId> = self.node(id).subtree().to_vec();
        for child in below {
            self.collapse_subtree(child);
        }
        self.collapse(id);
    }

    /// Default starting state: root expanded, every deeper subtree collapsed
    pub fn collapse_below_root(&mut self) {
        let root = self.root();
        self.expand(root);
        let children: Vec<NodeId> = self.node(root).children().to_vec();
        for child in children {
            self.collapse_subtree(child);
        }
    }

    /// Expand every node in the tree
    pub fn expand_all(&mut self) {
        for index in 0..self.nodes.len() {
            self.expand(NodeId(index));
        }
    }

    /// Nodes reachable from the root through `children`, in pre-order
    #[must_use]
    pub fn visible(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children().iter().rev());
        }
        out
    }

    /// True when every ancestor of `id` is expanded
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.node(current).parent() {
            if !self.node(parent).children().contains(&current) {
                return false;
            }
            current = parent;
        }
        true
    }

    /// Nearest visible ancestor-or-self of `id`
    #[must_use]
    pub fn visible_ancestor(&self, id: NodeId) -> NodeId {
        let mut candidate = id;
        let mut current = id;
        while let Some(parent) = self.node(current).parent() {
            if !self.node(parent).children().contains(&current) {
                candidate = parent;
            }
            current = parent;
        }
        candidate
    }
}
