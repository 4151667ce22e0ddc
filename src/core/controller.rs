//! Tree View Controller
//!
//! Owns the active tree, its expand/collapse state and the cache of what was drawn
//! in the previous frame. Every interaction ends in a reconciliation pass
//! ([`TreeViewController::render`]) that diffs the previous visible set against the
//! new one by node id and starts the matching tweens on the render clock.

use crate::core::dataset::DatasetSource;
use crate::core::label::{tooltip, truncate_label};
use crate::core::layout::{apply_layout, LayoutSettings, TreeLayout};
use crate::core::models::{NodeId, Point, Tree, ViewId};
use crate::core::reference::{reference_url, Opener, DEFAULT_REFERENCE_URL};
use crate::core::transition::{Segment, Timeline};
use crate::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Default maximum label length in characters
pub const DEFAULT_LABEL_LENGTH: usize = 50;
/// Default horizontal distance between depth levels
pub const DEFAULT_SPACING: f64 = 180.0;
/// Default vertical distance between leaf rows
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;
/// Default transition length
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(500);
/// Transition length when the modifier key is held
pub const DEFAULT_SLOW_TRANSITION: Duration = Duration::from_millis(5000);

/// User-adjustable presentation settings
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    /// Maximum characters shown per label
    pub label_length: usize,
    /// Horizontal distance between depth levels
    pub spacing: f64,
    /// Vertical distance between leaf rows
    pub row_height: f64,
    /// Normal transition length
    pub transition: Duration,
    /// Transition length for modifier clicks
    pub slow_transition: Duration,
    /// Base of the reference page URLs
    pub reference_url: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            label_length: DEFAULT_LABEL_LENGTH,
            spacing: DEFAULT_SPACING,
            row_height: DEFAULT_ROW_HEIGHT,
            transition: DEFAULT_TRANSITION,
            slow_transition: DEFAULT_SLOW_TRANSITION,
            reference_url: DEFAULT_REFERENCE_URL.to_string(),
        }
    }
}

impl ViewSettings {
    /// Replace unusable values with defaults.
    ///
    /// Label length and spacing must be positive; non-finite spacing or row height
    /// fall back as well. An empty reference URL restores the default.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if self.label_length == 0 {
            self.label_length = DEFAULT_LABEL_LENGTH;
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            self.spacing = DEFAULT_SPACING;
        }
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            self.row_height = DEFAULT_ROW_HEIGHT;
        }
        if self.reference_url.trim().is_empty() {
            self.reference_url = DEFAULT_REFERENCE_URL.to_string();
        }
        self
    }

    /// Parse a label length from user input, failing closed to the default
    #[must_use]
    pub fn parse_label_length(input: &str) -> usize {
        match input.trim().parse::<i64>() {
            Ok(value) if value > 0 => usize::try_from(value).unwrap_or(DEFAULT_LABEL_LENGTH),
            _ => DEFAULT_LABEL_LENGTH,
        }
    }

    /// Parse a spacing value from user input, failing closed to the default
    #[must_use]
    pub fn parse_spacing(input: &str) -> f64 {
        match input.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => value,
            _ => DEFAULT_SPACING,
        }
    }

    const fn layout(&self) -> LayoutSettings {
        LayoutSettings {
            spacing: self.spacing,
            row_height: self.row_height,
        }
    }
}

/// Movement of one node during a reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransition {
    /// Node being moved
    pub id: NodeId,
    /// Start position
    pub from: Point,
    /// End position
    pub to: Point,
}

/// Movement of one edge, keyed by its child endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeTransition {
    /// Child endpoint (edge identity)
    pub child: NodeId,
    /// Parent endpoint
    pub parent: NodeId,
    /// Start geometry
    pub from: Segment,
    /// End geometry
    pub to: Segment,
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    /// Newly visible nodes, starting at the anchor's previous position
    pub entering: Vec<NodeTransition>,
    /// Nodes visible before and after
    pub updating: Vec<NodeTransition>,
    /// Nodes no longer visible, moving into the anchor's current position
    pub exiting: Vec<NodeTransition>,
    /// Newly drawn edges
    pub edges_entering: Vec<EdgeTransition>,
    /// Edges drawn before and after
    pub edges_updating: Vec<EdgeTransition>,
    /// Edges being removed
    pub edges_exiting: Vec<EdgeTransition>,
    /// Transition length used for every tween in this pass
    pub duration: Duration,
}

impl RenderFrame {
    /// Nodes visible once the pass completes
    pub fn visible(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entering.iter().chain(&self.updating).map(|t| t.id)
    }

    /// Look up how a node moves in this pass
    #[must_use]
    pub fn transition(&self, id: NodeId) -> Option<&NodeTransition> {
        self.entering
            .iter()
            .chain(&self.updating)
            .chain(&self.exiting)
            .find(|t| t.id == id)
    }
}

/// A node as it should be drawn at a given instant
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnNode {
    /// Node identity
    pub id: NodeId,
    /// Interpolated position
    pub position: Point,
    /// Truncated label
    pub label: String,
    /// Full name and identifier
    pub tooltip: String,
    /// Node has hidden children
    pub collapsed: bool,
    /// Node has no children at all
    pub leaf: bool,
    /// Node is on its way out
    pub exiting: bool,
}

/// An edge as it should be drawn at a given instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnEdge {
    /// Child endpoint
    pub child: NodeId,
    /// Parent endpoint
    pub parent: NodeId,
    /// Interpolated geometry
    pub segment: Segment,
}

/// Everything to draw for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Nodes in pre-order, followed by exiting nodes
    pub nodes: Vec<DrawnNode>,
    /// Edges, visible first, then exiting
    pub edges: Vec<DrawnEdge>,
}

impl Scene {
    /// Closest non-exiting node within `tolerance` on both axes
    #[must_use]
    pub fn node_near(&self, point: Point, tolerance_x: f64, tolerance_y: f64) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|node| !node.exiting)
            .filter(|node| {
                (node.position.x - point.x).abs() <= tolerance_x
                    && (node.position.y - point.y).abs() <= tolerance_y
            })
            .min_by(|a, b| {
                let da = (a.position.x - point.x).abs() + (a.position.y - point.y).abs();
                let db = (b.position.x - point.x).abs() + (b.position.y - point.y).abs();
                da.total_cmp(&db)
            })
            .map(|node| node.id)
    }
}

/// Interaction state for one viewing session
#[derive(Debug, Default)]
pub struct TreeViewController {
    view: Option<ViewId>,
    tree: Option<Tree>,
    settings: ViewSettings,
    layout: TreeLayout,
    rendered: BTreeSet<NodeId>,
    rendered_edges: BTreeMap<NodeId, NodeId>,
    exiting: BTreeSet<NodeId>,
    exiting_edges: BTreeMap<NodeId, NodeId>,
    node_tweens: Timeline<NodeId, Point>,
    edge_tweens: Timeline<NodeId, Segment>,
    clock: Duration,
}

impl TreeViewController {
    /// Create a controller with no tree loaded
    #[must_use]
    pub fn new(settings: ViewSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            ..Self::default()
        }
    }

    /// Create a controller around an already built tree and run the first pass
    #[must_use]
    pub fn with_tree(tree: Tree, settings: ViewSettings) -> Self {
        let mut controller = Self::new(settings);
        controller.install(None, tree);
        controller
    }

    /// Load the view named by `id` from `source`.
    ///
    /// Unknown identifiers and unreadable datasets leave the controller empty
    /// ("nothing rendered") and return `false`; the failure is only logged.
    pub fn initialize(&mut self, id: &str, source: &dyn DatasetSource) -> bool {
        let Some(view) = ViewId::lookup(id) else {
            warn!("Unknown view '{id}', nothing to render");
            self.clear();
            return false;
        };
        self.initialize_view(view, source)
    }

    /// Load a known view from `source`; see [`initialize`](Self::initialize)
    pub fn initialize_view(&mut self, view: ViewId, source: &dyn DatasetSource) -> bool {
        match source.load(view) {
            Ok(record) => {
                let tree = Tree::from_record(&record);
                info!("Loaded view {view} ({} entries)", tree.len());
                self.install(Some(view), tree);
                true
            }
            Err(err) => {
                warn!("View {view} unavailable, nothing to render: {err}");
                self.clear();
                false
            }
        }
    }

    fn install(&mut self, view: Option<ViewId>, mut tree: Tree) {
        self.clear();
        tree.collapse_below_root();
        let root = tree.root();
        let layout = apply_layout(&mut tree, self.settings.layout());
        if let Some(start) = layout.position(root) {
            let node = tree.node_mut(root);
            node.x0 = start.x;
            node.y0 = start.y;
        }
        self.view = view;
        self.tree = Some(tree);
        self.render(root);
    }

    /// Drop the tree and everything drawn from it
    pub fn clear(&mut self) {
        self.view = None;
        self.tree = None;
        self.layout = TreeLayout::default();
        self.rendered.clear();
        self.rendered_edges.clear();
        self.exiting.clear();
        self.exiting_edges.clear();
        self.node_tweens.clear();
        self.edge_tweens.clear();
    }

    /// Active view, if the tree came from a dataset source
    #[must_use]
    pub const fn view(&self) -> Option<ViewId> {
        self.view
    }

    /// Active tree
    #[must_use]
    pub const fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Current settings
    #[must_use]
    pub const fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Layout of the last pass
    #[must_use]
    pub const fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    /// Current render clock value
    #[must_use]
    pub const fn clock(&self) -> Duration {
        self.clock
    }

    /// Nodes visible after the last pass, in pre-order
    #[must_use]
    pub fn visible_ids(&self) -> Vec<NodeId> {
        self.layout.order().to_vec()
    }

    /// Flip a node between expanded and collapsed; leaves are ignored
    pub fn toggle(&mut self, id: NodeId) -> bool {
        self.tree.as_mut().is_some_and(|tree| tree.toggle(id))
    }

    /// Reconcile the drawing with the current tree state, anchored at `anchor`
    pub fn render(&mut self, anchor: NodeId) -> Option<RenderFrame> {
        self.render_with(anchor, self.settings.transition)
    }

    #[allow(clippy::too_many_lines)]
    fn render_with(&mut self, anchor: NodeId, duration: Duration) -> Option<RenderFrame> {
        let now = self.clock;
        let tree = self.tree.as_mut()?;
        let anchor = tree.visible_ancestor(anchor);
        let source_before = tree.node(anchor).previous_position();

        let layout = apply_layout(tree, self.settings.layout());
        let source_after = tree.node(anchor).position();
        let mut frame = RenderFrame {
            duration,
            ..RenderFrame::default()
        };

        let visible: BTreeSet<NodeId> = layout.order().iter().copied().collect();
        for &id in layout.order() {
            let node = tree.node(id);
            if self.rendered.contains(&id) {
                frame.updating.push(NodeTransition {
                    id,
                    from: node.previous_position(),
                    to: node.position(),
                });
            } else {
                frame.entering.push(NodeTransition {
                    id,
                    from: source_before,
                    to: node.position(),
                });
            }
        }
        for &id in self.rendered.difference(&visible) {
            frame.exiting.push(NodeTransition {
                id,
                from: tree.node(id).previous_position(),
                to: source_after,
            });
        }

        let edges: BTreeMap<NodeId, NodeId> = layout
            .order()
            .iter()
            .filter_map(|&id| tree.node(id).parent().map(|parent| (id, parent)))
            .collect();
        for (&child, &parent) in &edges {
            let to = Segment {
                source: tree.node(parent).position(),
                target: tree.node(child).position(),
            };
            if self.rendered_edges.contains_key(&child) {
                let from = Segment {
                    source: tree.node(parent).previous_position(),
                    target: tree.node(child).previous_position(),
                };
                frame.edges_updating.push(EdgeTransition {
                    child,
                    parent,
                    from,
                    to,
                });
            } else {
                frame.edges_entering.push(EdgeTransition {
                    child,
                    parent,
                    from: Segment::point(source_before),
                    to,
                });
            }
        }
        for (&child, &parent) in &self.rendered_edges {
            if edges.contains_key(&child) {
                continue;
            }
            frame.edges_exiting.push(EdgeTransition {
                child,
                parent,
                from: Segment {
                    source: tree.node(parent).previous_position(),
                    target: tree.node(child).previous_position(),
                },
                to: Segment::point(source_after),
            });
        }

        for t in frame.entering.iter().chain(&frame.updating) {
            self.exiting.remove(&t.id);
            self.node_tweens.start(t.id, t.from, t.to, now, duration);
        }
        for t in &frame.exiting {
            self.exiting.insert(t.id);
            self.node_tweens.start(t.id, t.from, t.to, now, duration);
        }
        for e in frame.edges_entering.iter().chain(&frame.edges_updating) {
            self.exiting_edges.remove(&e.child);
            self.edge_tweens.start(e.child, e.from, e.to, now, duration);
        }
        for e in &frame.edges_exiting {
            self.exiting_edges.insert(e.child, e.parent);
            self.edge_tweens.start(e.child, e.from, e.to, now, duration);
        }

        for &id in layout.order() {
            let node = tree.node_mut(id);
            node.x0 = node.x;
            node.y0 = node.y;
        }

        debug!(
            "Render at {anchor}: {} entering, {} updating, {} exiting",
            frame.entering.len(),
            frame.updating.len(),
            frame.exiting.len()
        );

        self.rendered = visible;
        self.rendered_edges = edges;
        self.layout = layout;
        Some(frame)
    }

    /// Click: toggle the node and reconcile anchored at it.
    ///
    /// `slow` selects the long transition (modifier key held).
    pub fn on_node_click(&mut self, id: NodeId, slow: bool) -> Option<RenderFrame> {
        self.tree.as_ref()?.get(id)?;
        self.toggle(id);
        let duration = if slow {
            self.settings.slow_transition
        } else {
            self.settings.transition
        };
        self.render_with(id, duration)
    }

    /// Double click: open the node's reference page. No state changes.
    ///
    /// Returns the URL that was handed to the opener.
    ///
    /// # Errors
    /// Returns the opener's error if the URL could not be opened
    pub fn on_node_double_click(
        &self,
        id: NodeId,
        opener: &mut dyn Opener,
    ) -> std::io::Result<Option<String>> {
        let Some(url) = self.reference_url(id) else {
            return Ok(None);
        };
        info!("Opening reference {url}");
        opener.open(&url)?;
        Ok(Some(url))
    }

    /// Reference page of a node
    #[must_use]
    pub fn reference_url(&self, id: NodeId) -> Option<String> {
        let node = self.tree.as_ref()?.get(id)?;
        Some(reference_url(&self.settings.reference_url, &node.cid))
    }

    /// Truncated label of a node
    #[must_use]
    pub fn label(&self, id: NodeId) -> Option<String> {
        let node = self.tree.as_ref()?.get(id)?;
        Some(truncate_label(&node.name, self.settings.label_length))
    }

    /// Tooltip of a node
    #[must_use]
    pub fn tooltip(&self, id: NodeId) -> Option<String> {
        let node = self.tree.as_ref()?.get(id)?;
        Some(tooltip(&node.name, &node.cid))
    }

    /// Replace the settings and re-lay out in place, keeping expand/collapse state
    pub fn apply_settings(&mut self, settings: ViewSettings) -> Option<RenderFrame> {
        self.settings = settings.sanitized();
        debug!(
            "Settings applied: label_length={} spacing={}",
            self.settings.label_length, self.settings.spacing
        );
        let root = self.tree.as_ref()?.root();
        self.render(root)
    }

    /// Expand every node and reconcile from the root
    pub fn expand_all(&mut self) -> Option<RenderFrame> {
        let tree = self.tree.as_mut()?;
        tree.expand_all();
        let root = tree.root();
        self.render(root)
    }

    /// Return to the initial "collapsed below the root" state
    pub fn collapse_all(&mut self) -> Option<RenderFrame> {
        let tree = self.tree.as_mut()?;
        tree.collapse_below_root();
        let root = tree.root();
        self.render(root)
    }

    /// True while any tween is in flight at the current clock
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.node_tweens.is_animating(self.clock) || self.edge_tweens.is_animating(self.clock)
    }

    /// Advance the render clock and describe what to draw.
    ///
    /// Finished exit tweens are dropped here, which is when exiting nodes and
    /// edges disappear from the scene.
    pub fn tick(&mut self, now: Duration) -> Scene {
        self.clock = self.clock.max(now);
        let now = self.clock;
        let Some(tree) = self.tree.as_ref() else {
            return Scene::default();
        };

        let mut scene = Scene::default();
        let draw_node = |id: NodeId, exiting: bool| {
            let node = tree.node(id);
            DrawnNode {
                id,
                position: self
                    .node_tweens
                    .value(&id, now)
                    .unwrap_or_else(|| node.position()),
                label: truncate_label(&node.name, self.settings.label_length),
                tooltip: tooltip(&node.name, &node.cid),
                collapsed: node.is_collapsed(),
                leaf: node.is_leaf(),
                exiting,
            }
        };
        scene.nodes.extend(self.layout.order().iter().map(|&id| draw_node(id, false)));
        scene.nodes.extend(
            self.exiting
                .iter()
                .filter(|id| {
                    self.node_tweens
                        .get(id)
                        .is_some_and(|tween| !tween.is_finished(now))
                })
                .map(|&id| draw_node(id, true)),
        );

        let draw_edge = |child: NodeId, parent: NodeId| DrawnEdge {
            child,
            parent,
            segment: self.edge_tweens.value(&child, now).unwrap_or(Segment {
                source: tree.node(parent).position(),
                target: tree.node(child).position(),
            }),
        };
        scene.edges.extend(
            self.rendered_edges
                .iter()
                .map(|(&child, &parent)| draw_edge(child, parent)),
        );
        scene.edges.extend(
            self.exiting_edges
                .iter()
                .filter(|(child, _)| {
                    self.edge_tweens
                        .get(child)
                        .is_some_and(|tween| !tween.is_finished(now))
                })
                .map(|(&child, &parent)| draw_edge(child, parent)),
        );

        for id in self.node_tweens.retire_finished(now) {
            self.exiting.remove(&id);
        }
        for child in self.edge_tweens.retire_finished(now) {
            self.exiting_edges.remove(&child);
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::CweRecord;

    fn sample() -> TreeViewController {
        let record = CweRecord::with_children(
            "A",
            "A",
            vec![
                CweRecord::with_children("B", "B", vec![CweRecord::leaf("D", "D")]),
                CweRecord::leaf("C", "C"),
            ],
        );
        TreeViewController::with_tree(Tree::from_record(&record), ViewSettings::default())
    }

    fn cid(controller: &TreeViewController, cid: &str) -> NodeId {
        controller.tree().unwrap().find_by_cid(cid).unwrap()
    }

    #[test]
    fn sanitized_settings_fail_closed() {
        let settings = ViewSettings {
            label_length: 0,
            spacing: -3.0,
            row_height: f64::NAN,
            reference_url: " ".to_string(),
            ..ViewSettings::default()
        }
        .sanitized();
        assert_eq!(settings, ViewSettings::default());
    }

    #[test]
    fn parse_helpers_fail_closed() {
        assert_eq!(ViewSettings::parse_label_length("12"), 12);
        assert_eq!(ViewSettings::parse_label_length("-4"), DEFAULT_LABEL_LENGTH);
        assert_eq!(ViewSettings::parse_label_length("ten"), DEFAULT_LABEL_LENGTH);
        assert!((ViewSettings::parse_spacing("90.5") - 90.5).abs() < f64::EPSILON);
        assert!((ViewSettings::parse_spacing("0") - DEFAULT_SPACING).abs() < f64::EPSILON);
        assert!((ViewSettings::parse_spacing("inf") - DEFAULT_SPACING).abs() < f64::EPSILON);
    }

    #[test]
    fn first_pass_enters_everything_from_the_root() {
        let controller = sample();
        let root = controller.tree().unwrap().root();
        let root_pos = controller.tree().unwrap().node(root).position();
        assert_eq!(controller.visible_ids().len(), 3);
        let scene = {
            let mut c = controller;
            c.tick(Duration::ZERO)
        };
        assert!(scene.nodes.iter().all(|n| n.position == root_pos));
    }

    #[test]
    fn click_enters_children_at_the_clicked_node() {
        let mut controller = sample();
        let b = cid(&controller, "B");
        let d = cid(&controller, "D");
        let b_before = controller.tree().unwrap().node(b).position();

        let frame = controller.on_node_click(b, false).unwrap();
        let entering: Vec<NodeId> = frame.entering.iter().map(|t| t.id).collect();
        assert_eq!(entering, [d]);
        assert_eq!(frame.entering[0].from, b_before);
        assert_eq!(frame.duration, DEFAULT_TRANSITION);
        assert_eq!(frame.edges_entering.len(), 1);
        assert_eq!(frame.edges_entering[0].child, d);
        assert_eq!(frame.visible().count(), 4);
    }

    #[test]
    fn collapse_sends_children_to_the_clicked_node() {
        let mut controller = sample();
        let b = cid(&controller, "B");
        let d = cid(&controller, "D");
        controller.on_node_click(b, false);
        let frame = controller.on_node_click(b, true).unwrap();

        assert_eq!(frame.duration, DEFAULT_SLOW_TRANSITION);
        assert_eq!(frame.exiting.len(), 1);
        assert_eq!(frame.exiting[0].id, d);
        assert_eq!(frame.exiting[0].to, controller.tree().unwrap().node(b).position());
        assert_eq!(frame.edges_exiting.len(), 1);
    }

    #[test]
    fn exiting_nodes_leave_the_scene_after_their_tween() {
        let mut controller = sample();
        let b = cid(&controller, "B");
        let d = cid(&controller, "D");
        controller.tick(Duration::from_secs(1));
        controller.on_node_click(b, false);
        controller.tick(Duration::from_secs(2));
        controller.on_node_click(b, false);

        let during = controller.tick(Duration::from_millis(2200));
        assert!(during.nodes.iter().any(|n| n.id == d && n.exiting));

        controller.tick(Duration::from_secs(3));
        let after = controller.tick(Duration::from_secs(3));
        assert!(after.nodes.iter().all(|n| n.id != d));
        assert!(after.edges.iter().all(|e| e.child != d));
        assert!(!controller.is_animating());
    }

    #[test]
    fn settings_change_preserves_expansion() {
        let mut controller = sample();
        let b = cid(&controller, "B");
        controller.on_node_click(b, false);

        let frame = controller
            .apply_settings(ViewSettings {
                spacing: 60.0,
                label_length: 1,
                ..ViewSettings::default()
            })
            .unwrap();
        assert_eq!(frame.visible().count(), 4);
        assert!(frame.entering.is_empty());
        let d = cid(&controller, "D");
        assert!((controller.tree().unwrap().node(d).y - 120.0).abs() < f64::EPSILON);
        assert_eq!(controller.label(d).unwrap(), "D");
    }

    #[test]
    fn clicking_a_leaf_changes_nothing() {
        let mut controller = sample();
        let c = cid(&controller, "C");
        let frame = controller.on_node_click(c, false).unwrap();
        assert!(frame.entering.is_empty());
        assert!(frame.exiting.is_empty());
        assert_eq!(frame.updating.len(), 3);
    }

    #[test]
    fn node_near_finds_closest_visible_node() {
        let mut controller = sample();
        let scene = controller.tick(Duration::from_secs(10));
        let c = cid(&controller, "C");
        let c_pos = controller.tree().unwrap().node(c).position();
        let hit = scene.node_near(Point::new(c_pos.x + 1.0, c_pos.y - 1.0), 5.0, 5.0);
        assert_eq!(hit, Some(c));
        assert_eq!(scene.node_near(Point::new(-500.0, -500.0), 5.0, 5.0), None);
    }
}
