//! Interactive state of the terminal viewer
//!
//! `App` owns the controller and turns key and mouse events into controller
//! calls. It never touches the terminal, so it can be driven directly in tests.

use crate::core::controller::{Scene, TreeViewController, ViewSettings};
use crate::core::dataset::DatasetSource;
use crate::core::models::{NodeId, ViewId};
use crate::core::reference::{Opener, SystemOpener};
use crate::tui::canvas::{self, node_at, Canvas, HitRegion, Viewport};
use crate::{debug, warn};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::Duration;

/// Second click on the same node within this window counts as a double click
pub const DOUBLE_CLICK: Duration = Duration::from_millis(400);
/// Label length change per key press
pub const LABEL_STEP: usize = 5;
/// Spacing change per key press, in layout units
pub const SPACING_STEP: f64 = 20.0;
const MIN_SPACING: f64 = 20.0;
const SCROLL_STEP: i32 = 3;

/// A click that may become the first half of a double click
#[derive(Debug, Clone, Copy)]
struct Click {
    id: NodeId,
    cell: (u16, u16),
    at: Duration,
}

/// Terminal viewer state
pub struct App<O: Opener = SystemOpener> {
    controller: TreeViewController,
    source: Box<dyn DatasetSource>,
    opener: O,
    view: ViewId,
    viewport: Viewport,
    selected: Option<NodeId>,
    follow_selection: bool,
    scene: Scene,
    regions: Vec<HitRegion>,
    last_click: Option<Click>,
    now: Duration,
    show_settings: bool,
    status: Option<String>,
    should_quit: bool,
}

impl<O: Opener> App<O> {
    /// Load `view` from `source` and select its root
    pub fn new(
        settings: ViewSettings,
        view: ViewId,
        source: Box<dyn DatasetSource>,
        opener: O,
    ) -> Self {
        let mut app = Self {
            controller: TreeViewController::new(settings),
            source,
            opener,
            view,
            viewport: Viewport::default(),
            selected: None,
            follow_selection: true,
            scene: Scene::default(),
            regions: Vec::new(),
            last_click: None,
            now: Duration::ZERO,
            show_settings: false,
            status: None,
            should_quit: false,
        };
        app.load_view(view);
        app
    }

    fn load_view(&mut self, view: ViewId) {
        self.view = view;
        self.last_click = None;
        if self.controller.initialize_view(view, self.source.as_ref()) {
            self.selected = self.controller.tree().map(crate::core::models::Tree::root);
            self.status = None;
        } else {
            self.selected = None;
            self.status = Some(format!("View {view} unavailable, nothing to render"));
        }
        self.viewport.scroll_col = 0;
        self.viewport.scroll_row = 0;
        self.follow_selection = true;
    }

    /// The controller being driven
    #[must_use]
    pub const fn controller(&self) -> &TreeViewController {
        &self.controller
    }

    /// The opener double clicks go to
    #[must_use]
    pub const fn opener(&self) -> &O {
        &self.opener
    }

    /// Active view
    #[must_use]
    pub const fn view(&self) -> ViewId {
        self.view
    }

    /// Selected node
    #[must_use]
    pub const fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Current viewport
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Scene of the last tick
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// True when the settings panel is shown
    #[must_use]
    pub const fn show_settings(&self) -> bool {
        self.show_settings
    }

    /// True once the user asked to leave
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// True while the scene is still moving
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    /// Advance the render clock
    pub fn tick(&mut self, now: Duration) {
        self.now = self.now.max(now);
        self.scene = self.controller.tick(self.now);
        if self.follow_selection {
            self.reveal_selected();
        }
        self.refresh_regions();
    }

    /// Place the tree window on screen; called on every draw and on resize
    pub fn set_area(&mut self, area: Rect) {
        let resized = area.width != self.viewport.width || area.height != self.viewport.height;
        self.viewport.x = area.x;
        self.viewport.y = area.y;
        self.viewport.width = area.width;
        self.viewport.height = area.height;
        if resized {
            debug!("Tree area resized to {}x{}", area.width, area.height);
            self.reveal_selected();
        }
        self.refresh_regions();
    }

    fn row_height(&self) -> f64 {
        self.controller.settings().row_height
    }

    fn refresh_regions(&mut self) {
        self.regions = canvas::hit_regions(&self.scene, &self.viewport, self.row_height());
    }

    fn reveal_selected(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        let Some(position) = self.controller.layout().position(id) else {
            return;
        };
        let (col, row) = Viewport::tree_cell(position, self.row_height());
        let label = self
            .controller
            .label(id)
            .map_or(0, |label| i32::try_from(label.chars().count()).unwrap_or(0));
        self.viewport.reveal(col, row, label + 2);
    }

    /// Draw the last scene into a canvas
    #[must_use]
    pub fn paint(&self) -> Canvas {
        canvas::paint(&self.scene, &self.viewport, self.row_height(), self.selected)
    }

    /// One-line status: selection tooltip or the last message
    #[must_use]
    pub fn status_line(&self) -> String {
        if let Some(status) = &self.status {
            return status.clone();
        }
        self.selected
            .and_then(|id| self.controller.tooltip(id))
            .unwrap_or_default()
    }

    /// Lines of the settings panel
    #[must_use]
    pub fn settings_lines(&self) -> Vec<String> {
        let settings = self.controller.settings();
        vec![
            format!("View           {} {}", self.view.id(), self.view.title()),
            format!("Label length   {}   (+/-)", settings.label_length),
            format!("Spacing        {}   (>/<)", settings.spacing),
            format!("Transition     {} ms", settings.transition.as_millis()),
            format!("Slow           {} ms (shift)", settings.slow_transition.as_millis()),
            format!("Reference      {}", settings.reference_url),
        ]
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        let slow = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(slow),
            KeyCode::Char('o') => self.open_selected(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Left | KeyCode::Char('h') => self.select_parent(),
            KeyCode::Right | KeyCode::Char('l') => self.select_first_child(),
            KeyCode::Home => self.select_index(0),
            KeyCode::End => self.select_index(usize::MAX),
            KeyCode::Char('+' | '=') => self.adjust_label_length(true),
            KeyCode::Char('-') => self.adjust_label_length(false),
            KeyCode::Char('>' | '.') => self.adjust_spacing(SPACING_STEP),
            KeyCode::Char('<' | ',') => self.adjust_spacing(-SPACING_STEP),
            KeyCode::Char('e') => {
                self.controller.expand_all();
                self.follow_selection = true;
            }
            KeyCode::Char('c') => {
                self.controller.collapse_all();
                self.keep_selection_visible();
            }
            KeyCode::Char('s') => self.show_settings = !self.show_settings,
            KeyCode::Char('v') => self.load_view(self.view.next()),
            _ => {}
        }
    }

    /// Handle a mouse event; screen coordinates
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let slow = event
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT | KeyModifiers::CONTROL);
                self.click_at(event.column, event.row, slow);
            }
            MouseEventKind::ScrollUp => self.scroll(0, -SCROLL_STEP),
            MouseEventKind::ScrollDown => self.scroll(0, SCROLL_STEP),
            MouseEventKind::ScrollLeft => self.scroll(-SCROLL_STEP, 0),
            MouseEventKind::ScrollRight => self.scroll(SCROLL_STEP, 0),
            _ => {}
        }
    }

    fn scroll(&mut self, cols: i32, rows: i32) {
        self.follow_selection = false;
        self.viewport.scroll_by(cols, rows);
        self.refresh_regions();
    }

    /// Click at a screen cell. A second click within [`DOUBLE_CLICK`] on the
    /// same cell or the same node also opens the first node's reference page.
    ///
    /// The first click may have moved the node away from the cursor, so a
    /// repeat on the same cell targets the remembered node.
    pub fn click_at(&mut self, column: u16, row: u16, slow: bool) {
        let cell = (column, row);
        let hit = self
            .viewport
            .from_screen(column, row)
            .and_then(|(col, row)| node_at(&self.regions, col, row));
        let now = self.now;
        let repeat = self.last_click.take().filter(|last| {
            now.saturating_sub(last.at) <= DOUBLE_CLICK
                && (last.cell == cell || hit == Some(last.id))
        });

        if let Some(first) = repeat {
            self.selected = Some(first.id);
            self.status = None;
            self.controller.on_node_click(first.id, slow);
            self.open_node(first.id);
            return;
        }

        let Some(id) = hit else {
            return;
        };
        self.selected = Some(id);
        self.status = None;
        self.controller.on_node_click(id, slow);
        self.last_click = Some(Click { id, cell, at: now });
    }

    fn toggle_selected(&mut self, slow: bool) {
        if let Some(id) = self.selected {
            self.status = None;
            self.controller.on_node_click(id, slow);
            self.follow_selection = true;
        }
    }

    fn open_selected(&mut self) {
        if let Some(id) = self.selected {
            self.open_node(id);
        }
    }

    fn open_node(&mut self, id: NodeId) {
        match self.controller.on_node_double_click(id, &mut self.opener) {
            Ok(Some(url)) => self.status = Some(format!("Opened {url}")),
            Ok(None) => {}
            Err(err) => {
                warn!("Could not open reference page: {err}");
                self.status = Some(format!("Could not open reference page: {err}"));
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let visible = self.controller.visible_ids();
        if visible.is_empty() {
            return;
        }
        let current = self
            .selected
            .and_then(|id| visible.iter().position(|&v| v == id))
            .unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(visible.len() - 1);
        self.select(visible[next]);
    }

    fn select_index(&mut self, index: usize) {
        let visible = self.controller.visible_ids();
        if let Some(&id) = visible.get(index.min(visible.len().saturating_sub(1))) {
            self.select(id);
        }
    }

    fn select_parent(&mut self) {
        let parent = self
            .selected
            .and_then(|id| self.controller.tree()?.get(id)?.parent());
        if let Some(parent) = parent {
            self.select(parent);
        }
    }

    fn select_first_child(&mut self) {
        let child = self
            .selected
            .and_then(|id| self.controller.tree()?.get(id)?.children().first().copied());
        if let Some(child) = child {
            self.select(child);
        }
    }

    fn select(&mut self, id: NodeId) {
        self.selected = Some(id);
        self.status = None;
        self.follow_selection = true;
        self.reveal_selected();
        self.refresh_regions();
    }

    fn keep_selection_visible(&mut self) {
        if let (Some(id), Some(tree)) = (self.selected, self.controller.tree()) {
            self.selected = Some(tree.visible_ancestor(id));
        }
        self.follow_selection = true;
    }

    fn adjust_label_length(&mut self, grow: bool) {
        let mut settings = self.controller.settings().clone();
        settings.label_length = if grow {
            settings.label_length.saturating_add(LABEL_STEP)
        } else {
            settings.label_length.saturating_sub(LABEL_STEP).max(1)
        };
        self.controller.apply_settings(settings);
    }

    fn adjust_spacing(&mut self, delta: f64) {
        let mut settings = self.controller.settings().clone();
        settings.spacing = (settings.spacing + delta).max(MIN_SPACING);
        self.controller.apply_settings(settings);
        self.follow_selection = true;
    }
}
