//! Character canvas for the tree scene
//!
//! Layout coordinates are mapped to cells: the depth axis (`y`) becomes columns
//! at [`CELL_WIDTH`] layout units per column, the breadth axis (`x`) becomes rows
//! at one row per `row_height`.

use crate::core::controller::{DrawnNode, Scene};
use crate::core::models::{NodeId, Point};
use ratatui::prelude::*;

/// Layout units per terminal column
pub const CELL_WIDTH: f64 = 4.0;

const EXPANDED_GLYPH: char = '○';
const COLLAPSED_GLYPH: char = '●';
const EDGE_COLOR: Color = Color::DarkGray;
const COLLAPSED_COLOR: Color = Color::LightBlue;
const EXITING_COLOR: Color = Color::DarkGray;

/// Visible window onto the tree, in cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Screen column of the window's left edge
    pub x: u16,
    /// Screen row of the window's top edge
    pub y: u16,
    /// Width in cells
    pub width: u16,
    /// Height in cells
    pub height: u16,
    /// First tree column shown
    pub scroll_col: i32,
    /// First tree row shown
    pub scroll_row: i32,
}

impl Viewport {
    /// Absolute tree cell of a layout point
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn tree_cell(point: Point, row_height: f64) -> (i32, i32) {
        let col = (point.y / CELL_WIDTH).round() as i32;
        let row = (point.x / row_height).round() as i32;
        (col, row)
    }

    /// Window-relative cell of a layout point
    #[must_use]
    pub fn cell(&self, point: Point, row_height: f64) -> (i32, i32) {
        let (col, row) = Self::tree_cell(point, row_height);
        (col - self.scroll_col, row - self.scroll_row)
    }

    /// Window-relative cell under a screen position, if inside the window
    #[must_use]
    pub fn from_screen(&self, column: u16, row: u16) -> Option<(i32, i32)> {
        let inside = column >= self.x
            && row >= self.y
            && column < self.x.saturating_add(self.width)
            && row < self.y.saturating_add(self.height);
        inside.then(|| (i32::from(column - self.x), i32::from(row - self.y)))
    }

    /// Scroll the least amount that brings `width` cells starting at the given
    /// absolute tree cell into view
    pub fn reveal(&mut self, col: i32, row: i32, width: i32) {
        let view_w = i32::from(self.width).max(1);
        let view_h = i32::from(self.height).max(1);

        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + view_h {
            self.scroll_row = row - view_h + 1;
        }

        let right = col + width.min(view_w);
        if col < self.scroll_col {
            self.scroll_col = col;
        } else if right > self.scroll_col + view_w {
            self.scroll_col = right - view_w;
        }
    }

    /// Move the window by whole cells
    pub fn scroll_by(&mut self, cols: i32, rows: i32) {
        self.scroll_col = self.scroll_col.saturating_add(cols);
        self.scroll_row = self.scroll_row.saturating_add(rows);
    }
}

/// Cells a node occupies on screen: glyph plus label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRegion {
    /// Node drawn there
    pub id: NodeId,
    /// Window-relative row
    pub row: i32,
    /// First column (the glyph)
    pub start: i32,
    /// One past the last label column
    pub end: i32,
}

/// Width in cells of a node's glyph, gap, and label
#[must_use]
pub fn node_width(node: &DrawnNode) -> i32 {
    i32::try_from(node.label.chars().count()).unwrap_or(i32::MAX - 2) + 2
}

/// Regions of the non-exiting nodes of a scene
#[must_use]
pub fn hit_regions(scene: &Scene, viewport: &Viewport, row_height: f64) -> Vec<HitRegion> {
    scene
        .nodes
        .iter()
        .filter(|node| !node.exiting)
        .map(|node| {
            let (col, row) = viewport.cell(node.position, row_height);
            HitRegion {
                id: node.id,
                row,
                start: col,
                end: col + node_width(node),
            }
        })
        .collect()
}

/// Topmost node at a window-relative cell
#[must_use]
pub fn node_at(regions: &[HitRegion], col: i32, row: i32) -> Option<NodeId> {
    regions
        .iter()
        .rev()
        .find(|region| region.row == row && (region.start..region.end).contains(&col))
        .map(|region| region.id)
}

/// A grid of styled characters
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<(char, Style)>,
}

fn join_line(existing: char, new: char) -> char {
    match (existing, new) {
        ('│', '└' | '┌') | ('└' | '┌', '│') | ('├', _) => '├',
        ('┐', '┘') | ('┘', '┐') | ('┤', _) => '┤',
        ('─', '│') | ('│', '─') => '┼',
        _ => new,
    }
}

impl Canvas {
    /// Blank canvas
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![(' ', Style::default()); usize::from(width) * usize::from(height)],
        }
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        let col = u16::try_from(col).ok().filter(|&c| c < self.width)?;
        let row = u16::try_from(row).ok().filter(|&r| r < self.height)?;
        Some(usize::from(row) * usize::from(self.width) + usize::from(col))
    }

    /// Character at a cell
    #[must_use]
    pub fn get(&self, col: i32, row: i32) -> Option<char> {
        self.index(col, row).map(|i| self.cells[i].0)
    }

    /// Set a cell; out of range is ignored
    pub fn put(&mut self, col: i32, row: i32, ch: char, style: Style) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = (ch, style);
        }
    }

    fn put_line(&mut self, col: i32, row: i32, ch: char, style: Style) {
        if let Some(i) = self.index(col, row) {
            let joined = join_line(self.cells[i].0, ch);
            self.cells[i] = (joined, style);
        }
    }

    /// Write text left to right
    pub fn text(&mut self, col: i32, row: i32, text: &str, style: Style) {
        for (offset, ch) in (0..).zip(text.chars()) {
            self.put(col + offset, row, ch, style);
        }
    }

    /// Horizontal line, both ends inclusive
    pub fn hline(&mut self, row: i32, from: i32, to: i32, style: Style) {
        for col in from.min(to)..=from.max(to) {
            self.put_line(col, row, '─', style);
        }
    }

    /// Vertical line, both ends inclusive
    pub fn vline(&mut self, col: i32, from: i32, to: i32, style: Style) {
        for row in from.min(to)..=from.max(to) {
            self.put_line(col, row, '│', style);
        }
    }

    /// Elbow connector from a parent cell to a child cell
    pub fn connector(&mut self, parent: (i32, i32), child: (i32, i32), style: Style) {
        let (c0, r0) = parent;
        let (c1, r1) = child;
        if c1 <= c0 + 1 {
            return;
        }
        let mid = c0 + (c1 - c0) / 2;
        if r0 == r1 {
            self.hline(r0, c0 + 1, c1 - 1, style);
            return;
        }
        self.hline(r0, c0 + 1, mid - 1, style);
        if (r1 - r0).abs() > 1 {
            self.vline(mid, r0.min(r1) + 1, r0.max(r1) - 1, style);
        }
        self.hline(r1, mid + 1, c1 - 1, style);
        let (top, bottom) = if r1 > r0 { ('┐', '└') } else { ('┘', '┌') };
        self.put_line(mid, r0, top, style);
        self.put_line(mid, r1, bottom, style);
    }

    /// Rows as ratatui lines, merging runs of equal style
    #[must_use]
    pub fn lines(&self) -> Vec<Line<'static>> {
        let width = usize::from(self.width).max(1);
        self.cells
            .chunks(width)
            .take(usize::from(self.height))
            .map(|row| {
                let mut spans: Vec<Span<'static>> = Vec::new();
                let mut run = String::new();
                let mut run_style = Style::default();
                for &(ch, style) in row {
                    if style != run_style && !run.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut run), run_style));
                    }
                    run_style = style;
                    run.push(ch);
                }
                if !run.is_empty() {
                    spans.push(Span::styled(run, run_style));
                }
                Line::from(spans)
            })
            .collect()
    }

    /// Row as plain text
    #[must_use]
    pub fn row_text(&self, row: i32) -> String {
        (0..i32::from(self.width))
            .filter_map(|col| self.get(col, row))
            .collect()
    }
}

/// Draw a scene into a canvas the size of the viewport
#[must_use]
pub fn paint(
    scene: &Scene,
    viewport: &Viewport,
    row_height: f64,
    selected: Option<NodeId>,
) -> Canvas {
    let mut canvas = Canvas::new(viewport.width, viewport.height);
    let edge_style = Style::default().fg(EDGE_COLOR);

    for edge in &scene.edges {
        let parent = viewport.cell(edge.segment.source, row_height);
        let child = viewport.cell(edge.segment.target, row_height);
        canvas.connector(parent, child, edge_style);
    }

    for node in &scene.nodes {
        let (col, row) = viewport.cell(node.position, row_height);
        let (glyph, glyph_style) = if node.collapsed {
            (COLLAPSED_GLYPH, Style::default().fg(COLLAPSED_COLOR))
        } else {
            (EXPANDED_GLYPH, Style::default())
        };
        let mut label_style = Style::default();
        if node.exiting {
            label_style = label_style.fg(EXITING_COLOR);
        } else if selected == Some(node.id) {
            label_style = label_style.add_modifier(Modifier::REVERSED);
        }
        canvas.put(col, row, glyph, if node.exiting { label_style } else { glyph_style });
        canvas.put(col + 1, row, ' ', Style::default());
        canvas.text(col + 2, row, &node.label, label_style);
    }

    canvas
}
