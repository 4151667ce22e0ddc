//! Terminal UI.
//!
//! Full-screen tree viewer on ratatui + crossterm. Clicks and key presses go to
//! [`App`], which drives the controller; each frame advances the render clock
//! and paints the resulting scene.

pub mod app;
pub mod canvas;


pub use app::App;

use crate::core::reference::Opener;
use crate::logger;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const IDLE_INTERVAL: Duration = Duration::from_millis(250);
const BORDER_COLOR: Color = Color::DarkGray;
const STATUS_COLOR: Color = Color::Gray;
const KEY_COLOR: Color = Color::Cyan;

/// Run the viewer until the user quits
///
/// # Errors
/// Returns an error if the terminal cannot be set up or drawn to
pub fn run<O: Opener>(mut app: App<O>) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let started = Instant::now();

    while !app.should_quit() {
        app.tick(started.elapsed());
        terminal.draw(|frame| draw(frame, &mut app))?;

        let timeout = if app.is_animating() {
            FRAME_INTERVAL
        } else {
            IDLE_INTERVAL
        };
        if event::poll(timeout)? {
            app.tick(started.elapsed());
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(width, height) => {
                    crate::debug!("Terminal resized to {width}x{height}");
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw<O: Opener>(frame: &mut Frame<'_>, app: &mut App<O>) {
    let [tree_area, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    let title = format!(" CWE-{} {} ", app.view().id(), app.view().title());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title);
    let inner = block.inner(tree_area);
    frame.render_widget(block, tree_area);

    app.set_area(inner);
    let tree = Paragraph::new(Text::from(app.paint().lines()));
    frame.render_widget(tree, inner);

    if app.show_settings() {
        draw_settings(frame, app, inner);
    }

    frame.render_widget(Paragraph::new(footer_line(app)), status_area);
}

fn draw_settings<O: Opener>(frame: &mut Frame<'_>, app: &App<O>, within: Rect) {
    let lines: Vec<Line<'_>> = app.settings_lines().into_iter().map(Line::from).collect();
    let width = lines
        .iter()
        .map(Line::width)
        .max()
        .unwrap_or(0)
        .saturating_add(4);
    let width = u16::try_from(width).unwrap_or(u16::MAX).min(within.width);
    let height = u16::try_from(lines.len() + 2)
        .unwrap_or(u16::MAX)
        .min(within.height);
    let area = Rect {
        x: within.x + within.width.saturating_sub(width),
        y: within.y,
        width,
        height,
    };

    let panel = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(KEY_COLOR))
            .title(" Settings (s) "),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(panel, area);
}

fn footer_line<O: Opener>(app: &App<O>) -> Line<'static> {
    let key = Style::default().fg(KEY_COLOR);
    let label = Style::default().fg(STATUS_COLOR);
    let mut spans = vec![
        Span::styled("⏎", key),
        Span::styled(" toggle  ", label),
        Span::styled("o", key),
        Span::styled(" open  ", label),
        Span::styled("v", key),
        Span::styled(" view  ", label),
        Span::styled("s", key),
        Span::styled(" settings  ", label),
        Span::styled("q", key),
        Span::styled(" quit", label),
    ];
    let status = app.status_line();
    if !status.is_empty() {
        spans.push(Span::styled("  │  ", label));
        spans.push(Span::raw(status));
    }
    Line::from(spans)
}

/// Raw-mode alternate screen with mouse capture, restored on drop.
/// Console logging is muted for the lifetime of the session.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        logger::mute_console();

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
    logger::unmute_console();
}
