//! Terminal rendering of the demo app: the shown windows stacked by depth,
//! the navigation state of the center manager, key help and the log tail.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::debug_log::DebugLogHandle;
use crate::keybindings::KeyBindings;
use crate::screens::{DemoApp, Screen, ScreenId};
use crate::window::WindowManager;

const BAR_WIDTH: usize = 10;

/// One shown window as the UI presents it.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRow {
    pub title: String,
    pub depth: i32,
    pub progress: f32,
    pub hiding: bool,
    pub current: bool,
    pub nested: bool,
}

impl WindowRow {
    fn from_screen(
        manager: &WindowManager<ScreenId>,
        id: ScreenId,
        title: String,
        screen: Option<&Screen>,
        nested: bool,
    ) -> Self {
        Self {
            title,
            depth: manager.window(id).map(|w| w.min_depth()).unwrap_or_default(),
            progress: screen.map(Screen::progress).unwrap_or(1.0),
            hiding: screen.is_some_and(Screen::is_hiding),
            current: manager.current_window_id() == Some(id),
            nested,
        }
    }

    pub fn bar(&self) -> String {
        let filled = ((self.progress.clamp(0.0, 1.0) * BAR_WIDTH as f32).round()) as usize;
        format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
    }
}

/// Shown windows, lowest depth first. Children of the rank panel follow
/// their parent.
pub fn window_rows(app: &DemoApp) -> Vec<WindowRow> {
    let center = app.center();
    let mut rows = Vec::new();
    for id in center.shown_ids_by_depth() {
        rows.push(WindowRow::from_screen(
            center,
            id,
            id.to_string(),
            app.screen(id),
            false,
        ));
        if id != ScreenId::Rank {
            continue;
        }
        if let Some(rank) = app.rank() {
            let children = rank.children();
            for child in children.shown_ids_by_depth() {
                rows.push(WindowRow::from_screen(
                    children,
                    child,
                    child.to_string(),
                    children.window_script::<Screen>(child),
                    true,
                ));
            }
        }
    }
    rows
}

pub fn status_lines(app: &DemoApp) -> Vec<String> {
    let center = app.center();
    let name = |id: Option<ScreenId>| id.map_or_else(|| "-".to_string(), |id| id.to_string());
    let mut lines = vec![
        format!("current: {}", name(center.current_window_id())),
        format!("last: {}", name(center.last_window_id())),
        format!("back depth: {}", center.back_depth()),
        format!("pending hides: {}", center.pending_hides()),
        format!("delayed shows: {}", center.pending_delayed_shows()),
        format!(
            "wait for hide: {}",
            if center.config().wait_for_hide_completion {
                "on"
            } else {
                "off"
            }
        ),
    ];
    for record in center.back_records() {
        let targets: Vec<String> = record.restore_targets.iter().map(|t| t.to_string()).collect();
        lines.push(format!(
            "  back: {} -> {}",
            record.hide_target,
            targets.join(", ")
        ));
    }
    lines
}

pub fn draw(frame: &mut Frame, app: &DemoApp, bindings: &KeyBindings, log: Option<&DebugLogHandle>) {
    let [top, bottom] =
        Layout::vertical([Constraint::Min(8), Constraint::Length(8)]).areas(frame.area());
    let [windows, side] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(top);
    let [status, help] =
        Layout::vertical([Constraint::Length(10), Constraint::Min(3)]).areas(side);

    draw_windows(frame, app, windows);
    draw_status(frame, app, status);
    draw_help(frame, bindings, help);
    draw_log(frame, log, bottom);
}

fn draw_windows(frame: &mut Frame, app: &DemoApp, area: Rect) {
    let lines: Vec<Line> = window_rows(app)
        .into_iter()
        .map(|row| {
            let indent = if row.nested { "  " } else { "" };
            let mut style = Style::default();
            if row.current {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            if row.hiding {
                style = style.fg(Color::DarkGray);
            }
            Line::from(vec![
                Span::styled(format!("{indent}{:<18}", row.title), style),
                Span::raw(format!(" {:>4} ", row.depth)),
                Span::raw(row.bar()),
            ])
        })
        .collect();
    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" windows "));
    frame.render_widget(widget, area);
}

fn draw_status(frame: &mut Frame, app: &DemoApp, area: Rect) {
    let lines: Vec<Line> = status_lines(app).into_iter().map(Line::from).collect();
    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" center "));
    frame.render_widget(widget, area);
}

fn draw_help(frame: &mut Frame, bindings: &KeyBindings, area: Rect) {
    let lines: Vec<Line> = bindings
        .help_entries()
        .into_iter()
        .map(|(action, keys)| Line::from(format!("{:<12} {action}", keys.join("/"))))
        .collect();
    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" keys "));
    frame.render_widget(widget, area);
}

fn draw_log(frame: &mut Frame, log: Option<&DebugLogHandle>, area: Rect) {
    let rows = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = log
        .map(|log| log.tail(rows))
        .unwrap_or_default()
        .into_iter()
        .map(Line::from)
        .collect();
    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" log "));
    frame.render_widget(widget, area);
}
