//! Render orchestration for the aspect manager TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::widgets::{
    EntityListWidget, FateCardWidget, HotkeyBarWidget, InputWidget, StatusBarWidget,
};

/// Overlay types
#[derive(Debug, Clone)]
pub enum Overlay {
    Help,
}

/// Screen regions
struct AppLayout {
    title_area: Rect,
    list_area: Rect,
    card_area: Rect,
    hotkey_bar: Rect,
    input_area: Rect,
    status_bar: Rect,
}

impl AppLayout {
    fn calculate(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(5),    // Body
                Constraint::Length(1), // Category hotkeys
                Constraint::Length(3), // Input
                Constraint::Length(1), // Status
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);

        Self {
            title_area: rows[0],
            list_area: body[0],
            card_area: body[1],
            hotkey_bar: rows[2],
            input_area: rows[3],
            status_bar: rows[4],
        }
    }
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::calculate(area);

    render_title_bar(frame, app, layout.title_area);

    let list_widget = EntityListWidget::new(app.session.collection(), &app.theme)
        .selected(app.selected())
        .focused(!app.input_mode.is_editing());
    frame.render_widget(list_widget, layout.list_area);

    let entity = app.selected().and_then(|id| app.session.entity(id));
    let card_widget = FateCardWidget::new(entity, &app.theme)
        .selected_aspect(app.selected_aspect())
        .focused(!app.input_mode.is_editing());
    frame.render_widget(card_widget, layout.card_area);

    frame.render_widget(HotkeyBarWidget::new(&app.theme), layout.hotkey_bar);

    let input_widget = InputWidget::new(app.input_buffer(), app.input_mode, &app.theme)
        .cursor_position(app.cursor_position());
    frame.render_widget(input_widget, layout.input_area);

    let status_widget = StatusBarWidget::new(app.input_mode, app.session.is_dirty(), &app.theme)
        .message(app.status_message());
    frame.render_widget(status_widget, layout.status_bar);

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, overlay, area);
    }
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        " Fate Aspect Manager | {}{} ",
        app.session.path().display(),
        if app.session.is_dirty() { " [+]" } else { "" }
    );

    let line = Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_overlay(frame: &mut Frame, overlay: &Overlay, area: Rect) {
    match overlay {
        Overlay::Help => {
            let popup = centered_rect_fixed(56, 22, area);
            frame.render_widget(Clear, popup);

            let lines: Vec<Line> = HELP_LINES
                .iter()
                .map(|(keys, text)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{keys:<14}"),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(*text),
                    ])
                })
                .collect();

            let block = Block::default()
                .title(" Help (Esc to close) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan));

            frame.render_widget(
                Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
                popup,
            );
        }
    }
}

const HELP_LINES: &[(&str, &str)] = &[
    ("j / k", "select next / previous object"),
    ("J / K", "select next / previous aspect"),
    ("Enter, Space", "use the selected aspect (+1)"),
    ("1 - 5", "new PC / NPC / location / situation / object"),
    ("r", "rename the selected object"),
    ("a", "add an aspect (resets it if it exists)"),
    ("x", "remove the selected object"),
    ("w", "save"),
    ("q", "quit (refused with unsaved changes)"),
    ("", ""),
    (":w [path]", "save, optionally to a new file"),
    (":wq", "save and quit"),
    (":q!", "quit without saving"),
    (":e <path>", "open a file (:e! discards changes)"),
    (":m <path>", "merge a file into this one"),
    (":new", "remove every object"),
    ("", ""),
    ("Ctrl-C", "quit immediately"),
];

/// A rectangle of fixed size centred in `area`, clipped to fit
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
