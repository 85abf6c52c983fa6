//! Input field widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::InputMode;
use crate::ui::theme::FamTheme;

/// Single-line text input used for renames, new aspects and commands
pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    mode: InputMode,
    theme: &'a FamTheme,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, mode: InputMode, theme: &'a FamTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            mode,
            theme,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.mode {
            InputMode::Normal => "",
            InputMode::Rename => " Name ",
            InputMode::AddAspect => " New aspect ",
            InputMode::Command => " Command ",
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.mode.is_editing()));

        let inner = block.inner(area);
        block.render(area, buf);

        if !self.mode.is_editing() {
            let hint = Line::from(Span::styled(
                "1-5 new  r rename  a aspect  : command  ? help",
                self.theme.system_style(),
            ));
            Paragraph::new(hint).render(inner, buf);
            return;
        }

        let is_command = self.mode == InputMode::Command;
        let display_content = if is_command {
            self.content.strip_prefix(':').unwrap_or(self.content)
        } else {
            self.content
        };
        let cursor = if is_command {
            self.cursor_position.saturating_sub(1)
        } else {
            self.cursor_position
        };
        let prefix = if is_command { ":" } else { "> " };

        // Character-based slicing for unicode safety
        let before_cursor: String = display_content.chars().take(cursor).collect();
        let at_cursor = display_content
            .chars()
            .nth(cursor)
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after_cursor: String = display_content.chars().skip(cursor + 1).collect();

        let line = Line::from(vec![
            Span::styled(prefix, self.theme.input_style()),
            Span::raw(before_cursor),
            Span::styled(
                at_cursor,
                Style::default()
                    .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
                    .fg(self.theme.input_text),
            ),
            Span::raw(after_cursor),
        ]);

        Paragraph::new(line).render(inner, buf);
    }
}
