//! Status bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use fam_core::Category;

use crate::app::InputMode;
use crate::ui::theme::FamTheme;

/// Status bar showing mode, file state and the last message
pub struct StatusBarWidget<'a> {
    input_mode: InputMode,
    dirty: bool,
    theme: &'a FamTheme,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(input_mode: InputMode, dirty: bool, theme: &'a FamTheme) -> Self {
        Self {
            input_mode,
            dirty,
            theme,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (mode_text, mode_color) = match self.input_mode {
            InputMode::Normal => ("NORMAL", Color::Blue),
            InputMode::Rename => ("RENAME", Color::Green),
            InputMode::AddAspect => ("ASPECT", Color::Green),
            InputMode::Command => ("COMMAND", Color::Yellow),
        };

        let mut spans = vec![
            Span::styled(
                format!(" {mode_text} "),
                Style::default()
                    .fg(Color::Black)
                    .bg(mode_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
        ];

        if self.dirty {
            spans.push(Span::styled("[+] ", self.theme.count_style()));
        }

        if let Some(message) = self.message {
            spans.push(Span::styled(
                message.to_string(),
                Style::default().fg(self.theme.foreground),
            ));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// One-line legend of the category hotkeys, in category colours
pub struct HotkeyBarWidget<'a> {
    theme: &'a FamTheme,
}

impl<'a> HotkeyBarWidget<'a> {
    pub fn new(theme: &'a FamTheme) -> Self {
        Self { theme }
    }
}

impl Widget for HotkeyBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, category) in Category::ALL.iter().enumerate() {
            spans.push(Span::styled(
                format!(" {} ", i + 1),
                Style::default().add_modifier(Modifier::REVERSED),
            ));
            spans.push(Span::styled(
                format!(" {}  ", category.name()),
                self.theme.category_style(*category),
            ));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
