//! Color theme and styling for the aspect manager TUI

use fam_core::Category;
use ratatui::style::{Color, Modifier, Style};

/// UI color theme
#[derive(Debug, Clone)]
pub struct FamTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub highlight_bg: Color,

    // Text colors
    pub input_text: Color,
    pub system_text: Color,
    pub count_text: Color,
}

impl Default for FamTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            highlight_bg: Color::Rgb(50, 50, 60),

            input_text: Color::Cyan,
            system_text: Color::DarkGray,
            count_text: Color::Yellow,
        }
    }
}

impl FamTheme {
    /// Terminal colour for a category, taken from its metadata table
    pub fn category_color(&self, category: Category) -> Color {
        let (r, g, b) = category.color().to_rgb8();
        Color::Rgb(r, g, b)
    }

    /// Style for a category badge like `[P]`
    pub fn category_style(&self, category: Category) -> Style {
        Style::default()
            .fg(self.category_color(category))
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a selected row
    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for usage counts
    pub fn count_style(&self) -> Style {
        Style::default().fg(self.count_text)
    }

    /// Style for typed input
    pub fn input_style(&self) -> Style {
        Style::default()
            .fg(self.input_text)
            .add_modifier(Modifier::ITALIC)
    }

    /// Style for system messages and hints
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }
}
