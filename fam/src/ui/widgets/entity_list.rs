//! Ranked list of all fate objects

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use fam_core::{Collection, EntityId};

use crate::ui::theme::FamTheme;

/// Sidebar listing entities grouped by category, most used first
pub struct EntityListWidget<'a> {
    collection: &'a Collection,
    selected: Option<EntityId>,
    theme: &'a FamTheme,
    focused: bool,
}

impl<'a> EntityListWidget<'a> {
    pub fn new(collection: &'a Collection, theme: &'a FamTheme) -> Self {
        Self {
            collection,
            selected: None,
            theme,
            focused: false,
        }
    }

    pub fn selected(mut self, selected: Option<EntityId>) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for EntityListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Fate Objects ({}) ", self.collection.len()))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.collection.is_empty() {
            let hint = Line::from(Span::styled(
                "Press 1-5 to add a PC, NPC, location, situation or object",
                self.theme.system_style(),
            ));
            Paragraph::new(hint).render(inner, buf);
            return;
        }

        let ranked = self.collection.ranked();
        let selected_row = ranked
            .iter()
            .position(|e| Some(e.id()) == self.selected)
            .unwrap_or(0);

        // Keep the selected row visible
        let height = inner.height as usize;
        let offset = if height == 0 {
            0
        } else {
            selected_row.saturating_sub(height - 1)
        };

        let lines: Vec<Line> = ranked
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(row, entity)| {
                let name = if entity.name().is_empty() {
                    "(unnamed)"
                } else {
                    entity.name()
                };
                let mut line = Line::from(vec![
                    Span::styled(
                        format!("[{}] ", entity.category().short()),
                        self.theme.category_style(entity.category()),
                    ),
                    Span::raw(name.to_string()),
                    Span::styled(format!(" ({})", entity.total()), self.theme.count_style()),
                ]);
                if row == selected_row && self.selected.is_some() {
                    line = line.style(self.theme.selected_style());
                }
                line
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
