//! Detail card for the selected fate object

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use fam_core::Entity;

use crate::ui::theme::FamTheme;

/// Card showing one entity's header and its aspects ranked by use
pub struct FateCardWidget<'a> {
    entity: Option<&'a Entity>,
    selected_aspect: Option<&'a str>,
    theme: &'a FamTheme,
    focused: bool,
}

impl<'a> FateCardWidget<'a> {
    pub fn new(entity: Option<&'a Entity>, theme: &'a FamTheme) -> Self {
        Self {
            entity,
            selected_aspect: None,
            theme,
            focused: false,
        }
    }

    pub fn selected_aspect(mut self, label: Option<&'a str>) -> Self {
        self.selected_aspect = label;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for FateCardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(entity) = self.entity else {
            let block = Block::default()
                .title(" Aspects ")
                .borders(Borders::ALL)
                .border_style(self.theme.border_style(false));
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(Span::styled("Nothing selected", self.theme.system_style()))
                .render(inner, buf);
            return;
        };

        let category = entity.category();
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(category.name(), self.theme.category_style(category)),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_style(if self.focused {
                Style::default().fg(self.theme.category_color(category))
            } else {
                self.theme.border_style(false)
            });

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Aspects
                Constraint::Length(1), // Add hint
            ])
            .split(inner);

        // Header: short code, name, total
        let name = if entity.name().is_empty() {
            "(unnamed)"
        } else {
            entity.name()
        };
        let header = Line::from(vec![
            Span::styled(
                format!(" {} ", category.short()),
                Style::default()
                    .bg(self.theme.category_color(category))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(name.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(format!("total {}", entity.total()), self.theme.count_style()),
        ]);
        Paragraph::new(header).render(chunks[0], buf);

        // Aspects, most used first
        let lines: Vec<Line> = if entity.is_empty() {
            vec![Line::from(Span::styled(
                "No aspects yet",
                self.theme.system_style(),
            ))]
        } else {
            entity
                .ranked_aspects()
                .into_iter()
                .map(|(label, count)| {
                    let line = Line::from(vec![
                        Span::raw(format!("{label}: ")),
                        Span::styled(count.to_string(), self.theme.count_style()),
                    ]);
                    if Some(label) == self.selected_aspect {
                        line.style(self.theme.selected_style())
                    } else {
                        line
                    }
                })
                .collect()
        };
        Paragraph::new(lines).render(chunks[1], buf);

        let hint = Line::from(Span::styled(
            "+ a: add aspect   Enter: use aspect",
            self.theme.system_style(),
        ));
        Paragraph::new(hint).render(chunks[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fam_core::Category;
    use ratatui::style::Color;

    fn corner_color(focused: bool) -> Option<Color> {
        let theme = FamTheme::default();
        let entity = Entity::new(Category::Pc, "Avery", ["Brave"]);
        let area = Rect::new(0, 0, 30, 8);
        let mut buf = Buffer::empty(area);
        FateCardWidget::new(Some(&entity), &theme)
            .focused(focused)
            .render(area, &mut buf);
        buf.cell((0, 0)).and_then(|cell| cell.style().fg)
    }

    #[test]
    fn test_border_follows_focus() {
        assert_eq!(corner_color(true), Some(Color::Rgb(0, 204, 0)));
        assert_eq!(corner_color(false), Some(FamTheme::default().border));
    }
}
