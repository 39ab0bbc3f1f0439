use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Test-parameter picker: industry checkboxes, category and difficulty
/// cyclers, and a start row. Selection state lives in the app; this widget
/// only draws it.
pub struct StartMenu<'a> {
    pub industries: &'a [(String, bool)],
    pub category: &'a str,
    pub difficulty: &'a str,
    pub focus_row: usize,
    pub notice: Option<&'a str>,
    pub theme: &'a Theme,
}

impl StartMenu<'_> {
    fn row_line(&self, row: usize, text: String) -> Line<'static> {
        let colors = &self.theme.colors;
        let is_focused = row == self.focus_row;
        let indicator = if is_focused { ">" } else { " " };
        let style = Style::default()
            .fg(if is_focused { colors.accent() } else { colors.fg() })
            .add_modifier(if is_focused {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });
        Line::from(Span::styled(format!(" {indicator} {text}"), style))
    }
}

impl Widget for &StartMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let title = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Aptitude Test",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Pick industry, category and difficulty",
                Style::default().fg(colors.text_dim()),
            )),
        ])
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(Span::styled(
            "  Industry",
            Style::default().fg(colors.text_dim()),
        )));
        for (row, (industry, checked)) in self.industries.iter().enumerate() {
            let mark = if *checked { "[x]" } else { "[ ]" };
            lines.push(self.row_line(row, format!("{mark} {industry}")));
        }
        let base = self.industries.len();
        lines.push(Line::from(""));
        lines.push(self.row_line(base, format!("Category:   < {} >", self.category)));
        lines.push(self.row_line(base + 1, format!("Difficulty: < {} >", self.difficulty)));
        lines.push(Line::from(""));
        lines.push(self.row_line(base + 2, "Start Test".to_string()));

        Paragraph::new(lines).render(layout[1], buf);

        if let Some(notice) = self.notice {
            let warning = Paragraph::new(Line::from(Span::styled(
                format!("  {notice}"),
                Style::default().fg(colors.warning()),
            )));
            warning.render(layout[2], buf);
        }
    }
}
