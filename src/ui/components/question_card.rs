use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::bank::question::Question;
use crate::ui::layout::format_clock;
use crate::ui::theme::Theme;

/// One question: position, countdown, prompt, and the option list with the
/// active selection highlighted.
pub struct QuestionCard<'a> {
    pub question: &'a Question,
    pub index: usize,
    pub total: usize,
    pub selected: Option<&'a str>,
    pub time_left: u32,
    pub theme: &'a Theme,
}

/// Countdown turns alarming below this many seconds.
const TIMER_LOW_SECS: u32 = 30;

impl Widget for &QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Question {} of {} ", self.index + 1, self.total))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(self.question.options.len() as u16 + 1),
            ])
            .split(inner);

        let timer_color = if self.time_left <= TIMER_LOW_SECS {
            colors.timer_low()
        } else {
            colors.fg()
        };
        let timer = Paragraph::new(Line::from(vec![
            Span::styled(" Time left: ", Style::default().fg(colors.text_dim())),
            Span::styled(
                format_clock(self.time_left),
                Style::default().fg(timer_color).add_modifier(Modifier::BOLD),
            ),
        ]));
        timer.render(layout[0], buf);

        let prompt = Paragraph::new(Line::from(Span::styled(
            format!(" {}", self.question.prompt),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: false });
        prompt.render(layout[2], buf);

        let mut option_lines: Vec<Line> = Vec::new();
        for (key, text) in &self.question.options {
            let is_selected = self.selected == Some(key.as_str());
            let marker = if is_selected { "(o)" } else { "( )" };
            let style = if is_selected {
                Style::default()
                    .fg(colors.option_selected_fg())
                    .bg(colors.option_selected_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            option_lines.push(Line::from(Span::styled(
                format!(" {marker} {key}. {text}"),
                style,
            )));
        }
        Paragraph::new(option_lines).render(layout[3], buf);
    }
}
