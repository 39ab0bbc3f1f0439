use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::bank::question::Question;
use crate::session::quiz::AnswerRecord;
use crate::ui::theme::Theme;

/// Post-test answer review: every question with the correct option marked and
/// the user's pick highlighted where it was wrong. Scrolls by line.
pub struct ReviewList<'a> {
    pub questions: &'a [Question],
    pub answers: &'a HashMap<String, AnswerRecord>,
    pub scroll: usize,
    pub theme: &'a Theme,
}

impl ReviewList<'_> {
    /// Total rendered lines, used by the app to clamp scrolling.
    pub fn line_count(questions: &[Question]) -> usize {
        questions
            .iter()
            .map(|q| 2 + q.options.len() + usize::from(q.explanation.is_some()) + 1)
            .sum()
    }
}

impl Widget for &ReviewList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Review Answers ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for (i, question) in self.questions.iter().enumerate() {
            let answer = self.answers.get(&question.id);
            let answered_correctly = answer.is_some_and(|a| a.correct);
            let verdict = if answered_correctly { "+" } else { "x" };
            let verdict_color = if answered_correctly {
                colors.correct()
            } else {
                colors.incorrect()
            };

            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {verdict} "),
                    Style::default().fg(verdict_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("Q{}. {}", i + 1, question.prompt),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                ),
            ]));

            let selected = answer.and_then(|a| a.selected.as_deref());
            for (key, text) in &question.options {
                let is_correct_option = question.is_correct(key);
                let is_selected = selected == Some(key.as_str());
                let (mark, color) = if is_correct_option {
                    ("✓", colors.correct())
                } else if is_selected {
                    ("✗", colors.incorrect())
                } else {
                    (" ", colors.text_dim())
                };
                lines.push(Line::from(Span::styled(
                    format!("     {key}. {text} {mark}"),
                    Style::default().fg(color),
                )));
            }
            if selected.is_none() {
                lines.push(Line::from(Span::styled(
                    "     (not answered)",
                    Style::default().fg(colors.warning()),
                )));
            }

            if let Some(explanation) = &question.explanation {
                lines.push(Line::from(Span::styled(
                    format!("     Explanation: {explanation}"),
                    Style::default().fg(colors.text_dim()),
                )));
            }
            lines.push(Line::from(""));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll as u16, 0))
            .render(inner, buf);
    }
}
