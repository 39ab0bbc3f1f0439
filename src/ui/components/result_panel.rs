use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::quiz::SessionMode;
use crate::session::summary::{
    ResultSummary, improvement_tips, practice_message, score_message,
};
use crate::ui::theme::Theme;

/// Finished-session panel: headline, score, timing, per-category breakdown,
/// tips, and the persistence status line.
pub struct ResultPanel<'a> {
    pub summary: &'a ResultSummary,
    pub mode: SessionMode,
    pub player: &'a str,
    pub save_note: &'a str,
    pub theme: &'a Theme,
}

impl Widget for &ResultPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let summary = self.summary;

        let title = match self.mode {
            SessionMode::Fresh => " Test Results ".to_string(),
            SessionMode::Practice { round } => format!(" Practice Session #{round} "),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let score_color = if summary.percentage >= 70 {
            colors.success()
        } else if summary.percentage >= 30 {
            colors.warning()
        } else {
            colors.incorrect()
        };

        let mut lines: Vec<Line> = vec![Line::from("")];
        match self.mode {
            SessionMode::Fresh => {
                lines.push(Line::from(Span::styled(
                    format!("{}, {}!", score_message(summary.percentage), self.player),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )));
            }
            SessionMode::Practice { .. } => {
                let (headline, encouragement) = practice_message(summary.percentage);
                lines.push(Line::from(Span::styled(
                    format!("{headline} {}", self.player),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    encouragement,
                    Style::default().fg(colors.text_dim()),
                )));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("You scored ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}%", summary.percentage),
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    " ({} out of {} correct)",
                    summary.correct_count, summary.total_questions
                ),
                Style::default().fg(colors.fg()),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "Time taken: {}s | Average: {}s per question",
                summary.elapsed_secs,
                summary.avg_secs_per_question()
            ),
            Style::default().fg(colors.text_dim()),
        )));

        if !summary.category_stats.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "By category",
                Style::default().fg(colors.text_dim()),
            )));
            for (category, tally) in &summary.category_stats {
                let accuracy = tally.accuracy() * 100.0;
                let color = if accuracy >= 60.0 {
                    colors.success()
                } else {
                    colors.incorrect()
                };
                let weakest_mark =
                    if summary.weakest_category.as_deref() == Some(category.as_str()) {
                        "  <- weakest"
                    } else {
                        ""
                    };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {category}: {}/{}", tally.correct, tally.total),
                        Style::default().fg(color),
                    ),
                    Span::styled(weakest_mark, Style::default().fg(colors.warning())),
                ]));
            }

            lines.push(Line::from(""));
            for tip in improvement_tips(&summary.category_stats) {
                lines.push(Line::from(Span::styled(
                    format!("  {tip}"),
                    Style::default().fg(colors.text_dim()),
                )));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            self.save_note,
            Style::default().fg(colors.text_dim()).add_modifier(Modifier::ITALIC),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
