use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, Widget};

use crate::store::schema::ScoreRecord;
use crate::ui::theme::Theme;

/// Recent score records plus aggregate stats across the listed rows.
pub struct HistoryTable<'a> {
    pub records: &'a [ScoreRecord],
    pub theme: &'a Theme,
}

impl HistoryTable<'_> {
    fn aggregates(&self) -> (usize, u32, u32) {
        let taken = self.records.len();
        let best = self
            .records
            .iter()
            .map(|r| r.score_percent)
            .max()
            .unwrap_or(0);
        let average = if taken == 0 {
            0
        } else {
            let sum: u32 = self.records.iter().map(|r| r.score_percent).sum();
            sum / taken as u32
        };
        (taken, best, average)
    }
}

impl Widget for &HistoryTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Score History ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(3)])
            .split(inner);

        let (taken, best, average) = self.aggregates();
        let stats = Paragraph::new(Line::from(vec![
            Span::styled(" Tests: ", Style::default().fg(colors.text_dim())),
            Span::styled(
                taken.to_string(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Best: ", Style::default().fg(colors.text_dim())),
            Span::styled(
                format!("{best}%"),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Average: ", Style::default().fg(colors.text_dim())),
            Span::styled(
                format!("{average}%"),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
        ]));
        stats.render(layout[0], buf);

        if self.records.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                " No tests recorded yet. Finish a test to see it here.",
                Style::default().fg(colors.text_dim()),
            )));
            empty.render(layout[1], buf);
            return;
        }

        let header = Row::new(
            ["Date", "Category", "Difficulty", "Score", "Time", "Mode"]
                .into_iter()
                .map(Cell::from),
        )
        .style(
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = self
            .records
            .iter()
            .map(|record| {
                let score_color = if record.score_percent >= 70 {
                    colors.success()
                } else if record.score_percent >= 30 {
                    colors.warning()
                } else {
                    colors.incorrect()
                };
                Row::new(vec![
                    Cell::from(record.recorded_at.format("%Y-%m-%d %H:%M").to_string())
                        .style(Style::default().fg(colors.text_dim())),
                    Cell::from(record.category.clone())
                        .style(Style::default().fg(colors.fg())),
                    Cell::from(record.difficulty.clone())
                        .style(Style::default().fg(colors.fg())),
                    Cell::from(format!(
                        "{}% ({}/{})",
                        record.score_percent, record.correct_count, record.total_questions
                    ))
                    .style(Style::default().fg(score_color)),
                    Cell::from(format!("{}s", record.time_taken_secs))
                        .style(Style::default().fg(colors.text_dim())),
                    Cell::from(record.source.clone())
                        .style(Style::default().fg(colors.text_dim())),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(17),
                Constraint::Length(10),
                Constraint::Length(11),
                Constraint::Length(14),
                Constraint::Length(7),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .column_spacing(1);
        Widget::render(table, layout[1], buf);
    }
}
