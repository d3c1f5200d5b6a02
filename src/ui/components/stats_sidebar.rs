use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::stats::Stats;
use crate::ui::theme::{Theme, ThemeColors};

/// Running totals plus the session's mode flags.
pub struct StatsSidebar<'a> {
    stats: Stats,
    active_line: usize,
    line_count: usize,
    layout_name: &'a str,
    mapping: bool,
    strict: bool,
    theme: &'a Theme,
}

impl<'a> StatsSidebar<'a> {
    pub fn new(
        stats: Stats,
        (active_line, line_count): (usize, usize),
        layout_name: &'a str,
        (mapping, strict): (bool, bool),
        theme: &'a Theme,
    ) -> Self {
        Self {
            stats,
            active_line,
            line_count,
            layout_name,
            mapping,
            strict,
            theme,
        }
    }
}

pub fn accuracy_color(accuracy: f64, colors: &ThemeColors) -> Color {
    if accuracy >= 95.0 {
        colors.success()
    } else if accuracy >= 85.0 {
        colors.caution()
    } else {
        colors.mistake()
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

impl Widget for StatsSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let accuracy = self.stats.accuracy();
        let label = |text: &'static str| Span::styled(text, Style::default().fg(colors.fg()));

        let lines = vec![
            Line::from(vec![
                label("Accuracy: "),
                Span::styled(
                    format!("{accuracy:.1}%"),
                    Style::default().fg(accuracy_color(accuracy, colors)),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                label("Correct: "),
                Span::styled(
                    self.stats.correct_chars.to_string(),
                    Style::default().fg(colors.success()),
                ),
            ]),
            Line::from(vec![
                label("Close:   "),
                Span::styled(
                    self.stats.close_matches.to_string(),
                    Style::default().fg(colors.close()),
                ),
            ]),
            Line::from(vec![
                label("Errors:  "),
                Span::styled(
                    self.stats.mistakes.to_string(),
                    Style::default().fg(colors.mistake()),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                label("Line: "),
                Span::styled(
                    format!("{}/{}", self.active_line + 1, self.line_count),
                    Style::default().fg(colors.accent()),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                label("Layout: "),
                Span::styled(self.layout_name.to_string(), Style::default().fg(colors.accent())),
            ]),
            Line::from(vec![
                label("Mapping: "),
                Span::styled(on_off(self.mapping), Style::default().fg(colors.pending())),
            ]),
            Line::from(vec![
                label("Strict: "),
                Span::styled(on_off(self.strict), Style::default().fg(colors.pending())),
            ]),
        ];

        let block = Block::bordered()
            .title(" Stats ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
